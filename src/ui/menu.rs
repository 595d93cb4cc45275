use std::io::{self, BufRead, Write};
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::db::ClientRepository;
use crate::models::{Client, NewClient};

const MENU: &str = "
    *** MAIN MENU ***
    1) List clients
    2) Find client by ID
    3) Create client
    4) Edit client
    5) Delete client
    6) Exit
    *****************";

// Represents a choice on the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    List,
    Find,
    Create,
    Edit,
    Delete,
    Exit,
}

impl MenuOption {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuOption::List),
            "2" => Some(MenuOption::Find),
            "3" => Some(MenuOption::Create),
            "4" => Some(MenuOption::Edit),
            "5" => Some(MenuOption::Delete),
            "6" => Some(MenuOption::Exit),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Interactive client menu reading lines from `input` and writing to `output`.
pub struct Menu<'a, R, W> {
    repo: &'a ClientRepository<'a>,
    input: R,
    output: W,
    invalid_delay: Duration,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(repo: &'a ClientRepository<'a>, input: R, output: W) -> Self {
        Self {
            repo,
            input,
            output,
            invalid_delay: Duration::from_secs(1),
        }
    }

    /// How long an invalid option message stays up before the menu redraws.
    pub fn invalid_delay(mut self, delay: Duration) -> Self {
        self.invalid_delay = delay;
        self
    }

    /// Run until the user picks Exit or input is exhausted.
    pub async fn run(&mut self) -> io::Result<()> {
        self.clear_screen()?;

        loop {
            writeln!(self.output, "{MENU}")?;
            write!(self.output, "Select an option: ")?;
            self.output.flush()?;

            let Some(choice) = self.read_line()? else {
                break;
            };

            let flow = match MenuOption::parse(&choice) {
                Some(MenuOption::Exit) => {
                    writeln!(self.output, "\nExiting.")?;
                    Flow::Exit
                }
                Some(option) => {
                    self.clear_screen()?;
                    match self.dispatch(option).await? {
                        Flow::Continue => self.pause()?,
                        Flow::Exit => Flow::Exit,
                    }
                }
                None => {
                    writeln!(self.output, "\nInvalid option. Please try again")?;
                    tokio::time::sleep(self.invalid_delay).await;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                break;
            }
            self.clear_screen()?;
        }

        Ok(())
    }

    async fn dispatch(&mut self, option: MenuOption) -> io::Result<Flow> {
        match option {
            MenuOption::List => self.list_clients().await,
            MenuOption::Find => self.find_client().await,
            MenuOption::Create => self.create_client().await,
            MenuOption::Edit => self.edit_client().await,
            MenuOption::Delete => self.delete_client().await,
            MenuOption::Exit => Ok(Flow::Exit),
        }
    }

    async fn list_clients(&mut self) -> io::Result<Flow> {
        match self.repo.list().await {
            Ok(clients) => {
                writeln!(self.output, "----\nRecords found: {}\n----", clients.len())?;
                for client in &clients {
                    writeln!(self.output, "{client}")?;
                }
            }
            Err(err) => writeln!(self.output, "\nError listing clients: {err}")?,
        }
        Ok(Flow::Continue)
    }

    async fn find_client(&mut self) -> io::Result<Flow> {
        let Some(id) = self.read_id()? else {
            return Ok(Flow::Exit);
        };
        if let Some(client) = self.lookup(id).await? {
            self.print_client(&client)?;
        }
        Ok(Flow::Continue)
    }

    async fn create_client(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "*** NEW CLIENT ***")?;

        let Some(name) = self.read_required("Name")? else {
            return Ok(Flow::Exit);
        };
        let Some(email) = self.read_required("Email")? else {
            return Ok(Flow::Exit);
        };
        let Some(phone) = self.read_optional("Phone", "")? else {
            return Ok(Flow::Exit);
        };

        match self.repo.create(&NewClient::new(name, email, phone)).await {
            Ok(id) => writeln!(self.output, "Client created successfully. ID: {id}")?,
            Err(err) => writeln!(self.output, "\nError creating client: {err}")?,
        }
        Ok(Flow::Continue)
    }

    async fn edit_client(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "*** EDIT CLIENT ***")?;

        let Some(id) = self.read_id()? else {
            return Ok(Flow::Exit);
        };
        let Some(existing) = self.lookup(id).await? else {
            return Ok(Flow::Continue);
        };
        self.print_client(&existing)?;

        let Some(name) = self.read_optional("Name", &existing.name)? else {
            return Ok(Flow::Exit);
        };
        let Some(email) = self.read_optional("Email", &existing.email)? else {
            return Ok(Flow::Exit);
        };
        let Some(phone) = self.read_optional("Phone", &existing.phone)? else {
            return Ok(Flow::Exit);
        };

        let updated = NewClient::new(name, email, phone);
        match self.repo.update(id, &updated).await {
            Ok(_) => writeln!(
                self.output,
                "\nClient updated. ID: {} | NAME: {} | EMAIL: {} | PHONE: {}",
                id, updated.name, updated.email, updated.phone
            )?,
            Err(err) => writeln!(self.output, "\nError updating client: {err}")?,
        }
        Ok(Flow::Continue)
    }

    async fn delete_client(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "*** DELETE CLIENT ***")?;

        let Some(id) = self.read_id()? else {
            return Ok(Flow::Exit);
        };

        write!(self.output, "Are you sure you want to delete client {id}? (y/n) ")?;
        self.output.flush()?;
        let Some(answer) = self.read_line()? else {
            return Ok(Flow::Exit);
        };
        if !answer.trim().eq_ignore_ascii_case("y") {
            writeln!(self.output, "Operation cancelled")?;
            return Ok(Flow::Continue);
        }

        match self.repo.delete(id).await {
            Ok(_) => writeln!(self.output, "\nClient {id} deleted")?,
            Err(err) => writeln!(self.output, "\nError deleting client: {err}")?,
        }
        Ok(Flow::Continue)
    }

    async fn lookup(&mut self, id: i64) -> io::Result<Option<Client>> {
        match self.repo.find_by_id(id).await {
            Ok(client) => Ok(Some(client)),
            Err(err) => {
                writeln!(self.output, "\nError: {err}")?;
                Ok(None)
            }
        }
    }

    fn print_client(&mut self, client: &Client) -> io::Result<()> {
        writeln!(self.output, "----\nRecord found\n----")?;
        writeln!(self.output, "{client}")
    }

    /// One line without its terminator, or `None` once input is exhausted.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        self.read_line()
    }

    fn read_id(&mut self) -> io::Result<Option<i64>> {
        loop {
            let Some(raw) = self.prompt("Client ID: ")? else {
                return Ok(None);
            };
            match raw.trim().parse::<i64>() {
                Ok(id) if id >= 1 => return Ok(Some(id)),
                _ => writeln!(self.output, "Invalid ID. It must be greater than 0")?,
            }
        }
    }

    fn read_required(&mut self, field: &str) -> io::Result<Option<String>> {
        loop {
            let Some(raw) = self.prompt(&format!("{field}: "))? else {
                return Ok(None);
            };
            let value = raw.trim();
            if !value.is_empty() {
                return Ok(Some(value.to_string()));
            }
            writeln!(self.output, "This field is required")?;
        }
    }

    /// Empty input keeps `current`.
    fn read_optional(&mut self, field: &str, current: &str) -> io::Result<Option<String>> {
        let text = if current.is_empty() {
            format!("{field} (optional): ")
        } else {
            format!("{field} [Current: {current}] (Enter to keep): ")
        };
        let Some(raw) = self.prompt(&text)? else {
            return Ok(None);
        };
        let value = raw.trim();
        if value.is_empty() {
            Ok(Some(current.to_string()))
        } else {
            Ok(Some(value.to_string()))
        }
    }

    fn pause(&mut self) -> io::Result<Flow> {
        match self.prompt("\nPress Enter to continue...")? {
            Some(_) => Ok(Flow::Continue),
            None => Ok(Flow::Exit),
        }
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::db::testing::memory_manager;

    async fn run_script(repo: &ClientRepository<'_>, script: &str) -> String {
        let mut output = Vec::new();
        Menu::new(repo, Cursor::new(script.as_bytes()), &mut output)
            .invalid_delay(Duration::ZERO)
            .run()
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn parses_menu_options() {
        assert_eq!(MenuOption::parse("1"), Some(MenuOption::List));
        assert_eq!(MenuOption::parse(" 6 "), Some(MenuOption::Exit));
        assert_eq!(MenuOption::parse("7"), None);
        assert_eq!(MenuOption::parse(""), None);
    }

    #[tokio::test]
    async fn exhausted_input_ends_the_loop() {
        let manager = memory_manager().await;
        let repo = ClientRepository::new(&manager).unwrap();
        let out = run_script(&repo, "").await;
        assert!(out.contains("MAIN MENU"));
    }

    #[tokio::test]
    async fn invalid_option_redraws_menu() {
        let manager = memory_manager().await;
        let repo = ClientRepository::new(&manager).unwrap();
        let out = run_script(&repo, "9\n6\n").await;
        assert!(out.contains("Invalid option. Please try again"));
        assert!(out.contains("Exiting."));
    }

    #[tokio::test]
    async fn create_reprompts_required_fields_then_lists() {
        let manager = memory_manager().await;
        let repo = ClientRepository::new(&manager).unwrap();

        let out = run_script(&repo, "3\n\nAna\nana@x.com\n\n\n1\n\n6\n").await;

        assert!(out.contains("This field is required"));
        assert!(out.contains("Client created successfully. ID: 1"));
        assert!(out.contains("Records found: 1"));

        let clients = repo.list().await.unwrap();
        assert_eq!(clients[0].fields(), NewClient::new("Ana", "ana@x.com", ""));
    }

    #[tokio::test]
    async fn find_reprompts_invalid_ids_and_reports_missing() {
        let manager = memory_manager().await;
        let repo = ClientRepository::new(&manager).unwrap();

        let out = run_script(&repo, "2\nabc\n0\n5\n\n6\n").await;

        assert_eq!(out.matches("Invalid ID. It must be greater than 0").count(), 2);
        assert!(out.contains("client with id 5 not found"));
    }

    #[tokio::test]
    async fn edit_keeps_values_left_blank() {
        let manager = memory_manager().await;
        let repo = ClientRepository::new(&manager).unwrap();
        let id = repo
            .create(&NewClient::new("Ana", "ana@x.com", ""))
            .await
            .unwrap();

        let script = format!("4\n{id}\nAna Maria\n\n555\n\n6\n");
        let out = run_script(&repo, &script).await;

        assert!(out.contains("Client updated."));
        let client = repo.find_by_id(id).await.unwrap();
        assert_eq!(client.fields(), NewClient::new("Ana Maria", "ana@x.com", "555"));
    }

    #[tokio::test]
    async fn edit_of_missing_client_stops_before_prompting() {
        let manager = memory_manager().await;
        let repo = ClientRepository::new(&manager).unwrap();

        let out = run_script(&repo, "4\n3\n\n6\n").await;

        assert!(out.contains("client with id 3 not found"));
        assert!(!out.contains("Name ["));
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let manager = memory_manager().await;
        let repo = ClientRepository::new(&manager).unwrap();
        let id = repo
            .create(&NewClient::new("Ana", "ana@x.com", ""))
            .await
            .unwrap();

        let out = run_script(&repo, &format!("5\n{id}\nn\n\n6\n")).await;
        assert!(out.contains("Operation cancelled"));
        assert!(repo.find_by_id(id).await.is_ok());

        let out = run_script(&repo, &format!("5\n{id}\ny\n\n6\n")).await;
        assert!(out.contains(&format!("Client {id} deleted")));
        assert!(repo.find_by_id(id).await.is_err());
    }
}
