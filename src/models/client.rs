use std::fmt;

use crate::db::DbError;

/// A persisted row of the `clientes` table.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: i64,
    #[sqlx(rename = "nombre")]
    pub name: String,
    #[sqlx(rename = "correo")]
    pub email: String,
    #[sqlx(rename = "telefono")]
    pub phone: String,
}

impl Client {
    /// The editable part of the record, used as the starting point for an update.
    pub fn fields(&self) -> NewClient {
        NewClient {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {:<4} | Name: {:<20} | Email: {:<30} | Phone: {}",
            self.id, self.name, self.email, self.phone
        )
    }
}

/// Client data without an id, as sent to create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl NewClient {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Name and email are mandatory; phone may be empty.
    pub fn validate(&self) -> Result<(), DbError> {
        if self.name.trim().is_empty() {
            return Err(DbError::Validation { field: "name" });
        }
        if self.email.trim().is_empty() {
            return Err(DbError::Validation { field: "email" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_phone_is_valid() {
        assert!(NewClient::new("Ana", "ana@x.com", "").validate().is_ok());
    }

    #[test]
    fn blank_name_or_email_is_rejected() {
        let err = NewClient::new("  ", "ana@x.com", "").validate().unwrap_err();
        assert!(matches!(err, DbError::Validation { field: "name" }));

        let err = NewClient::new("Ana", "", "555").validate().unwrap_err();
        assert!(matches!(err, DbError::Validation { field: "email" }));
    }

    #[test]
    fn display_pads_columns() {
        let client = Client {
            id: 7,
            name: "Ana".into(),
            email: "ana@x.com".into(),
            phone: "555".into(),
        };
        let line = client.to_string();
        assert!(line.starts_with("ID: 7    | Name: Ana "));
        assert!(line.ends_with("| Phone: 555"));
    }

    #[test]
    fn fields_drop_the_id() {
        let client = Client {
            id: 1,
            name: "Ana".into(),
            email: "ana@x.com".into(),
            phone: String::new(),
        };
        assert_eq!(client.fields(), NewClient::new("Ana", "ana@x.com", ""));
    }
}
