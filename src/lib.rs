//! Console CRUD for the `clientes` table.
//!
//! [`db::ConnectionManager`] owns the single pool of the process,
//! [`db::ClientRepository`] runs the five client statements against it and
//! [`ui::Menu`] drives both from a line-based terminal menu.

pub mod config;
pub mod db;
pub mod models;
pub mod ui;

pub use config::Config;
pub use db::{ClientRepository, ConnectionManager, DbError};
pub use models::{Client, NewClient};
