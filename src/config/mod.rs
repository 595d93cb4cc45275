use std::time::Duration;

use serde::Deserialize;

use crate::db::DbError;

fn default_max_connections() -> u32 {
    5
}

fn default_timeout_secs() -> u64 {
    10
}

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database user (`DB_USER`)
    pub db_user: String,
    /// Database password (`DB_PASSWORD`)
    pub db_password: String,
    /// Database host (`DB_SERVER`)
    pub db_server: String,
    /// Database port (`DB_PORT`)
    pub db_port: u16,
    /// Database name (`DB_NAME`)
    pub db_name: String,
    /// Pool size (`DB_MAX_CONNECTIONS`)
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,
    /// Deadline for create/update/delete statements (`DB_TIMEOUT_SECS`)
    #[serde(default = "default_timeout_secs")]
    pub db_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self, DbError> {
        // A missing .env is fine, the variables may already be exported
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(err) if err.not_found() => {}
            Err(err) => return Err(DbError::Env(err)),
        }

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Deserialize configuration from explicit `(KEY, value)` pairs
    pub fn from_vars<I>(vars: I) -> Result<Self, DbError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Config>(vars)?)
    }

    /// Postgres connection URL assembled from the individual settings
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.db_user, self.db_password, self.db_server, self.db_port, self.db_name
        )
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout_secs)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config, DbError> {
    Config::load()
}
