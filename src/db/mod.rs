mod clients;
mod error;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::atomic::{AtomicUsize, Ordering};

use sqlx::Connection;
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::Config;

pub use clients::{ClientRepository, DEFAULT_STATEMENT_TIMEOUT};
pub use error::DbError;

/// Owns the single database pool of the process.
///
/// The pool is created lazily by [`ConnectionManager::initialize`]; every
/// caller, concurrent or not, gets the same handle back.
pub struct ConnectionManager {
    url: String,
    max_connections: u32,
    pool: OnceCell<AnyPool>,
    setups: AtomicUsize,
}

impl ConnectionManager {
    /// The driver is picked from the URL scheme (`postgres://`, `sqlite:`).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            pool: OnceCell::new(),
            setups: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.database_url()).max_connections(config.db_max_connections)
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Open and ping the connection on first call; later calls return the
    /// existing handle. A failed attempt leaves the manager uninitialized.
    pub async fn initialize(&self) -> Result<&AnyPool, DbError> {
        self.pool
            .get_or_try_init(|| async {
                self.setups.fetch_add(1, Ordering::SeqCst);
                sqlx::any::install_default_drivers();

                debug!(max_connections = self.max_connections, "opening database pool");
                let pool = AnyPoolOptions::new()
                    .max_connections(self.max_connections)
                    .connect(&self.url)
                    .await
                    .map_err(|source| DbError::Connect { source })?;

                let mut conn = pool
                    .acquire()
                    .await
                    .map_err(|source| DbError::Ping { source })?;
                conn.ping().await.map_err(|source| DbError::Ping { source })?;

                info!("database connection established");
                Ok(pool)
            })
            .await
    }

    /// The live handle, if [`initialize`](Self::initialize) has succeeded.
    pub fn handle(&self) -> Option<&AnyPool> {
        self.pool.get()
    }

    /// Close the pool if one was opened. Safe to call repeatedly or before
    /// initialization.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            if !pool.is_closed() {
                pool.close().await;
                info!("database connection closed");
            }
        }
    }
}
