use std::future::Future;
use std::time::Duration;

use sqlx::AnyPool;
use tracing::{debug, warn};

use super::{ConnectionManager, DbError};
use crate::models::{Client, NewClient};

/// Deadline applied to every create, update and delete statement.
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(10);

const SELECT_ALL: &str = "SELECT id, nombre, correo, telefono FROM clientes ORDER BY id ASC";
const SELECT_BY_ID: &str = "SELECT id, nombre, correo, telefono FROM clientes WHERE id = $1";
const INSERT: &str = "INSERT INTO clientes (nombre, correo, telefono) VALUES ($1, $2, $3) RETURNING id";
const UPDATE: &str = "UPDATE clientes SET nombre = $1, correo = $2, telefono = $3 WHERE id = $4";
const DELETE: &str = "DELETE FROM clientes WHERE id = $1";

/// Data access for the `clientes` table.
///
/// Borrows the pool owned by a [`ConnectionManager`]; the repository never
/// opens or closes connections itself.
pub struct ClientRepository<'a> {
    pool: &'a AnyPool,
    timeout: Duration,
}

impl<'a> ClientRepository<'a> {
    /// Bind to the manager's connection. Fails if it has not been initialized.
    pub fn new(manager: &'a ConnectionManager) -> Result<Self, DbError> {
        let pool = manager.handle().ok_or(DbError::NotConnected)?;
        Ok(Self {
            pool,
            timeout: DEFAULT_STATEMENT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Client>, DbError> {
        let clients = sqlx::query_as::<_, Client>(SELECT_ALL)
            .fetch_all(self.pool)
            .await
            .map_err(DbError::query("list clients"))?;

        debug!(count = clients.len(), "listed clients");
        Ok(clients)
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<Client, DbError> {
        sqlx::query_as::<_, Client>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|source| DbError::Lookup { id, source })?
            .ok_or(DbError::NotFound { id })
    }

    /// Insert a client and return the id generated by the server.
    #[tracing::instrument(skip(self, client))]
    pub async fn create(&self, client: &NewClient) -> Result<i64, DbError> {
        client.validate()?;

        let insert = sqlx::query_scalar::<_, i64>(INSERT)
            .bind(&client.name)
            .bind(&client.email)
            .bind(&client.phone)
            .fetch_one(self.pool);

        let id = with_deadline("create client", self.timeout, insert).await?;
        debug!(id, "client created");
        Ok(id)
    }

    /// Replace name, email and phone of the client with `id`.
    ///
    /// An id that matches no row is not an error; the returned count is zero.
    #[tracing::instrument(skip(self, client))]
    pub async fn update(&self, id: i64, client: &NewClient) -> Result<u64, DbError> {
        client.validate()?;

        let update = sqlx::query(UPDATE)
            .bind(&client.name)
            .bind(&client.email)
            .bind(&client.phone)
            .bind(id)
            .execute(self.pool);

        let rows = with_deadline("update client", self.timeout, update)
            .await?
            .rows_affected();
        if rows == 0 {
            warn!(id, "update matched no client");
        }
        Ok(rows)
    }

    /// Hard delete. Like [`update`](Self::update), a missing id yields zero rows.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<u64, DbError> {
        let delete = sqlx::query(DELETE).bind(id).execute(self.pool);

        let rows = with_deadline("delete client", self.timeout, delete)
            .await?
            .rows_affected();
        if rows == 0 {
            warn!(id, "delete matched no client");
        }
        Ok(rows)
    }
}

/// Run `fut` under a fresh deadline. The future is dropped when the deadline
/// fires, which releases the connection it held.
async fn with_deadline<T, F>(
    operation: &'static str,
    after: Duration,
    fut: F,
) -> Result<T, DbError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result.map_err(DbError::query(operation)),
        Err(_) => Err(DbError::Timeout { operation, after }),
    }
}
