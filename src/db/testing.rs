use super::ConnectionManager;

pub const MEMORY_URL: &str = "sqlite::memory:";

pub const SCHEMA: &str = include_str!("../../tests/fixtures/clientes_sqlite.sql");

/// In-memory database with an empty `clientes` table. A single connection
/// keeps every query on the same memory database.
pub async fn memory_manager() -> ConnectionManager {
    let manager = ConnectionManager::new(MEMORY_URL).max_connections(1);
    let pool = manager.initialize().await.unwrap();
    sqlx::query(SCHEMA).execute(pool).await.unwrap();
    manager
}
