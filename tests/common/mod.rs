use client_manager::ConnectionManager;

const SCHEMA: &str = include_str!("../fixtures/clientes_sqlite.sql");

pub async fn create_test_manager() -> ConnectionManager {
    let manager = ConnectionManager::new("sqlite::memory:").max_connections(1);
    let pool = manager.initialize().await.unwrap();
    sqlx::query(SCHEMA).execute(pool).await.unwrap();
    manager
}
