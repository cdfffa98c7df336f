use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;

pub type DbPool = sqlx::SqlitePool;

pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(effective_max_connections(database_url, max_connections))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

pub fn is_in_memory(database_url: &str) -> bool {
    let url = database_url.trim();
    url == ":memory:" || url.contains(":memory:") || url.contains("mode=memory")
}

// Every connection to a private in-memory database opens a fresh, empty store.
fn effective_max_connections(database_url: &str, requested: u32) -> u32 {
    if is_in_memory(database_url) && !database_url.contains("cache=shared") {
        1
    } else {
        requested.max(1)
    }
}
