use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;

pub type DbPool = sqlx::SqlitePool;

/// Opens a pool with foreign keys enforced on every connection.
///
/// `sqlite::memory:` gives each connection its own database, so callers that
/// rely on shared state there should pass `max_connections = 1`.
pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

pub async fn ping(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::{connect_with_settings, ping};

    #[tokio::test]
    async fn connections_enforce_foreign_keys() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");

        let enabled: i64 =
            sqlx::query_scalar("PRAGMA foreign_keys").fetch_one(&pool).await.expect("pragma");

        assert_eq!(enabled, 1);
        pool.close().await;
    }

    #[tokio::test]
    async fn ping_fails_once_pool_is_closed() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        ping(&pool).await.expect("ping open pool");

        pool.close().await;

        assert!(ping(&pool).await.is_err());
    }
}
