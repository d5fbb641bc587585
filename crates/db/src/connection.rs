use std::str::FromStr;
use std::time::Duration;

use kihsa_core::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub type DbPool = sqlx::SqlitePool;

pub async fn connect_with_config(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(&config.url, config.max_connections, config.timeout_secs).await
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// File databases are created on first connect so a fresh checkout can migrate
/// and seed without a manual `touch`.
///
/// An in-memory database lives only as long as its connection, so those pools
/// hold exactly one connection and never retire it.
pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    pool_options
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect_with(options)
        .await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::{connect_with_settings, is_in_memory};
    use crate::migrations::run_pending;

    #[test]
    fn recognizes_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:catalog?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://kihsa.db"));
    }

    #[tokio::test]
    async fn in_memory_pool_keeps_one_schema_across_queries() {
        let pool = connect_with_settings("sqlite::memory:", 5, 5).await.expect("connect");
        assert_eq!(pool.options().get_max_connections(), 1);

        run_pending(&pool).await.expect("migrations");

        let (first, second) = tokio::join!(
            sqlx::query("SELECT COUNT(*) AS n FROM product").fetch_one(&pool),
            sqlx::query("SELECT COUNT(*) AS n FROM product").fetch_one(&pool),
        );
        assert_eq!(first.expect("first query").get::<i64, _>("n"), 0);
        assert_eq!(second.expect("second query").get::<i64, _>("n"), 0);

        pool.close().await;
    }
}
