use std::sync::Arc;

use kihsa_core::catalog::{Catalog, CatalogSource};
use kihsa_core::config::{AppConfig, CatalogSourceKind, ConfigError, LoadOptions};
use kihsa_db::repositories::{RepositoryError, SqlProductRepository};
use kihsa_db::{connect_with_config, migrations, seed_sample_catalog, DbPool};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub source: Arc<dyn CatalogSource>,
    /// Present only when the catalog is served from the database.
    pub db_pool: Option<DbPool>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog source `{0}` cannot back the server; use static or database")]
    UnsupportedSource(&'static str),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("catalog seeding failed: {0}")]
    Seed(#[source] RepositoryError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        catalog_source = config.catalog.source.as_str(),
        "starting application bootstrap"
    );

    match config.catalog.source {
        CatalogSourceKind::Static => {
            info!(
                event_name = "system.bootstrap.catalog_ready",
                correlation_id = "bootstrap",
                catalog_source = "static",
                "serving the built-in sample catalog"
            );
            Ok(Application { config, source: Arc::new(Catalog::sample()), db_pool: None })
        }
        CatalogSourceKind::Database => {
            let db_pool = connect_with_config(&config.database)
                .await
                .map_err(BootstrapError::DatabaseConnect)?;
            info!(
                event_name = "system.bootstrap.database_connected",
                correlation_id = "bootstrap",
                "database connection established"
            );

            migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
            info!(
                event_name = "system.bootstrap.migrations_applied",
                correlation_id = "bootstrap",
                "database migrations applied"
            );

            let repository = SqlProductRepository::new(db_pool.clone());
            let seeded = seed_sample_catalog(&repository).await.map_err(BootstrapError::Seed)?;
            info!(
                event_name = "system.bootstrap.catalog_ready",
                correlation_id = "bootstrap",
                catalog_source = "database",
                products = seeded.total,
                "serving the database catalog"
            );

            Ok(Application { config, source: Arc::new(repository), db_pool: Some(db_pool) })
        }
        CatalogSourceKind::Api => Err(BootstrapError::UnsupportedSource(CatalogSourceKind::Api.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use kihsa_core::config::{CatalogSourceKind, ConfigOverrides, LoadOptions};

    use crate::bootstrap::{bootstrap, BootstrapError};

    fn options(source: CatalogSourceKind, database_url: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                catalog_source: Some(source),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn static_source_needs_no_database() {
        let app = bootstrap(options(CatalogSourceKind::Static, "sqlite::memory:"))
            .await
            .expect("static bootstrap");

        assert!(app.db_pool.is_none());
        assert_eq!(app.source.describe(), "static");
        assert_eq!(app.source.list_products().await.expect("list").len(), 12);
    }

    #[tokio::test]
    async fn database_source_migrates_and_seeds() {
        let app = bootstrap(options(CatalogSourceKind::Database, "sqlite::memory:"))
            .await
            .expect("database bootstrap");

        assert_eq!(app.source.describe(), "database");
        let rings = app.source.products_by_category("rings").await.expect("rings");
        let ids: Vec<&str> = rings.iter().map(|product| product.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "7", "9"]);

        if let Some(pool) = app.db_pool {
            pool.close().await;
        }
    }

    #[tokio::test]
    async fn api_source_is_rejected() {
        let result = bootstrap(options(CatalogSourceKind::Api, "sqlite::memory:")).await;

        assert!(matches!(result, Err(BootstrapError::UnsupportedSource("api"))));
    }
}
