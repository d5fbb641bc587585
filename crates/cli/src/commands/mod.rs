pub mod cart;
pub mod catalog;
pub mod config;
pub mod doctor;
pub mod migrate;
pub mod seed;

use std::sync::Arc;

use kihsa_client::ApiClient;
use kihsa_core::catalog::Catalog;
use kihsa_core::config::{AppConfig, CatalogSourceKind, LoadOptions};
use kihsa_core::errors::ApplicationError;
use kihsa_core::storefront::Storefront;
use kihsa_db::repositories::SqlProductRepository;
use kihsa_db::{connect_with_config, migrations, DbPool};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

/// `(error_class, message, exit_code)` carried out of async command bodies.
pub(crate) type Failure = (&'static str, String, u8);

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn with_data(command: &str, message: impl Into<String>, data: &impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 3);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub(crate) fn from_failure(command: &str, (error_class, message, exit_code): Failure) -> Self {
        Self::failure(command, error_class, message, exit_code)
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Error class and exit code for a catalog-layer failure.
pub(crate) fn application_failure(error: ApplicationError) -> Failure {
    let (error_class, exit_code) = match &error {
        ApplicationError::Configuration(_) => ("config_validation", 2),
        ApplicationError::Domain(_) => ("domain", 3),
        ApplicationError::Persistence(_) => ("db_connectivity", 4),
        ApplicationError::NotFound { .. } => ("not_found", 6),
        ApplicationError::Integration(_) => ("integration", 7),
    };
    (error_class, error.to_string(), exit_code)
}

pub(crate) fn load_config(command: &str, options: &LoadOptions) -> Result<AppConfig, CommandResult> {
    AppConfig::load(options.clone()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

pub(crate) fn runtime(command: &str) -> Result<tokio::runtime::Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            3,
        )
    })
}

pub(crate) async fn connect_and_migrate(config: &AppConfig) -> Result<DbPool, Failure> {
    let pool = connect_with_config(&config.database)
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
    migrations::run_pending(&pool).await.map_err(|error| ("migration", error.to_string(), 5u8))?;
    Ok(pool)
}

/// Storefront over the configured catalog source. The pool, when present,
/// should be closed once the command is done with the storefront.
pub(crate) async fn open_storefront(
    config: &AppConfig,
) -> Result<(Storefront, Option<DbPool>), Failure> {
    match config.catalog.source {
        CatalogSourceKind::Static => Ok((Storefront::new(Arc::new(Catalog::sample())), None)),
        CatalogSourceKind::Database => {
            let pool = connect_and_migrate(config).await?;
            let repository = SqlProductRepository::new(pool.clone());
            Ok((Storefront::new(Arc::new(repository)), Some(pool)))
        }
        CatalogSourceKind::Api => {
            let client = ApiClient::new(&config.api)
                .map_err(|error| application_failure(ApplicationError::from(error)))?;
            Ok((Storefront::new(Arc::new(client)), None))
        }
    }
}
