use std::env;
use std::fs;
use std::path::Path;

use kihsa_core::config::{resolve_config_path, AppConfig, ConfigOverrides, LoadOptions};
use serde::Serialize;
use toml::Value;

use crate::commands::{load_config, CommandResult};

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: String,
    pub source: String,
}

struct Field {
    key: &'static str,
    env_keys: &'static [&'static str],
    value: fn(&AppConfig) -> String,
    overridden: fn(&ConfigOverrides) -> bool,
}

const FIELDS: &[Field] = &[
    Field {
        key: "database.url",
        env_keys: &["KIHSA_DATABASE_URL"],
        value: |config| config.database.url.clone(),
        overridden: |overrides| overrides.database_url.is_some(),
    },
    Field {
        key: "database.max_connections",
        env_keys: &["KIHSA_DATABASE_MAX_CONNECTIONS"],
        value: |config| config.database.max_connections.to_string(),
        overridden: |_| false,
    },
    Field {
        key: "database.timeout_secs",
        env_keys: &["KIHSA_DATABASE_TIMEOUT_SECS"],
        value: |config| config.database.timeout_secs.to_string(),
        overridden: |_| false,
    },
    Field {
        key: "api.base_url",
        env_keys: &["KIHSA_API_URL"],
        value: |config| config.api.base_url.clone(),
        overridden: |overrides| overrides.api_base_url.is_some(),
    },
    Field {
        key: "api.timeout_secs",
        env_keys: &["KIHSA_API_TIMEOUT_SECS"],
        value: |config| config.api.timeout_secs.to_string(),
        overridden: |_| false,
    },
    Field {
        key: "server.bind_address",
        env_keys: &["KIHSA_SERVER_BIND_ADDRESS"],
        value: |config| config.server.bind_address.clone(),
        overridden: |_| false,
    },
    Field {
        key: "server.port",
        env_keys: &["KIHSA_SERVER_PORT"],
        value: |config| config.server.port.to_string(),
        overridden: |overrides| overrides.server_port.is_some(),
    },
    Field {
        key: "server.graceful_shutdown_secs",
        env_keys: &["KIHSA_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        value: |config| config.server.graceful_shutdown_secs.to_string(),
        overridden: |_| false,
    },
    Field {
        key: "catalog.source",
        env_keys: &["KIHSA_CATALOG_SOURCE"],
        value: |config| config.catalog.source.as_str().to_string(),
        overridden: |overrides| overrides.catalog_source.is_some(),
    },
    Field {
        key: "logging.level",
        env_keys: &["KIHSA_LOGGING_LEVEL", "KIHSA_LOG_LEVEL"],
        value: |config| config.logging.level.clone(),
        overridden: |overrides| overrides.log_level.is_some(),
    },
    Field {
        key: "logging.format",
        env_keys: &["KIHSA_LOGGING_FORMAT", "KIHSA_LOG_FORMAT"],
        value: |config| format!("{:?}", config.logging.format).to_lowercase(),
        overridden: |_| false,
    },
];

/// Effective configuration with the layer each value came from
/// (flag > env > file > default).
pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match load_config("config", options) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let entries: Vec<ConfigEntry> = FIELDS
        .iter()
        .map(|field| ConfigEntry {
            key: field.key,
            value: (field.value)(&config),
            source: field_source(
                field,
                &options.overrides,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        })
        .collect();

    CommandResult::with_data(
        "config",
        "effective config (source precedence: flag > env > file > default)",
        &entries,
    )
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &Field,
    overrides: &ConfigOverrides,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if (field.overridden)(overrides) {
        return "flag".to_string();
    }

    if let Some(env_key) = field.env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
