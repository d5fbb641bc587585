use std::env;
use std::sync::{Mutex, OnceLock};

use kihsa_cli::commands::{cart, catalog, config, doctor, migrate, seed};
use kihsa_core::config::{CatalogSourceKind, ConfigOverrides, LoadOptions, ENV_KEYS};
use serde_json::Value;

#[test]
fn products_lists_the_static_catalog() {
    with_env(&[], || {
        let result = catalog::products(&static_options(), None);
        assert_eq!(result.exit_code, 0, "expected successful listing");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "products");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["products"].as_array().map(Vec::len), Some(12));
        assert!(payload["data"]["category"].is_null());
    });
}

#[test]
fn products_filters_by_category_slug() {
    with_env(&[], || {
        let result = catalog::products(&static_options(), Some("rings"));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["category"]["slug"], "rings");
        assert_eq!(product_ids(&payload["data"]["products"]), vec!["1", "7", "9"]);
        assert_eq!(payload["message"], "3 products in Rings");
    });
}

#[test]
fn unknown_category_lists_nothing() {
    with_env(&[], || {
        let result = catalog::products(&static_options(), Some("watches"));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert!(payload["data"]["category"].is_null());
        assert_eq!(payload["data"]["products"].as_array().map(Vec::len), Some(0));
    });
}

#[test]
fn product_includes_material_and_related() {
    with_env(&[], || {
        let result = catalog::product(&static_options(), "4");
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["product"]["name"], "Sapphire Drop Earrings");
        assert_eq!(payload["data"]["category_slug"], "earrings");
        assert_eq!(payload["data"]["material"], "14K Gold, Gemstones");
        assert_eq!(product_ids(&payload["data"]["related"]), vec!["6", "12"]);
    });
}

#[test]
fn missing_product_returns_not_found_code() {
    with_env(&[], || {
        let result = catalog::product(&static_options(), "999");
        assert_eq!(result.exit_code, 6);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "not_found");
        assert_eq!(payload["message"], "product `999` was not found");
    });
}

#[test]
fn categories_report_counts() {
    with_env(&[], || {
        let result = catalog::categories(&static_options());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let counts: Vec<(String, u64)> = payload["data"]
            .as_array()
            .expect("category array")
            .iter()
            .map(|category| {
                (
                    category["slug"].as_str().unwrap_or_default().to_owned(),
                    category["count"].as_u64().unwrap_or_default(),
                )
            })
            .collect();
        assert_eq!(
            counts,
            vec![
                ("rings".to_owned(), 3),
                ("necklaces".to_owned(), 3),
                ("bangles".to_owned(), 2),
                ("earrings".to_owned(), 3),
            ]
        );
    });
}

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("KIHSA_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run(&LoadOptions::default());
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn seed_is_idempotent_and_feeds_the_database_source() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}", dir.path().join("kihsa.db").display());

    with_env(&[("KIHSA_DATABASE_URL", url.as_str())], || {
        let first = seed::run(&LoadOptions::default());
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        assert_eq!(parse_payload(&first.output)["message"], "seeded 12 sample products (12 total)");

        let second = seed::run(&LoadOptions::default());
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        assert_eq!(
            parse_payload(&second.output)["message"],
            "catalog already holds 12 products; nothing seeded"
        );

        let options = LoadOptions {
            overrides: ConfigOverrides {
                catalog_source: Some(CatalogSourceKind::Database),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        };
        let listed = catalog::products(&options, Some("necklace"));
        assert_eq!(listed.exit_code, 0);
        let payload = parse_payload(&listed.output);
        assert_eq!(product_ids(&payload["data"]["products"]), vec!["2", "8", "10"]);
    });
}

#[test]
fn invalid_env_returns_config_failure() {
    with_env(&[("KIHSA_API_URL", "ftp://kihsa.example")], || {
        let result = catalog::categories(&LoadOptions::default());
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "categories");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn config_attributes_values_to_their_layer() {
    with_env(&[("KIHSA_API_URL", "http://backend.internal:5000")], || {
        let result = config::run(&static_options());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let entries = payload["data"].as_array().expect("entries");
        let entry = |key: &str| {
            entries.iter().find(|entry| entry["key"] == key).cloned().unwrap_or(Value::Null)
        };

        assert_eq!(entry("api.base_url")["value"], "http://backend.internal:5000");
        assert_eq!(entry("api.base_url")["source"], "env (KIHSA_API_URL)");
        assert_eq!(entry("catalog.source")["source"], "flag");
        assert_eq!(entry("server.port")["value"], "5000");
        assert_eq!(entry("server.port")["source"], "default");
    });
}

#[test]
fn cart_add_reports_integration_failure_when_backend_is_down() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let address = listener.local_addr().expect("local addr");
    drop(listener);
    let base_url = format!("http://{address}");

    with_env(&[("KIHSA_API_URL", base_url.as_str())], || {
        let result = cart::add(&LoadOptions::default(), "1", 1);
        assert_eq!(result.exit_code, 7);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "cart-add");
        assert_eq!(payload["error_class"], "integration");
        assert_eq!(payload["message"], "Failed to add product to cart");
    });
}

#[test]
fn doctor_passes_for_the_static_catalog() {
    with_env(&[], || {
        let result = doctor::run(&static_options(), true);
        assert_eq!(result.exit_code, 0);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "pass");
        let statuses: Vec<&str> = report["checks"]
            .as_array()
            .expect("checks")
            .iter()
            .map(|check| check["status"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(statuses, vec!["pass", "skipped", "pass"]);
    });
}

#[test]
fn doctor_fails_with_config_code_when_config_is_invalid() {
    with_env(&[("KIHSA_SERVER_PORT", "not-a-port")], || {
        let result = doctor::run(&LoadOptions::default(), false);
        assert_eq!(result.exit_code, 2);
        assert!(result.output.starts_with("doctor: one or more readiness checks failed"));
        assert!(result.output.contains("- [skip] catalog_source"));
    });
}

fn static_options() -> LoadOptions {
    LoadOptions {
        overrides: ConfigOverrides {
            catalog_source: Some(CatalogSourceKind::Static),
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    }
}

fn product_ids(products: &Value) -> Vec<&str> {
    products
        .as_array()
        .map(|products| {
            products.iter().map(|product| product["id"].as_str().unwrap_or_default()).collect()
        })
        .unwrap_or_default()
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let previous_values: Vec<(&str, Option<String>)> =
        ENV_KEYS.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in ENV_KEYS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
