use kihsa_core::config::{AppConfig, CatalogSourceKind, LoadOptions};
use kihsa_db::connect_with_config;
use serde::Serialize;

use crate::commands::{open_storefront, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
    #[serde(skip)]
    exit_code: u8,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into(), exit_code: 0 }
    }

    fn fail(name: &'static str, details: impl Into<String>, exit_code: u8) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into(), exit_code }
    }

    fn skipped(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Skipped, details: details.into(), exit_code: 0 }
    }
}

/// Exit code is that of the first failing check, or 0.
pub fn run(options: &LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);
    let exit_code =
        report.checks.iter().find(|check| check.status == CheckStatus::Fail).map_or(0, |check| check.exit_code);

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(options: &LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options.clone()) {
        Ok(config) => {
            checks.push(DoctorCheck::pass("config_validation", "configuration loaded and validated"));
            let (database, catalog) = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime.block_on(async {
                    (check_database_connectivity(&config).await, check_catalog_source(&config).await)
                }),
                Err(error) => {
                    let details = format!("failed to initialize async runtime: {error}");
                    (
                        DoctorCheck::fail("database_connectivity", details.clone(), 3),
                        DoctorCheck::fail("catalog_source", details, 3),
                    )
                }
            };
            checks.push(database);
            checks.push(catalog);
        }
        Err(error) => {
            checks.push(DoctorCheck::fail("config_validation", error.to_string(), 2));
            checks.push(DoctorCheck::skipped(
                "database_connectivity",
                "skipped because configuration did not load",
            ));
            checks.push(DoctorCheck::skipped(
                "catalog_source",
                "skipped because configuration did not load",
            ));
        }
    }

    let all_pass = checks.iter().all(|check| check.status != CheckStatus::Fail);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

async fn check_database_connectivity(config: &AppConfig) -> DoctorCheck {
    if config.catalog.source != CatalogSourceKind::Database {
        return DoctorCheck::skipped(
            "database_connectivity",
            format!("catalog source is `{}`", config.catalog.source.as_str()),
        );
    }

    match connect_with_config(&config.database).await {
        Ok(pool) => {
            pool.close().await;
            DoctorCheck::pass(
                "database_connectivity",
                format!("connected using `{}`", config.database.url),
            )
        }
        Err(error) => DoctorCheck::fail(
            "database_connectivity",
            format!("failed to connect to database: {error}"),
            4,
        ),
    }
}

async fn check_catalog_source(config: &AppConfig) -> DoctorCheck {
    let (storefront, pool) = match open_storefront(config).await {
        Ok(opened) => opened,
        Err((_, message, exit_code)) => return DoctorCheck::fail("catalog_source", message, exit_code),
    };

    let source = storefront.source();
    let listed = source.list_products().await;
    if let Some(pool) = pool {
        pool.close().await;
    }

    match listed {
        Ok(products) => DoctorCheck::pass(
            "catalog_source",
            format!("{} products served from {}", products.len(), source.describe()),
        ),
        Err(error) => {
            let exit_code = if config.catalog.source == CatalogSourceKind::Api { 7 } else { 4 };
            DoctorCheck::fail("catalog_source", error.to_string(), exit_code)
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
