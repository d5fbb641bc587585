pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kihsa_core::config::{AppConfig, CatalogSourceKind, ConfigOverrides, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "kihsa",
    about = "Kihsa Jewels storefront CLI",
    long_about = "Browse the jewelry catalog, manage the product database, and inspect runtime configuration.",
    after_help = "Examples:\n  kihsa products --category rings\n  kihsa product 4\n  kihsa --source api cart-add 7 --quantity 2\n  kihsa doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (defaults to kihsa.toml or config/kihsa.toml)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Catalog source override: static, database or api")]
    source: Option<CatalogSourceKind>,
    #[arg(long, global = true, help = "Backend API base URL override")]
    api_url: Option<String>,
    #[arg(long, global = true, help = "Database URL override")]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List products, optionally for one category slug")]
    Products {
        #[arg(long, help = "Category slug (rings, necklaces, bangles, earrings or all)")]
        category: Option<String>,
    },
    #[command(about = "Show one product with its material and related products")]
    Product { id: String },
    #[command(about = "List categories with product counts")]
    Categories,
    #[command(about = "Add a product to the backend cart")]
    CartAdd {
        product_id: String,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the sample catalog into an empty product table")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, database connectivity, and the catalog source")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            require_file: self.config.is_some(),
            config_path: self.config.clone(),
            overrides: ConfigOverrides {
                database_url: self.database_url.clone(),
                api_base_url: self.api_url.clone(),
                catalog_source: self.source,
                ..ConfigOverrides::default()
            },
        }
    }
}

/// Logs go to stderr so stdout carries only the command's JSON.
fn init_logging(options: &LoadOptions) {
    use kihsa_core::config::LogFormat::*;
    use tracing::Level;

    let Ok(config) = AppConfig::load(options.clone()) else {
        return;
    };
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::WARN);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();
    init_logging(&options);

    let result = match cli.command {
        Command::Products { category } => commands::catalog::products(&options, category.as_deref()),
        Command::Product { id } => commands::catalog::product(&options, &id),
        Command::Categories => commands::catalog::categories(&options),
        Command::CartAdd { product_id, quantity } => {
            commands::cart::add(&options, &product_id, quantity)
        }
        Command::Migrate => commands::migrate::run(&options),
        Command::Seed => commands::seed::run(&options),
        Command::Config => commands::config::run(&options),
        Command::Doctor { json } => commands::doctor::run(&options, json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
