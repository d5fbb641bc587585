pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod seed;

pub use connection::{connect_with_config, connect_with_settings, DbPool};
pub use seed::{seed_sample_catalog, SeedResult};
