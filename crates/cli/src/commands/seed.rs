use kihsa_core::config::LoadOptions;
use kihsa_db::repositories::SqlProductRepository;
use kihsa_db::{seed_sample_catalog, SeedResult};

use crate::commands::{connect_and_migrate, load_config, runtime, CommandResult};

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match load_config("seed", options) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match runtime("seed") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = connect_and_migrate(&config).await?;
        let repository = SqlProductRepository::new(pool.clone());
        let seeded = seed_sample_catalog(&repository)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8));
        pool.close().await;
        seeded
    });

    match result {
        Ok(seeded) => CommandResult::success("seed", seed_message(&seeded)),
        Err(failure) => CommandResult::from_failure("seed", failure),
    }
}

fn seed_message(seeded: &SeedResult) -> String {
    if seeded.inserted == 0 {
        format!("catalog already holds {} products; nothing seeded", seeded.total)
    } else {
        format!("seeded {} sample products ({} total)", seeded.inserted, seeded.total)
    }
}

#[cfg(test)]
mod tests {
    use kihsa_db::SeedResult;

    use super::seed_message;

    #[test]
    fn message_reports_a_fresh_seed() {
        assert_eq!(
            seed_message(&SeedResult { inserted: 12, total: 12 }),
            "seeded 12 sample products (12 total)"
        );
    }

    #[test]
    fn message_reports_a_populated_catalog() {
        assert_eq!(
            seed_message(&SeedResult { inserted: 0, total: 12 }),
            "catalog already holds 12 products; nothing seeded"
        );
    }
}
