use kihsa_core::catalog::sample;
use tracing::info;

use crate::repositories::{ProductRepository, RepositoryError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub inserted: usize,
    pub total: u64,
}

/// Loads the sample collection into an empty product store. A store that
/// already holds products is left untouched.
pub async fn seed_sample_catalog(
    repository: &dyn ProductRepository,
) -> Result<SeedResult, RepositoryError> {
    let existing = repository.count().await?;
    if existing > 0 {
        info!(
            event_name = "db.seed.skipped",
            correlation_id = "seed",
            existing,
            "product table already populated"
        );
        return Ok(SeedResult { inserted: 0, total: existing });
    }

    let products = sample::products();
    let inserted = products.len();
    for product in products {
        repository.save(product).await?;
    }

    let total = repository.count().await?;
    info!(event_name = "db.seed.applied", correlation_id = "seed", inserted, total, "sample catalog seeded");
    Ok(SeedResult { inserted, total })
}
