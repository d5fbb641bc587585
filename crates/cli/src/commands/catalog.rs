use std::future::Future;

use kihsa_core::config::LoadOptions;
use kihsa_core::domain::category::ALL_SLUG;
use kihsa_core::domain::product::ProductId;
use kihsa_core::errors::ApplicationError;
use kihsa_core::storefront::Storefront;

use crate::commands::{application_failure, load_config, open_storefront, runtime, CommandResult};

fn with_storefront<F, Fut>(command: &str, options: &LoadOptions, body: F) -> CommandResult
where
    F: FnOnce(Storefront) -> Fut,
    Fut: Future<Output = CommandResult>,
{
    let config = match load_config(command, options) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match runtime(command) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        let (storefront, pool) = match open_storefront(&config).await {
            Ok(opened) => opened,
            Err(failure) => return CommandResult::from_failure(command, failure),
        };
        let result = body(storefront).await;
        if let Some(pool) = pool {
            pool.close().await;
        }
        result
    })
}

/// Category listing page for `category` (every product when absent).
pub fn products(options: &LoadOptions, category: Option<&str>) -> CommandResult {
    let slug = category.unwrap_or(ALL_SLUG);
    with_storefront("products", options, |storefront| async move {
        let page = storefront.category_page(slug).await;
        let message = match &page.category {
            Some(category) => format!("{} products in {}", page.products.len(), category.name),
            None => format!("{} products", page.products.len()),
        };
        CommandResult::with_data("products", message, &page)
    })
}

pub fn product(options: &LoadOptions, id: &str) -> CommandResult {
    let id = ProductId::new(id);
    with_storefront("product", options, |storefront| async move {
        match storefront.product_page(&id).await {
            Some(page) => CommandResult::with_data(
                "product",
                format!("{} ({} related)", page.product.name, page.related.len()),
                &page,
            ),
            None => CommandResult::from_failure(
                "product",
                application_failure(ApplicationError::NotFound {
                    entity: "product",
                    id: id.to_string(),
                }),
            ),
        }
    })
}

pub fn categories(options: &LoadOptions) -> CommandResult {
    with_storefront("categories", options, |storefront| async move {
        let categories = storefront.categories().await;
        CommandResult::with_data("categories", format!("{} categories", categories.len()), &categories)
    })
}
