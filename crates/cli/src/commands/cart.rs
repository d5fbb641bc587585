use kihsa_client::ApiClient;
use kihsa_core::config::LoadOptions;
use kihsa_core::domain::product::ProductId;
use kihsa_core::errors::ApplicationError;

use crate::commands::{application_failure, load_config, runtime, CommandResult};

/// Adds to the backend cart at `api.base_url`.
pub fn add(options: &LoadOptions, product_id: &str, quantity: u32) -> CommandResult {
    let config = match load_config("cart-add", options) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let client = match ApiClient::new(&config.api) {
        Ok(client) => client,
        Err(error) => {
            return CommandResult::from_failure(
                "cart-add",
                application_failure(ApplicationError::from(error)),
            );
        }
    };
    let runtime = match runtime("cart-add") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let product_id = ProductId::new(product_id);
    let response = runtime.block_on(client.add_to_cart(&product_id, quantity));
    if response.success {
        CommandResult::with_data("cart-add", response.message.clone(), &response)
    } else {
        CommandResult::failure("cart-add", "integration", response.message, 7)
    }
}
