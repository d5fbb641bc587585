//! HTTP client for a remote catalog backend.
//!
//! `ApiClient` speaks the storefront JSON API (`/api/products`, `/api/categories`,
//! `/api/cart`) and implements [`CatalogSource`] so the rest of the storefront can
//! treat a remote backend exactly like the static catalog or the database.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use kihsa_core::catalog::CatalogSource;
use kihsa_core::config::ApiConfig;
use kihsa_core::domain::cart::{AddToCartRequest, AddToCartResponse};
use kihsa_core::domain::category::{Category, CategoryFilter, CategoryName, CategorySlug};
use kihsa_core::domain::product::{Product, ProductId};
use kihsa_core::errors::ApplicationError;

pub mod error;

pub use error::ClientError;

pub const ADD_TO_CART_FAILURE: &str = "Failed to add product to cart";

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

/// Category entry as served by backends that only know `name`, `slug` and `count`.
#[derive(Debug, Deserialize)]
struct CategoryWire {
    name: String,
    slug: String,
    #[serde(default)]
    count: usize,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|error| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: error.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "url cannot carry a path".to_owned(),
            });
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET that treats 404 as absence.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        url: Url,
        category: Option<&str>,
    ) -> Result<Option<T>, ClientError> {
        let mut request = self.http.get(url.clone());
        if let Some(category) = category {
            request = request.query(&[("category", category)]);
        }

        debug!(event_name = "client.request", method = "GET", url = %url, "calling catalog api");
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ClientError::Status { url: url.to_string(), status: status.as_u16() });
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|source| ClientError::Decode { url: url.to_string(), source })
    }

    async fn get_required<T: DeserializeOwned>(
        &self,
        url: Url,
        category: Option<&str>,
    ) -> Result<T, ClientError> {
        let target = url.to_string();
        self.get_optional(url, category)
            .await?
            .ok_or(ClientError::Status { url: target, status: StatusCode::NOT_FOUND.as_u16() })
    }

    /// Lists products, optionally filtered by a category query value.
    pub async fn fetch_products(&self, category: Option<&str>) -> Result<Vec<Product>, ClientError> {
        self.get_required(self.endpoint(&["api", "products"]), category).await
    }

    pub async fn fetch_product(&self, id: &ProductId) -> Result<Option<Product>, ClientError> {
        self.get_optional(self.endpoint(&["api", "products", id.as_str()]), None).await
    }

    /// Categories keyed by canonical slug. Entries whose slug or name the
    /// storefront does not route are skipped.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ClientError> {
        let entries: Vec<CategoryWire> =
            self.get_required(self.endpoint(&["api", "categories"]), None).await?;

        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(slug) = resolve_slug(&entry) else {
                debug!(
                    event_name = "client.category.skipped",
                    name = %entry.name,
                    slug = %entry.slug,
                    "skipping category without a storefront route"
                );
                continue;
            };
            if seen.insert(slug) {
                categories.push(Category::for_slug(slug, entry.count));
            }
        }
        categories.sort_by_key(|category| {
            CategorySlug::ALL.iter().position(|slug| *slug == category.slug)
        });
        Ok(categories)
    }

    pub async fn try_add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<AddToCartResponse, ClientError> {
        let url = self.endpoint(&["api", "cart"]);
        let body = AddToCartRequest { product_id: product_id.clone(), quantity };

        debug!(event_name = "client.request", method = "POST", url = %url, "calling catalog api");
        let response = self
            .http
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { url: url.to_string(), status: status.as_u16() });
        }

        response
            .json::<AddToCartResponse>()
            .await
            .map_err(|source| ClientError::Decode { url: url.to_string(), source })
    }

    /// Adds to the remote cart. Never fails: any error is logged and reported
    /// as an unsuccessful response.
    pub async fn add_to_cart(&self, product_id: &ProductId, quantity: u32) -> AddToCartResponse {
        match self.try_add_to_cart(product_id, quantity).await {
            Ok(response) => response,
            Err(err) => {
                error!(
                    event_name = "client.cart.add_failed",
                    product_id = %product_id,
                    quantity,
                    error = %err,
                    "error adding product to cart"
                );
                AddToCartResponse::failed(ADD_TO_CART_FAILURE)
            }
        }
    }
}

fn resolve_slug(entry: &CategoryWire) -> Option<CategorySlug> {
    if let Some(slug) = CategorySlug::parse(&entry.slug) {
        return Some(slug);
    }
    match entry.name.parse::<CategoryName>() {
        // Only a category listed under its own slug gets a card.
        Ok(name) if name.slug().category_name() == name => Some(name.slug()),
        _ => None,
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    fn describe(&self) -> &'static str {
        "api"
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApplicationError> {
        Ok(self.fetch_products(None).await?)
    }

    async fn products_by_category(&self, slug: &str) -> Result<Vec<Product>, ApplicationError> {
        // The backend matches names case-insensitively, so only canonical slugs go upstream.
        match CategoryFilter::parse(slug) {
            CategoryFilter::All => Ok(self.fetch_products(None).await?),
            CategoryFilter::Category(slug) => Ok(self.fetch_products(Some(slug.as_str())).await?),
            CategoryFilter::Unknown(raw) => {
                debug!(event_name = "client.category.unknown", slug = %raw, "unknown category slug");
                Ok(Vec::new())
            }
        }
    }

    async fn product(&self, id: &ProductId) -> Result<Option<Product>, ApplicationError> {
        Ok(self.fetch_product(id).await?)
    }

    async fn categories(&self) -> Result<Vec<Category>, ApplicationError> {
        Ok(self.fetch_categories().await?)
    }

    async fn category(&self, slug: &str) -> Result<Option<Category>, ApplicationError> {
        let Some(slug) = CategorySlug::parse(slug) else {
            return Ok(None);
        };
        let categories = self.fetch_categories().await?;
        Ok(categories.into_iter().find(|category| category.slug == slug))
    }
}
