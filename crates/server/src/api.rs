//! Storefront JSON API.
//!
//! - `GET  /api/products[?category=<slug>]` list products, optionally by category slug
//! - `GET  /api/products/{id}`              single product or `404 {"error": ...}`
//! - `GET  /api/categories`                 category cards with product counts
//! - `POST /api/cart`                       add a product to the shared cart
//! - `GET  /api/cart`                       current cart summary

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use kihsa_core::catalog::CatalogSource;
use kihsa_core::domain::cart::{AddToCartRequest, AddToCartResponse, Cart, CartSummary};
use kihsa_core::domain::category::{Category, ALL_SLUG};
use kihsa_core::domain::product::{Product, ProductId};
use kihsa_core::errors::{ApplicationError, InterfaceError};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

#[derive(Clone)]
pub struct ApiState {
    source: Arc<dyn CatalogSource>,
    cart: Arc<RwLock<Cart>>,
}

impl ApiState {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source, cart: Arc::new(RwLock::new(Cart::default())) }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

type ApiError = (StatusCode, Json<ApiErrorBody>);

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
        .route("/api/categories", get(list_categories))
        .route("/api/cart", get(cart_summary).post(add_to_cart))
        .with_state(state)
}

fn correlation_id() -> String {
    format!("req-{}", Uuid::new_v4())
}

fn application_error(operation: &'static str, error: ApplicationError) -> ApiError {
    let interface = error.into_interface(correlation_id());
    error!(
        event_name = "api.request.failed",
        correlation_id = %interface.correlation_id(),
        operation,
        error = %interface,
        "catalog request failed"
    );

    let status = match &interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ApiErrorBody {
            error: interface.user_message().to_string(),
            correlation_id: Some(interface.correlation_id().to_string()),
        }),
    )
}

pub async fn list_products(
    State(state): State<ApiState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let listed = match query.category.as_deref() {
        None | Some("") | Some(ALL_SLUG) => state.source.list_products().await,
        Some(slug) => state.source.products_by_category(slug).await,
    };
    listed.map(Json).map_err(|error| application_error("list_products", error))
}

pub async fn get_product(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    match state.source.product(&ProductId(id)).await {
        Ok(Some(product)) => Ok(Json(product)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiErrorBody { error: PRODUCT_NOT_FOUND.to_string(), correlation_id: None }),
        )),
        Err(error) => Err(application_error("get_product", error)),
    }
}

pub async fn list_categories(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    state
        .source
        .categories()
        .await
        .map(Json)
        .map_err(|error| application_error("list_categories", error))
}

pub async fn add_to_cart(
    State(state): State<ApiState>,
    Json(request): Json<AddToCartRequest>,
) -> (StatusCode, Json<AddToCartResponse>) {
    let product = match state.source.product(&request.product_id).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, Json(AddToCartResponse::failed(PRODUCT_NOT_FOUND)));
        }
        Err(error) => {
            let (status, Json(body)) = application_error("add_to_cart", error);
            return (status, Json(AddToCartResponse::failed(body.error)));
        }
    };

    let mut cart = state.cart.write().await;
    match cart.add(&product, request.quantity) {
        Ok(()) => {
            info!(
                event_name = "api.cart.added",
                correlation_id = "cart",
                product_id = %product.id,
                quantity = request.quantity,
                total_items = cart.total_items(),
                "product added to cart"
            );
            (StatusCode::OK, Json(AddToCartResponse::added(&product.id, request.quantity)))
        }
        Err(error) => {
            warn!(
                event_name = "api.cart.rejected",
                correlation_id = "cart",
                product_id = %product.id,
                error = %error,
                "cart addition rejected"
            );
            (StatusCode::BAD_REQUEST, Json(AddToCartResponse::failed(error.to_string())))
        }
    }
}

pub async fn cart_summary(State(state): State<ApiState>) -> Json<CartSummary> {
    Json(state.cart.read().await.summary())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        extract::{Path, Query, State},
        http::{Request, StatusCode},
        Json,
    };
    use kihsa_core::catalog::Catalog;
    use kihsa_core::domain::cart::AddToCartRequest;
    use kihsa_core::domain::category::CategorySlug;
    use kihsa_core::domain::product::ProductId;
    use kihsa_db::repositories::SqlProductRepository;
    use kihsa_db::{connect_with_settings, migrations};
    use rust_decimal::Decimal;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn state() -> ApiState {
        ApiState::new(Arc::new(Catalog::sample()))
    }

    fn query(category: Option<&str>) -> Query<ProductQuery> {
        Query(ProductQuery { category: category.map(str::to_owned) })
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|product| product.id.as_str()).collect()
    }

    #[tokio::test]
    async fn products_are_filtered_by_slug() {
        let Json(all) = list_products(State(state()), query(None)).await.expect("all");
        assert_eq!(all.len(), 12);

        let Json(explicit_all) = list_products(State(state()), query(Some("all"))).await.expect("all");
        assert_eq!(explicit_all, all);

        let Json(rings) = list_products(State(state()), query(Some("rings"))).await.expect("rings");
        assert_eq!(ids(&rings), vec!["1", "7", "9"]);

        let Json(legacy) =
            list_products(State(state()), query(Some("necklace"))).await.expect("legacy");
        assert_eq!(ids(&legacy), vec!["2", "8", "10"]);

        let Json(unknown) =
            list_products(State(state()), query(Some("watches"))).await.expect("unknown");
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn missing_product_is_a_404_with_error_body() {
        let Json(found) =
            get_product(State(state()), Path("12".to_owned())).await.expect("product 12");
        assert_eq!(found.price, Decimal::new(49_999, 2));

        let (status, Json(body)) =
            get_product(State(state()), Path("999".to_owned())).await.expect_err("missing");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, ApiErrorBody { error: PRODUCT_NOT_FOUND.to_owned(), correlation_id: None });
    }

    #[tokio::test]
    async fn categories_carry_counts() {
        let Json(categories) = list_categories(State(state())).await.expect("categories");

        let counts: Vec<(CategorySlug, usize)> =
            categories.iter().map(|category| (category.slug, category.count)).collect();
        assert_eq!(
            counts,
            vec![
                (CategorySlug::Rings, 3),
                (CategorySlug::Necklaces, 3),
                (CategorySlug::Bangles, 2),
                (CategorySlug::Earrings, 3),
            ]
        );
    }

    #[tokio::test]
    async fn cart_accumulates_and_rejects_bad_requests() {
        let state = state();

        let (status, Json(added)) = add_to_cart(
            State(state.clone()),
            Json(AddToCartRequest { product_id: ProductId::new("1"), quantity: 2 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(added.success);
        assert_eq!(added.message, "Added product 1 to cart (quantity: 2)");

        let (status, Json(missing)) = add_to_cart(
            State(state.clone()),
            Json(AddToCartRequest { product_id: ProductId::new("999"), quantity: 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!missing.success);
        assert_eq!(missing.message, PRODUCT_NOT_FOUND);

        let (status, Json(zero)) = add_to_cart(
            State(state.clone()),
            Json(AddToCartRequest { product_id: ProductId::new("1"), quantity: 0 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!zero.success);

        let Json(summary) = cart_summary(State(state)).await;
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.subtotal, Decimal::new(259_998, 2));
    }

    #[tokio::test]
    async fn unavailable_database_maps_to_service_unavailable() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        pool.close().await;
        let state = ApiState::new(Arc::new(SqlProductRepository::new(pool)));

        let (status, Json(body)) =
            list_products(State(state.clone()), query(None)).await.expect_err("closed pool");
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.correlation_id.is_some_and(|id| id.starts_with("req-")));

        let (status, Json(response)) = add_to_cart(
            State(state),
            Json(AddToCartRequest { product_id: ProductId::new("1"), quantity: 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!response.success);
    }

    #[tokio::test]
    async fn routes_decode_query_path_and_body() {
        let app = router(state());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/products?category=earings")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let products: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(products.as_array().map(Vec::len), Some(3));
        assert_eq!(products[0]["price"], serde_json::json!(1099.99));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/products/404").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert_eq!(&body[..], br#"{"error":"Product not found"}"#);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cart")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"product_id":"6"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let added: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(added["message"], "Added product 6 to cart (quantity: 1)");
    }
}
