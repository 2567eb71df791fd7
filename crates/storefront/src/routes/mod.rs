//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness
//! GET  /health/ready                    - Database readiness
//!
//! # Account (gateway identity required)
//! POST /account/register                - Create the customer for this identity
//! GET  /account/details                 - Customer details
//! POST /account/details                 - Update customer details
//! GET  /account/addresses               - Addresses split into shipping/billing
//! POST /account/address                 - Add an address
//! PUT  /account/address/{id}            - Update an owned address
//! GET  /account/orders                  - Order history
//! GET  /account/orders/{id}             - Order detail
//!
//! # Catalog
//! GET  /product/{productId}             - Product detail with campaign pricing
//! GET  /products                        - Product listing
//! GET  /productsByCategory/{categoryId} - Products in a category
//! GET  /categories                      - Categories with product counts
//! GET  /brands                          - Manufacturers
//! GET  /countries                       - Countries
//! GET  /company                         - Company profile
//!
//! # Content
//! GET  /content/menu                    - Navigation menu document
//! GET  /content/footer                  - Footer document
//! ```
//!
//! Unknown paths and unsupported methods answer with the error envelope.

pub mod account;
pub mod catalog;
pub mod content;
pub mod health;
pub mod products;

use axum::{
    Router,
    extract::Request,
    middleware::from_fn,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::{
    RateLimitConfigError, api_rate_limiter, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(account::register))
        .route("/details", get(account::details).post(account::update_details))
        .route("/addresses", get(account::addresses))
        .route("/address", post(account::create_address))
        .route("/address/{id}", put(account::update_address))
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/product/{product_id}", get(products::show))
        .route("/products", get(products::index))
        .route("/productsByCategory/{category_id}", get(products::by_category))
        .route("/categories", get(catalog::categories))
        .route("/brands", get(catalog::brands))
        .route("/countries", get(catalog::countries))
        .route("/company", get(catalog::company))
}

/// Liveness and readiness checks.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Account, catalog and content routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/account", account_routes())
        .merge(catalog_routes())
        .route("/content/menu", get(content::menu))
        .route("/content/footer", get(content::footer))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    health_routes().merge(api_routes())
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// The full application: routes, state and the per-request middleware.
///
/// The Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    with_middleware(routes(), state)
}

/// [`app`] with the API routes behind the per-IP rate limiter.
///
/// # Errors
///
/// Returns `RateLimitConfigError` if the limiter settings are rejected.
pub fn rate_limited_app(state: AppState) -> Result<Router, RateLimitConfigError> {
    let api = api_routes().route_layer(api_rate_limiter()?);
    Ok(with_middleware(health_routes().merge(api), state))
}

fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                customer_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}
