use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Liveness endpoints and product reads. No token required.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Fixed confirmation payload.
        .route("/", get(handlers::root))
        // GET /health
        // Plain-text probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /products
        // At most 100 products, store order.
        .route("/products", get(handlers::list_products))
        .route("/products/", get(handlers::list_products))
        // GET /products/{id}
        .route("/products/{id}", get(handlers::get_product))
}
