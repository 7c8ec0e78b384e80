use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{post, put},
};

/// Protected Router Module
///
/// Create, update and delete. `create_router` wraps this router in the token
/// middleware, so a request without the shared secret is refused before its body is read.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // POST /products
        .route("/products", post(handlers::create_product))
        .route("/products/", post(handlers::create_product))
        // PUT/DELETE /products/{id}
        .route(
            "/products/{id}",
            put(handlers::update_product).delete(handlers::delete_product),
        )
}
