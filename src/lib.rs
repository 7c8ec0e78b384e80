use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod validation;

pub mod routes;
use auth::ApiToken;
use routes::{protected, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{ApiError, StoreError};
pub use repository::{
    MemoryProductRepository, MongoProductRepository, ProductRepository, RepositoryState,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// AppState
///
/// Everything a request needs, built once in `main` and cloned into each handler.
/// Holds no mutable state of its own.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer (MongoDB in production, in-memory in tests).
    pub repo: RepositoryState,
    /// Immutable configuration, including the shared API token.
    pub config: AppConfig,
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// require_api_token
///
/// Route layer for the protected router. Extracting `ApiToken` is the whole check: on a
/// missing or wrong token the extractor rejects with 401 and the handler never runs.
async fn require_api_token(_token: ApiToken, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Merges the public and protected routers, attaches the token gate to the protected
/// side only, and wraps everything in request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let base_router = Router::new()
        .merge(public::public_routes())
        .merge(
            protected::protected_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_api_token,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// One `http_request` span per request, tagged with method, URI and the request id set
/// by `SetRequestIdLayer`, so every log line of a request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
