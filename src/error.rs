use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// StoreError
///
/// Failures raised by a `ProductRepository` implementation. These are never translated
/// into client errors: every variant surfaces as a 500.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Error reported by the MongoDB driver (network, server, or BSON decoding).
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    /// The backing store refused the call.
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// ApiError
///
/// Every way a product request can fail. Handlers return `Result<_, ApiError>` and rely on
/// the `IntoResponse` impl below to produce the status code and `{"detail": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The `{id}` path segment is not a valid product identifier.
    #[error("ID inválido")]
    MalformedIdentifier,

    /// The request body is missing a field, has the wrong JSON type, or breaks a value constraint.
    #[error("{0}")]
    Validation(String),

    /// Missing or wrong API token.
    #[error("Token de API inválido")]
    Unauthorized,

    /// No product with the requested id.
    #[error("Produto não encontrado")]
    NotFound,

    /// A partial update carried no usable field.
    #[error("Nenhum campo para atualizar")]
    EmptyUpdateSet,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// ErrorBody
///
/// JSON shape of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedIdentifier => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EmptyUpdateSet => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body rejections (bad JSON syntax, wrong types, missing fields, wrong content type)
/// are all reported as validation failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = match &self {
            ApiError::Store(e) => {
                // Driver details stay in the logs.
                tracing::error!(error = %e, "document store call failed");
                "Erro interno do servidor".to_string()
            }
            other => other.to_string(),
        };

        let mut response = (status, Json(ErrorBody { detail })).into_response();

        if matches!(self, ApiError::Unauthorized) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
