use axum::{
    extract::{FromRef, FromRequestParts, Query},
    http::{HeaderMap, Uri, header, request::Parts},
};
use serde::Deserialize;

use crate::{config::AppConfig, error::ApiError};

/// ApiToken
///
/// Proof that the request presented the configured shared secret. Carries no identity:
/// one token gates every mutating operation.
///
/// The token is read from `Authorization: Bearer <token>` or, failing that, from the
/// `token` query parameter. Rejection is `ApiError::Unauthorized` (401 with
/// `WWW-Authenticate: Bearer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiToken;

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn query_token(uri: &Uri) -> Option<String> {
    Query::<TokenQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(query)| query.token)
}

/// presented_token
///
/// The token the caller supplied, header first.
pub fn presented_token(parts: &Parts) -> Option<String> {
    bearer_token(&parts.headers).or_else(|| query_token(&parts.uri))
}

impl<S> FromRequestParts<S> for ApiToken
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        match presented_token(parts) {
            Some(token) if token == config.api_token => Ok(ApiToken),
            Some(_) => {
                tracing::warn!(method = %parts.method, uri = %parts.uri.path(), "invalid API token");
                Err(ApiError::Unauthorized)
            }
            None => {
                tracing::warn!(method = %parts.method, uri = %parts.uri.path(), "missing API token");
                Err(ApiError::Unauthorized)
            }
        }
    }
}
