use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{CreateProductRequest, Product, ProductId, StatusMessage, UpdateProductRequest},
    repository::LIST_LIMIT,
};

/// root
///
/// [Public Route] Liveness probe with a fixed confirmation message.
pub async fn root() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "API de Produtos rodando com sucesso!".to_string(),
    })
}

/// create_product
///
/// [Protected Route] Validates the payload and inserts it. The id is always generated
/// by the persistence layer; the response carries it as `_id` with status 201.
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(payload) = payload?;
    let new_product = payload.validate()?;

    let product = state.repo.insert_product(new_product).await?;
    tracing::info!(product_id = %product.id, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// list_products
///
/// [Public Route] Up to `LIST_LIMIT` products in store order. An empty store is `[]`.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.repo.list_products(LIST_LIMIT).await?;
    Ok(Json(products))
}

/// get_product
///
/// [Public Route] A malformed id is rejected before the store is queried.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id: ProductId = id.parse()?;

    state
        .repo
        .find_product(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// update_product
///
/// [Protected Route] Partial update. The id is checked first, then the body: omitted and
/// `null` fields are dropped, an empty remainder is refused, and supplied values must pass
/// the same checks as on create. Returns the full record after the write.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let id: ProductId = id.parse()?;
    let Json(payload) = payload?;
    let changes = payload.into_changes()?;

    match state.repo.update_product(&id, changes).await? {
        Some(product) => {
            tracing::info!(product_id = %id, "product updated");
            Ok(Json(product))
        }
        None => Err(ApiError::NotFound),
    }
}

/// delete_product
///
/// [Protected Route] Hard delete. A second delete of the same id is a 404.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: ProductId = id.parse()?;

    if state.repo.delete_product(&id).await? {
        tracing::info!(product_id = %id, "product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
