use crate::error::{ApiError, ErrorResponse, Operation};
use crate::handlers::{message_body, require_id, HandlerResult};
use crate::models::MessageResponse;
use crate::routes;
use crate::store::RecordStore;
use axum::http::StatusCode;

/// DELETE /products/{id} handler - Remove a stored product
///
/// Looks the product up first and only deletes when it exists. A concurrent
/// delete between the two store calls is not guarded against.
#[utoipa::path(
    delete,
    path = routes::PRODUCT_ITEM,
    params(
        ("id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product<S: RecordStore + ?Sized>(store: &S, id: Option<&str>) -> HandlerResult {
    let internal = |err: anyhow::Error| ApiError::internal(Operation::Delete, err);

    let id = require_id(id).map_err(internal)?;

    if store.get(id).await.map_err(internal)?.is_none() {
        tracing::info!("Product not found for deletion with id: {}", id);
        return Err(ApiError::NotFound(format!("Product with id = {} NOT found", id)));
    }

    store.delete(id).await.map_err(internal)?;

    tracing::info!("Successfully deleted product with id: {}", id);
    Ok((
        StatusCode::OK,
        message_body(format!("Product with id = {} was deleted", id)),
    ))
}
