use crate::error::{ApiError, ErrorResponse, Operation};
use crate::handlers::{decode_product, message_body, HandlerResult};
use crate::models::{MessageResponse, Product};
use crate::routes;
use crate::store::RecordStore;
use axum::http::StatusCode;
use uuid::Uuid;

/// POST /products handler - Store a product under a freshly generated id
///
/// Any id in the body is ignored. The write is unconditional; there is no
/// existence check for the generated id.
#[utoipa::path(
    post,
    path = routes::PRODUCTS,
    request_body = Product,
    responses(
        (status = 201, description = "Product created", body = MessageResponse),
        (status = 500, description = "Decode or database error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product<S: RecordStore + ?Sized>(store: &S, body: Option<&[u8]>) -> HandlerResult {
    let internal = |err: anyhow::Error| ApiError::internal(Operation::Post, err);

    let product = decode_product(body).map_err(internal)?;
    let id = Uuid::new_v4().to_string();

    store.put(&id, &product.fields).await.map_err(internal)?;

    tracing::info!("Successfully created product with id: {}", id);
    Ok((
        StatusCode::CREATED,
        message_body(format!("Product with id = {} created", id)),
    ))
}
