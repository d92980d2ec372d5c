use crate::error::{ApiError, ErrorResponse, Operation};
use crate::handlers::{decode_product, message_body, require_id, HandlerResult};
use crate::models::{MessageResponse, Product};
use crate::routes;
use crate::store::RecordStore;
use axum::http::StatusCode;

/// PUT /products/{id} handler - Create or fully replace a product
///
/// The body id must equal the path id; on a mismatch nothing is written.
#[utoipa::path(
    put,
    path = routes::PRODUCT_ITEM,
    params(
        ("id" = String, Path, description = "Product id, must match the body id")
    ),
    request_body = Product,
    responses(
        (status = 201, description = "Product created or replaced", body = MessageResponse),
        (status = 400, description = "Body id does not match path id", body = ErrorResponse),
        (status = 500, description = "Decode or database error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn put_product<S: RecordStore + ?Sized>(
    store: &S,
    id: Option<&str>,
    body: Option<&[u8]>,
) -> HandlerResult {
    let internal = |err: anyhow::Error| ApiError::internal(Operation::Put, err);

    let id = require_id(id).map_err(internal)?;
    let product = decode_product(body).map_err(internal)?;

    if product.id.as_deref() != Some(id) {
        tracing::warn!(
            "Rejected product upsert: body id {:?} does not match path id {}",
            product.id,
            id
        );
        return Err(ApiError::IdMismatch);
    }

    store.put(id, &product.fields).await.map_err(internal)?;

    tracing::info!("Successfully stored product with id: {}", id);
    Ok((
        StatusCode::CREATED,
        message_body(format!("Product with id = {} edited(created)", id)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::store::testing::FailingStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_creates_product() {
        let store = InMemoryStore::new();
        let body = json!({"id": "p-1", "name": "Lamp", "price": 19.5}).to_string();

        let (status, response) = put_product(&store, Some("p-1"), Some(body.as_bytes())).await.unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response, json!({"message": "Product with id = p-1 edited(created)"}));
        let record = store.get("p-1").await.unwrap().unwrap();
        assert_eq!(record["name"], "Lamp");
    }

    #[tokio::test]
    async fn test_put_is_idempotent() {
        let store = InMemoryStore::new();
        let body = json!({"id": "p-1", "name": "Lamp", "price": 19.5}).to_string();

        let first = put_product(&store, Some("p-1"), Some(body.as_bytes())).await.unwrap();
        let second = put_product(&store, Some("p-1"), Some(body.as_bytes())).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_put_id_mismatch_writes_nothing() {
        let store = FailingStore::default();
        let body = json!({"id": "other", "name": "Lamp"}).to_string();

        let err = put_product(&store, Some("p-1"), Some(body.as_bytes())).await.unwrap_err();

        assert!(matches!(err, ApiError::IdMismatch));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_put_body_without_id_is_mismatch() {
        let store = InMemoryStore::new();
        let body = json!({"name": "Lamp"}).to_string();

        let err = put_product(&store, Some("p-1"), Some(body.as_bytes())).await.unwrap_err();

        assert!(matches!(err, ApiError::IdMismatch));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_put_malformed_body_is_internal_error() {
        let store = InMemoryStore::new();

        let err = put_product(&store, Some("p-1"), Some("{broken".as_bytes())).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().starts_with("Internal Server Error for Put :: "));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_put_store_failure() {
        let store = FailingStore::default();
        let body = json!({"id": "p-1"}).to_string();

        let err = put_product(&store, Some("p-1"), Some(body.as_bytes())).await.unwrap_err();

        assert_eq!(
            err.message(),
            "Internal Server Error for Put :: store unavailable during put"
        );
    }
}
