use crate::error::{ApiError, ErrorResponse, Operation};
use crate::handlers::HandlerResult;
use crate::routes;
use crate::store::RecordStore;
use anyhow::anyhow;
use axum::http::StatusCode;
use serde_json::Value as JsonValue;

/// Reserved id that forces the failure path without touching the store
pub const FORCE_ERROR_ID: &str = "ForceError";

/// GET /products/{id} handler - Retrieve a stored product
#[utoipa::path(
    get,
    path = routes::PRODUCT_ITEM,
    params(
        ("id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Stored product record", body = serde_json::Value),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Database error or forced fault", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product<S: RecordStore + ?Sized>(store: &S, id: &str) -> HandlerResult {
    if id == FORCE_ERROR_ID {
        return Err(ApiError::internal(
            Operation::GetById,
            anyhow!("Forced error for fault-injection testing"),
        ));
    }

    match store
        .get(id)
        .await
        .map_err(|err| ApiError::internal(Operation::GetById, err))?
    {
        Some(record) => {
            tracing::info!("Successfully retrieved product with id: {}", id);
            Ok((StatusCode::OK, JsonValue::Object(record)))
        }
        None => {
            tracing::info!("Product not found with id: {}", id);
            Err(ApiError::NotFound(format!("Product with id = {} NOT found", id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::models::ProductFields;
    use crate::store::testing::FailingStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_existing_product() {
        let store = InMemoryStore::new();
        let fields = ProductFields {
            name: Some(json!("Kettle")),
            price: Some(json!(30.0)),
        };
        store.put("p-1", &fields).await.unwrap();

        let (status, body) = get_product(&store, "p-1").await.unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": "p-1", "name": "Kettle", "price": 30.0}));
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let store = InMemoryStore::new();

        let err = get_product(&store, "missing-42").await.unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Product with id = missing-42 NOT found");
    }

    #[tokio::test]
    async fn test_force_error_skips_store() {
        let store = FailingStore::default();

        let err = get_product(&store, FORCE_ERROR_ID).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.message(),
            "Internal Server Error for GetById :: Forced error for fault-injection testing"
        );
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_force_error_even_when_record_exists() {
        let store = InMemoryStore::new();
        store.put(FORCE_ERROR_ID, &ProductFields::default()).await.unwrap();

        let err = get_product(&store, FORCE_ERROR_ID).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_store_failure() {
        let store = FailingStore::default();

        let err = get_product(&store, "p-1").await.unwrap_err();

        assert_eq!(
            err.message(),
            "Internal Server Error for GetById :: store unavailable during get"
        );
    }
}
