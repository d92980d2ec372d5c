use crate::error::{ApiError, ErrorResponse, Operation};
use crate::handlers::HandlerResult;
use crate::routes;
use crate::store::RecordStore;
use axum::http::StatusCode;
use serde_json::Value as JsonValue;

/// Maximum number of records returned by a list request
pub const PAGE_LIMIT: usize = 20;

/// GET /products handler - Return the first page of stored products
///
/// Records come back as stored, in store order. There is no continuation
/// token; anything past `PAGE_LIMIT` is omitted.
#[utoipa::path(
    get,
    path = routes::PRODUCTS,
    responses(
        (status = 200, description = "Up to 20 stored product records", body = Vec<serde_json::Value>),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_products<S: RecordStore + ?Sized>(store: &S) -> HandlerResult {
    let records = store
        .scan_limited(PAGE_LIMIT)
        .await
        .map_err(|err| ApiError::internal(Operation::GetAll, err))?;

    tracing::info!("Listed {} products (limit: {})", records.len(), PAGE_LIMIT);

    let items = records.into_iter().map(JsonValue::Object).collect();
    Ok((StatusCode::OK, JsonValue::Array(items)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::models::ProductFields;
    use crate::store::testing::FailingStore;

    #[tokio::test]
    async fn test_list_empty_store() {
        let store = InMemoryStore::new();

        let (status, body) = list_products(&store).await.unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, JsonValue::Array(vec![]));
    }

    #[tokio::test]
    async fn test_list_returns_raw_records() {
        let store = InMemoryStore::new();
        let fields = ProductFields {
            name: Some(serde_json::json!("Shelf")),
            price: None,
        };
        store.put("p-1", &fields).await.unwrap();

        let (_, body) = list_products(&store).await.unwrap();

        assert_eq!(body, serde_json::json!([{"id": "p-1", "name": "Shelf"}]));
    }

    #[tokio::test]
    async fn test_list_caps_at_page_limit() {
        let store = InMemoryStore::new();
        for i in 0..(PAGE_LIMIT + 5) {
            store
                .put(&format!("p-{}", i), &ProductFields::default())
                .await
                .unwrap();
        }

        let (_, body) = list_products(&store).await.unwrap();

        assert_eq!(body.as_array().unwrap().len(), PAGE_LIMIT);
    }

    #[tokio::test]
    async fn test_list_store_failure() {
        let store = FailingStore::default();

        let err = list_products(&store).await.unwrap_err();

        assert_eq!(
            err.message(),
            "Internal Server Error for GetAll :: store unavailable during scan"
        );
    }
}
