pub mod create;
pub mod delete;
pub mod get;
pub mod health;
pub mod list;
pub mod metrics;
pub mod products;
pub mod put;

pub use create::create_product;
pub use delete::delete_product;
pub use get::get_product;
pub use health::health_handler;
pub use list::list_products;
pub use metrics::metrics_handler;
pub use products::{product_item_handler, products_handler};
pub use put::put_product;

use anyhow::{anyhow, Context, Result};
use axum::http::StatusCode;
use serde_json::{json, Value as JsonValue};

use crate::error::ApiError;
use crate::models::Product;

/// Status and JSON body of a successful operation
pub type HandlerResult = Result<(StatusCode, JsonValue), ApiError>;

/// Decode a request body into a product, rejecting absent or malformed JSON
///
/// Bytes that are not valid UTF-8 are a decode failure, never repaired.
pub(crate) fn decode_product(body: Option<&[u8]>) -> Result<Product> {
    let body = body.ok_or_else(|| anyhow!("request body is required"))?;
    serde_json::from_slice(body).context("Failed to decode product from request body")
}

pub(crate) fn require_id(id: Option<&str>) -> Result<&str> {
    id.ok_or_else(|| anyhow!("missing path parameter 'id'"))
}

pub(crate) fn message_body(message: String) -> JsonValue {
    json!({ "message": message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_product_requires_body() {
        let err = decode_product(None).unwrap_err();
        assert_eq!(err.to_string(), "request body is required");
    }

    #[test]
    fn test_decode_product_fails_closed_on_malformed_json() {
        let err = decode_product(Some("{not json".as_bytes())).unwrap_err();
        assert!(format!("{:#}", err).starts_with("Failed to decode product from request body: "));
    }

    #[test]
    fn test_decode_product_accepts_partial_body() {
        let product = decode_product(Some(br#"{"name": "Mug"}"#.as_slice())).unwrap();
        assert_eq!(product.id, None);
        assert_eq!(product.fields.name, Some(serde_json::json!("Mug")));
        assert_eq!(product.fields.price, None);
    }

    #[test]
    fn test_decode_product_rejects_invalid_utf8() {
        let err = decode_product(Some(b"{\"id\":\"p\",\"name\":\"a\xFF\"}".as_slice())).unwrap_err();
        assert!(format!("{:#}", err).starts_with("Failed to decode product from request body: "));
    }
}
