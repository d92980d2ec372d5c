use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{Method, Uri};

use crate::dispatcher::{ProductRequest, ProductResponse};
use crate::routes;
use crate::state::AppState;

/// Split an extracted body into the dispatcher's body and malformed reason
///
/// An empty body is treated as absent.
fn split_body(body: Result<Bytes, BytesRejection>) -> (Option<Bytes>, Option<String>) {
    match body {
        Ok(bytes) if bytes.is_empty() => (None, None),
        Ok(bytes) => (Some(bytes), None),
        Err(rejection) => (None, Some(rejection.body_text())),
    }
}

/// The raw, still percent-encoded id segment, used when it fails to decode
fn raw_id(uri: &Uri) -> String {
    let prefix = format!("{}/", routes::PRODUCTS);
    uri.path()
        .strip_prefix(prefix.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Any method on /products
pub async fn products_handler(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> ProductResponse {
    let (body, malformed) = split_body(body);
    let request = ProductRequest {
        method,
        id: None,
        body,
        malformed,
    };
    state.dispatcher.handle(request).await
}

/// Any method on /products/{id}
///
/// Extractor failures are handed to the dispatcher instead of being answered
/// by axum, so they carry the same headers as every other product response.
pub async fn product_item_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> ProductResponse {
    let (body, body_fault) = split_body(body);
    let (id, path_fault) = match path {
        Ok(Path(id)) => (id, None),
        Err(rejection) => (raw_id(&uri), Some(rejection.body_text())),
    };
    let request = ProductRequest {
        method,
        id: Some(id),
        body,
        malformed: path_fault.or(body_fault),
    };
    state.dispatcher.handle(request).await
}
