//! Maps a normalized product request onto one of the five product operations
//! and shapes every outcome into a JSON response with fixed headers.

use std::sync::Arc;

use anyhow::anyhow;
use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value as JsonValue;

use crate::error::{ApiError, Operation};
use crate::handlers;
use crate::metrics::Metrics;
use crate::store::RecordStore;

pub const CUSTOM_HEADER: HeaderName = HeaderName::from_static("x-custom-header");
const JSON: HeaderValue = HeaderValue::from_static("application/json");

/// An inbound request reduced to what routing needs
#[derive(Debug, Clone)]
pub struct ProductRequest {
    pub method: Method,
    pub id: Option<String>,
    pub body: Option<Bytes>,
    /// Why the path or body could not be read off the wire, if it could not
    pub malformed: Option<String>,
}

/// Outbound response: status, serialized JSON body and headers
#[derive(Debug, Clone)]
pub struct ProductResponse {
    pub status: StatusCode,
    pub body: String,
    pub headers: HeaderMap,
}

impl ProductResponse {
    pub fn new(status: StatusCode, body: &JsonValue) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: HeaderMap::new(),
        }
    }

    /// Replace whatever headers were set with exactly the two fixed ones
    pub fn finalize(mut self) -> Self {
        self.headers.clear();
        self.headers.insert(CONTENT_TYPE, JSON);
        self.headers.insert(CUSTOM_HEADER, JSON);
        self
    }
}

impl From<ApiError> for ProductResponse {
    fn from(err: ApiError) -> Self {
        let body = serde_json::json!({ "error": err.message() });
        ProductResponse::new(err.status(), &body)
    }
}

impl IntoResponse for ProductResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

/// The operation a request is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Upsert,
    Create,
    ListFirstPage,
    GetById,
    Delete,
    Unsupported,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Upsert,
        Route::Create,
        Route::ListFirstPage,
        Route::GetById,
        Route::Delete,
        Route::Unsupported,
    ];

    /// First match wins: PUT, POST, GET without id, GET with id, DELETE
    pub fn resolve(method: &Method, has_id: bool) -> Self {
        match *method {
            Method::PUT => Route::Upsert,
            Method::POST => Route::Create,
            Method::GET if !has_id => Route::ListFirstPage,
            Method::GET => Route::GetById,
            Method::DELETE => Route::Delete,
            _ => Route::Unsupported,
        }
    }

    /// Operation named in 500 responses; the fallback has none
    pub fn operation(self) -> Option<Operation> {
        match self {
            Route::Upsert => Some(Operation::Put),
            Route::Create => Some(Operation::Post),
            Route::ListFirstPage => Some(Operation::GetAll),
            Route::GetById => Some(Operation::GetById),
            Route::Delete => Some(Operation::Delete),
            Route::Unsupported => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Upsert => "upsert",
            Route::Create => "create",
            Route::ListFirstPage => "list",
            Route::GetById => "get_by_id",
            Route::Delete => "delete",
            Route::Unsupported => "unsupported",
        }
    }
}

/// Routes product requests to their handlers against a shared store
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn RecordStore>,
    metrics: Arc<Metrics>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn RecordStore>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    #[tracing::instrument(
        name = "product_request",
        skip_all,
        fields(method = %request.method, id = request.id.as_deref().unwrap_or("-"))
    )]
    pub async fn handle(&self, request: ProductRequest) -> ProductResponse {
        let route = Route::resolve(&request.method, request.id.is_some());
        self.metrics.record_request(route);
        tracing::debug!("Dispatching to {}", route.label());

        let result = match (request.malformed.as_deref(), route.operation()) {
            (Some(reason), Some(operation)) => {
                Err(ApiError::internal(operation, anyhow!("{}", reason)))
            }
            _ => {
                self.run(route, request.id.as_deref(), request.body.as_deref())
                    .await
            }
        };

        let response = match result {
            Ok((status, body)) => {
                if route == Route::ListFirstPage {
                    let count = body.as_array().map_or(0, Vec::len);
                    self.metrics.record_products_listed(count);
                }
                ProductResponse::new(status, &body)
            }
            Err(err) => {
                if err.status().is_server_error() {
                    tracing::error!("{} failed: {}", route.label(), err);
                } else {
                    tracing::info!("{} rejected: {}", route.label(), err);
                }
                self.metrics.record_failure();
                ProductResponse::from(err)
            }
        };

        tracing::debug!("Responding with status {}", response.status);
        response.finalize()
    }

    async fn run(
        &self,
        route: Route,
        id: Option<&str>,
        body: Option<&[u8]>,
    ) -> handlers::HandlerResult {
        let store = self.store.as_ref();
        match route {
            Route::Upsert => handlers::put_product(store, id, body).await,
            Route::Create => handlers::create_product(store, body).await,
            Route::ListFirstPage => handlers::list_products(store).await,
            Route::GetById => match id {
                Some(id) => handlers::get_product(store, id).await,
                None => Err(ApiError::UnsupportedRoute),
            },
            Route::Delete => handlers::delete_product(store, id).await,
            Route::Unsupported => Err(ApiError::UnsupportedRoute),
        }
    }
}
