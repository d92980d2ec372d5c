// Route path constants - single source of truth for all API paths

use axum::routing::{any, get};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{health_handler, metrics_handler, product_item_handler, products_handler};
use crate::state::AppState;

pub const HEALTH: &str = "/health";
pub const METRICS: &str = "/metrics";
pub const PRODUCTS: &str = "/products";
pub const PRODUCT_ITEM: &str = "/products/{id}";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Build the full application router
///
/// Product routes accept every method; the dispatcher decides what each
/// method means and answers unsupported ones itself.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH, get(health_handler))
        .route(METRICS, get(metrics_handler))
        .route(PRODUCTS, any(products_handler))
        .route(PRODUCT_ITEM, any(product_item_handler))
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
