use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{MessageResponse, Product, ProductFields};

/// OpenAPI documentation
///
/// Product operations are documented per method, although they are served
/// by the two catch-all routes `products_handler` and `product_item_handler`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "rust-spanner-products API",
        version = "1.0.0",
        description = "CRUD over product records backed by Google Cloud Spanner"
    ),
    paths(
        handlers::health::health_handler,
        handlers::put::put_product,
        handlers::create::create_product,
        handlers::list::list_products,
        handlers::get::get_product,
        handlers::delete::delete_product
    ),
    components(
        schemas(
            Product,
            ProductFields,
            MessageResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "products", description = "Product record operations"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
