use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Path the generated document is served under
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Paperstore API",
        version = "0.1.0",
        description = r#"
# Paperstore API

Catalog, property tagging and transactional order placement for a paper-goods storefront.

## Orders

`POST /api/order` resolves the customer by email, reserves stock for every line item and
stores the order with its entries in one database transaction. When any line fails
(`400` unknown product, `422` insufficient stock) nothing is written.

## Errors

Every failure returns the same body:

```json
{
  "error": "Unprocessable Entity",
  "message": "Not enough stock for product Kraft A4 (requested 5, available 1)",
  "details": { "productId": 1, "requested": 5, "available": 1 },
  "request_id": "4b0f...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Papers", description = "Paper product catalog"),
        (name = "Properties", description = "Product property tags"),
        (name = "Orders", description = "Order placement and administration"),
        (name = "Customers", description = "Customers created by order placement"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        // Papers
        crate::handlers::papers::list_papers,
        crate::handlers::papers::get_paper,
        crate::handlers::papers::create_paper,
        crate::handlers::papers::update_paper,
        crate::handlers::papers::delete_paper,

        // Properties
        crate::handlers::properties::list_properties,
        crate::handlers::properties::get_property,
        crate::handlers::properties::create_property,
        crate::handlers::properties::update_property,
        crate::handlers::properties::delete_property,
        crate::handlers::properties::can_delete_property,

        // Orders
        crate::handlers::orders::place_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::delete_order,

        // Customers
        crate::handlers::customers::list_customers,
        crate::handlers::customers::get_customer,

        // Health
        crate::health_check,
        crate::service_status,
    ),
    components(
        schemas(
            crate::handlers::papers::PaperRequest,
            crate::services::catalog::PaperResponse,
            crate::handlers::properties::PropertyRequest,
            crate::services::properties::PropertyResponse,
            crate::services::properties::DeleteCheck,
            crate::services::orders::PlaceOrderRequest,
            crate::services::orders::OrderLine,
            crate::services::orders::OrderResponse,
            crate::services::orders::OrderEntryResponse,
            crate::handlers::orders::UpdateOrderStatusRequest,
            crate::services::customers::CustomerResponse,
            crate::services::customers::CustomerDetailResponse,
            crate::services::customers::OrderSummary,
            crate::HealthResponse,
            crate::StatusResponse,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from(OPENAPI_JSON_PATH).try_it_out_enabled(true))
}
