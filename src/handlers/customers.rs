use crate::handlers::common::{map_service_error, success_response};
use crate::{
    errors::ApiError,
    services::customers::{CustomerDetailResponse, CustomerResponse},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Read-only customer routes; customers are created by order placement
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers))
        .route("/:id", get(get_customer))
}

#[utoipa::path(
    get,
    path = "/api/customer",
    responses(
        (status = 200, description = "Customers ordered by id", body = [CustomerResponse])
    ),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let customers = state
        .services
        .customers
        .list_customers()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(customers))
}

#[utoipa::path(
    get,
    path = "/api/customer/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer with order summaries", body = CustomerDetailResponse),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state
        .services
        .customers
        .get_customer(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(customer))
}
