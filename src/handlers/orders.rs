use crate::handlers::common::{
    map_service_error, no_content_response, success_response,
};
use crate::{
    errors::ApiError,
    services::orders::{OrderResponse, PlaceOrderRequest},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

/// Creates the router for order endpoints
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(place_order))
        .route(
            "/:id",
            get(get_order).put(update_order_status).delete(delete_order),
        )
}

/// Admin status change. Any other field in the body is ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// Trimmed before storage; blank is rejected
    #[schema(max_length = 64)]
    pub status: String,
}

/// Place an order
///
/// Resolves the customer by email, reserves stock for every line and stores the
/// order in one transaction. Nothing is persisted when any line fails.
#[utoipa::path(
    post,
    path = "/api/order",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse,
            headers(("Location" = String, description = "URL of the new order"))),
        (status = 400, description = "Invalid customer data, quantity, status, unknown product or oversized total", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse),
        (status = 500, description = "Database error", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .place_order(payload)
        .await
        .map_err(map_service_error)?;

    let location = format!("/api/order/{}", order.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(order),
    ))
}

#[utoipa::path(
    get,
    path = "/api/order",
    responses(
        (status = 200, description = "Orders ordered by id", body = [OrderResponse])
    ),
    tag = "Orders"
)]
pub async fn list_orders(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let orders = state
        .services
        .orders
        .list_orders()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(orders))
}

#[utoipa::path(
    get,
    path = "/api/order/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .get_order(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

#[utoipa::path(
    put,
    path = "/api/order/{id}",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Blank or overlong status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .update_order_status(id, payload.status)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

/// Delete an order and its entries. Stock is not returned.
#[utoipa::path(
    delete,
    path = "/api/order/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .orders
        .delete_order(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}
