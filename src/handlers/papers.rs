use crate::handlers::common::{
    created_response, ensure_path_matches, map_service_error, no_content_response,
    success_response, validate_decimal_min_zero, validate_input,
};
use crate::{
    errors::ApiError,
    services::catalog::{PaperInput, PaperResponse},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Creates the router for paper product endpoints
pub fn paper_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_papers).post(create_paper))
        .route("/:id", get(get_paper).put(update_paper).delete(delete_paper))
}

/// Request body for creating or replacing a paper product
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaperRequest {
    /// Optional on PUT; must equal the path id when present
    pub id: Option<i32>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom = "validate_decimal_min_zero")]
    #[schema(value_type = String, example = "5.00")]
    pub price: Decimal,
    #[validate(range(min = 0))]
    pub stock: i32,
    #[serde(default)]
    pub discontinued: bool,
    #[serde(default)]
    pub property_ids: Vec<i32>,
}

impl From<PaperRequest> for PaperInput {
    fn from(request: PaperRequest) -> Self {
        Self {
            name: request.name,
            price: request.price,
            stock: request.stock,
            discontinued: request.discontinued,
            property_ids: request.property_ids,
        }
    }
}

/// List paper products with their properties
#[utoipa::path(
    get,
    path = "/api/paper",
    responses(
        (status = 200, description = "Products ordered by id", body = [PaperResponse]),
        (status = 500, description = "Database error", body = crate::errors::ErrorResponse)
    ),
    tag = "Papers"
)]
pub async fn list_papers(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let papers = state
        .services
        .catalog
        .list_papers()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(papers))
}

/// Fetch one paper product
#[utoipa::path(
    get,
    path = "/api/paper/{id}",
    params(("id" = i32, Path, description = "Paper id")),
    responses(
        (status = 200, description = "Product found", body = PaperResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Papers"
)]
pub async fn get_paper(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let paper = state
        .services
        .catalog
        .get_paper(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(paper))
}

/// Create a paper product
#[utoipa::path(
    post,
    path = "/api/paper",
    request_body = PaperRequest,
    responses(
        (status = 201, description = "Product created", body = PaperResponse),
        (status = 400, description = "Invalid payload or unknown property", body = crate::errors::ErrorResponse)
    ),
    tag = "Papers"
)]
pub async fn create_paper(
    State(state): State<AppState>,
    Json(payload): Json<PaperRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let paper = state
        .services
        .catalog
        .create_paper(payload.into())
        .await
        .map_err(map_service_error)?;
    Ok(created_response(paper))
}

/// Replace a paper product and its property set
#[utoipa::path(
    put,
    path = "/api/paper/{id}",
    params(("id" = i32, Path, description = "Paper id")),
    request_body = PaperRequest,
    responses(
        (status = 200, description = "Product updated", body = PaperResponse),
        (status = 400, description = "Invalid payload or id mismatch", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Papers"
)]
pub async fn update_paper(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<PaperRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_path_matches(id, payload.id)?;
    validate_input(&payload)?;

    let paper = state
        .services
        .catalog
        .update_paper(id, payload.into())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(paper))
}

/// Delete a paper product that no order references
#[utoipa::path(
    delete,
    path = "/api/paper/{id}",
    params(("id" = i32, Path, description = "Paper id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Product is referenced by orders", body = crate::errors::ErrorResponse)
    ),
    tag = "Papers"
)]
pub async fn delete_paper(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .catalog
        .delete_paper(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}
