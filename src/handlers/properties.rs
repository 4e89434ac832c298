use crate::handlers::common::{
    created_response, ensure_path_matches, map_service_error, no_content_response,
    success_response, validate_input,
};
use crate::{
    errors::ApiError,
    services::properties::{DeleteCheck, PropertyResponse},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_properties).post(create_property))
        .route(
            "/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
        .route("/:id/canDelete", get(can_delete_property))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRequest {
    pub id: Option<i32>,
    #[validate(length(min = 1, max = 255))]
    pub property_name: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeletePropertyParams {
    /// Remove the property even when products still carry it
    #[serde(default)]
    pub force: bool,
}

#[utoipa::path(
    get,
    path = "/api/property",
    responses(
        (status = 200, description = "Properties ordered by id", body = [PropertyResponse])
    ),
    tag = "Properties"
)]
pub async fn list_properties(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let properties = state
        .services
        .properties
        .list_properties()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(properties))
}

#[utoipa::path(
    get,
    path = "/api/property/{id}",
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property found", body = PropertyResponse),
        (status = 404, description = "Property not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let property = state
        .services
        .properties
        .get_property(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(property))
}

#[utoipa::path(
    post,
    path = "/api/property",
    request_body = PropertyRequest,
    responses(
        (status = 201, description = "Property created", body = PropertyResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn create_property(
    State(state): State<AppState>,
    Json(payload): Json<PropertyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let property = state
        .services
        .properties
        .create_property(payload.property_name)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(property))
}

#[utoipa::path(
    put,
    path = "/api/property/{id}",
    params(("id" = i32, Path, description = "Property id")),
    request_body = PropertyRequest,
    responses(
        (status = 200, description = "Property renamed", body = PropertyResponse),
        (status = 400, description = "Invalid payload or id mismatch", body = crate::errors::ErrorResponse),
        (status = 404, description = "Property not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<PropertyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_path_matches(id, payload.id)?;
    validate_input(&payload)?;

    let property = state
        .services
        .properties
        .update_property(id, payload.property_name)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(property))
}

/// Delete a property, optionally detaching it from every product first
#[utoipa::path(
    delete,
    path = "/api/property/{id}",
    params(
        ("id" = i32, Path, description = "Property id"),
        DeletePropertyParams
    ),
    responses(
        (status = 204, description = "Property deleted"),
        (status = 404, description = "Property not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Property is assigned and force was not set", body = crate::errors::ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<DeletePropertyParams>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .properties
        .delete_property(id, params.force)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/property/{id}/canDelete",
    params(("id" = i32, Path, description = "Property id")),
    responses(
        (status = 200, description = "Deletion check", body = DeleteCheck),
        (status = 404, description = "Property not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn can_delete_property(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let check = state
        .services
        .properties
        .can_delete(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(check))
}
