use crate::errors::{ApiError, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::{Validate, ValidationError};

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ValidationError(format!("Validation failed: {}", e)))
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

/// Rejects a PUT whose body names a different entity than its path.
pub fn ensure_path_matches(path_id: i32, body_id: Option<i32>) -> Result<(), ApiError> {
    match body_id {
        Some(body_id) if body_id != path_id => Err(ApiError::BadRequest(format!(
            "Path id {} does not match body id {}",
            path_id, body_id
        ))),
        _ => Ok(()),
    }
}

/// Custom validator for Decimal minimum value
pub fn validate_decimal_min_zero(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("decimal_min_zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn path_and_body_ids_must_agree() {
        assert!(ensure_path_matches(4, None).is_ok());
        assert!(ensure_path_matches(4, Some(4)).is_ok());
        assert!(matches!(
            ensure_path_matches(4, Some(5)),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn negative_decimals_fail_validation() {
        assert!(validate_decimal_min_zero(&dec!(0)).is_ok());
        assert!(validate_decimal_min_zero(&dec!(-0.01)).is_err());
    }
}
