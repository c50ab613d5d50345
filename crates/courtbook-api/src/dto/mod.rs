//! Request and response DTOs.

pub mod request;
pub mod response;

use validator::Validate;

use courtbook_core::error::AppError;

/// Runs DTO validation and reports the first violation at the boundary.
pub fn validate<T: Validate>(request: &T) -> Result<(), AppError> {
    request.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|field| field.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Invalid request".to_string());
        AppError::validation(message)
    })
}
