/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `users`: Member account management
/// - `inventory`: Inventory item CRUD (writes admin-only)
/// - `bookings`: Booking CRUD with availability checking

pub mod auth;
pub mod bookings;
pub mod health;
pub mod inventory;
pub mod users;

use crate::error::{ApiError, ValidationErrorDetail};
use serde::{Deserialize, Deserializer};

/// Flattens `validator` errors into the API's 422 payload
pub(crate) fn validation_error(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}

/// Deserializes a field that distinguishes absent from null
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// a missing field stays `None`, an explicit `null` becomes
/// `Some(None)` and clears the column.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}
