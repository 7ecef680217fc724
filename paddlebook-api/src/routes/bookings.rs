/// Booking endpoints
///
/// This module provides CRUD endpoints for equipment bookings. Every
/// write goes through the availability-checked paths in
/// [`paddlebook_core::models::booking`], so two members can never hold
/// the same item for overlapping times.
///
/// # Endpoints
///
/// - `GET /v1/bookings` - List bookings (filterable)
/// - `POST /v1/bookings` - Create a booking
/// - `GET /v1/bookings/:id` - Get a booking
/// - `PUT /v1/bookings/:id` - Update a booking (owner or admin)
/// - `DELETE /v1/bookings/:id` - Cancel a booking (owner or admin)
///
/// Interval boundaries are inclusive: a booking ending at 14:00 and
/// one starting at 14:00 conflict.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use paddlebook_core::{
    auth::{
        authorization::{authorize, Action},
        middleware::Actor,
    },
    models::{
        booking::{Booking, BookingFilter, CreateBooking, UpdateBooking},
        item::InventoryItem,
    },
};
use serde::Deserialize;
use uuid::Uuid;

/// Create booking request
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    /// Item to reserve
    pub item_id: Uuid,

    /// Proposed start (ISO 8601)
    pub start_time: DateTime<Utc>,

    /// Proposed end (ISO 8601)
    pub end_time: DateTime<Utc>,

    /// Book on behalf of another member (admin only)
    ///
    /// Defaults to the caller.
    pub user_id: Option<Uuid>,
}

/// Update booking request
///
/// Absent fields keep their current value. Ownership is not mutable.
#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    /// Move the booking to a different item
    pub item_id: Option<Uuid>,

    /// New start
    pub start_time: Option<DateTime<Utc>>,

    /// New end
    pub end_time: Option<DateTime<Utc>>,
}

/// List bookings
///
/// # Endpoint
///
/// ```text
/// GET /v1/bookings?item_id=<uuid>&user_id=<uuid>
/// Authorization: Bearer <jwt_token>
/// ```
///
/// Both filters are optional. Any member may see the club's calendar;
/// that is what makes the booking sheet useful.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `500 Internal Server Error`: Server error
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(filter): Query<BookingFilter>,
) -> ApiResult<Json<Vec<Booking>>> {
    authorize(&actor, Action::ReadBookings)?;

    let bookings = Booking::list(&state.db, filter).await?;

    Ok(Json(bookings))
}

/// Create a booking
///
/// The booking is checked against every existing booking of the item
/// inside a serializable transaction; an overlap is a 409.
///
/// # Endpoint
///
/// ```text
/// POST /v1/bookings
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "item_id": "uuid",
///   "start_time": "2026-06-01T09:00:00Z",
///   "end_time": "2026-06-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Booking for another member without admin rights
/// - `404 Not Found`: No such item
/// - `409 Conflict`: Item already booked for an overlapping interval
/// - `422 Unprocessable Entity`: start_time is not before end_time
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<Booking>)> {
    let member = authorize(&actor, Action::CreateBooking)?;

    let user_id = req.user_id.unwrap_or(member.id);
    if user_id != member.id && !member.is_admin {
        return Err(ApiError::Forbidden(
            "Only admins may book on behalf of another member".to_string(),
        ));
    }

    // Missing item is a 404, not a constraint-violation 409
    InventoryItem::find_by_id(&state.db, req.item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    let booking = Booking::create_checked(
        &state.db,
        CreateBooking {
            user_id,
            item_id: req.item_id,
            start_time: req.start_time,
            end_time: req.end_time,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Get a booking by ID
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `404 Not Found`: No such booking
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Booking>> {
    authorize(&actor, Action::ReadBookings)?;

    let booking = Booking::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    Ok(Json(booking))
}

/// Update a booking
///
/// Owner or admin only. The new interval is checked against every other
/// booking of the item; the booking being moved never conflicts with
/// itself.
///
/// # Endpoint
///
/// ```text
/// PUT /v1/bookings/:id
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "end_time": "2026-06-01T14:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Not the booking owner and not an admin
/// - `404 Not Found`: No such booking (or no such target item)
/// - `409 Conflict`: New interval overlaps another booking
/// - `422 Unprocessable Entity`: start_time is not before end_time
pub async fn update_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingRequest>,
) -> ApiResult<Json<Booking>> {
    let booking = Booking::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    authorize(
        &actor,
        Action::MutateBooking {
            owner_id: booking.user_id,
        },
    )?;

    if let Some(item_id) = req.item_id {
        InventoryItem::find_by_id(&state.db, item_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;
    }

    let updated = Booking::update_checked(
        &state.db,
        id,
        UpdateBooking {
            item_id: req.item_id,
            start_time: req.start_time,
            end_time: req.end_time,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    Ok(Json(updated))
}

/// Cancel a booking
///
/// Owner or admin only. Cancelling frees the slot immediately; no
/// availability check is needed on the way out.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Not the booking owner and not an admin
/// - `404 Not Found`: No such booking
pub async fn delete_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let booking = Booking::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    authorize(
        &actor,
        Action::MutateBooking {
            owner_id: booking.user_id,
        },
    )?;

    let deleted = Booking::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Booking not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
