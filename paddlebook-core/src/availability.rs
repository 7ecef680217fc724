/// Booking-conflict detection
///
/// This module decides whether a proposed reservation of an item may be
/// accepted. Two intervals conflict when they overlap with inclusive
/// boundaries: a booking ending at 11:00 blocks another starting at
/// 11:00. That is a deliberate conservative policy: gear handovers are
/// not instantaneous.
///
/// The check is a pure read over the bookings of one item. It holds no
/// state of its own; callers that also write must run the check on the
/// same transaction as the write (see
/// [`Booking::create_checked`](crate::models::booking::Booking::create_checked)).
///
/// # Example
///
/// ```
/// use paddlebook_core::availability::ranges_overlap;
/// use chrono::{TimeZone, Utc};
///
/// let t = |h, m| Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap();
///
/// // Boundary touch counts as overlap
/// assert!(ranges_overlap(t(10, 0), t(11, 0), t(11, 0), t(12, 0)));
///
/// // A minute of clearance does not
/// assert!(!ranges_overlap(t(10, 0), t(11, 0), t(11, 1), t(12, 0)));
/// ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::booking::Booking;

/// Error type for availability checks
#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    /// The proposed interval is zero-length or inverted
    #[error("Invalid time range: start must be before end")]
    InvalidRange,

    /// The item is already booked for an overlapping interval
    #[error("Item is already booked for the requested time")]
    Conflict,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Inclusive-boundary interval intersection test
///
/// `[s1, e1]` and `[s2, e2]` overlap iff `s1 <= e2 AND e1 >= s2`. This is
/// the same predicate [`Booking::find_overlapping`] evaluates in SQL;
/// keeping the pure form lets the policy be unit-tested directly.
pub fn ranges_overlap(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 <= e2 && e1 >= s2
}

/// Checks whether `item_id` is free over `[start_time, end_time]`
///
/// Scans all existing bookings of the item (excluding
/// `exclude_booking_id` when validating an update, so a booking never
/// conflicts with its own persisted row) and fails on any overlap.
///
/// Validates `start_time < end_time` as a precondition; zero-length and
/// inverted intervals are rejected rather than passed through to
/// storage.
///
/// Read-only. Generic over the executor so the caller can supply the
/// transaction that will also perform the write.
///
/// # Errors
///
/// - [`AvailabilityError::InvalidRange`] if `start_time >= end_time`
/// - [`AvailabilityError::Conflict`] if an overlapping booking exists
/// - [`AvailabilityError::Database`] if the scan fails
pub async fn check_available<'e, E>(
    executor: E,
    item_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    exclude_booking_id: Option<Uuid>,
) -> Result<(), AvailabilityError>
where
    E: sqlx::PgExecutor<'e>,
{
    if start_time >= end_time {
        return Err(AvailabilityError::InvalidRange);
    }

    let overlapping =
        Booking::find_overlapping(executor, item_id, start_time, end_time, exclude_booking_id)
            .await?;

    if !overlapping.is_empty() {
        tracing::debug!(
            %item_id,
            candidates = overlapping.len(),
            "Booking proposal rejected: overlap"
        );
        return Err(AvailabilityError::Conflict);
    }

    Ok(())
}
