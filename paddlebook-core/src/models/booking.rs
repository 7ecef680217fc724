/// Booking model and database operations
///
/// A booking reserves one inventory item for one member over a closed
/// time interval. The invariant this module upholds: for a fixed item,
/// no two persisted bookings may overlap (inclusive boundaries).
///
/// # Lifecycle
///
/// ```text
/// proposed → accepted   (authorize + availability both pass, row inserted)
///          → rejected   (either fails, nothing persisted)
/// accepted → updated    (authorize + availability re-pass, excluding own row)
///          → cancelled  (authorize only; freeing a slot cannot conflict)
/// ```
///
/// # Concurrency
///
/// Two concurrent creations for the same item can both pass an unguarded
/// availability read. [`Booking::create_checked`] and
/// [`Booking::update_checked`] therefore run the read and the write in a
/// single SERIALIZABLE transaction, and the schema carries a GiST
/// exclusion constraint on `(item_id, tstzrange(start_time, end_time, '[]'))`
/// as the storage-layer backstop. Both failure paths surface as a
/// conflict.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE bookings (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     item_id UUID NOT NULL REFERENCES inventory_items(id) ON DELETE CASCADE,
///     start_time TIMESTAMPTZ NOT NULL,
///     end_time TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT bookings_time_order CHECK (end_time > start_time),
///     CONSTRAINT bookings_no_overlap EXCLUDE USING gist
///         (item_id WITH =, tstzrange(start_time, end_time, '[]') WITH &&)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use paddlebook_core::models::booking::{Booking, CreateBooking};
/// use chrono::{TimeZone, Utc};
/// use uuid::Uuid;
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user_id: Uuid, item_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let booking = Booking::create_checked(&pool, CreateBooking {
///     user_id,
///     item_id,
///     start_time: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
///     end_time: Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::availability::{check_available, AvailabilityError};

/// A persisted reservation of one item by one member
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    /// Unique booking ID (UUID v4)
    pub id: Uuid,

    /// Owning member
    pub user_id: Uuid,

    /// Reserved item
    pub item_id: Uuid,

    /// Start of the reservation (inclusive)
    pub start_time: DateTime<Utc>,

    /// End of the reservation (inclusive for conflict purposes)
    pub end_time: DateTime<Utc>,

    /// When the booking was created
    pub created_at: DateTime<Utc>,

    /// When the booking was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for proposing a new booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    /// Owning member
    pub user_id: Uuid,

    /// Item to reserve
    pub item_id: Uuid,

    /// Proposed start
    pub start_time: DateTime<Utc>,

    /// Proposed end
    pub end_time: DateTime<Utc>,
}

/// Input for updating an existing booking
///
/// Names exactly the mutable fields; only non-None fields are applied.
/// Ownership (`user_id`) is not mutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBooking {
    /// Move the booking to a different item
    pub item_id: Option<Uuid>,

    /// New start
    pub start_time: Option<DateTime<Utc>>,

    /// New end
    pub end_time: Option<DateTime<Utc>>,
}

/// Query filters for listing bookings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    /// Only bookings of this item
    pub item_id: Option<Uuid>,

    /// Only bookings owned by this member
    pub user_id: Option<Uuid>,
}

impl Booking {
    /// Finds all bookings of `item_id` whose interval overlaps
    /// `[start_time, end_time]`, inclusive boundaries
    ///
    /// The SQL predicate is `start_time <= $end AND end_time >= $start`:
    /// a booking ending exactly when another starts counts as overlapping.
    /// `exclude_booking_id` removes one row from consideration so an
    /// update never conflicts with its own prior self.
    ///
    /// Generic over the executor so the availability check can run on the
    /// same transaction as the write it guards.
    pub async fn find_overlapping<'e, E>(
        executor: E,
        item_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, item_id, start_time, end_time, created_at, updated_at
            FROM bookings
            WHERE item_id = $1
              AND start_time <= $3
              AND end_time >= $2
              AND ($4::UUID IS NULL OR id <> $4)
            "#,
        )
        .bind(item_id)
        .bind(start_time)
        .bind(end_time)
        .bind(exclude_booking_id)
        .fetch_all(executor)
        .await?;

        Ok(bookings)
    }

    /// Creates a booking after an availability check, atomically
    ///
    /// Runs the overlap scan and the insert inside one SERIALIZABLE
    /// transaction so two concurrent proposals for the same slot cannot
    /// both be accepted.
    ///
    /// # Errors
    ///
    /// - [`AvailabilityError::InvalidRange`] if `start_time >= end_time`
    /// - [`AvailabilityError::Conflict`] if the slot is taken
    /// - [`AvailabilityError::Database`] for any storage failure,
    ///   including a serialization failure or exclusion-constraint hit
    ///   from a racing writer (callers map those to a conflict too)
    pub async fn create_checked(
        pool: &PgPool,
        data: CreateBooking,
    ) -> Result<Self, AvailabilityError> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        check_available(&mut *tx, data.item_id, data.start_time, data.end_time, None).await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (user_id, item_id, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, item_id, start_time, end_time, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.item_id)
        .bind(data.start_time)
        .bind(data.end_time)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(booking_id = %booking.id, item_id = %booking.item_id, "Booking accepted");

        Ok(booking)
    }

    /// Updates a booking after re-checking availability, atomically
    ///
    /// Merges `data` onto the persisted row, re-runs the overlap scan for
    /// the merged interval with the booking's own row excluded, then
    /// writes. Re-submitting a booking's current interval unchanged
    /// always succeeds (a booking never conflicts with itself).
    ///
    /// # Returns
    ///
    /// The updated booking, or `Ok(None)` if the booking doesn't exist.
    pub async fn update_checked(
        pool: &PgPool,
        id: Uuid,
        data: UpdateBooking,
    ) -> Result<Option<Self>, AvailabilityError> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        let Some(current) = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, item_id, start_time, end_time, created_at, updated_at
            FROM bookings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        // Explicit merge of the typed partial update
        let item_id = data.item_id.unwrap_or(current.item_id);
        let start_time = data.start_time.unwrap_or(current.start_time);
        let end_time = data.end_time.unwrap_or(current.end_time);

        check_available(&mut *tx, item_id, start_time, end_time, Some(id)).await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET item_id = $2, start_time = $3, end_time = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, item_id, start_time, end_time, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(item_id)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(booking))
    }

    /// Finds a booking by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, item_id, start_time, end_time, created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(booking)
    }

    /// Lists bookings matching the given filters, soonest first
    pub async fn list(pool: &PgPool, filter: BookingFilter) -> Result<Vec<Self>, sqlx::Error> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, item_id, start_time, end_time, created_at, updated_at
            FROM bookings
            WHERE ($1::UUID IS NULL OR item_id = $1)
              AND ($2::UUID IS NULL OR user_id = $2)
            ORDER BY start_time ASC
            "#,
        )
        .bind(filter.item_id)
        .bind(filter.user_id)
        .fetch_all(pool)
        .await?;

        Ok(bookings)
    }

    /// Cancels (deletes) a booking by ID
    ///
    /// No availability re-check: freeing a slot cannot create a conflict.
    /// Returns true if the booking was deleted, false if it didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
