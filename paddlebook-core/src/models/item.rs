/// Inventory item model and database operations
///
/// Bookable club assets: boats, paddles, buoyancy aids, spraydecks and
/// anything else the quartermaster catalogues. Items are created, updated
/// and deleted by admins only; any member may browse them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE inventory_items (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     reference VARCHAR(255) NOT NULL,
///     category VARCHAR(50) NOT NULL,
///     craft_type VARCHAR(50),
///     size VARCHAR(50),
///     num_seats INTEGER,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT inventory_items_reference_nonempty CHECK (reference <> '')
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A bookable inventory item
///
/// `category` is free text by club convention: craft, paddle, ba,
/// spraydeck, other. `craft_type` (kayak, canoe, sup) and `num_seats`
/// only make sense for craft and stay None otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryItem {
    /// Unique item ID (UUID v4)
    pub id: Uuid,

    /// Display label, e.g. "Kayak 12" or "Red club paddle"
    ///
    /// Must be non-empty (enforced by a CHECK constraint).
    pub reference: String,

    /// Classification: craft, paddle, ba, spraydeck, other
    pub category: String,

    /// Craft subtype (kayak, canoe, sup) where applicable
    pub craft_type: Option<String>,

    /// Size label (e.g. S/M/L or a length)
    pub size: Option<String>,

    /// Seat count for multi-seat craft
    pub num_seats: Option<i32>,

    /// When the item was catalogued
    pub created_at: DateTime<Utc>,

    /// When the item was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for cataloguing a new item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    /// Display label (non-empty)
    pub reference: String,

    /// Classification
    pub category: String,

    /// Craft subtype where applicable
    pub craft_type: Option<String>,

    /// Size label
    pub size: Option<String>,

    /// Seat count for multi-seat craft
    pub num_seats: Option<i32>,
}

/// Input for updating an existing item
///
/// Names exactly the mutable fields; only non-None fields are applied.
/// Optional columns use the double-Option pattern so Some(None) clears.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItem {
    /// New display label
    pub reference: Option<String>,

    /// New classification
    pub category: Option<String>,

    /// New craft subtype (Some(None) to clear)
    pub craft_type: Option<Option<String>>,

    /// New size label (Some(None) to clear)
    pub size: Option<Option<String>>,

    /// New seat count (Some(None) to clear)
    pub num_seats: Option<Option<i32>>,
}

/// Query filters for listing inventory
///
/// Mirrors the browse filters the front end offers. All fields optional;
/// absent fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    /// Filter by classification
    pub category: Option<String>,

    /// Filter by craft subtype
    pub craft_type: Option<String>,

    /// Filter by size label
    pub size: Option<String>,

    /// Filter by seat count
    pub num_seats: Option<i32>,
}

impl InventoryItem {
    /// Catalogues a new item
    ///
    /// # Errors
    ///
    /// Returns an error if `reference` is empty (CHECK constraint) or the
    /// database connection fails.
    pub async fn create(pool: &PgPool, data: CreateItem) -> Result<Self, sqlx::Error> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            INSERT INTO inventory_items (reference, category, craft_type, size, num_seats)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, reference, category, craft_type, size, num_seats,
                      created_at, updated_at
            "#,
        )
        .bind(data.reference)
        .bind(data.category)
        .bind(data.craft_type)
        .bind(data.size)
        .bind(data.num_seats)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    /// Finds an item by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, reference, category, craft_type, size, num_seats,
                   created_at, updated_at
            FROM inventory_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Lists items matching the given filters, newest first
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use paddlebook_core::models::item::{InventoryItem, ItemFilter};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let kayaks = InventoryItem::list(&pool, ItemFilter {
    ///     category: Some("craft".to_string()),
    ///     craft_type: Some("kayak".to_string()),
    ///     ..Default::default()
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(pool: &PgPool, filter: ItemFilter) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, reference, category, craft_type, size, num_seats,
                   created_at, updated_at
            FROM inventory_items
            WHERE ($1::VARCHAR IS NULL OR category = $1)
              AND ($2::VARCHAR IS NULL OR craft_type = $2)
              AND ($3::VARCHAR IS NULL OR size = $3)
              AND ($4::INTEGER IS NULL OR num_seats = $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.category)
        .bind(filter.craft_type)
        .bind(filter.size)
        .bind(filter.num_seats)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Updates an existing item
    ///
    /// Returns the updated item if found, None if the item doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateItem,
    ) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items
            SET reference = COALESCE($2, reference),
                category = COALESCE($3, category),
                craft_type = CASE WHEN $4 THEN $5 ELSE craft_type END,
                size = CASE WHEN $6 THEN $7 ELSE size END,
                num_seats = CASE WHEN $8 THEN $9 ELSE num_seats END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, reference, category, craft_type, size, num_seats,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.reference)
        .bind(data.category)
        .bind(data.craft_type.is_some())
        .bind(data.craft_type.flatten())
        .bind(data.size.is_some())
        .bind(data.size.flatten())
        .bind(data.num_seats.is_some())
        .bind(data.num_seats.flatten())
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Deletes an item by ID
    ///
    /// Returns true if the item was deleted, false if it didn't exist.
    /// Bookings of the item are removed by the FK cascade.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
