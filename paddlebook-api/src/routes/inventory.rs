/// Inventory endpoints
///
/// This module provides CRUD endpoints for the club's equipment
/// catalogue. Any authenticated member may browse; creating, updating
/// and deleting items is admin-only.
///
/// # Endpoints
///
/// - `GET /v1/inventory` - List items (filterable)
/// - `POST /v1/inventory` - Catalogue an item (admin)
/// - `GET /v1/inventory/:id` - Get an item
/// - `PUT /v1/inventory/:id` - Update an item (admin)
/// - `DELETE /v1/inventory/:id` - Delete an item (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{double_option, validation_error},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use paddlebook_core::{
    auth::{
        authorization::{authorize, Action},
        middleware::Actor,
    },
    models::item::{CreateItem, InventoryItem, ItemFilter, UpdateItem},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create item request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    /// Display label, e.g. a hull number or a sail number
    #[validate(length(min = 1, max = 100, message = "Reference must be 1-100 characters"))]
    pub reference: String,

    /// Classification, e.g. "kayak", "canoe", "paddle"
    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: String,

    /// Craft subtype where applicable, e.g. "sea", "slalom"
    pub craft_type: Option<String>,

    /// Size label, e.g. "M" or "3.6m"
    pub size: Option<String>,

    /// Seat count for multi-seat craft
    #[validate(range(min = 1, message = "Seat count must be at least 1"))]
    pub num_seats: Option<i32>,
}

/// Update item request
///
/// Optional columns use null to clear, absent to keep.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    /// New display label
    #[validate(length(min = 1, max = 100, message = "Reference must be 1-100 characters"))]
    pub reference: Option<String>,

    /// New classification
    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: Option<String>,

    /// New craft subtype (null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub craft_type: Option<Option<String>>,

    /// New size label (null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub size: Option<Option<String>>,

    /// New seat count (null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub num_seats: Option<Option<i32>>,
}

/// List the equipment catalogue
///
/// # Endpoint
///
/// ```text
/// GET /v1/inventory?category=kayak&craft_type=sea&size=M&num_seats=2
/// Authorization: Bearer <jwt_token>
/// ```
///
/// All filters are optional; absent filters match everything.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `500 Internal Server Error`: Server error
pub async fn list_items(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(filter): Query<ItemFilter>,
) -> ApiResult<Json<Vec<InventoryItem>>> {
    authorize(&actor, Action::ReadInventory)?;

    let items = InventoryItem::list(&state.db, filter).await?;

    Ok(Json(items))
}

/// Catalogue a new item
///
/// # Endpoint
///
/// ```text
/// POST /v1/inventory
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "reference": "K-07",
///   "category": "kayak",
///   "craft_type": "sea",
///   "size": "M",
///   "num_seats": 1
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is not an admin
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<InventoryItem>)> {
    authorize(&actor, Action::ManageInventory)?;

    req.validate().map_err(validation_error)?;

    let item = InventoryItem::create(
        &state.db,
        CreateItem {
            reference: req.reference,
            category: req.category,
            craft_type: req.craft_type,
            size: req.size,
            num_seats: req.num_seats,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Get an item by ID
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `404 Not Found`: No such item
pub async fn get_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InventoryItem>> {
    authorize(&actor, Action::ReadInventory)?;

    let item = InventoryItem::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(item))
}

/// Update an item
///
/// Existing bookings are unaffected; moving or retiring equipment is a
/// catalogue concern, not a booking one.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: No such item
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateItemRequest>,
) -> ApiResult<Json<InventoryItem>> {
    authorize(&actor, Action::ManageInventory)?;

    req.validate().map_err(validation_error)?;

    let item = InventoryItem::update(
        &state.db,
        id,
        UpdateItem {
            reference: req.reference,
            category: req.category,
            craft_type: req.craft_type,
            size: req.size,
            num_seats: req.num_seats,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(item))
}

/// Delete an item
///
/// Bookings of the item are removed with it.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: No such item
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    authorize(&actor, Action::ManageInventory)?;

    let deleted = InventoryItem::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
