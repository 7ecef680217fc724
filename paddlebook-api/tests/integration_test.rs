/// Integration tests for the Paddlebook API
///
/// These tests verify the full system works end-to-end:
/// - Registration, login and token refresh
/// - Booking creation with overlap rejection (inclusive boundaries)
/// - Self-exclusion when moving an existing booking
/// - Owner-or-admin authorization on bookings and accounts
/// - Admin-only inventory writes
///
/// They require a running PostgreSQL instance (DATABASE_URL) and a
/// JWT_SECRET in the environment, matching the server's own config.

mod common;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::{create_test_item, send, TestContext};
use serde_json::json;

fn slot(h_start: u32, h_end: u32) -> (String, String) {
    let start = Utc.with_ymd_and_hms(2030, 6, 1, h_start, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2030, 6, 1, h_end, 0, 0).unwrap();
    (start.to_rfc3339(), end.to_rfc3339())
}

/// Registration issues tokens and login works with the same password
#[tokio::test]
async fn test_register_and_login() {
    let ctx = TestContext::new().await.unwrap();
    let username = format!("{}-fresh", ctx.tag);

    let (status, body) = send(
        &ctx,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "SecureP4ssword",
            "membership_no": 7
        })),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());

    let (status, body) = send(
        &ctx,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({
            "username": username,
            "password": "SecureP4ssword"
        })),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    let access_token = body["access_token"].as_str().unwrap().to_string();
    let user_id = body["user_id"].as_str().unwrap().to_string();

    // The fresh registration is not an admin: inventory writes are 403
    let (status, _) = send(
        &ctx,
        "POST",
        "/v1/inventory",
        Some(&format!("Bearer {}", access_token)),
        Some(json!({"reference": format!("{}-sneak", ctx.tag), "category": "kayak"})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx,
        "DELETE",
        &format!("/v1/users/{}", user_id),
        Some(&format!("Bearer {}", access_token)),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    ctx.cleanup().await.unwrap();
}

/// Wrong password and unknown username both yield the same 401
#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(
        &ctx,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({
            "username": format!("{}-nobody", ctx.tag),
            "password": "whatever123"
        })),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    ctx.cleanup().await.unwrap();
}

/// Requests without a token are rejected before touching handlers
#[tokio::test]
async fn test_unauthenticated_requests_rejected() {
    let ctx = TestContext::new().await.unwrap();

    for uri in ["/v1/bookings", "/v1/inventory", "/v1/users"] {
        let (status, _) = send(&ctx, "GET", uri, None, None).await.unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED, "uri {} not gated", uri);
    }

    ctx.cleanup().await.unwrap();
}

/// A free slot books successfully and the booking is readable back
#[tokio::test]
async fn test_create_booking() {
    let ctx = TestContext::new().await.unwrap();
    let item = create_test_item(&ctx, "kayak").await.unwrap();
    let (start, end) = slot(9, 12);

    let (status, body) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.member_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED, "booking failed: {}", body);
    assert_eq!(body["user_id"], json!(ctx.member.id));
    assert_eq!(body["item_id"], json!(item.id));

    let booking_id = body["id"].as_str().unwrap().to_string();
    let (status, body) = send(
        &ctx,
        "GET",
        &format!("/v1/bookings/{}", booking_id),
        Some(&ctx.member_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_str().unwrap(), booking_id);

    ctx.cleanup().await.unwrap();
}

/// Overlapping bookings of the same item are rejected with 409
#[tokio::test]
async fn test_overlapping_booking_conflict() {
    let ctx = TestContext::new().await.unwrap();
    let item = create_test_item(&ctx, "kayak").await.unwrap();

    let (start, end) = slot(9, 12);
    let (status, _) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.member_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    // Contained interval, booked by a different member
    let (start, end) = slot(10, 11);
    let (status, body) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.admin_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CONFLICT, "expected 409: {}", body);
    assert_eq!(body["error"], "conflict");

    ctx.cleanup().await.unwrap();
}

/// Boundaries are inclusive: ending exactly when another starts conflicts
#[tokio::test]
async fn test_boundary_touch_conflicts() {
    let ctx = TestContext::new().await.unwrap();
    let item = create_test_item(&ctx, "canoe").await.unwrap();

    let (start, end) = slot(9, 12);
    let (status, _) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.member_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let (start, end) = slot(12, 14);
    let (status, _) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.admin_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.cleanup().await.unwrap();
}

/// Disjoint slots on the same item, and overlapping slots on different
/// items, both succeed
#[tokio::test]
async fn test_disjoint_bookings_succeed() {
    let ctx = TestContext::new().await.unwrap();
    let item = create_test_item(&ctx, "kayak").await.unwrap();
    let other_item = create_test_item(&ctx, "kayak").await.unwrap();

    let (start, end) = slot(9, 11);
    let (status, _) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.member_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    // Same item, later slot
    let (start, end) = slot(12, 14);
    let (status, _) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.member_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    // Different item, overlapping slot
    let (start, end) = slot(9, 11);
    let (status, _) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.admin_auth()),
        Some(json!({"item_id": other_item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    ctx.cleanup().await.unwrap();
}

/// An inverted interval is a 422, not a 409 and not a 201
#[tokio::test]
async fn test_inverted_interval_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let item = create_test_item(&ctx, "kayak").await.unwrap();

    let (start, end) = slot(9, 12);
    let (status, body) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.member_auth()),
        Some(json!({"item_id": item.id, "start_time": end, "end_time": start})),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "got: {}", body);

    ctx.cleanup().await.unwrap();
}

/// Moving a booking never conflicts with the booking's own slot
#[tokio::test]
async fn test_update_booking_excludes_self() {
    let ctx = TestContext::new().await.unwrap();
    let item = create_test_item(&ctx, "kayak").await.unwrap();

    let (start, end) = slot(9, 12);
    let (status, body) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.member_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = body["id"].as_str().unwrap().to_string();

    // Extend the end; the new interval overlaps only this booking itself
    let (_, new_end) = slot(9, 14);
    let (status, body) = send(
        &ctx,
        "PUT",
        &format!("/v1/bookings/{}", booking_id),
        Some(&ctx.member_auth()),
        Some(json!({"end_time": new_end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK, "self-overlap rejected: {}", body);

    ctx.cleanup().await.unwrap();
}

/// Moving a booking onto another member's slot is still a 409
#[tokio::test]
async fn test_update_into_other_booking_conflicts() {
    let ctx = TestContext::new().await.unwrap();
    let item = create_test_item(&ctx, "kayak").await.unwrap();

    let (start, end) = slot(9, 11);
    let (status, body) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.member_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = body["id"].as_str().unwrap().to_string();

    let (start, end) = slot(13, 15);
    let (status, _) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.admin_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    // Stretch the first booking into the second
    let (_, clash_end) = slot(9, 14);
    let (status, _) = send(
        &ctx,
        "PUT",
        &format!("/v1/bookings/{}", booking_id),
        Some(&ctx.member_auth()),
        Some(json!({"end_time": clash_end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.cleanup().await.unwrap();
}

/// Cancelling a booking frees its slot for someone else
#[tokio::test]
async fn test_delete_booking_frees_slot() {
    let ctx = TestContext::new().await.unwrap();
    let item = create_test_item(&ctx, "canoe").await.unwrap();

    let (start, end) = slot(9, 12);
    let (status, body) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.member_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = body["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &ctx,
        "DELETE",
        &format!("/v1/bookings/{}", booking_id),
        Some(&ctx.member_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.admin_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    ctx.cleanup().await.unwrap();
}

/// Only the owner or an admin may mutate a booking
#[tokio::test]
async fn test_booking_ownership_gate() {
    let ctx = TestContext::new().await.unwrap();
    let other = TestContext::new().await.unwrap();
    let item = create_test_item(&ctx, "kayak").await.unwrap();

    let (start, end) = slot(9, 12);
    let (status, body) = send(
        &ctx,
        "POST",
        "/v1/bookings",
        Some(&ctx.member_auth()),
        Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = body["id"].as_str().unwrap().to_string();

    // A different regular member can read it but cannot touch it
    let (status, _) = send(
        &other,
        "GET",
        &format!("/v1/bookings/{}", booking_id),
        Some(&other.member_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &other,
        "DELETE",
        &format!("/v1/bookings/{}", booking_id),
        Some(&other.member_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);

    // An admin can
    let (status, _) = send(
        &ctx,
        "DELETE",
        &format!("/v1/bookings/{}", booking_id),
        Some(&ctx.admin_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    other.cleanup().await.unwrap();
    ctx.cleanup().await.unwrap();
}

/// Inventory writes are admin-only; reads and filters work for members
#[tokio::test]
async fn test_inventory_write_requires_admin() {
    let ctx = TestContext::new().await.unwrap();

    let reference = format!("{}-new-boat", ctx.tag);
    let create_req = json!({
        "reference": reference,
        "category": "kayak",
        "craft_type": "sea",
        "size": "M",
        "num_seats": 1
    });

    let (status, _) = send(
        &ctx,
        "POST",
        "/v1/inventory",
        Some(&ctx.member_auth()),
        Some(create_req.clone()),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &ctx,
        "POST",
        "/v1/inventory",
        Some(&ctx.admin_auth()),
        Some(create_req),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED, "admin create failed: {}", body);
    let item_id = body["id"].as_str().unwrap().to_string();

    // Members can browse with filters
    let (status, body) = send(
        &ctx,
        "GET",
        "/v1/inventory?category=kayak&craft_type=sea",
        Some(&ctx.member_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert!(items.iter().any(|i| i["id"].as_str() == Some(&item_id)));
    assert!(items.iter().all(|i| i["category"] == "kayak"));

    // Member update and delete are 403, admin delete works
    let (status, _) = send(
        &ctx,
        "PUT",
        &format!("/v1/inventory/{}", item_id),
        Some(&ctx.member_auth()),
        Some(json!({"size": "L"})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx,
        "DELETE",
        &format!("/v1/inventory/{}", item_id),
        Some(&ctx.admin_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    ctx.cleanup().await.unwrap();
}

/// Members may edit themselves but not others, and cannot self-promote
#[tokio::test]
async fn test_user_update_self_or_admin() {
    let ctx = TestContext::new().await.unwrap();

    // Own email update works, and the admin flag in the body is ignored
    let (status, body) = send(
        &ctx,
        "PUT",
        &format!("/v1/users/{}", ctx.member.id),
        Some(&ctx.member_auth()),
        Some(json!({
            "email": format!("{}-new@example.com", ctx.tag),
            "is_admin": true
        })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK, "self update failed: {}", body);
    assert_eq!(body["is_admin"], json!(false));
    assert!(body.get("password_hash").is_none());

    // Updating the admin's account as a regular member is forbidden
    let (status, _) = send(
        &ctx,
        "PUT",
        &format!("/v1/users/{}", ctx.admin.id),
        Some(&ctx.member_auth()),
        Some(json!({"email": "hijack@example.com"})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);

    // An admin may promote someone
    let (status, body) = send(
        &ctx,
        "PUT",
        &format!("/v1/users/{}", ctx.member.id),
        Some(&ctx.admin_auth()),
        Some(json!({"is_admin": true})),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_admin"], json!(true));

    ctx.cleanup().await.unwrap();
}

/// Duplicate usernames are a 409 at registration
#[tokio::test]
async fn test_duplicate_username_conflict() {
    let ctx = TestContext::new().await.unwrap();

    let req = json!({
        "username": ctx.member.username,
        "email": format!("{}-dup@example.com", ctx.tag),
        "password": "SecureP4ssword"
    });

    let (status, body) = send(&ctx, "POST", "/v1/auth/register", None, Some(req))
        .await
        .unwrap();

    assert_eq!(status, StatusCode::CONFLICT, "got: {}", body);
    assert_eq!(body["error"], "conflict");

    ctx.cleanup().await.unwrap();
}

/// Booking lists filter by item and by owner
#[tokio::test]
async fn test_booking_list_filters() {
    let ctx = TestContext::new().await.unwrap();
    let item_a = create_test_item(&ctx, "kayak").await.unwrap();
    let item_b = create_test_item(&ctx, "canoe").await.unwrap();

    let (start, end) = slot(9, 11);
    for (item, auth) in [(&item_a, ctx.member_auth()), (&item_b, ctx.admin_auth())] {
        let (status, _) = send(
            &ctx,
            "POST",
            "/v1/bookings",
            Some(&auth),
            Some(json!({"item_id": item.id, "start_time": start, "end_time": end})),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &ctx,
        "GET",
        &format!("/v1/bookings?item_id={}", item_a.id),
        Some(&ctx.member_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    let bookings = body.as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["item_id"], json!(item_a.id));

    let (status, body) = send(
        &ctx,
        "GET",
        &format!("/v1/bookings?user_id={}", ctx.admin.id),
        Some(&ctx.member_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    let bookings = body.as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["item_id"], json!(item_b.id));

    ctx.cleanup().await.unwrap();
}
