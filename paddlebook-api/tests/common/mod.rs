/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test member and admin accounts
/// - JWT token generation
/// - API request helpers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use paddlebook_api::app::{build_router, AppState};
use paddlebook_api::config::Config;
use paddlebook_core::auth::jwt::{create_token, Claims, TokenType};
use paddlebook_core::models::item::{CreateItem, InventoryItem};
use paddlebook_core::models::user::{CreateUser, User};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
///
/// Each context creates its own member and admin accounts so tests can
/// run concurrently against a shared database. `tag` marks every item
/// the context catalogues, and `cleanup` removes everything by tag and
/// account.
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub member: User,
    pub admin: User,
    pub member_token: String,
    pub admin_token: String,
    pub tag: String,
}

impl TestContext {
    /// Creates a new test context with a fresh member and admin
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let tag = format!("test-{}", Uuid::new_v4());

        let member = User::create(
            &db,
            CreateUser {
                username: format!("{}-member", tag),
                email: format!("{}-member@example.com", tag),
                password_hash: "unused-in-tests".to_string(),
                membership_no: Some(1042),
            },
        )
        .await?;

        // Registration never grants admin, so promote directly
        let admin = User::create(
            &db,
            CreateUser {
                username: format!("{}-admin", tag),
                email: format!("{}-admin@example.com", tag),
                password_hash: "unused-in-tests".to_string(),
                membership_no: None,
            },
        )
        .await?;
        sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = $1")
            .bind(admin.id)
            .execute(&db)
            .await?;

        let member_claims = Claims::new(member.id, false, TokenType::Access);
        let admin_claims = Claims::new(admin.id, true, TokenType::Access);
        let member_token = create_token(&member_claims, &config.jwt.secret)?;
        let admin_token = create_token(&admin_claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            member,
            admin,
            member_token,
            admin_token,
            tag,
        })
    }

    /// Returns an authorization header value for the regular member
    pub fn member_auth(&self) -> String {
        format!("Bearer {}", self.member_token)
    }

    /// Returns an authorization header value for the admin
    pub fn admin_auth(&self) -> String {
        format!("Bearer {}", self.admin_token)
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        // Bookings cascade from both users and items
        sqlx::query("DELETE FROM inventory_items WHERE reference LIKE $1")
            .bind(format!("{}%", self.tag))
            .execute(&self.db)
            .await?;
        User::delete(&self.db, self.member.id).await?;
        User::delete(&self.db, self.admin.id).await?;
        Ok(())
    }
}

/// Helper to catalogue a test item directly in the database
pub async fn create_test_item(ctx: &TestContext, category: &str) -> anyhow::Result<InventoryItem> {
    let item = InventoryItem::create(
        &ctx.db,
        CreateItem {
            reference: format!("{}-{}", ctx.tag, Uuid::new_v4()),
            category: category.to_string(),
            craft_type: None,
            size: None,
            num_seats: Some(1),
        },
    )
    .await?;

    Ok(item)
}

/// Helper to send a JSON request and return (status, parsed body)
///
/// An empty response body (204) parses as JSON null.
pub async fn send(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> anyhow::Result<(StatusCode, serde_json::Value)> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }

    let request = builder.body(match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    })?;

    let response = ctx.app.clone().call(request).await?;
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, json))
}
