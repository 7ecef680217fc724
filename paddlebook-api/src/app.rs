/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use paddlebook_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = paddlebook_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use paddlebook_core::auth::{
    jwt::{HsTokenVerifier, TokenVerifier},
    middleware::bearer_auth_middleware,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; Arc
/// internally for cheap cloning. The token verifier is held behind the
/// trait so an alternative authentication scheme can be wired in here
/// without touching any handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Credential verifier for the auth middleware
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Creates new application state with the default HS256 verifier
    pub fn new(db: PgPool, config: Config) -> Self {
        let verifier = Arc::new(HsTokenVerifier::new(config.jwt.secret.clone()));
        Self {
            db,
            config: Arc::new(config),
            verifier,
        }
    }

    /// Creates application state with a custom token verifier
    pub fn with_verifier(db: PgPool, config: Config, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            verifier,
        }
    }

    /// Gets JWT secret for token issuance
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                  # Health check (public)
/// └── /v1/                     # API v1 (versioned)
///     ├── /auth/               # Authentication (public)
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── POST /refresh
///     ├── /users/              # Member accounts (authenticated)
///     ├── /inventory/          # Items (authenticated; writes admin-only)
///     └── /bookings/           # Reservations (authenticated)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Bearer authentication (per-route-group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Everything else requires a verified member; per-action rules are
    // applied in the handlers via authorize().
    let user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/:id", get(routes::users::get_user))
        .route("/:id", put(routes::users::update_user))
        .route("/:id", delete(routes::users::delete_user));

    let inventory_routes = Router::new()
        .route("/", get(routes::inventory::list_items))
        .route("/", post(routes::inventory::create_item))
        .route("/:id", get(routes::inventory::get_item))
        .route("/:id", put(routes::inventory::update_item))
        .route("/:id", delete(routes::inventory::delete_item));

    let booking_routes = Router::new()
        .route("/", get(routes::bookings::list_bookings))
        .route("/", post(routes::bookings::create_booking))
        .route("/:id", get(routes::bookings::get_booking))
        .route("/:id", put(routes::bookings::update_booking))
        .route("/:id", delete(routes::bookings::delete_booking));

    let verifier = state.verifier.clone();
    let authenticated = Router::new()
        .nest("/users", user_routes)
        .nest("/inventory", inventory_routes)
        .nest("/bookings", booking_routes)
        .layer(axum::middleware::from_fn(move |req, next| {
            bearer_auth_middleware(verifier.clone(), req, next)
        }));

    let v1_routes = Router::new().nest("/auth", auth_routes).merge(authenticated);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new())
        .with_state(state)
}
