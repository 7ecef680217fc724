/// Authentication middleware for Axum
///
/// Extracts the `Authorization: Bearer <token>` header, verifies it via a
/// [`TokenVerifier`], and inserts an [`Actor`] into request extensions.
/// Handlers behind the layer always see `Actor::Member`; routes that
/// allow anonymous access simply don't apply the layer.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get, middleware, Extension};
/// use std::sync::Arc;
/// use paddlebook_core::auth::jwt::HsTokenVerifier;
/// use paddlebook_core::auth::middleware::{bearer_auth_middleware, Actor};
///
/// async fn handler(Extension(actor): Extension<Actor>) -> String {
///     format!("hello, {:?}", actor)
/// }
///
/// let verifier: Arc<HsTokenVerifier> = Arc::new(HsTokenVerifier::new("secret"));
/// let app: Router = Router::new()
///     .route("/protected", get(handler))
///     .layer(middleware::from_fn(move |req, next| {
///         bearer_auth_middleware(verifier.clone(), req, next)
///     }));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::jwt::{Claims, JwtError, TokenVerifier};

/// A verified, authenticated club member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The member's user ID
    pub id: Uuid,

    /// Admin flag, trusted verbatim from the verified claims
    pub is_admin: bool,
}

/// The entity making a request
///
/// Constructed only from verified claims; an `Anonymous` actor never
/// carries an identity and a `Member` always does. The admin flag comes
/// from the claims' fail-closed default, so a missing flag is never
/// admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    /// No valid credential presented
    Anonymous,

    /// Authenticated club member
    Member(Member),
}

impl Actor {
    /// Creates an actor from verified claims
    pub fn from_claims(claims: &Claims) -> Self {
        Actor::Member(Member {
            id: claims.sub,
            is_admin: claims.admin,
        })
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

/// Bearer-token authentication middleware
///
/// Verifies the token with the supplied [`TokenVerifier`] and adds
/// `Actor::Member` to request extensions.
///
/// # Errors
///
/// Returns 401 Unauthorized if the header is missing, the token is
/// invalid, or the token has expired; 400 for a malformed header.
pub async fn bearer_auth_middleware(
    verifier: Arc<dyn TokenVerifier>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = verifier.verify(token).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    req.extensions_mut().insert(Actor::from_claims(&claims));

    Ok(next.run(req).await)
}
