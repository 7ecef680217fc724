/// JWT token generation and validation
///
/// Tokens are signed using HS256 (HMAC-SHA256) and carry the member's
/// identity plus the admin flag the authorization layer trusts verbatim.
///
/// # Token Types
///
/// - **Access Token**: Short-lived (24h), presented on API requests
/// - **Refresh Token**: Long-lived (30d), exchanged for new access tokens
///
/// # Pluggable verification
///
/// The service grew through several authentication schemes (external
/// identity provider, cookie JWT, self-issued tokens). All of them reduce
/// to "verify a raw credential into [`Claims`]", so handlers depend on the
/// [`TokenVerifier`] trait and the deployment picks the implementation.
/// The shipped implementation is [`HsTokenVerifier`].
///
/// # Example
///
/// ```
/// use paddlebook_core::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes";
///
/// let claims = Claims::new(user_id, false, TokenType::Access);
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// assert!(!validated.admin);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuer claim for all self-issued tokens
const ISSUER: &str = "paddlebook";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived, 24 hours)
    Access,

    /// Refresh token (long-lived, 30 days)
    Refresh,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (member's user ID)
/// - `iss`: Issuer (always "paddlebook")
/// - `iat` / `exp` / `nbf`: Issued-at, expiration, not-before timestamps
///
/// # Custom Claims
///
/// - `admin`: Whether the member holds the admin flag. Defaults to false
///   on deserialization so a token missing the claim is never admin.
/// - `token_type`: Access or refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: member's user ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Admin flag (custom claim, fail-closed default)
    #[serde(default)]
    pub admin: bool,

    /// Token type (custom claim)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new claims with the default expiration for the token type
    pub fn new(user_id: Uuid, admin: bool, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, admin, token_type, token_type.default_expiration())
    }

    /// Creates claims with a custom expiration
    pub fn with_expiration(
        user_id: Uuid,
        admin: bool,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            admin,
            token_type,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret. The secret
/// should be at least 32 bytes and randomly generated (`openssl rand
/// -hex 32`).
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies the signature, expiration, not-before time, and issuer.
///
/// # Errors
///
/// Returns an error if the signature is invalid, the token has expired,
/// or the issuer doesn't match.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token and checks it's an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::ValidationError(
            "Expected access token, got refresh token".to_string(),
        ));
    }

    Ok(claims)
}

/// Validates a token and checks it's a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::ValidationError(
            "Expected refresh token, got access token".to_string(),
        ));
    }

    Ok(claims)
}

/// Refreshes an access token using a refresh token
///
/// Takes a valid refresh token and mints a new access token for the same
/// member, preserving the admin flag.
///
/// # Errors
///
/// Returns an error if the refresh token is invalid or expired
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let refresh_claims = validate_refresh_token(refresh_token, secret)?;

    let access_claims = Claims::new(refresh_claims.sub, refresh_claims.admin, TokenType::Access);

    create_token(&access_claims, secret)
}

/// Verifies a raw credential into [`Claims`]
///
/// One seam for all authentication schemes: the HTTP layer depends on
/// this trait, the deployment configuration decides the implementation.
pub trait TokenVerifier: Send + Sync {
    /// Verifies `token` and returns its claims
    fn verify(&self, token: &str) -> Result<Claims, JwtError>;
}

/// [`TokenVerifier`] for self-issued HS256 access tokens
#[derive(Clone)]
pub struct HsTokenVerifier {
    secret: String,
}

impl HsTokenVerifier {
    /// Creates a verifier over the given signing secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl TokenVerifier for HsTokenVerifier {
    fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        validate_access_token(token, &self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::hours(24));
        assert_eq!(TokenType::Refresh.default_expiration(), Duration::days(30));
    }

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, true, TokenType::Access);

        assert_eq!(claims.sub, user_id);
        assert!(claims.admin);
        assert_eq!(claims.iss, "paddlebook");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let secret = "test-secret-key-at-least-32-bytes-long";

        let claims = Claims::new(user_id, false, TokenType::Access);
        let token = create_token(&claims, secret).expect("Should create token");

        let validated = validate_token(&token, secret).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert!(!validated.admin);
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), false, TokenType::Access);
        let token = create_token(&claims, "secret1").expect("Should create token");

        assert!(validate_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            false,
            TokenType::Access,
            Duration::seconds(-3600),
        );

        assert!(claims.is_expired());

        let token = create_token(&claims, "secret").expect("Should create token");
        let result = validate_token(&token, "secret");

        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_access_and_refresh_are_distinct() {
        let secret = "secret";

        let access = create_token(&Claims::new(Uuid::new_v4(), false, TokenType::Access), secret)
            .unwrap();
        let refresh = create_token(
            &Claims::new(Uuid::new_v4(), false, TokenType::Refresh),
            secret,
        )
        .unwrap();

        assert!(validate_access_token(&access, secret).is_ok());
        assert!(validate_access_token(&refresh, secret).is_err());
        assert!(validate_refresh_token(&refresh, secret).is_ok());
        assert!(validate_refresh_token(&access, secret).is_err());
    }

    #[test]
    fn test_refresh_access_token_preserves_admin() {
        let user_id = Uuid::new_v4();
        let secret = "secret";

        let refresh_claims = Claims::new(user_id, true, TokenType::Refresh);
        let refresh_token = create_token(&refresh_claims, secret).unwrap();

        let new_access = refresh_access_token(&refresh_token, secret).unwrap();
        let validated = validate_access_token(&new_access, secret).unwrap();

        assert_eq!(validated.sub, user_id);
        assert!(validated.admin);
    }

    #[test]
    fn test_refresh_with_access_token_fails() {
        let secret = "secret";

        let access_claims = Claims::new(Uuid::new_v4(), false, TokenType::Access);
        let access_token = create_token(&access_claims, secret).unwrap();

        assert!(refresh_access_token(&access_token, secret).is_err());
    }

    #[test]
    fn test_hs_verifier_accepts_access_tokens_only() {
        let secret = "test-secret-key-at-least-32-bytes-long";
        let verifier = HsTokenVerifier::new(secret);

        let access = create_token(&Claims::new(Uuid::new_v4(), false, TokenType::Access), secret)
            .unwrap();
        let refresh = create_token(
            &Claims::new(Uuid::new_v4(), false, TokenType::Refresh),
            secret,
        )
        .unwrap();

        assert!(verifier.verify(&access).is_ok());
        assert!(verifier.verify(&refresh).is_err());
    }

    #[test]
    fn test_missing_admin_claim_defaults_to_false() {
        // A token minted by an older revision without the admin claim
        // must deserialize as not-admin.
        let json = format!(
            r#"{{"sub":"{}","iss":"paddlebook","iat":0,"exp":4102444800,"nbf":0,"token_type":"access"}}"#,
            Uuid::new_v4()
        );
        let claims: Claims = serde_json::from_str(&json).unwrap();
        assert!(!claims.admin);
    }
}
