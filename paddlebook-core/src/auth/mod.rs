/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: JWT token generation and validation, plus the
///   [`jwt::TokenVerifier`] trait that lets alternative token schemes
///   plug in behind one `verify(credential) -> Claims` seam
/// - [`middleware`]: Bearer-token axum middleware producing an [`middleware::Actor`]
/// - [`authorization`]: Pure access-control decisions (owner-or-admin model)
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with configurable expiration
/// - **Fail-closed admin checks**: an absent or false admin flag never
///   grants admin access
///
/// # Example
///
/// ```no_run
/// use paddlebook_core::auth::password::{hash_password, verify_password};
/// use paddlebook_core::auth::jwt::{create_token, Claims, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("member_password")?;
/// assert!(verify_password("member_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), false, TokenType::Access);
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
