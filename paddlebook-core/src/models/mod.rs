/// Database models for paddlebook
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Club member accounts and authentication
/// - `item`: Bookable inventory items (boats, paddles, safety gear)
/// - `booking`: Time-ranged reservations of items by members
///
/// # Example
///
/// ```no_run
/// use paddlebook_core::models::user::{User, CreateUser};
/// use paddlebook_core::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "jdoe".to_string(),
///     email: "jdoe@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     membership_no: Some(1042),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod booking;
pub mod item;
pub mod user;
