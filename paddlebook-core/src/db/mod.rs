/// Database layer for paddlebook
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health check
/// - `migrations`: Database migration runner
///
/// Models live in the `models` module at crate root level. The pool is
/// opened once at process start, shared via the API's application state,
/// and closed at shutdown; no global singletons.
///
/// # Example
///
/// ```no_run
/// use paddlebook_core::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
