/// Database models for Evently
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Registered accounts with a denormalized owned-task counter
/// - `task`: Tasks belonging to an event, owned by a user's email
/// - `attendee`: Task attendees, keyed by a free-text task identifier
///
/// # Example
///
/// ```no_run
/// use evently_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "user@example.com".to_string(),
///         name: "John Doe".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod attendee;
pub mod task;
pub mod user;
