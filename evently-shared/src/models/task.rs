/// Task model and database operations
///
/// Tasks belong to an event (`event_id`, an external grouping identifier
/// that is not itself a managed entity) and are owned by a user's email.
/// Owner-scoped operations filter on `(id, email)` — a task whose email does
/// not match the caller is invisible to update/delete regardless of the id.
///
/// Task creation and deletion also maintain the owner's denormalized
/// `users.tasks` counter; both statements run in a single transaction so the
/// counter cannot drift from the actual row count on partial failure.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     event_id TEXT NOT NULL,
///     email TEXT NOT NULL,
///     title TEXT NOT NULL,
///     priority INTEGER NOT NULL CHECK (priority BETWEEN 1 AND 5),
///     status TEXT NOT NULL DEFAULT 'Pending',
///     start_time TIMESTAMPTZ NOT NULL,
///     end_time TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Status value for tasks not yet finished; the default on creation.
pub const STATUS_PENDING: &str = "Pending";

/// Status value for completed tasks.
///
/// Status is an open-ended string set; these two values are the ones the
/// statistics aggregator distinguishes.
pub const STATUS_FINISHED: &str = "Finished";

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Event this task belongs to
    pub event_id: String,

    /// Email of the owning user
    pub email: String,

    /// Task title
    pub title: String,

    /// Priority, 1 (lowest) through 5 (highest)
    pub priority: i32,

    /// Status string, e.g. "Pending" or "Finished"
    pub status: String,

    /// Scheduled start
    pub start_time: DateTime<Utc>,

    /// Scheduled end; not validated to be after `start_time`
    pub end_time: DateTime<Utc>,

    /// Server-assigned creation time, immutable after insert
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub event_id: String,
    pub email: String,
    pub title: String,
    pub priority: i32,
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Input for updating a task
///
/// `status` is optional: when `None`, the stored status is left unchanged.
/// `created_at` and ownership are never updatable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: String,
    pub priority: i32,
    pub status: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Task {
    /// Creates a new task and increments the owner's task counter
    ///
    /// Both writes run in one transaction: either the task row exists and
    /// the counter moved, or neither happened.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (event_id, email, title, priority, status, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, event_id, email, title, priority, status, start_time, end_time, created_at
            "#,
        )
        .bind(&data.event_id)
        .bind(&data.email)
        .bind(&data.title)
        .bind(data.priority)
        .bind(&data.status)
        .bind(data.start_time)
        .bind(data.end_time)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET tasks = tasks + 1 WHERE email = $1")
            .bind(&data.email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(task)
    }

    /// Lists all tasks for an event, regardless of owner
    pub async fn list_by_event(pool: &PgPool, event_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, event_id, email, title, priority, status, start_time, end_time, created_at
            FROM tasks
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the caller's tasks for an event
    pub async fn list_for_owner(
        pool: &PgPool,
        event_id: &str,
        email: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, event_id, email, title, priority, status, start_time, end_time, created_at
            FROM tasks
            WHERE event_id = $1 AND email = $2
            "#,
        )
        .bind(event_id)
        .bind(email)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists every task owned by an email, across all events
    ///
    /// This is the statistics aggregator's input.
    pub async fn list_by_owner(pool: &PgPool, email: &str) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, event_id, email, title, priority, status, start_time, end_time, created_at
            FROM tasks
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks in `ids` that belong to the given event
    ///
    /// Used to resolve attendee assignments back to tasks.
    pub async fn list_by_ids_for_event(
        pool: &PgPool,
        ids: &[Uuid],
        event_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, event_id, email, title, priority, status, start_time, end_time, created_at
            FROM tasks
            WHERE id = ANY($1) AND event_id = $2
            "#,
        )
        .bind(ids.to_vec())
        .bind(event_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates the task matching `(id, email)`
    ///
    /// Returns `None` when no row matches — including when the id exists but
    /// belongs to another owner.
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        email: &str,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3,
                priority = $4,
                status = COALESCE($5, status),
                start_time = $6,
                end_time = $7
            WHERE id = $1 AND email = $2
            RETURNING id, event_id, email, title, priority, status, start_time, end_time, created_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(data.title)
        .bind(data.priority)
        .bind(data.status)
        .bind(data.start_time)
        .bind(data.end_time)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes the task matching `(id, email)` and decrements the owner's
    /// task counter
    ///
    /// Returns `true` if a row was deleted. The delete and the counter
    /// decrement share a transaction; when nothing matches, the counter is
    /// untouched.
    pub async fn delete_owned(pool: &PgPool, id: Uuid, email: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted: Option<(Uuid,)> =
            sqlx::query_as("DELETE FROM tasks WHERE id = $1 AND email = $2 RETURNING id")
                .bind(id)
                .bind(email)
                .fetch_optional(&mut *tx)
                .await?;

        if deleted.is_some() {
            sqlx::query("UPDATE users SET tasks = tasks - 1 WHERE email = $1")
                .bind(email)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(deleted.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_constants() {
        assert_eq!(STATUS_PENDING, "Pending");
        assert_eq!(STATUS_FINISHED, "Finished");
        assert_ne!(STATUS_PENDING, STATUS_FINISHED);
    }

    #[test]
    fn test_task_serializes_wire_fields() {
        let task = Task {
            id: Uuid::new_v4(),
            event_id: "event-1".to_string(),
            email: "owner@example.com".to_string(),
            title: "Book venue".to_string(),
            priority: 3,
            status: STATUS_PENDING.to_string(),
            start_time: Utc::now(),
            end_time: Utc::now(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["event_id"], "event-1");
        assert_eq!(json["priority"], 3);
        assert_eq!(json["status"], "Pending");
        assert!(json.get("start_time").is_some());
        assert!(json.get("end_time").is_some());
    }

    // CRUD paths require a running database; they are exercised through the
    // API handlers.
}
