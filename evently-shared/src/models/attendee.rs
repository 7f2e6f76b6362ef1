/// Attendee model and database operations
///
/// Attendees hang off a task by a free-text `task_id`. The identifier is
/// deliberately not a foreign key: attendees can be created against task
/// identifiers that do not resolve to any task row, and deleting a task
/// leaves its attendees in place.
///
/// All fields beyond the identifier are optional at this layer.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE attendees (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id TEXT NOT NULL,
///     name TEXT,
///     email TEXT,
///     mobile TEXT
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Attendee record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendee {
    /// Unique attendee ID
    pub id: Uuid,

    /// Task identifier this attendee is attached to (free text, unvalidated)
    pub task_id: String,

    pub name: Option<String>,

    pub email: Option<String>,

    pub mobile: Option<String>,
}

/// Input for creating a new attendee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAttendee {
    pub task_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

/// Input for updating an attendee
///
/// Only `Some` fields are written; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAttendee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

impl Attendee {
    /// Creates a new attendee
    ///
    /// The task identifier is stored as given; no referential check.
    pub async fn create(pool: &PgPool, data: CreateAttendee) -> Result<Self, sqlx::Error> {
        let attendee = sqlx::query_as::<_, Attendee>(
            r#"
            INSERT INTO attendees (task_id, name, email, mobile)
            VALUES ($1, $2, $3, $4)
            RETURNING id, task_id, name, email, mobile
            "#,
        )
        .bind(data.task_id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.mobile)
        .fetch_one(pool)
        .await?;

        Ok(attendee)
    }

    /// Finds an attendee by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let attendee = sqlx::query_as::<_, Attendee>(
            r#"
            SELECT id, task_id, name, email, mobile
            FROM attendees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(attendee)
    }

    /// Lists all attendees attached to a task identifier
    pub async fn list_by_task(pool: &PgPool, task_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let attendees = sqlx::query_as::<_, Attendee>(
            r#"
            SELECT id, task_id, name, email, mobile
            FROM attendees
            WHERE task_id = $1
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(attendees)
    }

    /// Lists all attendee records with a matching email
    ///
    /// Used to resolve which tasks a user is assigned to.
    pub async fn list_by_email(pool: &PgPool, email: &str) -> Result<Vec<Self>, sqlx::Error> {
        let attendees = sqlx::query_as::<_, Attendee>(
            r#"
            SELECT id, task_id, name, email, mobile
            FROM attendees
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_all(pool)
        .await?;

        Ok(attendees)
    }

    /// Updates an attendee, writing only the provided fields
    ///
    /// Returns the updated record, or `None` if no record has that ID. With
    /// no fields provided, the stored record is returned unchanged.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateAttendee,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET clause from the provided fields, same shape for any
        // combination of them.
        let mut clauses = Vec::new();
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            clauses.push(format!("name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            clauses.push(format!("email = ${}", bind_count));
        }
        if data.mobile.is_some() {
            bind_count += 1;
            clauses.push(format!("mobile = ${}", bind_count));
        }

        if clauses.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let query = format!(
            "UPDATE attendees SET {} WHERE id = $1 RETURNING id, task_id, name, email, mobile",
            clauses.join(", ")
        );

        let mut q = sqlx::query_as::<_, Attendee>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(mobile) = data.mobile {
            q = q.bind(mobile);
        }

        let attendee = q.fetch_optional(pool).await?;

        Ok(attendee)
    }

    /// Deletes an attendee by ID
    ///
    /// Returns `true` if a row was deleted; callers treat a miss as success.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attendees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
