/// Task endpoints
///
/// Task CRUD, assignment resolution, and the statistics endpoint. Every
/// owner-scoped operation filters on the authenticated caller's email — a
/// task owned by someone else is indistinguishable from a missing one.
///
/// # Endpoints
///
/// - `GET /tasks/:id` - All tasks for an event (public)
/// - `GET /tasks?event_id=` - Caller's tasks for an event (bearer)
/// - `POST /tasks` - Create a task (bearer)
/// - `PUT /tasks/:id` - Update an owned task (bearer)
/// - `DELETE /tasks/:id` - Delete an owned task (bearer)
/// - `GET /tasksassigned/:event_id` - Tasks the caller is an attendee of (bearer)
/// - `GET /tasks/statistics` - Aggregate statistics over the caller's tasks (bearer)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use evently_shared::{
    auth::middleware::AuthContext,
    models::{
        attendee::Attendee,
        task::{CreateTask, Task, UpdateTask, STATUS_PENDING},
    },
    stats,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Request body shared by task create and update
///
/// Fields are optional at the deserialization layer; presence of the
/// required ones is enforced in [`TaskPayload::into_fields`] so a missing
/// field maps to the contract's 400. Timestamps arrive as RFC 3339 strings.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskPayload {
    /// Event the task belongs to (required on create)
    pub event_id: Option<String>,

    /// Task title
    pub title: Option<String>,

    /// Priority, 1-5
    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: Option<i32>,

    /// Status string; defaults to "Pending" on create, kept on update
    pub status: Option<String>,

    /// Scheduled start, RFC 3339
    pub start: Option<String>,

    /// Scheduled end, RFC 3339
    pub end: Option<String>,
}

/// Validated and parsed task fields
#[derive(Debug)]
struct TaskFields {
    event_id: Option<String>,
    title: String,
    priority: i32,
    status: Option<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl TaskPayload {
    /// Checks required fields and parses the timestamps
    ///
    /// Title, priority, start, and end must all be present and well-formed;
    /// event_id and status stay optional here (create additionally requires
    /// the event id).
    fn into_fields(self) -> Result<TaskFields, ApiError> {
        self.validate()?;

        let (Some(title), Some(priority), Some(start), Some(end)) =
            (self.title, self.priority, self.start, self.end)
        else {
            return Err(ApiError::Validation("All fields are required".to_string()));
        };

        Ok(TaskFields {
            event_id: self.event_id,
            title,
            priority,
            status: self.status,
            start_time: parse_timestamp(&start)?,
            end_time: parse_timestamp(&end)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ApiError::Validation("All fields are required".to_string()))
}

/// Query parameters for the caller-scoped task listing
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub event_id: Option<String>,
}

/// Response envelope for create/update
#[derive(Debug, Serialize)]
pub struct TaskEnvelope {
    pub message: String,
    pub task: Task,
}

/// Lists all tasks for an event (public)
///
/// # Endpoint
///
/// ```text
/// GET /tasks/:id
/// ```
pub async fn event_tasks(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_event(&state.db, &event_id).await?;
    Ok(Json(tasks))
}

/// Lists the caller's tasks for an event
///
/// # Endpoint
///
/// ```text
/// GET /tasks?event_id=<event>
/// Authorization: Bearer <token>
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let event_id = query
        .event_id
        .ok_or_else(|| ApiError::Validation("Event ID is required".to_string()))?;

    let tasks = Task::list_for_owner(&state.db, &event_id, &auth.email).await?;
    Ok(Json(tasks))
}

/// Lists the tasks the caller is an attendee of, for one event
///
/// Attendee records matching the caller's email are collected, their task
/// identifiers parsed, and tasks matching both an id and the event returned.
/// Attendee task identifiers are free text, so anything that isn't a task
/// UUID simply resolves to no task.
///
/// # Endpoint
///
/// ```text
/// GET /tasksassigned/:event_id
/// Authorization: Bearer <token>
/// ```
pub async fn assigned_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    if event_id.is_empty() {
        return Err(ApiError::Validation("Event ID is required".to_string()));
    }

    let assignments = Attendee::list_by_email(&state.db, &auth.email).await?;

    let task_ids: Vec<Uuid> = assignments
        .iter()
        .filter_map(|attendee| Uuid::parse_str(&attendee.task_id).ok())
        .collect();

    let tasks = Task::list_by_ids_for_event(&state.db, &task_ids, &event_id).await?;
    Ok(Json(tasks))
}

/// Creates a task owned by the caller
///
/// The owner's denormalized task counter is incremented in the same
/// transaction as the insert.
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "event_id": "event-1",
///   "title": "Book venue",
///   "priority": 3,
///   "status": "Pending",
///   "start": "2025-06-01T09:00:00Z",
///   "end": "2025-06-01T11:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `400`: missing fields, unparseable timestamps, or priority out of range
/// - `500`: persistence failure
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<TaskPayload>,
) -> ApiResult<(StatusCode, Json<TaskEnvelope>)> {
    let fields = payload.into_fields()?;
    let event_id = fields
        .event_id
        .ok_or_else(|| ApiError::Validation("All fields are required".to_string()))?;

    let task = Task::create(
        &state.db,
        CreateTask {
            event_id,
            email: auth.email.clone(),
            title: fields.title,
            priority: fields.priority,
            status: fields
                .status
                .unwrap_or_else(|| STATUS_PENDING.to_string()),
            start_time: fields.start_time,
            end_time: fields.end_time,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskEnvelope {
            message: "Task added successfully".to_string(),
            task,
        }),
    ))
}

/// Updates a task owned by the caller
///
/// # Endpoint
///
/// ```text
/// PUT /tasks/:id
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `400`: missing fields or unparseable timestamps
/// - `404`: no task matches the id AND the caller's email
/// - `500`: persistence failure
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaskPayload>,
) -> ApiResult<Json<TaskEnvelope>> {
    let fields = payload.into_fields()?;

    let task = Task::update_owned(
        &state.db,
        id,
        &auth.email,
        UpdateTask {
            title: fields.title,
            priority: fields.priority,
            status: fields.status,
            start_time: fields.start_time,
            end_time: fields.end_time,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskEnvelope {
        message: "Task updated successfully".to_string(),
        task,
    }))
}

/// Deletes a task owned by the caller
///
/// The owner's task counter is decremented in the same transaction as the
/// delete.
///
/// # Endpoint
///
/// ```text
/// DELETE /tasks/:id
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `404`: no task matches the id AND the caller's email
/// - `500`: persistence failure
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete_owned(&state.db, id, &auth.email).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// Aggregate statistics over all of the caller's tasks
///
/// The computation is pure and re-runs in full on every call; with no tasks
/// the response carries an empty statistics object and a message instead.
///
/// # Endpoint
///
/// ```text
/// GET /tasks/statistics
/// Authorization: Bearer <token>
/// ```
pub async fn statistics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<serde_json::Value>> {
    let tasks = Task::list_by_owner(&state.db, &auth.email).await?;

    let body = match stats::compute(&tasks, Utc::now()) {
        None => json!({
            "message": "No tasks found for this user",
            "statistics": {},
        }),
        Some(statistics) => json!({ "statistics": statistics }),
    };

    Ok(Json(body))
}
