/// Attendee endpoints
///
/// Attendee CRUD is unauthenticated and scoped only by the task identifier
/// in the path. The identifier is free text: it is not checked against
/// existing tasks, and attendees are not touched when a task is deleted.
///
/// # Endpoints
///
/// - `GET /tasks/:id/attendees` - List attendees for a task identifier
/// - `POST /tasks/:id/attendees` - Create an attendee
/// - `PUT /tasks/:id/attendees/:attendee_id` - Update an attendee
/// - `DELETE /tasks/:id/attendees/:attendee_id` - Delete an attendee

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use evently_shared::models::attendee::{Attendee, CreateAttendee, UpdateAttendee};
use serde::Deserialize;
use uuid::Uuid;

/// Request body for attendee create and update
///
/// Every field is optional; there is no required-field enforcement at this
/// layer.
#[derive(Debug, Deserialize)]
pub struct AttendeePayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

/// Lists attendees attached to a task identifier
pub async fn list_attendees(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<Vec<Attendee>>> {
    let attendees = Attendee::list_by_task(&state.db, &task_id).await?;
    Ok(Json(attendees))
}

/// Creates an attendee under a task identifier
///
/// The identifier is taken from the path and stored verbatim; it does not
/// have to name an existing task.
pub async fn create_attendee(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<AttendeePayload>,
) -> ApiResult<(StatusCode, Json<Attendee>)> {
    let attendee = Attendee::create(
        &state.db,
        CreateAttendee {
            task_id,
            name: payload.name,
            email: payload.email,
            mobile: payload.mobile,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(attendee)))
}

/// Updates an attendee
///
/// Responds with the updated record, or a JSON `null` body when no record
/// has that ID — a miss is not an error here.
pub async fn update_attendee(
    State(state): State<AppState>,
    Path((_task_id, attendee_id)): Path<(String, Uuid)>,
    Json(payload): Json<AttendeePayload>,
) -> ApiResult<Json<Option<Attendee>>> {
    let attendee = Attendee::update(
        &state.db,
        attendee_id,
        UpdateAttendee {
            name: payload.name,
            email: payload.email,
            mobile: payload.mobile,
        },
    )
    .await?;

    Ok(Json(attendee))
}

/// Deletes an attendee
///
/// Responds 204 whether or not a record existed.
pub async fn delete_attendee(
    State(state): State<AppState>,
    Path((_task_id, attendee_id)): Path<(String, Uuid)>,
) -> ApiResult<StatusCode> {
    Attendee::delete(&state.db, attendee_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
