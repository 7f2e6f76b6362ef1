/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Status probe
/// - `auth`: Authentication endpoints (register, login)
/// - `tasks`: Task CRUD, assignment resolution, and statistics
/// - `attendees`: Attendee CRUD

pub mod attendees;
pub mod auth;
pub mod health;
pub mod tasks;

use serde::{Deserialize, Serialize};

/// Plain confirmation body shared by several endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
