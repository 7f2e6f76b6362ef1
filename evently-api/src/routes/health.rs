/// Status probe
///
/// # Endpoint
///
/// ```text
/// GET /
/// ```
///
/// # Response
///
/// ```json
/// { "status": "success" }
/// ```

use axum::Json;
use serde::{Deserialize, Serialize};

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Service status
    pub status: String,
}

/// Status handler; answers unconditionally once the server is up
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "success".to_string(),
    })
}
