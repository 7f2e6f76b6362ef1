/// Authentication middleware for Axum
///
/// The gate in front of protected routes: extracts the bearer token from the
/// Authorization header, validates it, and injects an [`AuthContext`] into
/// the request extensions for handlers to consume. Stateless and
/// side-effect-free; an invalid request never reaches the handler.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use evently_shared::auth::middleware::{authenticate, AuthContext};
///
/// async fn protected(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.email)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected))
///     .route_layer(middleware::from_fn(|req, next| {
///         authenticate("your-jwt-secret", req, next)
///     }));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::validate_token;

/// Authenticated identity injected into request extensions
///
/// Handlers extract it with Axum's `Extension` extractor and use the email
/// to scope owner-filtered queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Authenticated user's email
    pub email: String,
}

/// Error type for the authentication gate
///
/// Both variants translate to 401 at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization header absent or not a bearer token
    #[error("No token provided")]
    MissingCredentials,

    /// Signature verification failed or the token is expired
    #[error("Invalid or expired token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Validates the request's bearer token and runs the inner handler
///
/// On success the decoded identity is available to the handler as an
/// [`AuthContext`] extension.
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] if the Authorization header is absent
///   or malformed
/// - [`AuthError::InvalidToken`] if signature verification fails or the
///   token is expired
pub async fn authenticate(
    secret: &str,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingCredentials)?;

    let claims = validate_token(token, secret).map_err(|_| AuthError::InvalidToken)?;

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(AuthError::MissingCredentials.to_string(), "No token provided");
        assert_eq!(
            AuthError::InvalidToken.to_string(),
            "Invalid or expired token"
        );
    }

    // The full gate (header extraction through handler dispatch) is covered
    // by the router-level tests in evently-api.
}
