/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Register a new user (no token issued)
/// - `POST /login` - Login and receive a 1-hour bearer token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use evently_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, PublicUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
///
/// Fields are optional at the deserialization layer so a missing field maps
/// to the contract's 400 rather than a body-rejection error.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Display name
    pub name: Option<String>,

    /// Password (stored as an Argon2id hash)
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Password
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token, expires 1 hour from issuance
    pub token: String,

    /// Public profile of the authenticated user
    pub user: PublicUser,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: application/json
///
/// { "email": "user@example.com", "name": "John Doe", "password": "secret" }
/// ```
///
/// # Errors
///
/// - `400`: missing fields, invalid email format, or email already taken
/// - `500`: hashing or persistence failure
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let (Some(email), Some(name), Some(password)) =
        (req.email.clone(), req.name.clone(), req.password.clone())
    else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };
    req.validate()?;

    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&password)?;

    User::create(
        &state.db,
        CreateUser {
            email,
            name,
            password_hash,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Login and obtain a bearer token
///
/// Unknown email and wrong password return the identical message, so callers
/// cannot enumerate registered users.
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret" }
/// ```
///
/// # Response
///
/// ```json
/// { "token": "eyJ...", "user": { "email": "user@example.com", "name": "John Doe" } }
/// ```
///
/// # Errors
///
/// - `400`: missing fields
/// - `401`: invalid credentials
/// - `500`: persistence failure
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (Some(email), Some(supplied_password)) = (req.email.clone(), req.password.clone()) else {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    };
    req.validate()?;

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !password::verify_password(&supplied_password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, user.email.clone());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        token,
        user: user.public(),
    }))
}
