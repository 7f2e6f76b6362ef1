/// Application state and router builder
///
/// Defines the shared application state and assembles the Axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use evently_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use evently_shared::auth::middleware as auth;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; cheap to
/// clone (`PgPool` is reference-counted, config is behind an `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT signing secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET  /                                     # Status probe (public)
/// ├── POST /register                             # Register (public)
/// ├── POST /login                                # Login (public)
/// ├── GET  /tasks/:id                            # Tasks for an event (public)
/// ├── GET  /tasks?event_id=                      # Caller's tasks for an event (bearer)
/// ├── POST /tasks                                # Create task (bearer)
/// ├── GET  /tasks/statistics                     # Task statistics (bearer)
/// ├── PUT  /tasks/:id                            # Update owned task (bearer)
/// ├── DEL  /tasks/:id                            # Delete owned task (bearer)
/// ├── GET  /tasksassigned/:event_id              # Tasks assigned to caller (bearer)
/// └── /tasks/:id/attendees[/:attendee_id]        # Attendee CRUD (public)
/// ```
///
/// The bearer-gated routes carry the auth layer; everything else is open.
/// CORS and trace logging wrap the whole router.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/tasks/statistics", get(routes::tasks::statistics))
        .route(
            "/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/tasksassigned/:event_id", get(routes::tasks::assigned_tasks))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let public = Router::new()
        .route("/", get(routes::health::status))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/tasks/:id", get(routes::tasks::event_tasks))
        .route(
            "/tasks/:id/attendees",
            get(routes::attendees::list_attendees).post(routes::attendees::create_attendee),
        )
        .route(
            "/tasks/:id/attendees/:attendee_id",
            put(routes::attendees::update_attendee).delete(routes::attendees::delete_attendee),
        );

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    };

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Delegates to the shared auth gate with this deployment's signing secret;
/// failures surface as 401 responses.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    auth::authenticate(state.jwt_secret(), req, next)
        .await
        .map_err(ApiError::from)
}
