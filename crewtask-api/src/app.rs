/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use crewtask_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = crewtask_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use crewtask_shared::auth::{jwt, middleware::AuthContext};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
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

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// ├── /v1/                             # API v1 (versioned)
/// │   ├── /auth/                       # Authentication (public)
/// │   │   ├── POST /signup
/// │   │   ├── POST /login
/// │   │   └── POST /refresh
/// │   ├── /users/                      # User profile (authenticated)
/// │   │   ├── GET /me
/// │   │   ├── PUT /me/name
/// │   │   └── PUT /me/organization
/// │   ├── /organizations/              # Organizations (authenticated)
/// │   │   ├── POST   /
/// │   │   ├── GET    /
/// │   │   ├── GET    /created
/// │   │   ├── GET    /:org_id/users
/// │   │   ├── POST   /:org_id/teams
/// │   │   └── GET    /:org_id/teams
/// │   ├── /teams/                      # Teams and memberships (authenticated)
/// │   │   ├── GET    /joined
/// │   │   ├── DELETE /:team_id
/// │   │   ├── POST   /:team_id/members
/// │   │   ├── DELETE /:team_id/members
/// │   │   └── POST   /:team_id/tasks
/// │   └── /tasks/                      # Task lifecycle (authenticated)
/// │       ├── GET    /
/// │       ├── GET    /deadline
/// │       ├── GET    /status
/// │       ├── GET    /search
/// │       ├── GET    /:task_id
/// │       ├── PUT    /:task_id
/// │       ├── PUT    /:task_id/status
/// │       └── DELETE /:task_id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // User profile routes
    let user_routes = Router::new()
        .route("/me", get(routes::users::me))
        .route("/me/name", put(routes::users::update_name))
        .route("/me/organization", put(routes::users::update_organization));

    // Organization routes
    let organization_routes = Router::new()
        .route("/", post(routes::organizations::create_organization))
        .route("/", get(routes::organizations::list_organizations))
        .route("/created", get(routes::organizations::list_created))
        .route("/:org_id/users", get(routes::organizations::list_users))
        .route("/:org_id/teams", post(routes::teams::create_team))
        .route("/:org_id/teams", get(routes::teams::list_teams));

    // Team and membership routes
    let team_routes = Router::new()
        .route("/joined", get(routes::teams::list_joined))
        .route("/:team_id", delete(routes::teams::delete_team))
        .route("/:team_id/members", post(routes::teams::join_team))
        .route("/:team_id/members", delete(routes::teams::leave_team))
        .route("/:team_id/tasks", post(routes::tasks::create_task));

    // Task routes
    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks))
        .route("/deadline", get(routes::tasks::list_by_deadline))
        .route("/status", get(routes::tasks::list_by_status))
        .route("/search", get(routes::tasks::search_tasks))
        .route("/:task_id", get(routes::tasks::get_task))
        .route("/:task_id", put(routes::tasks::update_task))
        .route("/:task_id/status", put(routes::tasks::update_task_status))
        .route("/:task_id", delete(routes::tasks::delete_task));

    // Everything except /auth requires JWT authentication
    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/organizations", organization_routes)
        .nest("/teams", team_routes)
        .nest("/tasks", task_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
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
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the JWT from the Authorization header,
/// then injects AuthContext into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_jwt(claims.sub);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
