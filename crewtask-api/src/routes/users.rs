/// User profile endpoints
///
/// All endpoints require JWT authentication and operate on the caller's
/// own account.
///
/// # Endpoints
///
/// - `GET /v1/users/me` - Current user's profile
/// - `PUT /v1/users/me/name` - Change display name
/// - `PUT /v1/users/me/organization` - Move to another organization

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use crewtask_shared::{
    auth::middleware::AuthContext,
    error::CoreError,
    models::{organization::Organization, user::User},
};
use serde::Deserialize;
use validator::Validate;

/// Update name request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNameRequest {
    /// New display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Update organization request
#[derive(Debug, Deserialize)]
pub struct UpdateOrganizationRequest {
    /// Organization to move to
    pub organization_id: i64,
}

/// Current user's profile
///
/// # Endpoint
///
/// ```text
/// GET /v1/users/me
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, auth.user_id).await?;
    Ok(Json(user))
}

/// Changes the caller's display name
///
/// # Endpoint
///
/// ```text
/// PUT /v1/users/me/name
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// { "name": "New Name" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_name(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateNameRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let user = User::update_name(&state.db, auth.user_id, &req.name).await?;
    Ok(Json(user))
}

/// Moves the caller to another organization
///
/// Team memberships are unaffected: leaving an organization does not
/// revoke memberships in its teams.
///
/// # Endpoint
///
/// ```text
/// PUT /v1/users/me/organization
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// { "organization_id": 3 }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `404 Not Found`: Organization does not exist
pub async fn update_organization(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateOrganizationRequest>,
) -> ApiResult<Json<User>> {
    Organization::find_by_id(&state.db, req.organization_id)
        .await?
        .ok_or(CoreError::NotFound)?;

    let user = User::assign_organization(&state.db, auth.user_id, req.organization_id).await?;
    Ok(Json(user))
}
