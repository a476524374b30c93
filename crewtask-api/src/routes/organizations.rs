/// Organization endpoints
///
/// Organizations are a public directory: any authenticated user can browse
/// them and create new ones. The seeded "Unaffiliated" organization holds
/// users who have not joined one yet.
///
/// # Endpoints
///
/// - `POST /v1/organizations` - Create organization
/// - `GET /v1/organizations` - List all organizations
/// - `GET /v1/organizations/created` - List organizations founded by the caller
/// - `GET /v1/organizations/:org_id/users` - List an organization's users

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use crewtask_shared::{
    auth::middleware::AuthContext,
    error::CoreError,
    models::{
        organization::{CreateOrganization, Organization},
        user::User,
    },
};
use serde::Deserialize;
use validator::Validate;

/// Create organization request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    /// Organization name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Organization description
    #[serde(default)]
    pub description: String,
}

/// Creates a new organization founded by the caller
///
/// # Endpoint
///
/// ```text
/// POST /v1/organizations
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "name": "Acme Inc",
///   "description": "Widgets"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_organization(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateOrganizationRequest>,
) -> ApiResult<Json<Organization>> {
    req.validate()?;

    let organization = Organization::create(
        &state.db,
        CreateOrganization {
            name: req.name,
            description: req.description,
        },
        auth.user_id,
    )
    .await?;

    Ok(Json(organization))
}

/// Lists all organizations
///
/// # Endpoint
///
/// ```text
/// GET /v1/organizations
/// Authorization: Bearer <jwt_token>
/// ```
pub async fn list_organizations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Organization>>> {
    let organizations = Organization::list_all(&state.db).await?;
    Ok(Json(organizations))
}

/// Lists organizations founded by the caller
///
/// # Endpoint
///
/// ```text
/// GET /v1/organizations/created
/// Authorization: Bearer <jwt_token>
/// ```
pub async fn list_created(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Organization>>> {
    let organizations = Organization::list_by_founder(&state.db, auth.user_id).await?;
    Ok(Json(organizations))
}

/// Lists the users affiliated with an organization
///
/// # Endpoint
///
/// ```text
/// GET /v1/organizations/:org_id/users
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Organization does not exist
pub async fn list_users(
    State(state): State<AppState>,
    Path(org_id): Path<i64>,
) -> ApiResult<Json<Vec<User>>> {
    // 404 for an organization id that was never created
    Organization::find_by_id(&state.db, org_id)
        .await?
        .ok_or(CoreError::NotFound)?;

    let users = User::list_by_organization(&state.db, org_id).await?;
    Ok(Json(users))
}
