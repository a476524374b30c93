/// Team and membership endpoints
///
/// Teams live under an organization; membership is the unit of access.
/// Joining a team makes its tasks visible, leaving (a soft delete) hides
/// them again while keeping the membership row for audit.
///
/// # Endpoints
///
/// - `POST /v1/organizations/:org_id/teams` - Create team
/// - `GET /v1/organizations/:org_id/teams` - List an organization's teams
/// - `GET /v1/teams/joined` - List teams the caller belongs to
/// - `DELETE /v1/teams/:team_id` - Delete team (members only)
/// - `POST /v1/teams/:team_id/members` - Join team
/// - `DELETE /v1/teams/:team_id/members` - Leave team

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use crewtask_shared::{
    auth::{middleware::AuthContext, scoping},
    error::CoreError,
    models::{
        organization::Organization,
        team::{CreateTeam, Team},
        team_member::TeamMember,
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Team description
    #[serde(default)]
    pub description: String,
}

/// Delete team response
#[derive(Debug, Serialize)]
pub struct DeleteTeamResponse {
    /// Whether the team was deleted
    pub deleted: bool,
}

/// Leave team response
#[derive(Debug, Serialize)]
pub struct LeaveTeamResponse {
    /// Whether the membership was revoked
    pub left: bool,
}

/// Creates a new team under an organization
///
/// The creator is not made a member automatically; they join with
/// `POST /v1/teams/:team_id/members` like anyone else.
///
/// # Endpoint
///
/// ```text
/// POST /v1/organizations/:org_id/teams
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "name": "Platform",
///   "description": "Infra and tooling"
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Organization does not exist
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_team(
    State(state): State<AppState>,
    Path(org_id): Path<i64>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<Json<Team>> {
    req.validate()?;

    Organization::find_by_id(&state.db, org_id)
        .await?
        .ok_or(CoreError::NotFound)?;

    let team = Team::create(
        &state.db,
        CreateTeam {
            name: req.name,
            description: req.description,
            organization_id: org_id,
        },
    )
    .await?;

    Ok(Json(team))
}

/// Lists the teams of an organization
///
/// Browsing is unscoped: membership is required to see a team's tasks,
/// not to see that the team exists.
///
/// # Endpoint
///
/// ```text
/// GET /v1/organizations/:org_id/teams
/// Authorization: Bearer <jwt_token>
/// ```
pub async fn list_teams(
    State(state): State<AppState>,
    Path(org_id): Path<i64>,
) -> ApiResult<Json<Vec<Team>>> {
    let teams = Team::list_by_organization(&state.db, org_id).await?;
    Ok(Json(teams))
}

/// Lists the teams the caller is an active member of
///
/// # Endpoint
///
/// ```text
/// GET /v1/teams/joined
/// Authorization: Bearer <jwt_token>
/// ```
pub async fn list_joined(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Team>>> {
    let teams = Team::list_for_member(&state.db, auth.user_id).await?;
    Ok(Json(teams))
}

/// Deletes a team along with its tasks, revoking all active memberships
///
/// Only active members may delete a team; outsiders get a 404. Revoked
/// membership rows survive the deletion for audit.
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/teams/:team_id
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Team does not exist or caller is not a member
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<i64>,
) -> ApiResult<Json<DeleteTeamResponse>> {
    scoping::require_team_membership(&state.db, team_id, auth.user_id).await?;

    Team::delete(&state.db, team_id).await?;

    Ok(Json(DeleteTeamResponse { deleted: true }))
}

/// Joins a team as the caller
///
/// At most one active membership per (team, user) exists at any time; a
/// concurrent duplicate join resolves to a single active row and the loser
/// gets a 409. The team's existence is checked inside the insert itself
/// (membership rows carry no team foreign key), so a join racing a team
/// deletion cannot leave an active row behind.
///
/// # Endpoint
///
/// ```text
/// POST /v1/teams/:team_id/members
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Team does not exist
/// - `409 Conflict`: Caller is already an active member
pub async fn join_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<i64>,
) -> ApiResult<Json<TeamMember>> {
    let membership = TeamMember::assign(&state.db, team_id, auth.user_id).await?;
    Ok(Json(membership))
}

/// Leaves a team (soft-deletes the caller's membership)
///
/// The membership row is flagged, not removed, so the join/leave history
/// stays auditable. Re-joining later creates a fresh row.
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/teams/:team_id/members
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Caller has no active membership in this team
pub async fn leave_team(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<i64>,
) -> ApiResult<Json<LeaveTeamResponse>> {
    TeamMember::revoke(&state.db, team_id, auth.user_id).await?;
    Ok(Json(LeaveTeamResponse { left: true }))
}
