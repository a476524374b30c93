/// Task lifecycle endpoints
///
/// All task reads and writes are scoped to the caller's active team
/// memberships. A task outside that scope behaves exactly like a task that
/// does not exist: the response is a 404 either way.
///
/// # Endpoints
///
/// - `POST /v1/teams/:team_id/tasks` - Create task (members only)
/// - `GET /v1/tasks` - List visible tasks, oldest first
/// - `GET /v1/tasks/deadline?from=&to=` - Narrow by deadline range
/// - `GET /v1/tasks/status?status=` - Narrow by status
/// - `GET /v1/tasks/search?keyword=&status=` - Substring search
/// - `GET /v1/tasks/:task_id` - Fetch one task
/// - `PUT /v1/tasks/:task_id` - Update title, memo, status, deadline
/// - `PUT /v1/tasks/:task_id/status` - Update status only
/// - `DELETE /v1/tasks/:task_id` - Delete task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use crewtask_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, TaskStatus, UpdateTask},
};
use serde::{Deserialize, Serialize};

/// Create task request (team id comes from the path)
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title (1..=10 code points)
    pub title: String,

    /// Initial status (defaults to unstarted)
    #[serde(default)]
    pub status: Option<TaskStatus>,

    /// Free-form memo
    #[serde(default)]
    pub memo: String,

    /// Optional due date
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

/// Update task request
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: String,

    /// New memo
    #[serde(default)]
    pub memo: String,

    /// New status
    pub status: TaskStatus,

    /// New due date
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

/// Update status request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status label
    pub status: String,
}

/// Deadline range query parameters
#[derive(Debug, Deserialize)]
pub struct DeadlineQuery {
    /// Inclusive start of the range
    pub from: NaiveDate,

    /// Inclusive end of the range
    pub to: NaiveDate,
}

/// Status query parameters
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// Status label to narrow by
    pub status: String,
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring to match against title or memo (case-sensitive)
    pub keyword: String,

    /// Optional status label; an unrecognized label drops the filter
    pub status: Option<String>,
}

/// Delete task response
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    /// Whether the task was deleted
    pub deleted: bool,
}

/// Creates a task under a team the caller belongs to
///
/// The membership check is part of the insert itself, so a membership
/// revoked by a concurrent request cannot sneak a task in.
///
/// # Endpoint
///
/// ```text
/// POST /v1/teams/:team_id/tasks
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "title": "Ship v1",
///   "memo": "Cut the release branch",
///   "deadline": "2025-04-01"
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Team does not exist or caller is not a member
/// - `422 Unprocessable Entity`: Title empty or over 10 characters
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(team_id): Path<i64>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = Task::create(
        &state.db,
        auth.user_id,
        CreateTask {
            title: req.title,
            status: req.status,
            memo: req.memo,
            deadline: req.deadline,
            team_id,
        },
    )
    .await?;

    Ok(Json(task))
}

/// Lists all tasks visible to the caller, oldest first
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks
/// Authorization: Bearer <jwt_token>
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_for_member(&state.db, auth.user_id).await?;
    Ok(Json(tasks))
}

/// Lists visible tasks with a deadline in an inclusive date range
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks/deadline?from=2025-04-01&to=2025-04-30
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Range end precedes range start
pub async fn list_by_deadline(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<DeadlineQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    if query.to < query.from {
        return Err(ApiError::validation("to", "Range end precedes range start"));
    }

    let tasks = Task::list_by_deadline(&state.db, auth.user_id, query.from, query.to).await?;
    Ok(Json(tasks))
}

/// Lists visible tasks with a given status
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks/status?status=started
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Unrecognized status label
pub async fn list_by_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let status = TaskStatus::from_label(&query.status)
        .ok_or_else(|| ApiError::validation("status", "Unknown status label"))?;

    let tasks = Task::list_by_status(&state.db, auth.user_id, status).await?;
    Ok(Json(tasks))
}

/// Case-sensitive substring search over visible tasks
///
/// The keyword matches title or memo as a literal substring; LIKE
/// wildcards in the keyword are treated literally. An unrecognized status
/// label drops the status filter rather than failing the search.
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks/search?keyword=ship&status=started
/// Authorization: Bearer <jwt_token>
/// ```
pub async fn search_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let status = query.status.as_deref().and_then(TaskStatus::from_label);

    let tasks = Task::fuzzy_search(&state.db, auth.user_id, &query.keyword, status).await?;
    Ok(Json(tasks))
}

/// Fetches a single task within the caller's scope
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks/:task_id
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Task does not exist or caller is not a member of its team
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_scoped(&state.db, auth.user_id, task_id).await?;
    Ok(Json(task))
}

/// Updates title, memo, status, and deadline of a task
///
/// The update is a single scoped statement: when the task is out of scope
/// nothing is modified and the response is a 404.
///
/// # Endpoint
///
/// ```text
/// PUT /v1/tasks/:task_id
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "title": "Ship v1.1",
///   "memo": "Follow-up release",
///   "status": "started",
///   "deadline": "2025-05-01"
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Task does not exist or caller is not a member of its team
/// - `422 Unprocessable Entity`: Title empty or over 10 characters
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = Task::update_scoped(
        &state.db,
        auth.user_id,
        task_id,
        UpdateTask {
            title: req.title,
            memo: req.memo,
            status: req.status,
            deadline: req.deadline,
        },
    )
    .await?;

    Ok(Json(task))
}

/// Updates only the status of a task
///
/// Any status can move to any other: reopening a completed task is an
/// ordinary update.
///
/// # Endpoint
///
/// ```text
/// PUT /v1/tasks/:task_id/status
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// { "status": "completed" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Task does not exist or caller is not a member of its team
/// - `422 Unprocessable Entity`: Unrecognized status label
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Task>> {
    let status = TaskStatus::from_label(&req.status)
        .ok_or_else(|| ApiError::validation("status", "Unknown status label"))?;

    let task = Task::update_status_scoped(&state.db, auth.user_id, task_id, status).await?;
    Ok(Json(task))
}

/// Deletes a task within the caller's scope
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/tasks/:task_id
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Task does not exist or caller is not a member of its team
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    Task::delete_scoped(&state.db, auth.user_id, task_id).await?;
    Ok(Json(DeleteTaskResponse { deleted: true }))
}
