/// Task model and scoped database operations
///
/// Tasks belong to a team; a caller sees or mutates a task only while they
/// hold an active membership in that team. Every operation here embeds the
/// scoping predicate
///
/// ```sql
/// team_id IN (SELECT team_id FROM team_members
///             WHERE user_id = $caller AND delete_flg = FALSE)
/// ```
///
/// directly in the statement, so a scoped update or delete is a single
/// atomic statement and a zero-row result means "not found or not yours" —
/// never a silent success.
///
/// # Status lifecycle
///
/// ```text
/// unstarted ⇄ started ⇄ completed
/// ```
///
/// No transition restrictions: any status is reachable from any other via an
/// explicit status update.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('unstarted', 'started', 'completed');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     status task_status NOT NULL DEFAULT 'unstarted',
///     memo TEXT NOT NULL DEFAULT '',
///     deadline DATE,
///     team_id BIGINT NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::CoreError;

/// Maximum task title length in Unicode code points
pub const TITLE_MAX_CHARS: usize = 10;

/// Scoping predicate fragment shared by all task statements.
///
/// `$1` is always the caller's user id in statements that use it.
const VISIBLE_TEAMS: &str =
    "team_id IN (SELECT team_id FROM team_members WHERE user_id = $1 AND delete_flg = FALSE)";

/// Task status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Work has not begun
    #[default]
    Unstarted,

    /// Work is in progress
    Started,

    /// Work is finished
    Completed,
}

impl TaskStatus {
    /// Converts status to its label string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Unstarted => "unstarted",
            TaskStatus::Started => "started",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parses a status label; `None` for unrecognized labels.
    ///
    /// Callers decide what an unrecognized label means: status narrowing
    /// rejects it as a validation error, fuzzy search drops the status
    /// filter.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "unstarted" => Some(TaskStatus::Unstarted),
            "started" => Some(TaskStatus::Started),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Validates a task title: non-empty, at most [`TITLE_MAX_CHARS`] code points.
///
/// Length is counted in Unicode code points, not bytes, so multi-byte
/// titles get the same budget as ASCII ones.
///
/// # Errors
///
/// Returns `CoreError::Validation` when the title is empty or too long
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.is_empty() {
        return Err(CoreError::Validation("title is required".to_string()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(CoreError::Validation(format!(
            "title is limited to {} characters",
            TITLE_MAX_CHARS
        )));
    }
    Ok(())
}

/// Builds a LIKE pattern that matches `keyword` as a literal substring.
///
/// `%`, `_` and `\` in the keyword are escaped so they cannot act as
/// wildcards. Matching stays case-sensitive (Postgres LIKE).
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if c == '%' || c == '_' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Task title (1..=10 code points)
    pub title: String,

    /// Current status
    pub status: TaskStatus,

    /// Free-form memo
    pub memo: String,

    /// Optional due date
    pub deadline: Option<NaiveDate>,

    /// Team that owns this task
    pub team_id: i64,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
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

    /// Team that owns the task
    pub team_id: i64,
}

/// Input for updating an existing task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
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

impl Task {
    /// Creates a new task under a team the caller is an active member of
    ///
    /// Like the scoped writes below, creation embeds its predicate in the
    /// statement: the insert selects from the caller's active membership
    /// row, so a membership revoked by a concurrent request cannot be used
    /// to slip a task in. The `FOR SHARE` lock on the membership row makes
    /// a concurrent revoke wait for the insert to commit. At most one
    /// active row exists per (team, user), so the select yields at most
    /// one row.
    ///
    /// # Errors
    ///
    /// - `Validation` if the title is empty or too long
    /// - `NotFound` if the caller holds no active membership in the team
    /// - `Store` on database failure
    pub async fn create(pool: &PgPool, user_id: i64, data: CreateTask) -> Result<Self, CoreError> {
        validate_title(&data.title)?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, status, memo, deadline, team_id)
            SELECT $2, $3, $4, $5, team_id
            FROM team_members
            WHERE team_id = $6 AND user_id = $1 AND delete_flg = FALSE
            FOR SHARE
            RETURNING id, title, status, memo, deadline, team_id, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&data.title)
        .bind(data.status.unwrap_or_default())
        .bind(&data.memo)
        .bind(data.deadline)
        .bind(data.team_id)
        .fetch_optional(pool)
        .await?;

        task.ok_or(CoreError::NotFound)
    }

    /// Lists all tasks visible to a user, oldest first
    pub async fn list_for_member(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, CoreError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT id, title, status, memo, deadline, team_id, created_at, updated_at
            FROM tasks
            WHERE {VISIBLE_TEAMS}
            ORDER BY created_at ASC
            "#,
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a single task within the caller's scope
    ///
    /// # Errors
    ///
    /// `NotFound` when the task does not exist or the caller is not an
    /// active member of its team — the two cases are indistinguishable by
    /// design.
    pub async fn find_scoped(pool: &PgPool, user_id: i64, task_id: i64) -> Result<Self, CoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT id, title, status, memo, deadline, team_id, created_at, updated_at
            FROM tasks
            WHERE id = $2 AND {VISIBLE_TEAMS}
            "#,
        ))
        .bind(user_id)
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

        task.ok_or(CoreError::NotFound)
    }

    /// Lists visible tasks with a deadline in the inclusive range `[from, to]`
    pub async fn list_by_deadline(
        pool: &PgPool,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Self>, CoreError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT id, title, status, memo, deadline, team_id, created_at, updated_at
            FROM tasks
            WHERE deadline BETWEEN $2 AND $3 AND {VISIBLE_TEAMS}
            ORDER BY created_at ASC
            "#,
        ))
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists visible tasks with a given status
    pub async fn list_by_status(
        pool: &PgPool,
        user_id: i64,
        status: TaskStatus,
    ) -> Result<Vec<Self>, CoreError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT id, title, status, memo, deadline, team_id, created_at, updated_at
            FROM tasks
            WHERE status = $2 AND {VISIBLE_TEAMS}
            ORDER BY created_at ASC
            "#,
        ))
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Case-sensitive substring search over title OR memo, optionally
    /// narrowed to a status
    pub async fn fuzzy_search(
        pool: &PgPool,
        user_id: i64,
        keyword: &str,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Self>, CoreError> {
        let pattern = like_pattern(keyword);

        let tasks = match status {
            Some(status) => {
                sqlx::query_as::<_, Task>(&format!(
                    r#"
                    SELECT id, title, status, memo, deadline, team_id, created_at, updated_at
                    FROM tasks
                    WHERE (title LIKE $2 OR memo LIKE $2) AND status = $3 AND {VISIBLE_TEAMS}
                    ORDER BY created_at ASC
                    "#,
                ))
                .bind(user_id)
                .bind(&pattern)
                .bind(status)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>(&format!(
                    r#"
                    SELECT id, title, status, memo, deadline, team_id, created_at, updated_at
                    FROM tasks
                    WHERE (title LIKE $2 OR memo LIKE $2) AND {VISIBLE_TEAMS}
                    ORDER BY created_at ASC
                    "#,
                ))
                .bind(user_id)
                .bind(&pattern)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Updates title, memo, status, and deadline of a task in scope
    ///
    /// The update is a single scoped statement; a concurrent update to the
    /// same row serializes at the store, and a zero-row match (absent row or
    /// out-of-scope caller) is reported as `NotFound` with the row left
    /// untouched.
    ///
    /// # Errors
    ///
    /// - `Validation` if the new title is empty or too long
    /// - `NotFound` if no row matched the scoped predicate
    /// - `Store` on database failure
    pub async fn update_scoped(
        pool: &PgPool,
        user_id: i64,
        task_id: i64,
        data: UpdateTask,
    ) -> Result<Self, CoreError> {
        validate_title(&data.title)?;

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = $3, memo = $4, status = $5, deadline = $6, updated_at = NOW()
            WHERE id = $2 AND {VISIBLE_TEAMS}
            RETURNING id, title, status, memo, deadline, team_id, created_at, updated_at
            "#,
        ))
        .bind(user_id)
        .bind(task_id)
        .bind(&data.title)
        .bind(&data.memo)
        .bind(data.status)
        .bind(data.deadline)
        .fetch_optional(pool)
        .await?;

        task.ok_or(CoreError::NotFound)
    }

    /// Updates only the status column of a task in scope
    ///
    /// # Errors
    ///
    /// `NotFound` if no row matched the scoped predicate
    pub async fn update_status_scoped(
        pool: &PgPool,
        user_id: i64,
        task_id: i64,
        status: TaskStatus,
    ) -> Result<Self, CoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = $3, updated_at = NOW()
            WHERE id = $2 AND {VISIBLE_TEAMS}
            RETURNING id, title, status, memo, deadline, team_id, created_at, updated_at
            "#,
        ))
        .bind(user_id)
        .bind(task_id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        task.ok_or(CoreError::NotFound)
    }

    /// Deletes a task in scope
    ///
    /// # Errors
    ///
    /// `NotFound` if no row matched the scoped predicate
    pub async fn delete_scoped(pool: &PgPool, user_id: i64, task_id: i64) -> Result<(), CoreError> {
        let result = sqlx::query(&format!(
            "DELETE FROM tasks WHERE id = $2 AND {VISIBLE_TEAMS}",
        ))
        .bind(user_id)
        .bind(task_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound);
        }

        Ok(())
    }
}
