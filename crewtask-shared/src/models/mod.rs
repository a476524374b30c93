/// Database models for Crewtask
///
/// This module contains all database models and their scoped operations.
///
/// # Models
///
/// - `user`: User accounts and organization affiliation
/// - `organization`: Organizations (top of the ownership chain)
/// - `team`: Teams under an organization
/// - `team_member`: Soft-deletable user-team memberships (the membership store)
/// - `task`: Team-scoped tasks with status lifecycle
///
/// Every read or write that targets a team-owned resource goes through the
/// caller's active-membership scope; see `auth::scoping`.
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::models::task::{Task, CreateTask};
/// use crewtask_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let caller_user_id = 42;
/// let task = Task::create(&pool, caller_user_id, CreateTask {
///     title: "Ship v1".to_string(),
///     status: None,
///     memo: String::new(),
///     deadline: None,
///     team_id: 1,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod organization;
pub mod task;
pub mod team;
pub mod team_member;
pub mod user;
