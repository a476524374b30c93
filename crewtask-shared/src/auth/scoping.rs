/// Membership-derived resource scoping
///
/// This module is the single place that decides which records a caller may
/// see or mutate:
///
/// 1. **Task resources**: visible while the caller holds an active
///    membership in the owning team. Bulk reads apply the predicate
///    `task.team_id IN (teams where the caller is an active member)`;
///    single-resource writes embed the same predicate in one atomic
///    statement (see `models::task`).
/// 2. **Team resources**: browsing an organization's teams is unscoped;
///    deleting a team requires active membership in it.
/// 3. **Organization resources**: "created by me" is founder-scoped
///    (`founder_user_id = caller`); the full listing is a public directory.
///
/// A denied check reports [`CoreError::NotFound`], never a distinct
/// "forbidden": non-members cannot learn whether a resource exists.
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::auth::scoping::require_team_membership;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// require_team_membership(&pool, 7, 42).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;

use crate::error::CoreError;
use crate::models::team_member::TeamMember;

/// Requires that a user holds an active membership in a team
///
/// # Errors
///
/// `NotFound` when the membership is absent or revoked — indistinguishable
/// from the team not existing, by design
pub async fn require_team_membership(
    pool: &PgPool,
    team_id: i64,
    user_id: i64,
) -> Result<(), CoreError> {
    if !TeamMember::is_active_member(pool, team_id, user_id).await? {
        return Err(CoreError::NotFound);
    }

    Ok(())
}

/// Lists the ids of teams visible to a user (active memberships only)
///
/// Bulk task reads in `models::task` inline this set as a subquery rather
/// than calling here, so read-and-filter stays one statement; this helper
/// exists for callers that need the set itself.
pub async fn visible_team_ids(pool: &PgPool, user_id: i64) -> Result<Vec<i64>, CoreError> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT team_id FROM team_members WHERE user_id = $1 AND delete_flg = FALSE ORDER BY team_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

// Store-backed scoping behavior is exercised end to end by the integration
// tests in crewtask-api/tests/.
