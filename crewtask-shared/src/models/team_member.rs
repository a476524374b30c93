/// Team membership model and database operations (the membership store)
///
/// Memberships are soft-deleted: revoking flips `delete_flg` instead of
/// removing the row, so history stays queryable. Only rows with
/// `delete_flg = FALSE` ("active" memberships) grant task visibility.
///
/// A partial unique index guarantees at most one active row per
/// (team, user) pair:
///
/// ```sql
/// CREATE UNIQUE INDEX team_members_active_uniq
///     ON team_members (team_id, user_id)
///     WHERE NOT delete_flg;
/// ```
///
/// Two concurrent assignments therefore cannot both insert; the loser gets a
/// unique violation which surfaces as `AlreadyMember`. No check-then-insert
/// window exists.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE team_members (
///     id BIGSERIAL PRIMARY KEY,
///     team_id BIGINT NOT NULL,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     delete_flg BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `team_id` deliberately has no foreign key: revoked rows must survive
/// deletion of their team for audit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::error::CoreError;

/// Membership row linking a user to a team
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    /// Unique membership row ID
    pub id: i64,

    /// Team the membership belongs to
    pub team_id: i64,

    /// Member user
    pub user_id: i64,

    /// Soft-delete flag; TRUE means revoked
    pub delete_flg: bool,

    /// When the membership was granted
    pub created_at: DateTime<Utc>,
}

impl TeamMember {
    /// Assigns a user to a team (inserts an active membership row)
    ///
    /// The insert selects from `teams` in the same statement: it inserts
    /// nothing when the team is gone, and the `FOR KEY SHARE` lock on the
    /// team row makes a concurrent `Team::delete` wait for the insert to
    /// commit (and then revoke it) rather than leave an active row pointing
    /// at a deleted team.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the team does not exist
    /// - `AlreadyMember` if an active row for (team, user) already exists,
    ///   including when a concurrent request won the insert
    /// - `Store` on any other database failure
    pub async fn assign(pool: &PgPool, team_id: i64, user_id: i64) -> Result<Self, CoreError> {
        let member = sqlx::query_as::<_, TeamMember>(
            r#"
            INSERT INTO team_members (team_id, user_id)
            SELECT id, $2 FROM teams WHERE id = $1 FOR KEY SHARE
            RETURNING id, team_id, user_id, delete_flg, created_at
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(CoreError::membership_conflict)?;

        let member = member.ok_or(CoreError::NotFound)?;
        debug!(team_id, user_id, "membership assigned");
        Ok(member)
    }

    /// Revokes a user's active membership in a team (soft delete)
    ///
    /// The row is kept with `delete_flg = TRUE`; a later re-assignment
    /// inserts a distinct new active row.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user has no active membership in the team
    pub async fn revoke(pool: &PgPool, team_id: i64, user_id: i64) -> Result<Self, CoreError> {
        let member = sqlx::query_as::<_, TeamMember>(
            r#"
            UPDATE team_members
            SET delete_flg = TRUE
            WHERE team_id = $1 AND user_id = $2 AND delete_flg = FALSE
            RETURNING id, team_id, user_id, delete_flg, created_at
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        let member = member.ok_or(CoreError::NotFound)?;
        debug!(team_id, user_id, "membership revoked");
        Ok(member)
    }

    /// Revokes every active membership of a team, within a transaction
    ///
    /// Used by team deletion so that revocation and team removal commit
    /// atomically; orphaned active rows would otherwise grant stale
    /// visibility if the team id were ever reused.
    pub async fn revoke_all_for_team(
        tx: &mut Transaction<'_, Postgres>,
        team_id: i64,
    ) -> Result<u64, CoreError> {
        let result = sqlx::query(
            "UPDATE team_members SET delete_flg = TRUE WHERE team_id = $1 AND delete_flg = FALSE",
        )
        .bind(team_id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }

    /// Checks whether a user holds an active membership in a team
    pub async fn is_active_member(
        pool: &PgPool,
        team_id: i64,
        user_id: i64,
    ) -> Result<bool, CoreError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM team_members
                WHERE team_id = $1 AND user_id = $2 AND delete_flg = FALSE
            )
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists a user's active memberships
    pub async fn list_active_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, CoreError> {
        let members = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT id, team_id, user_id, delete_flg, created_at
            FROM team_members
            WHERE user_id = $1 AND delete_flg = FALSE
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Lists a team's active memberships
    pub async fn list_active_by_team(pool: &PgPool, team_id: i64) -> Result<Vec<Self>, CoreError> {
        let members = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT id, team_id, user_id, delete_flg, created_at
            FROM team_members
            WHERE team_id = $1 AND delete_flg = FALSE
            ORDER BY created_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_member_serialization() {
        let member = TeamMember {
            id: 1,
            team_id: 7,
            user_id: 42,
            delete_flg: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["team_id"], 7);
        assert_eq!(json["user_id"], 42);
        assert_eq!(json["delete_flg"], false);
    }

    // Store-backed behavior (duplicate assignment, revoke semantics) is
    // covered by the integration tests in crewtask-api/tests/.
}
