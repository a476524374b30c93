/// Team model and database operations
///
/// Teams sit under an organization and own tasks. Deleting a team revokes
/// all active memberships and removes the team row in one transaction;
/// tasks go with the team via the `ON DELETE CASCADE` foreign key.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     organization_id BIGINT NOT NULL REFERENCES organizations(id) ON DELETE CASCADE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::error::CoreError;
use crate::models::team_member::TeamMember;

/// Team model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Unique team ID
    pub id: i64,

    /// Team name
    pub name: String,

    /// Team description
    pub description: String,

    /// Organization the team belongs to
    pub organization_id: i64,
}

/// Input for creating a new team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    /// Team name
    pub name: String,

    /// Team description
    #[serde(default)]
    pub description: String,

    /// Owning organization
    pub organization_id: i64,
}

impl Team {
    /// Creates a new team under an organization
    ///
    /// # Errors
    ///
    /// `Store` if the organization does not exist (foreign key) or the
    /// database fails
    pub async fn create(pool: &PgPool, data: CreateTeam) -> Result<Self, CoreError> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, description, organization_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, organization_id
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.organization_id)
        .fetch_one(pool)
        .await?;

        Ok(team)
    }

    /// Lists the teams of an organization (unscoped; any authenticated
    /// caller may browse)
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: i64,
    ) -> Result<Vec<Self>, CoreError> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, organization_id
            FROM teams
            WHERE organization_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }

    /// Lists the teams where a user holds an active membership
    pub async fn list_for_member(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, CoreError> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.id, t.name, t.description, t.organization_id
            FROM teams t
            INNER JOIN team_members tm ON tm.team_id = t.id
            WHERE tm.user_id = $1 AND tm.delete_flg = FALSE
            ORDER BY t.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }

    /// Deletes a team, revoking all of its active memberships
    ///
    /// Deletion and revocation run in one transaction: either the team is
    /// gone and no active membership references it, or nothing changed.
    /// Tasks owned by the team are removed by the cascade.
    ///
    /// The team row is deleted before the memberships are revoked. The
    /// delete waits on the row lock held by any in-flight
    /// `TeamMember::assign`, so a join racing this transaction has either
    /// committed by the time the revocation runs (and gets revoked with
    /// the rest) or observes the deleted team and inserts nothing.
    ///
    /// # Errors
    ///
    /// `NotFound` if the team does not exist
    pub async fn delete(pool: &PgPool, team_id: i64) -> Result<(), CoreError> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(CoreError::NotFound);
        }

        let revoked = TeamMember::revoke_all_for_team(&mut tx, team_id).await?;

        tx.commit().await?;

        info!(team_id, revoked, "team deleted");
        Ok(())
    }
}
