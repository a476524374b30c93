/// Organization model and database operations
///
/// Organizations are the top of the ownership chain: teams cascade-delete
/// with their organization, tasks with their team. Any authenticated user
/// can create an organization and becomes its founder; the full listing is
/// a public directory, the "created by me" listing is founder-scoped.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     founder_user_id BIGINT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Organization 1 is the reserved "Unaffiliated" organization that new
/// users default into; it is seeded by the initial migration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::CoreError;

/// ID of the reserved organization new users default into
pub const UNAFFILIATED_ORGANIZATION_ID: i64 = 1;

/// Organization model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    /// Unique organization ID
    pub id: i64,

    /// Organization name
    pub name: String,

    /// Organization description
    pub description: String,

    /// User who created the organization
    pub founder_user_id: i64,

    /// When the organization was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    /// Organization name
    pub name: String,

    /// Organization description
    #[serde(default)]
    pub description: String,
}

impl Organization {
    /// Creates a new organization with the given founder
    pub async fn create(
        pool: &PgPool,
        data: CreateOrganization,
        founder_user_id: i64,
    ) -> Result<Self, CoreError> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, description, founder_user_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, founder_user_id, created_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(founder_user_id)
        .fetch_one(pool)
        .await?;

        Ok(organization)
    }

    /// Lists all organizations (public directory)
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, CoreError> {
        let organizations = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, description, founder_user_id, created_at
            FROM organizations
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(organizations)
    }

    /// Lists the organizations founded by a user
    pub async fn list_by_founder(pool: &PgPool, founder_user_id: i64) -> Result<Vec<Self>, CoreError> {
        let organizations = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, description, founder_user_id, created_at
            FROM organizations
            WHERE founder_user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(founder_user_id)
        .fetch_all(pool)
        .await?;

        Ok(organizations)
    }

    /// Finds an organization by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, CoreError> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, description, founder_user_id, created_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(organization)
    }
}
