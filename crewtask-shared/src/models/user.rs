/// User model and database operations
///
/// Users authenticate by email and password hash and carry an organization
/// affiliation. New users default into the reserved "Unaffiliated"
/// organization until they assign themselves elsewhere.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     name VARCHAR(255) NOT NULL DEFAULT '',
///     organization_id BIGINT NOT NULL DEFAULT 1 REFERENCES organizations(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::CoreError;

/// User model
///
/// The password hash never serializes into responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Email address (unique)
    pub email: String,

    /// Argon2id password hash (PHC string), excluded from serialization
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Organization the user is affiliated with
    pub organization_id: i64,

    /// When the user registered
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Already-hashed password
    pub password_hash: String,

    /// Display name
    pub name: String,
}

impl User {
    /// Creates a new user in the default (unaffiliated) organization
    ///
    /// # Errors
    ///
    /// `Store` with a unique violation if the email is already registered
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, CoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, name, organization_id, created_at, updated_at
            "#,
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.name)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (for login)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, CoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, organization_id, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Errors
    ///
    /// `NotFound` if no such user exists
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Self, CoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, organization_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        user.ok_or(CoreError::NotFound)
    }

    /// Updates a user's display name
    ///
    /// # Errors
    ///
    /// `NotFound` if no row matched
    pub async fn update_name(pool: &PgPool, user_id: i64, name: &str) -> Result<Self, CoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, name, organization_id, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        user.ok_or(CoreError::NotFound)
    }

    /// Assigns a user to an organization
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user row is absent
    /// - `Store` with a foreign-key violation if the organization is absent
    pub async fn assign_organization(
        pool: &PgPool,
        user_id: i64,
        organization_id: i64,
    ) -> Result<Self, CoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET organization_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, name, organization_id, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;

        user.ok_or(CoreError::NotFound)
    }

    /// Lists the users affiliated with an organization
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: i64,
    ) -> Result<Vec<Self>, CoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, organization_id, created_at, updated_at
            FROM users
            WHERE organization_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
