/// Common test utilities for integration tests
///
/// These tests need a PostgreSQL database. Set `TEST_DATABASE_URL` to run
/// them; when it is unset each test returns early so the suite still
/// passes in environments without a database.
///
/// Provided here:
/// - Test database setup with migrations
/// - Test user creation with unique emails
/// - JWT token generation
/// - Router construction

use crewtask_api::app::{build_router, AppState};
use crewtask_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use crewtask_shared::auth::jwt::{create_token, Claims, TokenType};
use crewtask_shared::models::organization::{CreateOrganization, Organization};
use crewtask_shared::models::team::{CreateTeam, Team};
use crewtask_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};

/// Signing secret for test tokens
pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

static UNIQUE: AtomicU64 = AtomicU64::new(0);

/// Returns a process-unique suffix for emails and names
pub fn unique_suffix() -> String {
    let n = UNIQUE.fetch_add(1, Ordering::Relaxed);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    format!("{}-{}-{}", std::process::id(), nanos, n)
}

/// Test context containing the app router and a direct pool handle
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a test context, or `None` when `TEST_DATABASE_URL` is unset
    pub async fn try_new() -> anyhow::Result<Option<Self>> {
        let url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => return Ok(None),
        };

        let db = PgPool::connect(&url).await?;

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../crewtask-shared/migrations")
            .run(&db)
            .await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Some(TestContext { db, app }))
    }

    /// Creates a user directly in the store (bypasses signup)
    pub async fn create_user(&self, label: &str) -> anyhow::Result<User> {
        let user = User::create(
            &self.db,
            CreateUser {
                email: format!("{}-{}@example.com", label, unique_suffix()),
                // Tests authenticate with JWTs, not passwords
                password_hash: "unused".to_string(),
                name: label.to_string(),
            },
        )
        .await?;
        Ok(user)
    }

    /// Creates an organization founded by the given user
    pub async fn create_organization(&self, founder: &User) -> anyhow::Result<Organization> {
        let organization = Organization::create(
            &self.db,
            CreateOrganization {
                name: format!("org-{}", unique_suffix()),
                description: String::new(),
            },
            founder.id,
        )
        .await?;
        Ok(organization)
    }

    /// Creates a team under an organization
    pub async fn create_team(&self, organization_id: i64) -> anyhow::Result<Team> {
        let team = Team::create(
            &self.db,
            CreateTeam {
                name: format!("team-{}", unique_suffix()),
                description: String::new(),
                organization_id,
            },
        )
        .await?;
        Ok(team)
    }

    /// Returns an Authorization header value for a user
    pub fn auth_header(&self, user: &User) -> String {
        let claims = Claims::new(user.id, TokenType::Access);
        let token = create_token(&claims, TEST_JWT_SECRET).expect("token creation");
        format!("Bearer {}", token)
    }

    /// Removes test data created through the given users
    ///
    /// Deleting a user cascades into their membership rows; organizations
    /// cascade into teams and tasks.
    pub async fn cleanup(
        &self,
        users: &[&User],
        organizations: &[&Organization],
    ) -> anyhow::Result<()> {
        for user in users {
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(user.id)
                .execute(&self.db)
                .await?;
        }
        for organization in organizations {
            sqlx::query("DELETE FROM organizations WHERE id = $1")
                .bind(organization.id)
                .execute(&self.db)
                .await?;
        }
        Ok(())
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("parse body")
}
