/// Authentication context carried through requests
///
/// The API server's JWT middleware validates the bearer token and inserts an
/// [`AuthContext`] into request extensions; handlers extract it with Axum's
/// `Extension` extractor. The core never sees credentials — only the
/// verified user id resolved here.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use crewtask_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use serde::{Deserialize, Serialize};

/// Authentication context added to request extensions after the bearer
/// token is validated
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Verified ID of the authenticated user
    pub user_id: i64,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_jwt(user_id: i64) -> Self {
        Self { user_id }
    }
}
