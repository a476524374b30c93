/// Core error taxonomy
///
/// Every scoped operation in `models` returns `Result<T, CoreError>`. The
/// variants match the outcomes the API boundary needs to distinguish:
///
/// - `Validation`: bad input shape or range; surfaced before the store is
///   touched.
/// - `NotFound`: the row is absent *or* the caller is not in scope. The two
///   cases are deliberately conflated so non-members cannot probe for
///   resource existence.
/// - `AlreadyMember`: a duplicate active membership assignment.
/// - `Store`: underlying persistence failure, fatal to the request only.
///
/// # Example
///
/// ```
/// use crewtask_shared::error::CoreError;
///
/// fn check_title(title: &str) -> Result<(), CoreError> {
///     if title.is_empty() {
///         return Err(CoreError::Validation("title is required".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(check_title("").is_err());
/// ```

/// Error type for core (model-layer) operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input failed validation; the store was not touched
    #[error("validation failed: {0}")]
    Validation(String),

    /// Row absent or caller not in scope (deliberately conflated)
    #[error("resource not found")]
    NotFound,

    /// An active membership already exists for this (team, user) pair
    #[error("user is already an active member of this team")]
    AlreadyMember,

    /// Underlying persistence failure
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl CoreError {
    /// Maps a sqlx error to `AlreadyMember` when it is a unique-constraint
    /// violation, otherwise wraps it as `Store`.
    ///
    /// Used by membership assignment, where the partial unique index on
    /// active rows is what closes the duplicate-insert race.
    pub fn membership_conflict(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                CoreError::AlreadyMember
            }
            _ => CoreError::Store(err),
        }
    }

    /// True when the error means the target was absent or out of scope.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound)
    }
}
