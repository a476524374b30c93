/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Authentication context carried through requests
/// - [`scoping`]: Membership-derived resource scoping (who may see what)
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::auth::password::{hash_password, verify_password};
/// use crewtask_shared::auth::jwt::{create_token, Claims, TokenType};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(42, TokenType::Access);
/// let token = create_token(&claims, "secret-key-that-is-long-enough....")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod scoping;
