/// Custom middleware for the API server
///
/// - `security`: Security-related response headers

pub mod security;
