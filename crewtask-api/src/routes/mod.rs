/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (signup, login, refresh)
/// - `users`: User profile endpoints
/// - `organizations`: Organization endpoints
/// - `teams`: Team and membership endpoints
/// - `tasks`: Task lifecycle endpoints

pub mod auth;
pub mod health;
pub mod organizations;
pub mod tasks;
pub mod teams;
pub mod users;
