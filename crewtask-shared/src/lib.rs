//! # Crewtask Shared Library
//!
//! This crate contains the domain core shared by the Crewtask API server:
//! the membership-scoped resource model, the task lifecycle, and the
//! supporting auth and database plumbing.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their scoped operations
//! - `auth`: JWT issuance, password hashing, auth context, resource scoping
//! - `db`: Connection pool and migration runner
//! - `error`: Core error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;

/// Current version of the Crewtask shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
