//! # Tasklist Shared Library
//!
//! Authentication, identity resolution, and storage for the per-user task
//! list API.
//!
//! ## Module Organization
//!
//! - `auth`: Bearer token validation, key resolution, identity resolution
//! - `db`: Connection pool and migrations
//! - `models`: Database models and their queries
//! - `store`: Storage traits and the PostgreSQL implementation

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
