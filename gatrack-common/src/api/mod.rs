//! Shared HTTP API functionality
//!
//! This module contains ONLY pure functions, settings access and shared
//! types. The axum middleware wrapping them lives in gatrack-server.

pub mod auth;
pub mod types;

pub use auth::{load_shared_secret, now_millis, sign_request, verify_request, ApiAuthError};
pub use types::AuthErrorResponse;
