//! # gatrack Common Library
//!
//! Shared code for the gatrack service:
//! - Settings database initialization and the settings store
//! - API authentication primitives (shared secret, timestamp + hash)
//! - Configuration loading and root folder resolution
//! - Common error types

pub mod api;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
