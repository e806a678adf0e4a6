//! Shared API request/response types

use serde::Serialize;

// ========================================
// Error Response Types
// ========================================

/// Error body returned when authentication fails
#[derive(Debug, Clone, Serialize)]
pub struct AuthErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

impl AuthErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
