// ── Core error types ──
//
// User-facing errors from stockroom-core. Remote failures never appear
// here: every `stockroom_api::Error` is absorbed by the mirror fallback in
// `ProductClient`, so callers only see what the answering store reports.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Data errors ──────────────────────────────────────────────────
    #[error("Product not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Product has no identity (neither `_id` nor `id` is set)")]
    IdentityMissing,

    // ── Mirror store errors ──────────────────────────────────────────
    #[error("Mirror store error: {message}")]
    Mirror { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn mirror(message: impl std::fmt::Display) -> Self {
        Self::Mirror {
            message: message.to_string(),
        }
    }

    pub(crate) fn not_found(identifier: impl std::fmt::Display) -> Self {
        Self::NotFound {
            identifier: identifier.to_string(),
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::mirror(err)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::mirror(format!("invalid JSON: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_identifier() {
        let err = CoreError::not_found("42");
        assert_eq!(err.to_string(), "Product not found: 42");
    }

    #[test]
    fn io_errors_become_mirror_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert!(matches!(CoreError::from(io), CoreError::Mirror { .. }));
    }
}
