use thiserror::Error;

/// Top-level error type for the `stockroom-api` crate.
///
/// Every variant describes a failed remote call. `stockroom-core` never
/// surfaces these to its callers: any of them triggers the mirror-store
/// fallback.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for REST paths: {0}")]
    BaseUrl(String),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Service ─────────────────────────────────────────────────────
    /// Non-2xx response from the catalog service.
    #[error("Catalog service error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status code of the failed response, if the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the service was never reached.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reports_service_code() {
        let err = Error::Status {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_unreachable());
    }

    #[test]
    fn timeout_is_unreachable() {
        let err = Error::Timeout { timeout_secs: 5 };
        assert!(err.is_unreachable());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Request timed out after 5s");
    }
}
