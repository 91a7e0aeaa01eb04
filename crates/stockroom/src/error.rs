//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use stockroom_config::ConfigError;
use stockroom_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────
    #[error("product '{identifier}' not found")]
    #[diagnostic(
        code(stockroom::not_found),
        help("Run: stockroom list to see available products")
    )]
    NotFound { identifier: String },

    #[error("product has no id")]
    #[diagnostic(
        code(stockroom::identity_missing),
        help("Updates and deletes need a product with an `_id` or `id`.")
    )]
    IdentityMissing,

    #[error("{failed} of {total} deletions failed")]
    #[diagnostic(
        code(stockroom::partial_delete),
        help("Run with -v to see why each item failed, then retry the failed ids.")
    )]
    PartialDelete { failed: usize, total: usize },

    // ── Local mirror ─────────────────────────────────────────────────
    #[error("local mirror failed: {message}")]
    #[diagnostic(
        code(stockroom::mirror),
        help(
            "The catalog service was unavailable and the local mirror could not answer.\n\
             Check that the mirror directory (--mirror-dir) is readable and writable."
        )
    )]
    Mirror { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(stockroom::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(stockroom::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(stockroom::config),
        help("Inspect the resolved settings with: stockroom config show")
    )]
    Config(#[from] ConfigError),

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(stockroom::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(stockroom::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(stockroom::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML output failed: {0}")]
    #[diagnostic(code(stockroom::toml))]
    Toml(#[from] toml::ser::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(stockroom::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::IdentityMissing
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ConfigExists { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { identifier } => Self::NotFound { identifier },
            CoreError::IdentityMissing => Self::IdentityMissing,
            CoreError::Mirror { message } => Self::Mirror { message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_exit_four() {
        let err = CliError::from(CoreError::NotFound {
            identifier: "42".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "product '42' not found");
    }

    #[test]
    fn validation_is_usage_error() {
        let err = CliError::Validation {
            field: "price".into(),
            reason: "must not be negative".into(),
        };
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn mirror_failure_is_general() {
        let err = CliError::from(CoreError::Mirror {
            message: "disk full".into(),
        });
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
