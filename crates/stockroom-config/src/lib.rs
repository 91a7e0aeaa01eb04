//! Shared configuration for the stockroom CLI.
//!
//! TOML file + `STOCKROOM_*` environment loading via figment, and
//! translation to `stockroom_core::ClientConfig`. The CLI layers its own
//! flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockroom_core::{ClientConfig, DEFAULT_BASE_URL, MirrorLocation, SeedSource, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub mirror: MirrorSection,

    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Output format: table, json, json-compact, yaml, plain.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

/// Catalog service connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Path to a custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            ca_cert: None,
            insecure: false,
        }
    }
}

/// Local mirror store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MirrorSection {
    /// Directory for mirror entries. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// JSON array of products used to seed an empty mirror. Defaults to
    /// the bundled fixture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
}

/// CSV export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExportSection {
    /// Directory for exported files. Defaults to the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_output() -> String {
    "table".into()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "stockroom", "stockroom")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default mirror directory when `[mirror] dir` is unset.
pub fn default_mirror_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("mirror"),
        |dirs| dirs.data_dir().join("mirror"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("stockroom");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then `path` if it exists, then `STOCKROOM_*` variables
/// (`STOCKROOM_API__BASE_URL` sets `api.base_url`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STOCKROOM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from loaded settings.
pub fn to_client_config(cfg: &Config) -> Result<ClientConfig, ConfigError> {
    let base_url: url::Url = cfg
        .api
        .base_url
        .parse()
        .map_err(|e| ConfigError::Validation {
            field: "api.base_url".into(),
            reason: format!("invalid URL {}: {e}", cfg.api.base_url),
        })?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api.base_url".into(),
            reason: format!("expected an http(s) URL, got {base_url}"),
        });
    }

    let tls = if cfg.api.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.api.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mirror_dir = cfg.mirror.dir.clone().unwrap_or_else(default_mirror_dir);
    let seed = cfg
        .mirror
        .seed_file
        .clone()
        .map_or(SeedSource::Embedded, SeedSource::File);

    Ok(ClientConfig {
        tls,
        timeout: Duration::from_secs(cfg.api.timeout_secs),
        mirror: MirrorLocation::Directory(mirror_dir),
        seed,
        ..ClientConfig::new(base_url)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let cfg = Config::default();
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.api.timeout_secs, 30);
        assert_eq!(cfg.defaults.output, "table");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.api, ApiSection::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://catalog.example.com/api\"\ntimeout_secs = 5\n\n[mirror]\ndir = \"/var/lib/stockroom\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.api.base_url, "https://catalog.example.com/api");
        assert_eq!(cfg.api.timeout_secs, 5);
        assert_eq!(cfg.mirror.dir, Some(PathBuf::from("/var/lib/stockroom")));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut cfg = Config::default();
        cfg.export.dir = Some(PathBuf::from("/tmp/exports"));

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap().export, cfg.export);
    }

    #[test]
    fn client_config_uses_mirror_and_seed_settings() {
        let mut cfg = Config::default();
        cfg.mirror.dir = Some(PathBuf::from("/srv/mirror"));
        cfg.mirror.seed_file = Some(PathBuf::from("/srv/seed.json"));
        cfg.api.insecure = true;

        let client = to_client_config(&cfg).unwrap();
        assert_eq!(
            client.mirror,
            MirrorLocation::Directory(PathBuf::from("/srv/mirror"))
        );
        assert!(matches!(client.seed, SeedSource::File(ref p) if p == Path::new("/srv/seed.json")));
        assert_eq!(client.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn invalid_base_url_is_validation_error() {
        let mut cfg = Config::default();
        cfg.api.base_url = "not a url".into();
        assert!(matches!(
            to_client_config(&cfg),
            Err(ConfigError::Validation { .. })
        ));

        cfg.api.base_url = "ftp://files.example.com/".into();
        assert!(matches!(
            to_client_config(&cfg),
            Err(ConfigError::Validation { .. })
        ));
    }
}
