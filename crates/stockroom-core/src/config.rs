// ── Runtime client configuration ──
//
// Describes where the catalog service lives and where the local mirror
// keeps its copy. Core never reads config files: the CLI (through
// stockroom-config) builds a `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use stockroom_api::{TlsMode, TransportConfig};
use url::Url;

use crate::mirror::SeedSource;

/// Default catalog service endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed dev servers).
    DangerAcceptInvalid,
}

/// Where the mirror store persists its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorLocation {
    /// One `<key>.json` file per entry inside this directory.
    Directory(PathBuf),
    /// Process-local, discarded on exit.
    Memory,
}

/// Configuration for a `ProductClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Catalog service base URL (e.g. `http://localhost:3000/api/`).
    pub base_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout for the remote attempt.
    pub timeout: Duration,
    /// Mirror persistence location.
    pub mirror: MirrorLocation,
    /// Dataset used the first time the mirror is read.
    pub seed: SeedSource,
}

impl ClientConfig {
    /// Config for `base_url` with strict TLS, a 30s timeout, and an
    /// in-memory mirror seeded from the bundled fixture.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            mirror: MirrorLocation::Memory,
            seed: SeedSource::Embedded,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            ..TransportConfig::default()
        }
        .with_timeout(self.timeout)
    }
}
