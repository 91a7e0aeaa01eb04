//! CLI configuration: thin wrapper around `stockroom_config`.
//!
//! Re-exports the shared types and applies `GlobalOpts` flag overrides
//! (--api-url, --timeout, --mirror-dir, ...) on top of the loaded file.

use std::path::PathBuf;

use clap::ValueEnum;
use stockroom_core::ClientConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use stockroom_config::{Config, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Apply flag overrides to a loaded config. Flags win over file and
/// environment values.
pub fn apply_overrides(mut cfg: Config, global: &GlobalOpts) -> Config {
    if let Some(ref url) = global.api_url {
        cfg.api.base_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.api.timeout_secs = timeout;
    }
    if global.insecure {
        cfg.api.insecure = true;
    }
    if let Some(ref dir) = global.mirror_dir {
        cfg.mirror.dir = Some(dir.clone());
    }
    if let Some(ref seed) = global.seed_file {
        cfg.mirror.seed_file = Some(seed.clone());
    }
    cfg
}

/// Load config, apply flag overrides, and build the client settings.
pub fn resolve(global: &GlobalOpts) -> Result<(Config, ClientConfig), CliError> {
    let cfg = apply_overrides(load_config()?, global);
    let client = stockroom_config::to_client_config(&cfg)?;
    Ok((cfg, client))
}

/// Fill in `--output` from `[defaults] output` when the flag was not given.
pub fn apply_output_default(global: &mut GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    if global.output.is_none() {
        let format = <OutputFormat as ValueEnum>::from_str(&cfg.defaults.output, true).map_err(|_| {
            CliError::Validation {
                field: "defaults.output".into(),
                reason: format!(
                    "unknown output format '{}' (expected table, json, json-compact, yaml, plain)",
                    cfg.defaults.output
                ),
            }
        })?;
        global.output = Some(format);
    }
    Ok(())
}

/// Export directory: flag, then config, then the working directory.
pub fn export_dir(flag: Option<PathBuf>, cfg: &Config) -> PathBuf {
    flag.or_else(|| cfg.export.dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["stockroom"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_output(output: &str) -> Config {
        let mut cfg = Config::default();
        cfg.defaults.output = output.into();
        cfg
    }

    #[test]
    fn configured_output_applies_without_flag() {
        let mut opts = global(&[]);
        apply_output_default(&mut opts, &config_with_output("json-compact")).unwrap();
        assert!(matches!(opts.format(), OutputFormat::JsonCompact));
    }

    #[test]
    fn output_flag_beats_config() {
        let mut opts = global(&["-o", "yaml"]);
        apply_output_default(&mut opts, &config_with_output("json")).unwrap();
        assert!(matches!(opts.format(), OutputFormat::Yaml));
    }

    #[test]
    fn unknown_configured_output_is_rejected() {
        let mut opts = global(&[]);
        let err = apply_output_default(&mut opts, &config_with_output("xml")).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "defaults.output"));
    }
}
