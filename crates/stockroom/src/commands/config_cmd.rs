//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            base_url,
            mirror_dir,
            force,
        } => init(base_url, mirror_dir, force, global),

        ConfigCommand::Show => {
            let cfg = config::apply_overrides(config::load_config()?, global);
            let out = toml::to_string_pretty(&cfg)?;
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

fn init(
    base_url: Option<String>,
    mirror_dir: Option<PathBuf>,
    force: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let path = config::config_path();
    if path.exists() && !force {
        return Err(CliError::ConfigExists {
            path: path.display().to_string(),
        });
    }

    let mut cfg = Config::default();
    cfg.api.base_url = match base_url {
        Some(url) => url,
        None => {
            eprintln!("stockroom configuration");
            eprintln!("   Config path: {}\n", path.display());
            Input::new()
                .with_prompt("Catalog service URL")
                .default(cfg.api.base_url.clone())
                .interact_text()
                .map_err(prompt_err)?
        }
    };
    cfg.mirror.dir = mirror_dir;

    // Reject a bad URL before it lands on disk
    stockroom_config::to_client_config(&cfg)?;

    let written = config::save_config(&cfg)?;
    if !global.quiet {
        eprintln!("Wrote {}", written.display());
    }
    Ok(())
}
