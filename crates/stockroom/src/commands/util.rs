//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use stockroom_core::{Attachment, ProductDraft};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the action is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Reject negative or non-finite prices before anything is sent.
pub fn validate_price(price: f64) -> Result<f64, CliError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(CliError::Validation {
            field: "price".into(),
            reason: format!("must be a non-negative number, got {price}"),
        })
    }
}

pub fn validate_name(name: &str) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::Validation {
            field: "name".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

/// Read `path` and attach it to `draft`.
pub async fn attach_image(draft: &mut ProductDraft, path: &Path) -> Result<(), CliError> {
    let attachment = Attachment::from_path(path).await.map_err(|e| CliError::Validation {
        field: "image".into(),
        reason: format!("cannot read {}: {e}", path.display()),
    })?;
    draft.attachment = Some(attachment);
    Ok(())
}
