//! CSV export handler.

use std::path::Path;

use chrono::Utc;
use tracing::info;

use stockroom_core::{Catalog, ProductClient, view};

use crate::cli::{ExportArgs, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;

/// Write the visible rows of the requested view to
/// `<dir>/products_<millis>.csv` and print the path.
pub async fn handle(
    catalog: &Catalog,
    client: &ProductClient,
    args: ExportArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    catalog.load_if_idle(client).await?;
    let projection = catalog.project(&args.view.view_state());
    let dir = config::export_dir(args.dir, cfg);

    let path = write_csv(&dir, &view::to_csv(&projection.rows)).await?;
    info!(rows = projection.rows.len(), path = %path.display(), "catalog exported");

    if !global.quiet {
        println!("{}", path.display());
    }
    Ok(())
}

async fn write_csv(dir: &Path, contents: &str) -> Result<std::path::PathBuf, CliError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(view::export_file_name(Utc::now()));
    tokio::fs::write(&path, contents).await?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_named_file_into_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("exports");

        let path = write_csv(&dir, "ID,Name").await.unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("products_") && name.ends_with(".csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ID,Name");
    }
}
