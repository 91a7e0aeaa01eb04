// ── Seed dataset ──

use std::path::PathBuf;

use stockroom_api::ProductRecord;

use crate::error::CoreError;

/// Bundled fixture used when no seed file is configured.
const EMBEDDED_SEED: &str = include_str!("../../fixtures/products.seed.json");

/// Where the mirror's initial dataset comes from.
#[derive(Debug, Clone, Default)]
pub enum SeedSource {
    /// The fixture shipped with this crate.
    #[default]
    Embedded,
    /// A JSON array of records on disk.
    File(PathBuf),
    /// Records supplied directly.
    Records(Vec<ProductRecord>),
    /// Start with an empty catalog.
    Empty,
}

impl SeedSource {
    /// Load the dataset as JSON text ready to persist. File contents are
    /// validated as a record array but stored as read.
    pub(crate) async fn load(&self) -> Result<String, CoreError> {
        match self {
            Self::Embedded => Ok(EMBEDDED_SEED.to_owned()),
            Self::File(path) => {
                let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                    CoreError::mirror(format!("failed to read seed {}: {e}", path.display()))
                })?;
                serde_json::from_str::<Vec<ProductRecord>>(&text).map_err(|e| {
                    CoreError::mirror(format!("seed {} is not a product list: {e}", path.display()))
                })?;
                Ok(text)
            }
            Self::Records(records) => Ok(serde_json::to_string(records)?),
            Self::Empty => Ok("[]".to_owned()),
        }
    }
}
