// ── Local mirror store ──
//
// A durable copy of the catalog that answers whenever the remote service
// cannot. The whole collection lives under one entry (`products`) as a JSON
// array of wire records, seeded on first access. Every read-modify-write
// cycle holds an async mutex so concurrent callers never interleave.

mod backend;
mod seed;

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use stockroom_api::{DeleteOutcome, ProductRecord};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub use backend::{FileBackend, MemoryBackend, MirrorBackend};
pub use seed::SeedSource;

use crate::config::MirrorLocation;
use crate::error::CoreError;
use crate::model::{ProductDraft, ProductId, resolve_identity};

/// Entry holding the product collection.
pub const PRODUCTS_KEY: &str = "products";

/// Serialized access to the persisted product collection.
#[derive(Debug)]
pub struct MirrorStore {
    backend: Arc<dyn MirrorBackend>,
    seed: SeedSource,
    lock: Mutex<()>,
}

impl MirrorStore {
    pub fn new(backend: Arc<dyn MirrorBackend>, seed: SeedSource) -> Self {
        Self {
            backend,
            seed,
            lock: Mutex::new(()),
        }
    }

    /// File-backed store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>, seed: SeedSource) -> Self {
        Self::new(Arc::new(FileBackend::new(dir)), seed)
    }

    pub fn in_memory(seed: SeedSource) -> Self {
        Self::new(Arc::new(MemoryBackend::new()), seed)
    }

    pub fn from_location(location: &MirrorLocation, seed: SeedSource) -> Self {
        match location {
            MirrorLocation::Directory(dir) => Self::open(dir.clone(), seed),
            MirrorLocation::Memory => Self::in_memory(seed),
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Persist the seed dataset if the collection has never been written.
    /// Idempotent.
    pub async fn seed(&self) -> Result<(), CoreError> {
        let _guard = self.lock.lock().await;
        self.load_seeded().await.map(drop)
    }

    pub async fn list(&self) -> Result<Vec<ProductRecord>, CoreError> {
        let _guard = self.lock.lock().await;
        self.load_seeded().await
    }

    pub async fn get(&self, id: &ProductId) -> Result<ProductRecord, CoreError> {
        let _guard = self.lock.lock().await;
        self.load_seeded()
            .await?
            .into_iter()
            .find(|record| matches_id(record, id))
            .ok_or_else(|| CoreError::not_found(id))
    }

    /// Append a record with the next numeric id (`max + 1`, or 1 on an
    /// empty store). Any `_id` on the draft is discarded.
    pub async fn create(&self, draft: &ProductDraft) -> Result<ProductRecord, CoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load_seeded().await?;

        let next_id = records
            .iter()
            .filter_map(resolve_identity)
            .filter_map(|id| id.as_number())
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        let record = ProductRecord {
            primary_id: None,
            id: Some(Value::from(next_id)),
            name: draft.name.clone(),
            price: Some(draft.price),
            amount: Some(draft.amount),
            description: draft.description.clone(),
            image_url: inline_image(draft),
            is_active: draft.is_active,
            ..ProductRecord::default()
        };
        records.push(record.clone());
        self.persist(&records).await?;

        debug!(id = next_id, "mirror create");
        Ok(record)
    }

    /// Merge `draft` into the record matching `id`. Identity and
    /// timestamps are kept; optional draft fields only override when set,
    /// and an empty description or image URL clears the stored one.
    pub async fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<ProductRecord, CoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load_seeded().await?;

        let record = records
            .iter_mut()
            .find(|record| matches_id(record, id))
            .ok_or_else(|| CoreError::not_found(id))?;

        record.name.clone_from(&draft.name);
        record.price = Some(draft.price);
        record.amount = Some(draft.amount);
        merge_text(&mut record.description, draft.description.as_deref());
        merge_text(&mut record.image_url, inline_image(draft).as_deref());
        if let Some(active) = draft.is_active {
            record.is_active = Some(active);
        }
        let updated = record.clone();

        self.persist(&records).await?;
        debug!(%id, "mirror update");
        Ok(updated)
    }

    /// Remove the record matching `id`. A missing id is not an error.
    pub async fn delete(&self, id: &ProductId) -> Result<DeleteOutcome, CoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load_seeded().await?;

        let before = records.len();
        records.retain(|record| !matches_id(record, id));
        let deleted = records.len() < before;

        if deleted {
            self.persist(&records).await?;
        }
        debug!(%id, deleted, "mirror delete");
        Ok(DeleteOutcome { deleted })
    }

    // ── Storage helpers (caller holds the lock) ──────────────────────

    async fn load_seeded(&self) -> Result<Vec<ProductRecord>, CoreError> {
        let text = match self.read_entry().await? {
            Some(text) => text,
            None => {
                let text = self.seed.load().await?;
                self.write_entry(text.clone()).await?;
                info!(key = PRODUCTS_KEY, "seeded mirror store");
                text
            }
        };
        serde_json::from_str(&text)
            .map_err(|e| CoreError::mirror(format!("stored `{PRODUCTS_KEY}` is corrupt: {e}")))
    }

    async fn persist(&self, records: &[ProductRecord]) -> Result<(), CoreError> {
        let text = serde_json::to_string(records)?;
        self.write_entry(text).await
    }

    async fn read_entry(&self) -> Result<Option<String>, CoreError> {
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || backend.load(PRODUCTS_KEY))
            .await
            .map_err(|e| CoreError::Internal(format!("mirror read task failed: {e}")))?
    }

    async fn write_entry(&self, text: String) -> Result<(), CoreError> {
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || backend.store(PRODUCTS_KEY, &text))
            .await
            .map_err(|e| CoreError::Internal(format!("mirror write task failed: {e}")))?
    }
}

fn matches_id(record: &ProductRecord, id: &ProductId) -> bool {
    resolve_identity(record).as_ref() == Some(id)
}

/// An attachment wins over a plain URL and is stored inline.
/// `None` keeps the stored value, an empty string clears it.
fn merge_text(slot: &mut Option<String>, value: Option<&str>) {
    match value {
        None => {}
        Some("") => *slot = None,
        Some(text) => *slot = Some(text.to_owned()),
    }
}

fn inline_image(draft: &ProductDraft) -> Option<String> {
    draft
        .attachment
        .as_ref()
        .map(crate::model::Attachment::to_data_url)
        .or_else(|| draft.image_url.clone())
}
