// ── Catalog container ──
//
// Owns the in-memory product snapshot and the fetch lifecycle for one
// consumer session. Every change to the snapshot comes from a gateway
// return value. Closing the catalog cancels its token; results that land
// afterwards are dropped instead of applied.

use std::sync::Arc;

use stockroom_api::DeleteOutcome;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::ProductGateway;
use crate::error::CoreError;
use crate::lifecycle::{FetchLifecycle, LifecycleState};
use crate::model::{Product, ProductDraft, ProductId};
use crate::stream::CatalogStream;
use crate::view::{Projection, ViewState};

/// Immutable, cheaply cloned view of the catalog contents.
pub type CatalogSnapshot = Arc<Vec<Arc<Product>>>;

/// What a fetch did to the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The snapshot was replaced.
    Applied,
    /// Another fetch was pending (or, for autoload, one already ran).
    Suppressed,
    /// The catalog was closed before the result arrived.
    Discarded,
}

#[derive(Debug)]
pub struct Catalog {
    snapshot: watch::Sender<CatalogSnapshot>,
    lifecycle: FetchLifecycle,
    cancel: CancellationToken,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            snapshot,
            lifecycle: FetchLifecycle::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> CatalogStream {
        CatalogStream::new(self.snapshot.subscribe())
    }

    pub fn lifecycle(&self) -> &FetchLifecycle {
        &self.lifecycle
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Stop applying results. Idempotent.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Filtered, sorted rows plus the featured item for `view`.
    pub fn project(&self, view: &ViewState) -> Projection {
        view.project(&self.snapshot())
    }

    // ── Fetch ────────────────────────────────────────────────────────

    /// Replace the snapshot with a fresh list. Suppressed while another
    /// fetch is pending.
    pub async fn fetch_all<G: ProductGateway>(
        &self,
        gateway: &G,
    ) -> Result<FetchOutcome, CoreError> {
        if self.is_closed() {
            return Ok(FetchOutcome::Discarded);
        }
        let Some(ticket) = self.lifecycle.begin() else {
            return Ok(FetchOutcome::Suppressed);
        };

        let result = gateway.list().await;
        if self.is_closed() {
            debug!("catalog closed, discarding fetch result");
            return Ok(FetchOutcome::Discarded);
        }

        match result {
            Ok(products) => {
                info!(count = products.len(), "catalog loaded");
                self.snapshot
                    .send_replace(Arc::new(products.into_iter().map(Arc::new).collect()));
                ticket.succeed();
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                warn!(error = %err, "catalog fetch failed");
                ticket.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// First-load gate: fetch only if no fetch has ever started.
    pub async fn load_if_idle<G: ProductGateway>(
        &self,
        gateway: &G,
    ) -> Result<FetchOutcome, CoreError> {
        if self.lifecycle.should_autoload() {
            self.fetch_all(gateway).await
        } else {
            Ok(FetchOutcome::Suppressed)
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a product and append it to the snapshot.
    pub async fn create<G: ProductGateway>(
        &self,
        gateway: &G,
        draft: &ProductDraft,
    ) -> Result<Product, CoreError> {
        let product = gateway.create(draft).await?;
        let entry = Arc::new(product.clone());
        self.apply("create", |items| items.push(entry));
        Ok(product)
    }

    /// Update a product and replace the matching snapshot entry. An entry
    /// that is not in the snapshot is left alone.
    pub async fn update<G: ProductGateway>(
        &self,
        gateway: &G,
        draft: &ProductDraft,
    ) -> Result<Product, CoreError> {
        let product = gateway.update(draft).await?;
        if let Some(key) = product.id.clone().or_else(|| draft.id.clone()) {
            let entry = Arc::new(product.clone());
            self.apply("update", |items| {
                if let Some(slot) = items.iter_mut().find(|p| p.has_id(&key)) {
                    *slot = entry;
                }
            });
        }
        Ok(product)
    }

    /// Delete a product and drop it from the snapshot.
    pub async fn delete<G: ProductGateway>(
        &self,
        gateway: &G,
        id: &ProductId,
    ) -> Result<DeleteOutcome, CoreError> {
        let outcome = gateway.delete(id).await?;
        self.apply("delete", |items| items.retain(|p| !p.has_id(id)));
        Ok(outcome)
    }

    /// Create a copy of `product` named `"<name> (copy)"`.
    pub async fn duplicate<G: ProductGateway>(
        &self,
        gateway: &G,
        product: &Product,
    ) -> Result<Product, CoreError> {
        self.create(gateway, &ProductDraft::duplicate_of(product))
            .await
    }

    fn apply(&self, op: &'static str, change: impl FnOnce(&mut Vec<Arc<Product>>)) {
        if self.is_closed() {
            debug!(op, "catalog closed, discarding result");
            return;
        }
        self.snapshot.send_modify(|snapshot| {
            let mut items = snapshot.as_ref().clone();
            change(&mut items);
            *snapshot = Arc::new(items);
        });
    }
}
