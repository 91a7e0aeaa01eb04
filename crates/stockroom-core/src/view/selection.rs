// Multi-selection and batched delete.

use indexmap::IndexSet;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::client::ProductGateway;
use crate::model::ProductId;

/// Insertion-ordered set of selected product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: IndexSet<ProductId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Returns whether it is now
    /// selected.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if self.ids.shift_remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn insert(&mut self, id: ProductId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.ids.iter()
    }
}

impl FromIterator<ProductId> for Selection {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

// ── Bulk delete ─────────────────────────────────────────────────────

/// Per-item result of a bulk delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkItemResult {
    Deleted,
    /// The store answered but had no such record.
    Missing,
    Failed { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub items: Vec<(ProductId, BulkItemResult)>,
}

impl BulkDeleteReport {
    pub fn deleted(&self) -> usize {
        self.items
            .iter()
            .filter(|(_, r)| *r == BulkItemResult::Deleted)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ProductId, &str)> {
        self.items.iter().filter_map(|(id, r)| match r {
            BulkItemResult::Failed { message } => Some((id, message.as_str())),
            _ => None,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Delete every selected id, one at a time, through `catalog`.
///
/// A failed item is logged and skipped. The selection is always cleared.
pub async fn bulk_delete<G: ProductGateway>(
    catalog: &Catalog,
    gateway: &G,
    selection: &mut Selection,
) -> BulkDeleteReport {
    let mut report = BulkDeleteReport::default();

    for id in selection.iter() {
        let result = match catalog.delete(gateway, id).await {
            Ok(outcome) if outcome.deleted => BulkItemResult::Deleted,
            Ok(_) => BulkItemResult::Missing,
            Err(err) => {
                warn!(%id, error = %err, "bulk delete item failed");
                BulkItemResult::Failed {
                    message: err.to_string(),
                }
            }
        };
        report.items.push((id.clone(), result));
    }

    selection.clear();
    info!(
        requested = report.items.len(),
        deleted = report.deleted(),
        "bulk delete finished"
    );
    report
}
