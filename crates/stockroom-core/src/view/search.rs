use std::sync::Arc;

use crate::model::Product;

/// Case-insensitive substring match over name, description, and identity.
/// The query is trimmed; an empty query matches everything.
pub fn search(snapshot: &[Arc<Product>], query: &str) -> Vec<Arc<Product>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return snapshot.to_vec();
    }
    snapshot
        .iter()
        .filter(|p| matches_query(p, &needle))
        .cloned()
        .collect()
}

/// `needle` must already be trimmed and lowercased.
fn matches_query(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || product.id_text().to_lowercase().contains(needle)
}
