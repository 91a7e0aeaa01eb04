// ── View projections ──
//
// Derivations over a catalog snapshot (search, sort, featured item, CSV
// export) are pure. The one exception is `bulk_delete` in `selection`,
// which deletes each selected id through the `Catalog` and its gateway.

mod export;
mod featured;
mod search;
mod selection;
mod sort;

use std::sync::Arc;

use crate::model::Product;

pub use export::{CSV_HEADER, export_file_name, to_csv};
pub use featured::{featured, show_featured};
pub use search::search;
pub use selection::{BulkDeleteReport, BulkItemResult, Selection, bulk_delete};
pub use sort::{SortKey, SortOrder, sort};

/// Query and sort indicator state for a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub query: String,
    pub sort_key: Option<SortKey>,
    pub sort_order: SortOrder,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_key = Some(key);
        self.sort_order = order;
        self
    }

    /// Same key flips the direction; a new key starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == Some(key) {
            self.sort_order = self.sort_order.flip();
        } else {
            self.sort_key = Some(key);
            self.sort_order = SortOrder::Asc;
        }
    }

    pub fn clear_sort(&mut self) {
        self.sort_key = None;
        self.sort_order = SortOrder::Asc;
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn show_featured(&self) -> bool {
        show_featured(&self.query, self.sort_key)
    }

    /// Rows for this view plus the featured item.
    pub fn project(&self, snapshot: &[Arc<Product>]) -> Projection {
        let matched = search(snapshot, &self.query);
        let rows = match self.sort_key {
            Some(key) => sort(&matched, key, self.sort_order),
            None => matched,
        };
        Projection {
            rows,
            featured: featured(snapshot),
            show_featured: self.show_featured(),
        }
    }
}

/// Output of [`ViewState::project`].
#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub rows: Vec<Arc<Product>>,
    /// Computed from the whole snapshot, regardless of the display policy.
    pub featured: Option<Arc<Product>>,
    pub show_featured: bool,
}

impl Projection {
    /// The featured item when the display policy allows it.
    pub fn visible_featured(&self) -> Option<&Arc<Product>> {
        self.featured.as_ref().filter(|_| self.show_featured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductId;
    use pretty_assertions::assert_eq;

    fn item(id: &str, name: &str, price: f64, amount: u64) -> Arc<Product> {
        Arc::new(Product {
            id: Some(ProductId::from(id)),
            name: name.into(),
            price,
            amount,
            description: None,
            image_url: None,
            is_active: None,
            created_at: None,
            updated_at: None,
        })
    }

    fn seed() -> Vec<Arc<Product>> {
        vec![item("1", "A", 10.0, 2), item("2", "B", 50.0, 0)]
    }

    #[test]
    fn toggle_sort_cycles_direction() {
        let mut view = ViewState::new();
        view.toggle_sort(SortKey::Price);
        assert_eq!((view.sort_key, view.sort_order), (Some(SortKey::Price), SortOrder::Asc));
        view.toggle_sort(SortKey::Price);
        assert_eq!(view.sort_order, SortOrder::Desc);
        view.toggle_sort(SortKey::Amount);
        assert_eq!((view.sort_key, view.sort_order), (Some(SortKey::Amount), SortOrder::Asc));
        view.clear_sort();
        assert_eq!(view.sort_key, None);
    }

    #[test]
    fn featured_is_hidden_by_query_but_still_computed() {
        let snapshot = seed();

        let plain = ViewState::new().project(&snapshot);
        assert_eq!(plain.visible_featured().map(|p| p.id_text()), Some("2"));

        let searching = ViewState::new().with_query("A").project(&snapshot);
        assert!(!searching.show_featured);
        assert!(searching.visible_featured().is_none());
        assert_eq!(searching.featured.as_ref().map(|p| p.id_text()), Some("2"));
        assert_eq!(searching.rows.len(), 1);
    }

    #[test]
    fn projection_filters_then_sorts() {
        let snapshot = vec![
            item("1", "Zaku II", 590.0, 15),
            item("2", "Zaku Cannon", 790.0, 4),
            item("3", "Gouf", 990.0, 1),
        ];
        let view = ViewState::new()
            .with_query("zaku")
            .with_sort(SortKey::Amount, SortOrder::Asc);
        let names: Vec<_> = view
            .project(&snapshot)
            .rows
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["Zaku Cannon", "Zaku II"]);
    }

    #[test]
    fn clear_query_restores_full_list() {
        let mut view = ViewState::new().with_query("B");
        assert_eq!(view.project(&seed()).rows.len(), 1);
        view.clear_query();
        assert_eq!(view.project(&seed()).rows.len(), 2);
    }
}
