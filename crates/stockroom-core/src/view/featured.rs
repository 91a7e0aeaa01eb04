use std::sync::Arc;

use crate::model::Product;

use super::sort::SortKey;

/// The highest-priced product with a positive price. Earliest wins ties.
pub fn featured(snapshot: &[Arc<Product>]) -> Option<Arc<Product>> {
    snapshot
        .iter()
        .filter(|p| p.price > 0.0)
        .fold(None::<&Arc<Product>>, |best, p| match best {
            Some(b) if b.price >= p.price => Some(b),
            _ => Some(p),
        })
        .cloned()
}

/// Whether the featured item is shown: only with no active query and no
/// sort key.
pub fn show_featured(query: &str, sort: Option<SortKey>) -> bool {
    query.trim().is_empty() && sort.is_none()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::ProductId;

    fn item(id: &str, price: f64) -> Arc<Product> {
        Arc::new(Product {
            id: Some(ProductId::from(id)),
            name: id.into(),
            price,
            amount: 0,
            description: None,
            image_url: None,
            is_active: None,
            created_at: None,
            updated_at: None,
        })
    }

    #[test]
    fn picks_highest_price_first_on_ties() {
        let snapshot = vec![item("a", 10.0), item("b", 50.0), item("c", 50.0)];
        assert_eq!(featured(&snapshot).unwrap().id_text(), "b");
    }

    #[test]
    fn zero_prices_never_qualify() {
        assert!(featured(&[item("a", 0.0), item("b", 0.0)]).is_none());
        assert!(featured(&[]).is_none());
    }

    #[test]
    fn display_policy_hides_during_search_or_sort() {
        assert!(show_featured("", None));
        assert!(show_featured("  ", None));
        assert!(!show_featured("A", None));
        assert!(!show_featured("", Some(SortKey::Price)));
    }
}
