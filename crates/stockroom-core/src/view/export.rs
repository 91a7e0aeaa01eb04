// CSV export of the visible rows.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::model::Product;

pub const CSV_HEADER: &str = "ID,Name,Price,Amount,Active,Description,ImageUrl";

/// Serialize `list` as CSV: header first, one row per product, every
/// field quoted, rows joined with `\n` and no trailing newline.
pub fn to_csv(list: &[Arc<Product>]) -> String {
    let mut lines = Vec::with_capacity(list.len() + 1);
    lines.push(CSV_HEADER.to_owned());
    lines.extend(list.iter().map(|p| csv_row(p)));
    lines.join("\n")
}

/// `products_<unix-millis>.csv`
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("products_{}.csv", at.timestamp_millis())
}

fn csv_row(product: &Product) -> String {
    let description = product
        .description
        .as_deref()
        .unwrap_or_default()
        .replace(['\r', '\n'], " ");
    let active = product.is_active.map(|a| a.to_string()).unwrap_or_default();
    let price = product.price.to_string();
    let amount = product.amount.to_string();

    let fields: [&str; 7] = [
        product.id_text(),
        &product.name,
        &price,
        &amount,
        &active,
        &description,
        product.image_url.as_deref().unwrap_or_default(),
    ];
    fields.map(quote).join(",")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
