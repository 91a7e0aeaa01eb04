//! Product command handlers.

use std::sync::Arc;

use tabled::Tabled;
use tracing::debug;

use stockroom_core::{
    BulkItemResult, Catalog, Product, ProductClient, ProductDraft, ProductId, Selection,
    view::bulk_delete,
};

use crate::cli::{GlobalOpts, OutputFormat, ProductFields, UpdateArgs, ViewArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Amount")]
    amount: u64,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Arc<Product>> for ProductRow {
    fn from(p: &Arc<Product>) -> Self {
        Self {
            id: p.id_text().to_owned(),
            name: p.name.clone(),
            price: format!("{:.2}", p.price),
            amount: p.amount,
            active: match p.is_active {
                Some(true) => "yes",
                Some(false) => "no",
                None => "-",
            }
            .into(),
            description: p.description.clone().unwrap_or_default(),
        }
    }
}

fn detail(p: &Product) -> String {
    let mut lines = vec![
        format!("ID:          {}", or_dash(p.id_text())),
        format!("Name:        {}", p.name),
        format!("Price:       {:.2}", p.price),
        format!("Amount:      {}", p.amount),
        format!("Description: {}", p.description.as_deref().unwrap_or("-")),
        format!("Image URL:   {}", p.image_url.as_deref().unwrap_or("-")),
    ];
    if let Some(active) = p.is_active {
        lines.push(format!("Active:      {active}"));
    }
    if let Some(ref created) = p.created_at {
        lines.push(format!("Created:     {created}"));
    }
    if let Some(ref updated) = p.updated_at {
        lines.push(format!("Updated:     {updated}"));
    }
    lines.join("\n")
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn render_product(p: &Product, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.format(), p, detail, |p| p.id_text().to_owned())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(
    catalog: &Catalog,
    client: &ProductClient,
    args: &ViewArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    catalog.load_if_idle(client).await?;
    let projection = catalog.project(&args.view_state());

    if matches!(global.format(), OutputFormat::Table) && !global.quiet {
        if let Some(top) = projection.visible_featured() {
            eprintln!("Featured: {} ({:.2})", top.name, top.price);
        }
    }

    let out = output::render_list(
        global.format(),
        &projection.rows,
        |p| ProductRow::from(p),
        |p| p.id_text().to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn get(client: &ProductClient, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let product = client.get(&ProductId::from(id)).await?;
    render_product(&product, global)
}

pub async fn create(
    catalog: &Catalog,
    client: &ProductClient,
    fields: ProductFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::validate_name(&fields.name)?;
    let price = util::validate_price(fields.price)?;

    let mut draft = ProductDraft::new(fields.name, price, fields.amount);
    draft.description = fields.description;
    draft.image_url = fields.image_url;
    draft.is_active = fields.active;
    if let Some(ref path) = fields.image {
        util::attach_image(&mut draft, path).await?;
    }

    let created = catalog.create(client, &draft).await?;
    if !global.quiet {
        eprintln!("Created product {}", or_dash(created.id_text()));
    }
    render_product(&created, global)
}

/// Fetch the current product, overlay the given fields, and send the
/// whole record back.
pub async fn update(
    catalog: &Catalog,
    client: &ProductClient,
    args: UpdateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let current = client.get(&ProductId::from(args.id.as_str())).await?;
    let mut draft = ProductDraft::from(&current);
    // A record that only answered to the requested id keeps that id
    if draft.id.is_none() {
        draft.id = Some(ProductId::from(args.id.as_str()));
    }

    if let Some(name) = args.name {
        util::validate_name(&name)?;
        draft.name = name;
    }
    if let Some(price) = args.price {
        draft.price = util::validate_price(price)?;
    }
    if let Some(amount) = args.amount {
        draft.amount = amount;
    }
    if let Some(description) = args.description {
        draft.description = Some(description);
    }
    if let Some(image_url) = args.image_url {
        draft.image_url = Some(image_url);
    }
    if let Some(active) = args.active {
        draft.is_active = Some(active);
    }
    if let Some(ref path) = args.image {
        util::attach_image(&mut draft, path).await?;
    }

    let updated = if args.patch {
        debug!(id = %args.id, "sending partial update");
        client.patch(&draft).await?
    } else {
        catalog.update(client, &draft).await?
    };
    render_product(&updated, global)
}

pub async fn delete(
    catalog: &Catalog,
    client: &ProductClient,
    ids: Vec<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut selection: Selection = ids.into_iter().map(ProductId::from).collect();
    let prompt = if selection.len() == 1 {
        "Delete 1 product?".to_owned()
    } else {
        format!("Delete {} products?", selection.len())
    };
    if !util::confirm(&prompt, "delete", global.yes)? {
        return Ok(());
    }

    let report = bulk_delete(catalog, client, &mut selection).await;
    let total = report.items.len();

    for (id, result) in &report.items {
        match result {
            BulkItemResult::Deleted => {
                if !global.quiet {
                    eprintln!("Deleted {id}");
                }
            }
            BulkItemResult::Missing => eprintln!("Not found: {id}"),
            BulkItemResult::Failed { message } => eprintln!("Failed to delete {id}: {message}"),
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        return Err(CliError::PartialDelete { failed, total });
    }
    if report.deleted() == 0 {
        if let Some((id, _)) = report.items.first() {
            return Err(CliError::NotFound {
                identifier: id.to_string(),
            });
        }
    }
    Ok(())
}

pub async fn duplicate(
    catalog: &Catalog,
    client: &ProductClient,
    id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let source = client.get(&ProductId::from(id)).await?;
    let copy = catalog.duplicate(client, &source).await?;
    if !global.quiet {
        eprintln!("Duplicated {id} as {}", or_dash(copy.id_text()));
    }
    render_product(&copy, global)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: Some(ProductId::from("7")),
            name: "Zaku II".into(),
            price: 890.5,
            amount: 2,
            description: None,
            image_url: None,
            is_active: Some(true),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn row_formats_price_and_flags() {
        let row = ProductRow::from(&Arc::new(product()));
        assert_eq!(row.id, "7");
        assert_eq!(row.price, "890.50");
        assert_eq!(row.active, "yes");
        assert_eq!(row.description, "");
    }

    #[test]
    fn detail_dashes_missing_fields() {
        let text = detail(&product());
        assert!(text.contains("Name:        Zaku II"));
        assert!(text.contains("Description: -"));
        assert!(!text.contains("Created:"));
    }
}
