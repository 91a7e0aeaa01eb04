// ── Product domain types ──

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use bytes::Bytes;
use serde::Serialize;
use stockroom_api::ProductRecord;

use super::identity::{ProductId, resolve_identity};

/// A persisted catalog entry.
///
/// Identity is resolved once from the wire record and never re-derived.
/// Absent numeric fields are coerced to zero at this boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Product {
    /// Identity as display text, empty when absent.
    pub fn id_text(&self) -> &str {
        self.id.as_ref().map_or("", ProductId::as_str)
    }

    pub fn has_id(&self, id: &ProductId) -> bool {
        self.id.as_ref() == Some(id)
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let id = resolve_identity(&record);
        Self {
            id,
            name: record.name,
            price: record.price.unwrap_or_default(),
            amount: record.amount.unwrap_or_default(),
            description: record.description,
            image_url: record.image_url,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

// ── Attachment ──────────────────────────────────────────────────────

/// A binary file selected for upload. Lives only on a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl Attachment {
    /// Build an attachment, guessing the content type from the file name.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Read an attachment from disk.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }

    /// Self-contained `data:<mime>;base64,<payload>` form.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            BASE64_STANDARD.encode(&self.bytes)
        )
    }
}

// ── ProductDraft ────────────────────────────────────────────────────

/// Editable input for create and update. Carries the only reference to
/// an attachment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    pub amount: u64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub attachment: Option<Attachment>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64, amount: u64) -> Self {
        Self {
            name: name.into(),
            price,
            amount,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// A fresh draft cloned from `product`: named `"<name> (copy)"`, with
    /// identity and timestamps dropped.
    pub fn duplicate_of(product: &Product) -> Self {
        Self {
            id: None,
            name: format!("{} (copy)", product.name),
            ..Self::from(product)
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            amount: product.amount,
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            is_active: product.is_active,
            attachment: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(raw: serde_json::Value) -> Product {
        Product::from(serde_json::from_value::<ProductRecord>(raw).unwrap())
    }

    #[test]
    fn absent_numbers_coerce_to_zero() {
        let p = product(json!({ "_id": "a", "name": "Zaku" }));
        assert!(p.price.abs() < f64::EPSILON);
        assert_eq!(p.amount, 0);
        assert_eq!(p.id_text(), "a");
    }

    #[test]
    fn attachment_guesses_content_type() {
        let a = Attachment::new("rx78.png", b"\x89PNG".to_vec());
        assert_eq!(a.content_type, "image/png");
        let unknown = Attachment::new("blob", Vec::new());
        assert_eq!(unknown.content_type, "application/octet-stream");
    }

    #[test]
    fn data_url_inlines_payload() {
        let a = Attachment::new("a.txt", b"hi".to_vec());
        assert_eq!(a.to_data_url(), "data:text/plain;base64,aGk=");
    }

    #[test]
    fn duplicate_drops_identity_and_renames() {
        let p = product(json!({
            "id": 4, "name": "Dom", "price": 1500, "amount": 2,
            "createdAt": "2024-01-01T00:00:00Z"
        }));
        let draft = ProductDraft::duplicate_of(&p);
        assert!(draft.id.is_none());
        assert_eq!(draft.name, "Dom (copy)");
        assert_eq!(draft.amount, 2);
    }

    #[test]
    fn serializes_identity_as_text() {
        let p = product(json!({ "id": 9, "name": "Gelgoog", "price": 10, "amount": 1 }));
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["id"], json!("9"));
        assert_eq!(value["name"], json!("Gelgoog"));
    }
}
