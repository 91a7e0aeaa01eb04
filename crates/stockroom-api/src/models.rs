// Wire types for the `/products` REST contract.
//
// `ProductRecord` is the raw JSON shape the service returns. The local
// mirror persists the same shape, so both paths decode identically.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product exactly as the catalog service (or the mirror) stores it.
///
/// Identity arrives in one of two fields: `_id` (document-store key) or
/// `id` (numeric or string fallback). Resolving them into a single key is
/// the caller's job; this type keeps both verbatim. Unknown fields are
/// preserved in `extra` so a record survives a decode/encode cycle intact.
///
/// Decoding never rejects a record over a field's type: numbers may arrive
/// as strings, names as `null`, stock counts as fractions. Values that
/// cannot be read are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub primary_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::count",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<u64>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_active: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Lenient field decoding ──────────────────────────────────────────

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn raw<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
        Option::<Value>::deserialize(d)
    }

    /// Strings as-is, numbers and booleans rendered, anything else empty.
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(raw(d)?.as_ref().and_then(as_text).unwrap_or_default())
    }

    pub fn optional_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(raw(d)?.as_ref().and_then(as_text))
    }

    /// JSON numbers or numeric strings. Non-finite values are absent.
    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(raw(d)?.as_ref().and_then(as_number))
    }

    /// A stock count: rounded to the nearest whole unit, negatives become 0.
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        let value = raw(d)?;
        if let Some(n) = value.as_ref().and_then(Value::as_u64) {
            return Ok(Some(n));
        }
        Ok(value.as_ref().and_then(as_number).map(whole_units))
    }

    /// Booleans, `"true"`/`"false"`, or numbers (non-zero is true).
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(match raw(d)? {
            Some(Value::Bool(b)) => Some(b),
            Some(Value::String(s)) => s.trim().parse().ok(),
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0),
            _ => None,
        })
    }

    fn as_text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn as_number(value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        n.is_finite().then_some(n)
    }

    #[allow(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn whole_units(n: f64) -> u64 {
        // Saturating float-to-int cast; NaN is filtered out earlier.
        n.round().max(0.0) as u64
    }
}

/// Result of a delete, on either path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted: bool,
}

// ── Request bodies ──────────────────────────────────────────────────

/// Encoded body for a create or update request.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductBody {
    /// `application/json`
    Json(Value),
    /// `multipart/form-data`, fields in send order.
    Multipart(Vec<FormField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub value: FormValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Bytes,
    },
}

impl FormField {
    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: FormValue::Text(value.into()),
        }
    }

    /// Text value of this field, if it is not a file part.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FormValue::Text(t) => Some(t),
            FormValue::File { .. } => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_both_identity_fields() {
        let rec: ProductRecord = serde_json::from_value(json!({
            "_id": "665f1c2e9b1e8a0012345678",
            "name": "Gundam RX-78",
            "price": 1290,
            "amount": 3,
            "imageUrl": "https://example.com/rx78.jpg",
            "createdAt": "2024-06-01T10:00:00.000Z",
            "__v": 0
        }))
        .unwrap();

        assert_eq!(rec.primary_id, Some(json!("665f1c2e9b1e8a0012345678")));
        assert!(rec.id.is_none());
        assert_eq!(rec.price, Some(1290.0));
        assert_eq!(rec.image_url.as_deref(), Some("https://example.com/rx78.jpg"));
        assert_eq!(rec.extra.get("__v"), Some(&json!(0)));
    }

    #[test]
    fn unknown_fields_survive_reencode() {
        let raw = json!({ "id": 7, "name": "Zaku", "isRecommended": true });
        let rec: ProductRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&rec).unwrap(), raw);
    }

    #[test]
    fn loosely_typed_fields_decode() {
        let rec: ProductRecord = serde_json::from_value(json!({
            "_id": 42,
            "name": null,
            "price": "12.50",
            "amount": 2.6,
            "description": 7,
            "isActive": "false"
        }))
        .unwrap();

        assert_eq!(rec.primary_id, Some(json!(42)));
        assert_eq!(rec.name, "");
        assert_eq!(rec.price, Some(12.5));
        assert_eq!(rec.amount, Some(3));
        assert_eq!(rec.description.as_deref(), Some("7"));
        assert_eq!(rec.is_active, Some(false));
    }

    #[test]
    fn unreadable_numbers_are_absent() {
        let rec: ProductRecord = serde_json::from_value(json!({
            "price": "n/a",
            "amount": -4,
            "imageUrl": null
        }))
        .unwrap();

        assert!(rec.price.is_none());
        assert_eq!(rec.amount, Some(0));
        assert!(rec.image_url.is_none());
    }

    #[test]
    fn missing_fields_default() {
        let rec: ProductRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(rec.name, "");
        assert!(rec.price.is_none());
        assert!(rec.amount.is_none());
    }
}
