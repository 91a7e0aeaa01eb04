// ── Product identity ──
//
// Records carry their key in one of two fields: `_id` (document-store key)
// or `id` (numeric or string). `ProductId` folds both into one string key
// and remembers which field it came from so writes can echo it back.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;
use stockroom_api::ProductRecord;

use crate::error::CoreError;

/// Which record field an identity was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdentitySource {
    /// `_id`
    #[default]
    Primary,
    /// `id`
    Fallback,
}

impl IdentitySource {
    /// Wire field name for this source.
    pub fn field(self) -> &'static str {
        match self {
            Self::Primary => "_id",
            Self::Fallback => "id",
        }
    }
}

// ── ProductId ───────────────────────────────────────────────────────

/// Canonical identifier for a product.
///
/// Equality and hashing compare the key text only: `_id: "7"` and `id: 7`
/// name the same product.
#[derive(Debug, Clone)]
pub struct ProductId {
    value: String,
    source: IdentitySource,
}

impl ProductId {
    pub fn new(value: impl Into<String>, source: IdentitySource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> IdentitySource {
        self.source
    }

    /// Numeric value of the key, used for mirror id assignment.
    pub fn as_number(&self) -> Option<u64> {
        self.value.parse().ok()
    }

    /// The key as a JSON value for its source field. Numeric fallback
    /// keys are emitted as numbers, everything else as strings.
    pub fn to_json(&self) -> Value {
        match (self.source, self.as_number()) {
            (IdentitySource::Fallback, Some(n)) => Value::from(n),
            _ => Value::String(self.value.clone()),
        }
    }
}

impl PartialEq for ProductId {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ProductId {}

impl Hash for ProductId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl FromStr for ProductId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Operator-supplied keys are sent back as `_id`.
impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self::new(value, IdentitySource::Primary)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

// ── Resolution ──────────────────────────────────────────────────────

/// Resolve a record's identity: `_id` when present, else `id`, either
/// rendered as a string. Empty values count as absent.
pub fn resolve_identity(record: &ProductRecord) -> Option<ProductId> {
    if let Some(primary) = record.primary_id.as_ref().and_then(key_text) {
        return Some(ProductId::new(primary, IdentitySource::Primary));
    }
    record
        .id
        .as_ref()
        .and_then(key_text)
        .map(|text| ProductId::new(text, IdentitySource::Fallback))
}

/// Fail with `IdentityMissing` when a record referenced for mutation has
/// no key.
pub fn require_identity(id: Option<&ProductId>) -> Result<&ProductId, CoreError> {
    id.ok_or(CoreError::IdentityMissing)
}

fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integral numbers render without a fractional part (`1`, not `1.0`).
fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
