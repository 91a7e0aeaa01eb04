// ── Domain model ──

pub mod identity;
pub mod product;

pub use identity::{IdentitySource, ProductId, require_identity, resolve_identity};
pub use product::{Attachment, Product, ProductDraft};
