//! Resilient catalog data access between `stockroom-api` and consumers.
//!
//! - **[`ProductClient`]** tries the catalog service once per call and, on
//!   any failure, replays the operation against the local [`MirrorStore`].
//!   Both paths return the same types.
//!
//! - **[`MirrorStore`]** keeps a durable copy of the catalog behind a
//!   [`MirrorBackend`] (a directory of JSON files, or memory), seeded once
//!   from a fixture.
//!
//! - **[`Catalog`]** owns the in-memory snapshot and the
//!   [`FetchLifecycle`] (`Idle -> Pending -> Succeeded | Failed`) for one
//!   session. Mutations flow through a [`ProductGateway`] and land in the
//!   snapshot from its return values.
//!
//! - **[`view`]** derives rows from a snapshot: search, sort, the featured
//!   item, CSV export, and multi-selection with bulk delete.
//!
//! - **Domain model** ([`model`]) with [`ProductId`] folding the `_id`/`id`
//!   identity fields into one key.

pub mod catalog;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod mirror;
pub mod model;
pub mod stream;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{Catalog, CatalogSnapshot, FetchOutcome};
pub use client::{ProductClient, ProductGateway, RemoteResult};
pub use codec::encode_for_wire;
pub use config::{ClientConfig, DEFAULT_BASE_URL, MirrorLocation, TlsVerification};
pub use error::CoreError;
pub use lifecycle::{FetchLifecycle, FetchTicket, LifecycleState};
pub use mirror::{FileBackend, MemoryBackend, MirrorBackend, MirrorStore, SeedSource};
pub use model::{
    Attachment, IdentitySource, Product, ProductDraft, ProductId, require_identity,
    resolve_identity,
};
pub use stream::{CatalogStream, CatalogWatchStream};
pub use view::{
    BulkDeleteReport, BulkItemResult, Projection, Selection, SortKey, SortOrder, ViewState,
};

pub use stockroom_api::DeleteOutcome;
