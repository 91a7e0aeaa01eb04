// stockroom-api: Async Rust client for the product catalog REST service

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::CatalogClient;
pub use error::Error;
pub use models::{DeleteOutcome, FormField, FormValue, ProductBody, ProductRecord};
pub use transport::{TlsMode, TransportConfig};
