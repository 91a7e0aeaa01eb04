// ── Resilient product client ──
//
// Every verb tries the catalog service once. Any failure (unreachable,
// timeout, non-2xx, undecodable body) is logged and the same operation is
// replayed against the local mirror, whose answer is returned as if it
// were authoritative. Callers cannot tell which store answered.

use std::future::Future;
use std::sync::Arc;

use stockroom_api::{CatalogClient, DeleteOutcome, ProductRecord};
use tracing::{debug, warn};

use crate::codec::encode_for_wire;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::mirror::MirrorStore;
use crate::model::{Product, ProductDraft, ProductId, require_identity};

// ── RemoteResult ─────────────────────────────────────────────────

/// Outcome of a single remote attempt.
#[derive(Debug)]
pub enum RemoteResult<T> {
    Ok(T),
    /// The remote attempt failed; the mirror answers instead.
    NetworkFailure(stockroom_api::Error),
}

impl<T> From<Result<T, stockroom_api::Error>> for RemoteResult<T> {
    fn from(result: Result<T, stockroom_api::Error>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(err) => Self::NetworkFailure(err),
        }
    }
}

/// Which store answered a call. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Remote,
    Mirror,
}

// ── ProductGateway ───────────────────────────────────────────────

/// Product CRUD as seen by the catalog container and bulk operations.
pub trait ProductGateway: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<Product>, CoreError>> + Send;

    fn get(&self, id: &ProductId) -> impl Future<Output = Result<Product, CoreError>> + Send;

    fn create(
        &self,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<Product, CoreError>> + Send;

    fn update(
        &self,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<Product, CoreError>> + Send;

    fn delete(&self, id: &ProductId)
    -> impl Future<Output = Result<DeleteOutcome, CoreError>> + Send;
}

// ── ProductClient ────────────────────────────────────────────────

/// Remote-first product client with a local mirror fallback.
#[derive(Debug)]
pub struct ProductClient {
    remote: CatalogClient,
    mirror: Arc<MirrorStore>,
}

impl ProductClient {
    /// Build the remote client and mirror store described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let remote = CatalogClient::new(config.base_url.as_str(), &config.transport()).map_err(
            |e| CoreError::Config {
                message: e.to_string(),
            },
        )?;
        let mirror = MirrorStore::from_location(&config.mirror, config.seed.clone());
        Ok(Self::from_parts(remote, Arc::new(mirror)))
    }

    pub fn from_parts(remote: CatalogClient, mirror: Arc<MirrorStore>) -> Self {
        Self { remote, mirror }
    }

    pub fn mirror(&self) -> &Arc<MirrorStore> {
        &self.mirror
    }

    // ── Verbs ────────────────────────────────────────────────────────

    pub async fn list(&self) -> Result<Vec<Product>, CoreError> {
        let records = match RemoteResult::from(self.remote.list_products().await) {
            RemoteResult::Ok(records) => answered("list", Source::Remote, records),
            RemoteResult::NetworkFailure(err) => {
                fell_back("list", &err);
                answered("list", Source::Mirror, self.mirror.list().await?)
            }
        };
        Ok(records.into_iter().map(Product::from).collect())
    }

    pub async fn get(&self, id: &ProductId) -> Result<Product, CoreError> {
        let record = match RemoteResult::from(self.remote.get_product(id.as_str()).await) {
            RemoteResult::Ok(record) => answered("get", Source::Remote, record),
            RemoteResult::NetworkFailure(err) => {
                fell_back("get", &err);
                answered("get", Source::Mirror, self.mirror.get(id).await?)
            }
        };
        Ok(Product::from(record))
    }

    /// Create a product. A draft without identity is expected here.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, CoreError> {
        let body = encode_for_wire(draft);
        let record = match RemoteResult::from(self.remote.create_product(body).await) {
            RemoteResult::Ok(record) => answered("create", Source::Remote, record),
            RemoteResult::NetworkFailure(err) => {
                fell_back("create", &err);
                answered("create", Source::Mirror, self.mirror.create(draft).await?)
            }
        };
        Ok(Product::from(record))
    }

    /// Full update via `PUT /products/:id`.
    pub async fn update(&self, draft: &ProductDraft) -> Result<Product, CoreError> {
        let id = require_identity(draft.id.as_ref())?;
        let body = encode_for_wire(draft);
        let remote = self.remote.update_product(id.as_str(), body).await;
        self.finish_update("update", id, draft, remote).await
    }

    /// Partial update via `PATCH /products/:id`. Falls back to the same
    /// mirror merge as [`update`](Self::update).
    pub async fn patch(&self, draft: &ProductDraft) -> Result<Product, CoreError> {
        let id = require_identity(draft.id.as_ref())?;
        let body = encode_for_wire(draft);
        let remote = self.remote.patch_product(id.as_str(), body).await;
        self.finish_update("patch", id, draft, remote).await
    }

    pub async fn delete(&self, id: &ProductId) -> Result<DeleteOutcome, CoreError> {
        match RemoteResult::from(self.remote.delete_product(id.as_str()).await) {
            RemoteResult::Ok(outcome) => Ok(answered("delete", Source::Remote, outcome)),
            RemoteResult::NetworkFailure(err) => {
                fell_back("delete", &err);
                let outcome = self.mirror.delete(id).await?;
                Ok(answered("delete", Source::Mirror, outcome))
            }
        }
    }

    async fn finish_update(
        &self,
        op: &'static str,
        id: &ProductId,
        draft: &ProductDraft,
        remote: Result<ProductRecord, stockroom_api::Error>,
    ) -> Result<Product, CoreError> {
        let record = match RemoteResult::from(remote) {
            RemoteResult::Ok(record) => answered(op, Source::Remote, record),
            RemoteResult::NetworkFailure(err) => {
                fell_back(op, &err);
                answered(op, Source::Mirror, self.mirror.update(id, draft).await?)
            }
        };
        Ok(Product::from(record))
    }
}

fn answered<T>(op: &'static str, source: Source, value: T) -> T {
    debug!(op, ?source, "product call answered");
    value
}

fn fell_back(op: &'static str, err: &stockroom_api::Error) {
    warn!(op, error = %err, "catalog service call failed, using local mirror");
}

impl ProductGateway for ProductClient {
    async fn list(&self) -> Result<Vec<Product>, CoreError> {
        ProductClient::list(self).await
    }

    async fn get(&self, id: &ProductId) -> Result<Product, CoreError> {
        ProductClient::get(self, id).await
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, CoreError> {
        ProductClient::create(self, draft).await
    }

    async fn update(&self, draft: &ProductDraft) -> Result<Product, CoreError> {
        ProductClient::update(self, draft).await
    }

    async fn delete(&self, id: &ProductId) -> Result<DeleteOutcome, CoreError> {
        ProductClient::delete(self, id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mirror::SeedSource;

    fn offline_client() -> ProductClient {
        let remote = CatalogClient::new(
            "http://127.0.0.1:1/api",
            &stockroom_api::TransportConfig::default(),
        )
        .unwrap();
        ProductClient::from_parts(
            remote,
            Arc::new(MirrorStore::in_memory(SeedSource::Empty)),
        )
    }

    #[test]
    fn remote_result_from_result() {
        let ok: RemoteResult<u8> = Ok(1).into();
        assert!(matches!(ok, RemoteResult::Ok(1)));

        let failed: RemoteResult<u8> = Err(stockroom_api::Error::Timeout { timeout_secs: 1 }).into();
        assert!(matches!(failed, RemoteResult::NetworkFailure(_)));
    }

    #[tokio::test]
    async fn update_without_identity_fails_fast() {
        let client = offline_client();
        let err = client
            .update(&ProductDraft::new("No id", 1.0, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::IdentityMissing));
    }

    #[tokio::test]
    async fn unreachable_service_falls_back_to_mirror() {
        let client = offline_client();
        let created = client.create(&ProductDraft::new("Offline", 3.0, 2)).await.unwrap();
        assert_eq!(created.id_text(), "1");
        assert_eq!(client.list().await.unwrap().len(), 1);
    }
}
