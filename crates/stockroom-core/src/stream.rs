// ── Catalog snapshot streams ──

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::catalog::CatalogSnapshot;

/// A subscription to the catalog snapshot.
///
/// Offers the snapshot captured at subscription time, the latest one, and
/// change notification via [`changed`](Self::changed) or as a `Stream`.
pub struct CatalogStream {
    current: CatalogSnapshot,
    receiver: watch::Receiver<CatalogSnapshot>,
}

impl CatalogStream {
    pub(crate) fn new(receiver: watch::Receiver<CatalogSnapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    pub fn current(&self) -> &CatalogSnapshot {
        &self.current
    }

    pub fn latest(&self) -> CatalogSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the catalog is dropped.
    pub async fn changed(&mut self) -> Option<CatalogSnapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    pub fn into_stream(self) -> CatalogWatchStream {
        CatalogWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` of snapshots, starting with the current one.
pub struct CatalogWatchStream {
    inner: WatchStream<CatalogSnapshot>,
}

impl Stream for CatalogWatchStream {
    type Item = CatalogSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
