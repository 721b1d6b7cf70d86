//! Single owned copy of the catalog held by every view.
//!
//! Views read cheap [`CatalogSnapshot`]s and ask the store to refresh; they
//! never patch the lists themselves. Refreshes take a ticket when they are
//! initiated and a response is applied only if no later-initiated refresh
//! of the same list has already been applied.

use crate::error::TransportError;
use crate::filter::{self, CategoryGroup};
use crate::models::{CatalogId, Category, Document};
use crate::services::catalog_client::CatalogApi;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Point-in-time view of categories and documents.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    categories: Arc<Vec<Category>>,
    documents: Arc<Vec<Document>>,
}

impl CatalogSnapshot {
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn grouped(&self) -> Vec<CategoryGroup<'_>> {
        filter::group_by_category(&self.categories, &self.documents)
    }

    pub fn has_category_named(&self, name: &str) -> bool {
        self.categories.iter().any(|category| category.name == name)
    }

    pub fn document_ids(&self) -> HashSet<&CatalogId> {
        self.documents.iter().map(|document| &document.id).collect()
    }
}

#[derive(Default)]
struct StoreState {
    snapshot: CatalogSnapshot,
    categories_applied: u64,
    documents_applied: u64,
}

pub struct CatalogStore {
    api: Arc<dyn CatalogApi>,
    state: RwLock<StoreState>,
    categories_issued: AtomicU64,
    documents_issued: AtomicU64,
}

impl CatalogStore {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            state: RwLock::new(StoreState::default()),
            categories_issued: AtomicU64::new(0),
            documents_issued: AtomicU64::new(0),
        }
    }

    /// Client used for mutations issued on behalf of the views.
    pub fn api(&self) -> &Arc<dyn CatalogApi> {
        &self.api
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.state.read().await.snapshot.clone()
    }

    /// Re-fetch categories. On failure the last known list is kept.
    pub async fn refresh_categories(&self) -> Result<(), TransportError> {
        let ticket = self.categories_issued.fetch_add(1, Ordering::SeqCst) + 1;

        let categories = self.api.list_categories().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to refresh categories, keeping last known list");
            e
        })?;

        let mut state = self.state.write().await;
        if ticket <= state.categories_applied {
            tracing::debug!(ticket, "Discarding stale category listing");
            return Ok(());
        }
        state.categories_applied = ticket;
        state.snapshot.categories = Arc::new(categories);

        Ok(())
    }

    /// Re-fetch documents. On failure the last known list is kept.
    pub async fn refresh_documents(&self) -> Result<(), TransportError> {
        let ticket = self.documents_issued.fetch_add(1, Ordering::SeqCst) + 1;

        let documents = self.api.list_documents().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to refresh documents, keeping last known list");
            e
        })?;

        let mut state = self.state.write().await;
        if ticket <= state.documents_applied {
            tracing::debug!(ticket, "Discarding stale document listing");
            return Ok(());
        }
        state.documents_applied = ticket;
        state.snapshot.documents = Arc::new(documents);

        Ok(())
    }

    /// Refresh both lists concurrently, as a view does when it mounts.
    ///
    /// Both requests always run to completion; the first failure is returned.
    pub async fn refresh_all(&self) -> Result<(), TransportError> {
        let (categories, documents) =
            futures::join!(self.refresh_categories(), self.refresh_documents());
        categories.and(documents)
    }

    /// Merge a category the service just created.
    ///
    /// Listings initiated before this call predate the category and are
    /// discarded when they land.
    pub async fn record_category(&self, category: Category) {
        let mut state = self.state.write().await;
        state.categories_applied = state
            .categories_applied
            .max(self.categories_issued.load(Ordering::SeqCst));
        if state
            .snapshot
            .categories
            .iter()
            .any(|known| known.id == category.id)
        {
            return;
        }
        Arc::make_mut(&mut state.snapshot.categories).push(category);
    }

    /// Drop documents the service confirmed as deleted.
    ///
    /// Used when the follow-up listing fails, so removed rows do not linger.
    pub async fn forget_documents(&self, ids: &[CatalogId]) {
        let mut state = self.state.write().await;
        let removed: HashSet<&CatalogId> = ids.iter().collect();
        Arc::make_mut(&mut state.snapshot.documents)
            .retain(|document| !removed.contains(&document.id));
    }
}
