//! Multi-select removal of documents.
//!
//! The selection survives category filter changes, so documents can be
//! picked across several filtered views before a single batch delete. At
//! most one delete is in flight per workflow; extra submits are ignored.

use crate::error::{ValidationError, WorkflowError};
use crate::filter::{self, CategoryFilter};
use crate::models::{CatalogId, Document};
use crate::services::credentials::resolve_credential;
use crate::services::{CatalogSnapshot, CatalogStore, CredentialPolicy, CredentialProvider};
use crate::AppState;
use secrecy::Secret;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed(Vec<CatalogId>),
    /// Another removal from this workflow was still pending.
    AlreadyInFlight,
}

#[derive(Default)]
struct SelectionState {
    filter: CategoryFilter,
    selected: BTreeSet<CatalogId>,
    credential: Option<Secret<String>>,
}

impl SelectionState {
    fn prune(&mut self, snapshot: &CatalogSnapshot) {
        let known = snapshot.document_ids();
        let before = self.selected.len();
        self.selected.retain(|id| known.contains(id));

        let pruned = before - self.selected.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Dropped selections for documents no longer listed");
        }
    }
}

pub struct RemovalWorkflow {
    store: Arc<CatalogStore>,
    credentials: Arc<dyn CredentialProvider>,
    policy: CredentialPolicy,
    state: Mutex<SelectionState>,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RemovalWorkflow {
    pub fn new(app: &AppState) -> Self {
        Self {
            store: app.store.clone(),
            credentials: app.credentials.clone(),
            policy: app.credential_policy,
            state: Mutex::new(SelectionState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Load categories and documents, then prune stale selections.
    ///
    /// Read failures are logged by the store and leave the last known data.
    pub async fn refresh(&self) {
        let _ = self.store.refresh_all().await;
        let snapshot = self.store.snapshot().await;
        self.state.lock().await.prune(&snapshot);
    }

    /// Flip `id` in the selection; returns whether it is now selected.
    pub async fn toggle(&self, id: CatalogId) -> bool {
        let mut state = self.state.lock().await;
        if state.selected.remove(&id) {
            false
        } else {
            state.selected.insert(id);
            true
        }
    }

    pub async fn set_filter(&self, filter: CategoryFilter) {
        self.state.lock().await.filter = filter;
    }

    pub async fn filter(&self) -> CategoryFilter {
        self.state.lock().await.filter.clone()
    }

    /// Current selection, restricted to documents the store still lists.
    pub async fn selected(&self) -> BTreeSet<CatalogId> {
        let snapshot = self.store.snapshot().await;
        let mut state = self.state.lock().await;
        state.prune(&snapshot);
        state.selected.clone()
    }

    pub async fn set_credential(&self, credential: &str) {
        self.state.lock().await.credential = if credential.trim().is_empty() {
            None
        } else {
            Some(Secret::new(credential.to_string()))
        };
    }

    /// Documents shown under the current filter.
    pub async fn visible(&self) -> Vec<Document> {
        let filter = self.filter().await;
        let snapshot = self.store.snapshot().await;
        filter::filter_by_category(snapshot.documents(), &filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn submit_removal(&self) -> Result<RemovalOutcome, WorkflowError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::warn!("Removal already in flight, ignoring submit");
            return Ok(RemovalOutcome::AlreadyInFlight);
        }
        let _in_flight = InFlight(&self.in_flight);

        // The store may have been refreshed by another view since the last prune.
        let snapshot = self.store.snapshot().await;
        let (ids, credential) = {
            let mut state = self.state.lock().await;
            state.prune(&snapshot);
            let ids: Vec<CatalogId> = state.selected.iter().cloned().collect();
            let credential = resolve_credential(state.credential.as_ref(), &*self.credentials);
            (ids, credential)
        };

        if ids.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }
        if self.policy.is_required() && credential.is_none() {
            tracing::info!("Removal rejected, credential required");
            return Err(ValidationError::MissingCredential.into());
        }

        tracing::info!(count = ids.len(), "Submitting PDF removal");
        self.store
            .api()
            .delete_documents(&ids, credential.as_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, auth_failure = e.is_auth_failure(), "PDF removal failed");
                e
            })?;

        if self.store.refresh_documents().await.is_err() {
            self.store.forget_documents(&ids).await;
        }

        let snapshot = self.store.snapshot().await;
        let mut state = self.state.lock().await;
        for id in &ids {
            state.selected.remove(id);
        }
        state.prune(&snapshot);

        Ok(RemovalOutcome::Removed(ids))
    }
}
