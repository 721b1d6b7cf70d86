//! Catalog synchronization and mutation workflows for the PDF library.
//!
//! ```text
//!  UploadWorkflow ─┐
//! RemovalWorkflow ─┼─▶ CatalogStore ─▶ CatalogApi ─▶ catalog service
//! add_category ────┘        │
//!                           ▼
//!                     filter (pure)
//! ```
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod services;
pub mod workflows;

use services::{CatalogStore, CredentialPolicy, CredentialProvider};
use std::sync::Arc;

/// Shared state handed to every view and workflow.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub credentials: Arc<dyn CredentialProvider>,
    pub credential_policy: CredentialPolicy,
}

impl AppState {
    pub fn new(
        store: Arc<CatalogStore>,
        credentials: Arc<dyn CredentialProvider>,
        credential_policy: CredentialPolicy,
    ) -> Self {
        Self {
            store,
            credentials,
            credential_policy,
        }
    }
}
