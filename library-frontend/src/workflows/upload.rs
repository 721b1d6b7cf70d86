//! Upload form state machine.
//!
//! `Idle -> Validating -> Submitting -> {Succeeded, Failed}`; a rejected
//! validation drops back to `Idle` without any network call.

use crate::error::{ValidationError, WorkflowError};
use crate::models::{CatalogId, Category, Document};
use crate::services::credentials::resolve_credential;
use crate::services::{CatalogStore, CredentialPolicy, CredentialProvider, PdfUpload};
use crate::workflows::bootstrap::{self, CategoryOutcome};
use crate::AppState;
use secrecy::Secret;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Where the user should be taken after a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    CatalogRoot,
}

#[derive(Debug, Clone)]
pub struct SelectedFile {
    file_name: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, WorkflowError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| WorkflowError::LocalFile {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());

        Ok(Self::new(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

#[derive(Default)]
pub struct UploadDraft {
    file: Option<SelectedFile>,
    display_name: String,
    category_id: Option<CatalogId>,
    credential: Option<Secret<String>>,
}

impl UploadDraft {
    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn category_id(&self) -> Option<&CatalogId> {
        self.category_id.as_ref()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub document: Document,
    pub navigate_to: Navigation,
}

pub struct UploadWorkflow {
    store: Arc<CatalogStore>,
    credentials: Arc<dyn CredentialProvider>,
    policy: CredentialPolicy,
    draft: UploadDraft,
    state: UploadState,
    categories: Vec<Category>,
    message: Option<String>,
}

impl UploadWorkflow {
    pub fn new(app: &AppState) -> Self {
        Self {
            store: app.store.clone(),
            credentials: app.credentials.clone(),
            policy: app.credential_policy,
            draft: UploadDraft::default(),
            state: UploadState::Idle,
            categories: Vec::new(),
            message: None,
        }
    }

    /// Load the category choices once when the form is opened.
    ///
    /// A failed fetch leaves the last known list (empty on first load); file
    /// selection is unaffected.
    pub async fn enter(&mut self) {
        let _ = self.store.refresh_categories().await;
        self.categories = self.store.snapshot().await.categories().to_vec();
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn draft(&self) -> &UploadDraft {
        &self.draft
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Message to show next to the form, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.draft.file = Some(file);
    }

    pub async fn select_file_from_path(&mut self, path: &Path) -> Result<(), WorkflowError> {
        let file = SelectedFile::from_path(path).await?;
        self.select_file(file);
        Ok(())
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.draft.display_name = display_name.into();
    }

    pub fn select_category(&mut self, category_id: Option<CatalogId>) {
        self.draft.category_id = category_id;
    }

    pub fn set_credential(&mut self, credential: &str) {
        self.draft.credential = if credential.trim().is_empty() {
            None
        } else {
            Some(Secret::new(credential.to_string()))
        };
    }

    /// Create a category from the form and pre-select it.
    pub async fn add_category(&mut self, name: &str) -> Result<CategoryOutcome, WorkflowError> {
        let outcome = match bootstrap::add_category(&self.store, name).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.message = Some(e.user_message());
                return Err(e.into());
            }
        };

        match &outcome {
            CategoryOutcome::Created(category) => {
                if !self.categories.iter().any(|known| known.id == category.id) {
                    self.categories.push(category.clone());
                }
                self.draft.category_id = Some(category.id.clone());
            }
            CategoryOutcome::Pending { name } => {
                self.message = Some(format!(
                    "Category '{}' was created but could not be loaded yet. Refresh to select it.",
                    name
                ));
            }
            CategoryOutcome::Skipped => {}
        }

        Ok(outcome)
    }

    pub async fn submit(&mut self) -> Result<UploadOutcome, WorkflowError> {
        self.state = UploadState::Validating;

        let credential = match self.validate() {
            Ok(credential) => credential,
            Err(e) => {
                tracing::info!(reason = %e, "Upload rejected before submission");
                self.state = UploadState::Idle;
                self.message = Some(e.to_string());
                return Err(e.into());
            }
        };

        self.state = UploadState::Submitting;
        self.message = None;

        // The selected file is released whatever the outcome.
        let Some(file) = self.draft.file.take() else {
            self.state = UploadState::Idle;
            return Err(ValidationError::MissingFile.into());
        };
        let display_name = if self.draft.display_name.trim().is_empty() {
            file.file_name.clone()
        } else {
            self.draft.display_name.trim().to_string()
        };
        let upload = PdfUpload {
            file_name: file.file_name,
            bytes: file.bytes,
            display_name,
            category_id: self.draft.category_id.clone(),
        };

        tracing::info!(
            file_name = %upload.file_name,
            display_name = %upload.display_name,
            size = upload.bytes.len(),
            "Submitting PDF upload"
        );

        match self
            .store
            .api()
            .upload_document(upload, credential.as_ref())
            .await
        {
            Ok(document) => {
                self.state = UploadState::Succeeded;
                self.message = Some(format!("Uploaded {}", document.name));
                Ok(UploadOutcome {
                    document,
                    navigate_to: Navigation::CatalogRoot,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, auth_failure = e.is_auth_failure(), "PDF upload failed");
                self.state = UploadState::Failed;
                self.message = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    fn validate(&self) -> Result<Option<Secret<String>>, ValidationError> {
        if self.draft.file.is_none() {
            return Err(ValidationError::MissingFile);
        }

        let credential = resolve_credential(self.draft.credential.as_ref(), &*self.credentials);
        if self.policy.is_required() && credential.is_none() {
            return Err(ValidationError::MissingCredential);
        }

        Ok(credential)
    }
}
