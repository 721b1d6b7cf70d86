#![allow(dead_code)]

use async_trait::async_trait;
use library_frontend::error::TransportError;
use library_frontend::models::{CatalogId, Category, Document, DownloadedPdf};
use library_frontend::services::{
    CatalogApi, CatalogStore, CreatedCategory, CredentialPolicy, PdfUpload, StaticCredential,
};
use library_frontend::AppState;
use secrecy::{ExposeSecret, Secret};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A call observed by [`FakeCatalog`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListCategories,
    ListDocuments,
    CreateCategory(String),
    Upload {
        file_name: String,
        display_name: String,
        category_id: Option<CatalogId>,
        credential: Option<String>,
    },
    Delete {
        ids: Vec<CatalogId>,
        credential: Option<String>,
    },
    Download(CatalogId),
}

#[derive(Default)]
struct FakeState {
    categories: Vec<Category>,
    documents: Vec<Document>,
    calls: Vec<Call>,
    next_id: i64,
    fail_listing: bool,
    upload_status: Option<u16>,
    delete_status: Option<u16>,
    unresolved_creates: bool,
    category_gates: VecDeque<Arc<Notify>>,
    document_gates: VecDeque<Arc<Notify>>,
    delete_gate: Option<Arc<Notify>>,
}

/// In-memory catalog service that records every call.
pub struct FakeCatalog {
    state: Mutex<FakeState>,
    /// Signalled whenever a held call has started and is waiting.
    pub held: Notify,
}

impl FakeCatalog {
    pub fn new(categories: Vec<Category>, documents: Vec<Document>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                categories,
                documents,
                next_id: 100,
                ..Default::default()
            }),
            held: Notify::new(),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Calls other than listings.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, Call::ListCategories | Call::ListDocuments))
            .collect()
    }

    pub fn documents(&self) -> Vec<Document> {
        self.state.lock().unwrap().documents.clone()
    }

    pub fn set_documents(&self, documents: Vec<Document>) {
        self.state.lock().unwrap().documents = documents;
    }

    pub fn fail_listing(&self, fail: bool) {
        self.state.lock().unwrap().fail_listing = fail;
    }

    pub fn reject_uploads(&self, status: u16) {
        self.state.lock().unwrap().upload_status = Some(status);
    }

    pub fn accept_uploads(&self) {
        self.state.lock().unwrap().upload_status = None;
    }

    pub fn reject_deletes(&self, status: u16) {
        self.state.lock().unwrap().delete_status = Some(status);
    }

    pub fn accept_deletes(&self) {
        self.state.lock().unwrap().delete_status = None;
    }

    /// Accept creates without handing back the record.
    pub fn unresolved_creates(&self) {
        self.state.lock().unwrap().unresolved_creates = true;
    }

    /// Hold the next category listing until the returned gate is notified.
    pub fn hold_next_category_listing(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .category_gates
            .push_back(gate.clone());
        gate
    }

    /// Hold the next document listing until the returned gate is notified.
    pub fn hold_next_document_listing(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .document_gates
            .push_back(gate.clone());
        gate
    }

    /// Hold every delete until the returned gate is notified.
    pub fn hold_deletes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().delete_gate = Some(gate.clone());
        gate
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn next_id(&self) -> CatalogId {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        CatalogId::from(state.next_id)
    }
}

fn rejection(endpoint: &str, status: u16) -> TransportError {
    if status == 401 || status == 403 {
        TransportError::Unauthorized {
            endpoint: endpoint.to_string(),
            status,
        }
    } else {
        TransportError::Status {
            endpoint: endpoint.to_string(),
            status,
            body: "rejected by fake".to_string(),
        }
    }
}

fn exposed(credential: Option<&Secret<String>>) -> Option<String> {
    credential.map(|key| key.expose_secret().clone())
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_categories(&self) -> Result<Vec<Category>, TransportError> {
        self.record(Call::ListCategories);
        let (categories, gate) = {
            let mut state = self.state.lock().unwrap();
            if state.fail_listing {
                return Err(rejection("/api/categories", 500));
            }
            (state.categories.clone(), state.category_gates.pop_front())
        };

        if let Some(gate) = gate {
            self.held.notify_one();
            gate.notified().await;
        }
        Ok(categories)
    }

    async fn list_documents(&self) -> Result<Vec<Document>, TransportError> {
        self.record(Call::ListDocuments);
        let (documents, gate) = {
            let mut state = self.state.lock().unwrap();
            if state.fail_listing {
                return Err(rejection("/api/pdfs", 500));
            }
            (state.documents.clone(), state.document_gates.pop_front())
        };

        if let Some(gate) = gate {
            self.held.notify_one();
            gate.notified().await;
        }
        Ok(documents)
    }

    async fn create_category(&self, name: &str) -> Result<CreatedCategory, TransportError> {
        self.record(Call::CreateCategory(name.to_string()));
        let category = Category {
            id: self.next_id(),
            name: name.to_string(),
        };
        let mut state = self.state.lock().unwrap();
        state.categories.push(category.clone());
        if state.unresolved_creates {
            return Ok(CreatedCategory::Pending {
                name: name.to_string(),
            });
        }
        Ok(CreatedCategory::Record(category))
    }

    async fn upload_document(
        &self,
        upload: PdfUpload,
        credential: Option<&Secret<String>>,
    ) -> Result<Document, TransportError> {
        self.record(Call::Upload {
            file_name: upload.file_name.clone(),
            display_name: upload.display_name.clone(),
            category_id: upload.category_id.clone(),
            credential: exposed(credential),
        });

        if let Some(status) = self.state.lock().unwrap().upload_status {
            return Err(rejection("/api/pdfs", status));
        }

        let document = Document {
            id: self.next_id(),
            name: upload.display_name,
            category_id: upload.category_id.unwrap_or_else(|| CatalogId::from(0)),
        };
        self.state
            .lock()
            .unwrap()
            .documents
            .push(document.clone());
        Ok(document)
    }

    async fn delete_documents(
        &self,
        ids: &[CatalogId],
        credential: Option<&Secret<String>>,
    ) -> Result<(), TransportError> {
        self.record(Call::Delete {
            ids: ids.to_vec(),
            credential: exposed(credential),
        });

        let gate = self.state.lock().unwrap().delete_gate.clone();
        if let Some(gate) = gate {
            self.held.notify_one();
            gate.notified().await;
        }

        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.delete_status {
            return Err(rejection("/api/remove-pdfs", status));
        }
        state.documents.retain(|document| !ids.contains(&document.id));
        Ok(())
    }

    async fn download_document(&self, id: &CatalogId) -> Result<DownloadedPdf, TransportError> {
        self.record(Call::Download(id.clone()));
        Ok(DownloadedPdf {
            file_name: format!("{}.pdf", id),
            bytes: b"%PDF-1.4".to_vec(),
        })
    }
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        id: CatalogId::from(id),
        name: name.to_string(),
    }
}

pub fn document(id: i64, name: &str, category_id: i64) -> Document {
    Document {
        id: CatalogId::from(id),
        name: name.to_string(),
        category_id: CatalogId::from(category_id),
    }
}

pub fn id(value: i64) -> CatalogId {
    CatalogId::from(value)
}

/// Fiction/History catalog used by most scenarios.
pub fn library() -> Arc<FakeCatalog> {
    FakeCatalog::new(
        vec![category(1, "Fiction"), category(2, "History")],
        vec![
            document(10, "A", 1),
            document(11, "B", 2),
            document(12, "C", 1),
        ],
    )
}

pub fn app_state(
    fake: &Arc<FakeCatalog>,
    policy: CredentialPolicy,
    configured_key: Option<&str>,
) -> AppState {
    let api: Arc<dyn CatalogApi> = fake.clone();
    AppState::new(
        Arc::new(CatalogStore::new(api)),
        Arc::new(StaticCredential::new(
            configured_key.map(|key| Secret::new(key.to_string())),
        )),
        policy,
    )
}
