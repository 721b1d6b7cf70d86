//! Typed client for the catalog service REST API.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/categories` | List categories |
//! | POST   | `/api/categories` | Create category |
//! | GET    | `/api/pdfs` | List documents |
//! | POST   | `/api/pdfs` | Upload document (multipart, optional `x-api-key`) |
//! | GET    | `/api/pdfs/{id}` | Download document |
//! | POST   | `/api/remove-pdfs` | Batch delete (optional `x-api-key`) |
//!
//! No call is retried; every failure is reported once to the caller.

use crate::config::CatalogSettings;
use crate::error::TransportError;
use crate::models::{
    CatalogId, Category, CreateCategoryRequest, Document, DownloadedPdf, RemovePdfsRequest,
};
use async_trait::async_trait;
use library_core::observability::TracedClientExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

pub const API_KEY_HEADER: &str = "x-api-key";

const CATEGORIES_PATH: &str = "/api/categories";
const PDFS_PATH: &str = "/api/pdfs";
const REMOVE_PDFS_PATH: &str = "/api/remove-pdfs";

/// The service stores an empty `category_id` form field as `0`.
const UNSET_CATEGORY_ID: i64 = 0;

/// A PDF ready to be posted to `/api/pdfs`.
#[derive(Debug, Clone)]
pub struct PdfUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub display_name: String,
    pub category_id: Option<CatalogId>,
}

/// A category the service accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatedCategory {
    /// Returned by the service or read back from the listing.
    Record(Category),
    /// Accepted, but the record could not be read back yet.
    Pending { name: String },
}

/// Operations the workflows need from the catalog service.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, TransportError>;

    async fn list_documents(&self) -> Result<Vec<Document>, TransportError>;

    /// Create a category. A `2xx` always yields `Ok`, even when the created
    /// record cannot be read back.
    async fn create_category(&self, name: &str) -> Result<CreatedCategory, TransportError>;

    async fn upload_document(
        &self,
        upload: PdfUpload,
        credential: Option<&Secret<String>>,
    ) -> Result<Document, TransportError>;

    async fn delete_documents(
        &self,
        ids: &[CatalogId],
        credential: Option<&Secret<String>>,
    ) -> Result<(), TransportError>;

    async fn download_document(&self, id: &CatalogId) -> Result<DownloadedPdf, TransportError>;
}

pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpCatalogClient {
    pub fn new(settings: &CatalogSettings) -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::Network {
                endpoint: "client_init".to_string(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<Response, TransportError> {
        let response = self
            .client
            .traced_get(&self.url(path))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| network_error(path, e))?;

        check_status(path, response).await
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn list_categories(&self) -> Result<Vec<Category>, TransportError> {
        let response = self.get(CATEGORIES_PATH).await?;
        let categories: Vec<Category> = response
            .json()
            .await
            .map_err(|e| decode_error(CATEGORIES_PATH, e))?;

        tracing::debug!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    async fn list_documents(&self) -> Result<Vec<Document>, TransportError> {
        let response = self.get(PDFS_PATH).await?;
        // An empty table is encoded as `null` rather than `[]`.
        let documents: Option<Vec<Document>> = response
            .json()
            .await
            .map_err(|e| decode_error(PDFS_PATH, e))?;
        let documents = documents.unwrap_or_default();

        tracing::debug!(count = documents.len(), "Listed documents");
        Ok(documents)
    }

    async fn create_category(&self, name: &str) -> Result<CreatedCategory, TransportError> {
        let response = self
            .client
            .traced_post(&self.url(CATEGORIES_PATH))
            .timeout(self.timeout)
            .json(&CreateCategoryRequest { name })
            .send()
            .await
            .map_err(|e| network_error(CATEGORIES_PATH, e))?;
        let body = check_status(CATEGORIES_PATH, response)
            .await?
            .text()
            .await
            .map_err(|e| decode_error(CATEGORIES_PATH, e))?;

        if let Ok(category) = serde_json::from_str::<Category>(&body) {
            tracing::info!(category_id = %category.id, name = %category.name, "Category created");
            return Ok(CreatedCategory::Record(category));
        }

        // Plain-text acknowledgement: the category exists, read it back by name.
        tracing::debug!(name = %name, "Create category returned no record, re-listing");
        let listed = match self.list_categories().await {
            Ok(categories) => categories
                .into_iter()
                .rev()
                .find(|category| category.name == name),
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Category created but read-back failed");
                None
            }
        };

        match listed {
            Some(category) => {
                tracing::info!(category_id = %category.id, name = %category.name, "Category created");
                Ok(CreatedCategory::Record(category))
            }
            None => {
                tracing::warn!(name = %name, "Category created, record not resolved");
                Ok(CreatedCategory::Pending {
                    name: name.to_string(),
                })
            }
        }
    }

    async fn upload_document(
        &self,
        upload: PdfUpload,
        credential: Option<&Secret<String>>,
    ) -> Result<Document, TransportError> {
        let size = upload.bytes.len();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str("application/pdf")
            .map_err(|e| network_error(PDFS_PATH, e))?;
        let form = Form::new()
            .part("pdf", part)
            .text("display_name", upload.display_name.clone())
            .text(
                "category_id",
                upload
                    .category_id
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            );

        let response = self
            .client
            .traced_post(&self.url(PDFS_PATH))
            .timeout(self.timeout)
            .optional_header(API_KEY_HEADER, credential.map(|key| key.expose_secret().as_str()))
            .multipart(form)
            .send()
            .await
            .map_err(|e| network_error(PDFS_PATH, e))?;
        let body = check_status(PDFS_PATH, response)
            .await?
            .text()
            .await
            .map_err(|e| decode_error(PDFS_PATH, e))?;

        if let Ok(document) = serde_json::from_str::<Document>(&body) {
            tracing::info!(document_id = %document.id, size, "PDF uploaded");
            return Ok(document);
        }

        let id = parse_created_id(&body).ok_or_else(|| TransportError::Decode {
            endpoint: PDFS_PATH.to_string(),
            message: format!("no document id in response: {}", body),
        })?;

        // The upload is stored at this point; the listing only refines the record.
        let listed = match self.list_documents().await {
            Ok(documents) => documents.into_iter().find(|document| document.id == id),
            Err(e) => {
                tracing::warn!(document_id = %id, error = %e, "PDF uploaded but read-back failed");
                None
            }
        };
        let document = listed.unwrap_or_else(|| Document {
            id,
            name: upload.display_name,
            category_id: upload
                .category_id
                .unwrap_or_else(|| CatalogId::from(UNSET_CATEGORY_ID)),
        });

        tracing::info!(document_id = %document.id, size, "PDF uploaded");
        Ok(document)
    }

    async fn delete_documents(
        &self,
        ids: &[CatalogId],
        credential: Option<&Secret<String>>,
    ) -> Result<(), TransportError> {
        let response = self
            .client
            .traced_post(&self.url(REMOVE_PDFS_PATH))
            .timeout(self.timeout)
            .optional_header(API_KEY_HEADER, credential.map(|key| key.expose_secret().as_str()))
            .json(&RemovePdfsRequest { pdf_ids: ids })
            .send()
            .await
            .map_err(|e| network_error(REMOVE_PDFS_PATH, e))?;
        check_status(REMOVE_PDFS_PATH, response).await?;

        tracing::info!(count = ids.len(), "PDFs removed");
        Ok(())
    }

    async fn download_document(&self, id: &CatalogId) -> Result<DownloadedPdf, TransportError> {
        let path = format!("{}/{}", PDFS_PATH, id);
        let response = self.get(&path).await?;

        let file_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_file_name)
            .unwrap_or_else(|| format!("{}.pdf", id));
        let bytes = response
            .bytes()
            .await
            .map_err(|e| decode_error(&path, e))?
            .to_vec();

        tracing::info!(document_id = %id, size = bytes.len(), "PDF downloaded");
        Ok(DownloadedPdf { file_name, bytes })
    }
}

async fn check_status(endpoint: &str, response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::warn!(endpoint = %endpoint, status = %status, "Catalog service rejected credential");
        return Err(TransportError::Unauthorized {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::error!(endpoint = %endpoint, status = %status, body = %body.trim(), "Catalog request failed");

    Err(TransportError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}

fn network_error(endpoint: &str, source: reqwest::Error) -> TransportError {
    tracing::error!(endpoint = %endpoint, error = %source, "Failed to reach catalog service");
    TransportError::Network {
        endpoint: endpoint.to_string(),
        source,
    }
}

fn decode_error(endpoint: &str, source: reqwest::Error) -> TransportError {
    tracing::error!(endpoint = %endpoint, error = %source, "Failed to decode catalog response");
    TransportError::Decode {
        endpoint: endpoint.to_string(),
        message: source.to_string(),
    }
}

/// Extract the id from an acknowledgement such as
/// `"PDF uploaded and recorded successfully with ID: 42"`.
fn parse_created_id(body: &str) -> Option<CatalogId> {
    let (_, tail) = body.rsplit_once("ID:")?;
    CatalogId::parse(tail).ok()
}

/// File name from a `Content-Disposition: attachment; filename="..."` value.
fn attachment_file_name(header: &str) -> Option<String> {
    header.split(';').find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}
