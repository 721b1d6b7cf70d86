use super::CatalogId;
use serde::{Deserialize, Serialize};

/// A PDF record as listed by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: CatalogId,
    pub name: String,
    pub category_id: CatalogId,
}

#[derive(Debug, Serialize)]
pub struct RemovePdfsRequest<'a> {
    #[serde(rename = "pdfIds")]
    pub pdf_ids: &'a [CatalogId],
}

/// PDF content fetched from `GET /api/pdfs/{id}`.
#[derive(Debug, Clone)]
pub struct DownloadedPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
