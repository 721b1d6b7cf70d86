pub mod category;
pub mod document;
pub mod id;

pub use category::{Category, CreateCategoryRequest};
pub use document::{Document, DownloadedPdf, RemovePdfsRequest};
pub use id::{CatalogId, IdParseError};
