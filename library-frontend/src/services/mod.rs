pub mod catalog_client;
pub mod credentials;
pub mod store;

pub use catalog_client::{CatalogApi, CreatedCategory, HttpCatalogClient, PdfUpload};
pub use credentials::{CredentialPolicy, CredentialProvider, StaticCredential};
pub use store::{CatalogSnapshot, CatalogStore};
