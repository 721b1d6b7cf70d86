pub mod bootstrap;
pub mod removal;
pub mod upload;

pub use bootstrap::{add_category, CategoryOutcome};
pub use removal::{RemovalOutcome, RemovalWorkflow};
pub use upload::{Navigation, SelectedFile, UploadDraft, UploadOutcome, UploadState, UploadWorkflow};
