use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to the catalog service.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service rejected a missing or invalid `x-api-key`.
    #[error("Catalog service rejected the credential for {endpoint} ({status})")]
    Unauthorized { endpoint: String, status: u16 },

    #[error("Catalog service returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl TransportError {
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, TransportError::Unauthorized { .. })
    }

    /// Message suitable for showing next to the form that triggered the call.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Network { .. } => {
                "Could not reach the catalog service. Please try again.".to_string()
            }
            TransportError::Unauthorized { .. } => {
                "The API key was rejected. Enter a valid API key and try again.".to_string()
            }
            TransportError::Status { status, .. } => format!(
                "The catalog service could not complete the request (status {}).",
                status
            ),
            TransportError::Decode { .. } => {
                "The catalog service returned an unexpected response.".to_string()
            }
        }
    }
}

/// Local rejection raised before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a file to upload.")]
    MissingFile,

    #[error("Please enter the API key.")]
    MissingCredential,

    #[error("Select at least one PDF to remove.")]
    EmptySelection,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to read {path}: {source}")]
    LocalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WorkflowError {
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Validation(err) => err.to_string(),
            WorkflowError::Transport(err) => err.user_message(),
            WorkflowError::LocalFile { path, .. } => {
                format!("Could not read {}.", path.display())
            }
        }
    }
}
