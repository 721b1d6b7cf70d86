//! Source of the shared secret sent as `x-api-key` on mutating calls.
//!
//! Workflows only see [`CredentialProvider`], so a real authentication
//! mechanism can replace [`StaticCredential`] without touching them.

use secrecy::{ExposeSecret, Secret};

pub trait CredentialProvider: Send + Sync {
    /// The credential configured for this deployment, if any.
    fn credential(&self) -> Option<Secret<String>>;
}

/// Deployment-wide key from configuration or the command line.
pub struct StaticCredential {
    api_key: Option<Secret<String>>,
}

impl StaticCredential {
    pub fn new(api_key: Option<Secret<String>>) -> Self {
        Self { api_key }
    }

    pub fn none() -> Self {
        Self { api_key: None }
    }
}

impl CredentialProvider for StaticCredential {
    fn credential(&self) -> Option<Secret<String>> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .map(|key| Secret::new(key.expose_secret().clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialPolicy {
    /// Mutations are rejected locally when no credential is available.
    Required,
    /// The header is sent only when a credential happens to be available.
    Optional,
}

impl CredentialPolicy {
    pub fn is_required(self) -> bool {
        self == CredentialPolicy::Required
    }
}

/// Pick the credential for one mutating call.
///
/// A key typed into the form wins over the deployment-wide one.
pub fn resolve_credential(
    entered: Option<&Secret<String>>,
    provider: &dyn CredentialProvider,
) -> Option<Secret<String>> {
    match entered {
        Some(key) if !key.expose_secret().trim().is_empty() => {
            Some(Secret::new(key.expose_secret().trim().to_string()))
        }
        _ => provider.credential(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entered_key_wins() {
        let provider = StaticCredential::new(Some(Secret::new("configured".to_string())));
        let entered = Secret::new(" typed ".to_string());

        let resolved = resolve_credential(Some(&entered), &provider).unwrap();
        assert_eq!(resolved.expose_secret(), "typed");
    }

    #[test]
    fn test_blank_entry_falls_back_to_provider() {
        let provider = StaticCredential::new(Some(Secret::new("configured".to_string())));
        let entered = Secret::new("   ".to_string());

        let resolved = resolve_credential(Some(&entered), &provider).unwrap();
        assert_eq!(resolved.expose_secret(), "configured");
    }

    #[test]
    fn test_blank_configured_key_counts_as_absent() {
        let provider = StaticCredential::new(Some(Secret::new(String::new())));
        assert!(resolve_credential(None, &provider).is_none());
        assert!(resolve_credential(None, &StaticCredential::none()).is_none());
    }
}
