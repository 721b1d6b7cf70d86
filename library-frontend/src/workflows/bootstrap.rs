use crate::error::TransportError;
use crate::models::Category;
use crate::services::{CatalogStore, CreatedCategory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    /// Blank or already known; no request was made.
    Skipped,
    Created(Category),
    /// The service accepted the category but its record is not known yet;
    /// it appears with the next category refresh.
    Pending { name: String },
}

impl CategoryOutcome {
    pub fn category(&self) -> Option<&Category> {
        match self {
            CategoryOutcome::Created(category) => Some(category),
            _ => None,
        }
    }
}

/// Create a category on demand and merge it into the store.
///
/// Returns [`CategoryOutcome::Skipped`] without touching the network when the
/// trimmed name is blank or exactly matches a known category name. The
/// service still owns uniqueness; this only spares an obvious duplicate.
pub async fn add_category(
    store: &CatalogStore,
    name: &str,
) -> Result<CategoryOutcome, TransportError> {
    let name = name.trim();
    if name.is_empty() {
        tracing::debug!("Ignoring blank category name");
        return Ok(CategoryOutcome::Skipped);
    }

    if store.snapshot().await.has_category_named(name) {
        tracing::debug!(name = %name, "Category already exists, not creating");
        return Ok(CategoryOutcome::Skipped);
    }

    let created = store.api().create_category(name).await.map_err(|e| {
        tracing::error!(name = %name, error = %e, "Failed to create category");
        e
    })?;

    match created {
        CreatedCategory::Record(category) => {
            store.record_category(category.clone()).await;
            Ok(CategoryOutcome::Created(category))
        }
        CreatedCategory::Pending { name } => Ok(CategoryOutcome::Pending { name }),
    }
}
