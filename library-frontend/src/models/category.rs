use super::CatalogId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CatalogId,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateCategoryRequest<'a> {
    pub name: &'a str,
}
