//! Pure selection logic behind the catalog and removal views.

use crate::models::{CatalogId, Category, Document, IdParseError};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Category filter as chosen in a selection control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(CatalogId),
}

impl FromStr for CategoryFilter {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        CatalogId::parse(value).map(CategoryFilter::Category)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Category(id) => write!(f, "{}", id),
        }
    }
}

/// One non-empty section of the catalog view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: &'a Category,
    pub documents: Vec<&'a Document>,
}

/// Group documents under their categories, in the service's category order.
///
/// Categories without documents are omitted, as are documents whose category
/// is unknown (deleted, or not loaded yet).
pub fn group_by_category<'a>(
    categories: &'a [Category],
    documents: &'a [Document],
) -> Vec<CategoryGroup<'a>> {
    let mut by_category: HashMap<&CatalogId, Vec<&Document>> = HashMap::new();
    for document in documents {
        by_category
            .entry(&document.category_id)
            .or_default()
            .push(document);
    }

    categories
        .iter()
        .filter_map(|category| {
            let documents = by_category.remove(&category.id)?;
            Some(CategoryGroup {
                category,
                documents,
            })
        })
        .collect()
}

/// Documents visible under `filter`.
pub fn filter_by_category<'a>(
    documents: &'a [Document],
    filter: &CategoryFilter,
) -> Vec<&'a Document> {
    match filter {
        CategoryFilter::All => documents.iter().collect(),
        CategoryFilter::Category(id) => documents
            .iter()
            .filter(|document| &document.category_id == id)
            .collect(),
    }
}

/// Documents that reference no known category.
pub fn orphaned_documents<'a>(
    categories: &[Category],
    documents: &'a [Document],
) -> Vec<&'a Document> {
    documents
        .iter()
        .filter(|document| {
            !categories
                .iter()
                .any(|category| category.id == document.category_id)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id: CatalogId::from(id),
            name: name.to_string(),
        }
    }

    fn document(id: i64, name: &str, category_id: i64) -> Document {
        Document {
            id: CatalogId::from(id),
            name: name.to_string(),
            category_id: CatalogId::from(category_id),
        }
    }

    fn sample_documents() -> Vec<Document> {
        vec![
            document(10, "A", 1),
            document(11, "B", 2),
            document(12, "C", 1),
            document(13, "Orphan", 9),
        ]
    }

    #[test]
    fn test_empty_categories_are_omitted() {
        let categories = vec![category(1, "Fiction"), category(2, "History")];
        let documents = vec![document(10, "A", 1)];

        let groups = group_by_category(&categories, &documents);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category.name, "Fiction");
        assert_eq!(groups[0].documents.len(), 1);
    }

    #[test]
    fn test_grouping_covers_exactly_known_categories() {
        let category_sets = vec![
            vec![],
            vec![category(1, "Fiction")],
            vec![category(2, "History"), category(1, "Fiction")],
            vec![category(3, "Poetry"), category(2, "History")],
        ];
        let documents = sample_documents();

        for categories in &category_sets {
            let groups = group_by_category(categories, &documents);
            assert!(groups.iter().all(|group| !group.documents.is_empty()));

            let mut grouped: Vec<&CatalogId> = groups
                .iter()
                .flat_map(|group| group.documents.iter().map(|d| &d.id))
                .collect();
            grouped.sort();

            let mut expected: Vec<&CatalogId> = documents
                .iter()
                .filter(|d| categories.iter().any(|c| c.id == d.category_id))
                .map(|d| &d.id)
                .collect();
            expected.sort();

            assert_eq!(grouped, expected);
        }
    }

    #[test]
    fn test_grouping_preserves_category_order() {
        let categories = vec![category(2, "History"), category(1, "Fiction")];
        let documents = sample_documents();

        let names: Vec<&str> = group_by_category(&categories, &documents)
            .iter()
            .map(|group| group.category.name.as_str())
            .collect();
        assert_eq!(names, vec!["History", "Fiction"]);
    }

    #[test]
    fn test_all_filter_is_identity() {
        let documents = sample_documents();
        let visible: Vec<Document> = filter_by_category(&documents, &CategoryFilter::All)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(visible, documents);

        assert!(filter_by_category(&[], &CategoryFilter::All).is_empty());
    }

    #[test]
    fn test_string_and_numeric_selection_agree() {
        let documents = sample_documents();
        let from_ui: CategoryFilter = "1".parse().unwrap();
        let numeric = CategoryFilter::Category(CatalogId::from(1));

        let by_string = filter_by_category(&documents, &from_ui);
        let by_number = filter_by_category(&documents, &numeric);
        assert_eq!(by_string, by_number);
        assert_eq!(by_string.len(), 2);
        assert!(by_string
            .iter()
            .all(|d| d.category_id == CatalogId::from(1)));
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(" ALL ".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "3".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Category(CatalogId::from(3)))
        );
        assert_eq!(CategoryFilter::Category(CatalogId::from(3)).to_string(), "3");
    }

    #[test]
    fn test_orphaned_documents() {
        let categories = vec![category(1, "Fiction"), category(2, "History")];
        let documents = sample_documents();

        let orphans = orphaned_documents(&categories, &documents);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].name, "Orphan");
    }
}
