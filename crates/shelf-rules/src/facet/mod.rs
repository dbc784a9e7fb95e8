//! Faceted filtering for the sidebar.
//!
//! A flat [`FilterMap`] selects values per dimension and one [`FilterMode`]
//! applies to all of them. Facets are cascading: each dimension's candidates
//! are counted over the books that pass every *other* dimension.
//!
//! ```
//! use shelf_rules::{Book, BookMetadata, FacetEngine, FacetField, FilterMode};
//! use shelf_rules::facet::filter_query;
//!
//! let mut book = Book::new(1);
//! book.metadata = Some(BookMetadata {
//!     authors: vec!["Octavia E. Butler".into()],
//!     ..BookMetadata::default()
//! });
//! let books = vec![book];
//!
//! let filters = filter_query::decode("author:Octavia E. Butler");
//! let engine = FacetEngine::default();
//! assert_eq!(engine.filter(&books, &filters, FilterMode::And).len(), 1);
//!
//! let facets = engine.facets(&books, &filters, FilterMode::And, FacetField::Author);
//! assert_eq!(facets[0].book_count, 1);
//! ```

mod aggregate;
mod field;
mod filter;
pub mod filter_query;
pub mod ranges;

pub use aggregate::{aggregate, Facet};
pub use field::FacetField;
pub use filter::{filter_collection, matches, FilterMap, FilterMode};
pub use ranges::is_file_size_in_range;

use tracing::debug;

use crate::book::Book;
use crate::config::{EngineConfig, DEFAULT_FACET_LIMIT};

/// Filters collections and computes cascading facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetEngine {
    limit: usize,
}

impl Default for FacetEngine {
    fn default() -> Self {
        FacetEngine {
            limit: DEFAULT_FACET_LIMIT,
        }
    }
}

impl FacetEngine {
    pub fn new(config: &EngineConfig) -> Self {
        FacetEngine {
            limit: config.facet_limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Books passing every active dimension.
    pub fn filter<'a>(
        &self,
        books: &'a [Book],
        filters: &FilterMap,
        mode: FilterMode,
    ) -> Vec<&'a Book> {
        filter_collection(books, filters, mode, None)
    }

    /// Candidate values of `field`, counted over the books that pass the
    /// other dimensions.
    pub fn facets(
        &self,
        books: &[Book],
        filters: &FilterMap,
        mode: FilterMode,
        field: FacetField,
    ) -> Vec<Facet> {
        let remaining = filter_collection(books, filters, mode, Some(field.key()));
        let facets = aggregate(&remaining, field, self.limit);
        debug!(%field, books = remaining.len(), facets = facets.len(), "facets computed");
        facets
    }

    /// Cascading facets for every dimension that has at least one value.
    pub fn all_facets(
        &self,
        books: &[Book],
        filters: &FilterMap,
        mode: FilterMode,
    ) -> Vec<(FacetField, Vec<Facet>)> {
        FacetField::ALL
            .into_iter()
            .map(|field| (field, self.facets(books, filters, mode, field)))
            .filter(|(_, facets)| !facets.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{BookMetadata, ReadStatus};

    fn book(id: u64, author: &str, status: ReadStatus, pages: f64) -> Book {
        let mut book = Book::new(id);
        book.read_status = Some(status);
        book.metadata = Some(BookMetadata {
            authors: vec![author.into()],
            page_count: Some(pages),
            ..BookMetadata::default()
        });
        book
    }

    fn library() -> Vec<Book> {
        vec![
            book(1, "Le Guin", ReadStatus::Read, 180.0),
            book(2, "Le Guin", ReadStatus::Unread, 320.0),
            book(3, "Butler", ReadStatus::Read, 250.0),
            book(4, "Banks", ReadStatus::Reading, 40.0),
        ]
    }

    #[test]
    fn facets_exclude_their_own_dimension() {
        let books = library();
        let filters = filter_query::decode("author:Le Guin,readStatus:READ");
        let engine = FacetEngine::default();

        let authors = engine.facets(&books, &filters, FilterMode::And, FacetField::Author);
        assert_eq!(
            authors,
            vec![
                Facet {
                    value: "Butler".into(),
                    book_count: 1
                },
                Facet {
                    value: "Le Guin".into(),
                    book_count: 1
                },
            ]
        );

        let statuses = engine.facets(&books, &filters, FilterMode::And, FacetField::ReadStatus);
        let values: Vec<&str> = statuses.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["UNREAD", "READ"]);
    }

    #[test]
    fn range_facets_use_bucket_order() {
        let books = library();
        let engine = FacetEngine::default();
        let pages = engine.facets(
            &books,
            &FilterMap::new(),
            FilterMode::And,
            FacetField::PageCount,
        );
        let values: Vec<&str> = pages.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["<50", "100-200", "200-400"]);
        assert_eq!(pages[2].book_count, 2);
    }

    #[test]
    fn configured_limit() {
        let engine = FacetEngine::new(&EngineConfig::default().with_facet_limit(1));
        let books = library();
        assert_eq!(
            engine
                .facets(&books, &FilterMap::new(), FilterMode::Or, FacetField::Author)
                .len(),
            1
        );
    }

    #[test]
    fn all_facets_skips_empty_dimensions() {
        let books = library();
        let all = FacetEngine::default().all_facets(&books, &FilterMap::new(), FilterMode::And);
        let dims: Vec<FacetField> = all.iter().map(|(f, _)| *f).collect();
        assert!(dims.contains(&FacetField::Author));
        assert!(dims.contains(&FacetField::ShelfStatus));
        assert!(!dims.contains(&FacetField::Mood));
    }
}
