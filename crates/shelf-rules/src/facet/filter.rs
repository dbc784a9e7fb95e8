//! Flat filter maps, as produced by the sidebar.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::book::Book;
use crate::error::RulesError;

use super::field::FacetField;

/// Selected values per dimension key.
pub type FilterMap = BTreeMap<String, Vec<String>>;

/// How selections combine.
///
/// `And` requires every selected value of a dimension and every dimension.
/// `Or` accepts any selected value of any dimension. `Single` looks only at
/// the first selected value of each dimension and requires every dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    And,
    Or,
    Single,
}

impl FilterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::And => "and",
            FilterMode::Or => "or",
            FilterMode::Single => "single",
        }
    }
}

impl FromStr for FilterMode {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "and" => Ok(FilterMode::And),
            "or" => Ok(FilterMode::Or),
            "single" => Ok(FilterMode::Single),
            _ => Err(RulesError::UnknownFilterMode(s.to_string())),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `book` passes one dimension's selection.
///
/// An empty selection passes in `Or` mode and fails otherwise. Unknown
/// dimension keys never pass.
pub fn matches(book: &Book, key: &str, selected: &[String], mode: FilterMode) -> bool {
    let Some(field) = FacetField::parse(key) else {
        debug!(key, "unknown facet dimension matches nothing");
        return false;
    };
    if selected.is_empty() {
        return mode == FilterMode::Or;
    }
    match mode {
        FilterMode::And => selected.iter().all(|v| field.matches_value(book, v)),
        FilterMode::Or => selected.iter().any(|v| field.matches_value(book, v)),
        FilterMode::Single => field.matches_value(book, &selected[0]),
    }
}

/// Applies a filter map to a collection, preserving order.
///
/// `exclude` names a dimension to leave out, which is how a facet computes
/// its own candidates without filtering on itself. A map with no remaining
/// dimensions returns every book.
pub fn filter_collection<'a>(
    books: &'a [Book],
    filters: &FilterMap,
    mode: FilterMode,
    exclude: Option<&str>,
) -> Vec<&'a Book> {
    let excluded = exclude.map(|key| (key, FacetField::parse(key)));
    let active: Vec<(&str, &[String])> = filters
        .iter()
        .filter(|(key, _)| match excluded {
            Some((name, Some(field))) => {
                FacetField::parse(key) != Some(field) && key.as_str() != name
            }
            Some((name, None)) => key.as_str() != name,
            None => true,
        })
        .map(|(key, values)| (key.as_str(), values.as_slice()))
        .collect();

    if active.is_empty() {
        return books.iter().collect();
    }

    books
        .iter()
        .filter(|book| {
            let mut dimensions = active
                .iter()
                .map(|(key, values)| matches(book, key, values, mode));
            match mode {
                FilterMode::Or => dimensions.any(|m| m),
                FilterMode::And | FilterMode::Single => dimensions.all(|m| m),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{BookMetadata, ReadStatus};

    fn book(id: u64, authors: &[&str], status: ReadStatus) -> Book {
        let mut book = Book::new(id);
        book.read_status = Some(status);
        book.metadata = Some(BookMetadata {
            authors: authors.iter().map(|a| a.to_string()).collect(),
            ..BookMetadata::default()
        });
        book
    }

    fn shelf() -> Vec<Book> {
        vec![
            book(1, &["Le Guin", "Delany"], ReadStatus::Read),
            book(2, &["Le Guin"], ReadStatus::Unread),
            book(3, &["Butler"], ReadStatus::Read),
        ]
    }

    fn filters(entries: &[(&str, &[&str])]) -> FilterMap {
        entries
            .iter()
            .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    fn ids(books: Vec<&Book>) -> Vec<u64> {
        books.iter().map(|b| b.id).collect()
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("OR".parse::<FilterMode>().unwrap(), FilterMode::Or);
        assert_eq!("single".parse::<FilterMode>().unwrap(), FilterMode::Single);
        assert!(matches!(
            "xor".parse::<FilterMode>(),
            Err(RulesError::UnknownFilterMode(m)) if m == "xor"
        ));
    }

    #[test]
    fn per_dimension_modes() {
        let books = shelf();
        let both = vec!["Le Guin".to_string(), "Delany".to_string()];
        assert!(matches(&books[0], "author", &both, FilterMode::And));
        assert!(!matches(&books[1], "author", &both, FilterMode::And));
        assert!(matches(&books[1], "author", &both, FilterMode::Or));
        assert!(matches(&books[1], "author", &both, FilterMode::Single));
        assert!(!matches(&books[0], "colour", &both, FilterMode::Or));
    }

    #[test]
    fn empty_selection() {
        let books = shelf();
        assert!(matches(&books[0], "author", &[], FilterMode::Or));
        assert!(!matches(&books[0], "author", &[], FilterMode::And));
        assert!(!matches(&books[0], "author", &[], FilterMode::Single));
    }

    #[test]
    fn combines_dimensions() {
        let books = shelf();
        let map = filters(&[("author", &["Le Guin"]), ("readStatus", &["READ"])]);
        assert_eq!(ids(filter_collection(&books, &map, FilterMode::And, None)), vec![1]);
        assert_eq!(ids(filter_collection(&books, &map, FilterMode::Or, None)), vec![1, 2, 3]);
        assert_eq!(ids(filter_collection(&books, &map, FilterMode::Single, None)), vec![1]);
    }

    #[test]
    fn excluding_a_dimension() {
        let books = shelf();
        let map = filters(&[("author", &["Le Guin"]), ("readStatus", &["READ"])]);
        assert_eq!(
            ids(filter_collection(&books, &map, FilterMode::And, Some("author"))),
            vec![1, 3]
        );
        assert_eq!(
            ids(filter_collection(&books, &map, FilterMode::And, Some("AUTHOR"))),
            vec![1, 3]
        );
        let only_author = filters(&[("author", &["Le Guin"])]);
        assert_eq!(
            ids(filter_collection(&books, &only_author, FilterMode::And, Some("author"))),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn unknown_dimension_filters_everything_out() {
        let books = shelf();
        let map = filters(&[("colour", &["teal"])]);
        assert!(filter_collection(&books, &map, FilterMode::And, None).is_empty());
    }
}
