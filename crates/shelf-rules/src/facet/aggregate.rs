//! Facet counting.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::book::Book;

use super::field::FacetField;

/// One candidate value of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facet {
    pub value: String,
    pub book_count: usize,
}

/// Counts the values of `field` over `books`.
///
/// Each book counts once per distinct value. Dimensions with an intrinsic
/// order (read status, range buckets) sort by it; the rest sort by count,
/// highest first, then by name ignoring case. At most `limit` facets are
/// returned.
pub fn aggregate(books: &[&Book], field: FacetField, limit: usize) -> Vec<Facet> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for book in books {
        let distinct: BTreeSet<String> = field.values(book).into_iter().collect();
        for value in distinct {
            *counts.entry(value).or_default() += 1;
        }
    }

    let mut facets: Vec<Facet> = counts
        .into_iter()
        .map(|(value, book_count)| Facet { value, book_count })
        .collect();
    facets.sort_by(|a, b| compare(field, a, b));
    facets.truncate(limit);
    facets
}

fn compare(field: FacetField, a: &Facet, b: &Facet) -> Ordering {
    let rank = |facet: &Facet| field.sort_index(&facet.value).unwrap_or(usize::MAX);
    rank(a)
        .cmp(&rank(b))
        .then_with(|| b.book_count.cmp(&a.book_count))
        .then_with(|| a.value.to_lowercase().cmp(&b.value.to_lowercase()))
        .then_with(|| a.value.cmp(&b.value))
}
