//! Composite fields evaluated over every book of a series.
//!
//! `seriesStatus`, `seriesGaps` and `seriesPosition` cannot be answered from
//! one record: they look at all books sharing the record's series name
//! (exact, case-sensitive match). A record without a series name, or without
//! the number a predicate needs, never matches.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::book::{Book, ReadStatus};
use crate::field::Field;

/// Values of the `seriesStatus` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesStatus {
    /// Some book of the series is being read or re-read.
    Reading,
    /// No book of the series has been started.
    NotStarted,
    /// Every book of the series is read.
    FullyRead,
    /// The book numbered like the declared series total is present.
    Completed,
    /// A series total is declared but its final book is absent.
    Ongoing,
}

impl SeriesStatus {
    pub fn parse(name: &str) -> Option<SeriesStatus> {
        match name {
            "reading" => Some(SeriesStatus::Reading),
            "not_started" => Some(SeriesStatus::NotStarted),
            "fully_read" => Some(SeriesStatus::FullyRead),
            "completed" => Some(SeriesStatus::Completed),
            "ongoing" => Some(SeriesStatus::Ongoing),
            _ => None,
        }
    }
}

/// Values of the `seriesGaps` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesGap {
    AnyGap,
    MissingFirst,
    MissingLatest,
    DuplicateNumber,
}

impl SeriesGap {
    pub fn parse(name: &str) -> Option<SeriesGap> {
        match name {
            "any_gap" => Some(SeriesGap::AnyGap),
            "missing_first" => Some(SeriesGap::MissingFirst),
            "missing_latest" => Some(SeriesGap::MissingLatest),
            "duplicate_number" => Some(SeriesGap::DuplicateNumber),
            _ => None,
        }
    }
}

/// Values of the `seriesPosition` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesPosition {
    FirstInSeries,
    LastInSeries,
    /// The earliest unread book after at least one read one.
    NextUnread,
}

impl SeriesPosition {
    pub fn parse(name: &str) -> Option<SeriesPosition> {
        match name {
            "first_in_series" => Some(SeriesPosition::FirstInSeries),
            "last_in_series" => Some(SeriesPosition::LastInSeries),
            "next_unread" => Some(SeriesPosition::NextUnread),
            _ => None,
        }
    }
}

/// Books grouped by exact series name, built once per collection.
#[derive(Debug, Default)]
pub struct SeriesIndex<'a> {
    groups: HashMap<&'a str, Vec<&'a Book>>,
}

impl<'a> SeriesIndex<'a> {
    pub fn new(books: &'a [Book]) -> Self {
        let mut groups: HashMap<&'a str, Vec<&'a Book>> = HashMap::new();
        for book in books {
            if let Some(name) = book.series_name() {
                groups.entry(name).or_default().push(book);
            }
        }
        SeriesIndex { groups }
    }

    /// Books of the named series, empty if the series is unknown.
    pub fn siblings(&self, name: &str) -> &[&'a Book] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct series.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Where composite evaluation finds a record's siblings.
#[derive(Debug, Clone, Copy)]
pub enum SeriesSource<'a> {
    /// Scan the whole collection for every lookup.
    Scan(&'a [Book]),
    /// Use a prebuilt index.
    Indexed(&'a SeriesIndex<'a>),
}

impl<'a> SeriesSource<'a> {
    fn siblings(&self, name: &str) -> Vec<&'a Book> {
        match self {
            SeriesSource::Scan(books) => books
                .iter()
                .filter(|b| b.series_name() == Some(name))
                .collect(),
            SeriesSource::Indexed(index) => index.siblings(name).to_vec(),
        }
    }
}

/// Evaluates the positive form of a composite predicate for `book`.
///
/// `value` is the rule's value, already lower-cased. Unknown values and
/// non-composite fields yield `false`.
pub fn evaluate(book: &Book, field: &Field, value: &str, source: SeriesSource<'_>) -> bool {
    let Some(name) = book.series_name() else {
        return false;
    };

    let mut set: Vec<&Book> = source.siblings(name);
    if !set.iter().any(|b| b.id == book.id) {
        set.push(book);
    }
    let siblings = Siblings(&set);

    match field {
        Field::SeriesStatus => SeriesStatus::parse(value).is_some_and(|s| siblings.status(s)),
        Field::SeriesGaps => SeriesGap::parse(value).is_some_and(|g| siblings.gap(g)),
        Field::SeriesPosition => {
            SeriesPosition::parse(value).is_some_and(|p| siblings.position(book, p))
        }
        _ => false,
    }
}

/// A non-empty set of books sharing one series name.
struct Siblings<'s, 'b>(&'s [&'b Book]);

impl Siblings<'_, '_> {
    fn status(&self, status: SeriesStatus) -> bool {
        let books = self.0;
        match status {
            SeriesStatus::Reading => books.iter().any(|b| b.status().is_in_progress()),
            SeriesStatus::NotStarted => !books.iter().any(|b| b.status().is_started()),
            SeriesStatus::FullyRead => {
                !books.is_empty() && books.iter().all(|b| b.status() == ReadStatus::Read)
            }
            SeriesStatus::Completed => self.max_total().is_some_and(|t| self.has_floor(t)),
            SeriesStatus::Ongoing => self.max_total().is_some_and(|t| !self.has_floor(t)),
        }
    }

    fn gap(&self, gap: SeriesGap) -> bool {
        let numbers = self.numbers();
        if numbers.is_empty() {
            return false;
        }
        let floors: BTreeSet<i64> = numbers.iter().map(|n| n.floor() as i64).collect();

        match gap {
            SeriesGap::AnyGap => floors
                .last()
                .is_some_and(|max| (floors.len() as i64) < *max),
            SeriesGap::MissingFirst => !floors.contains(&1),
            SeriesGap::MissingLatest => self.max_total().is_some_and(|t| !self.has_floor(t)),
            SeriesGap::DuplicateNumber => {
                let distinct: HashSet<u64> = numbers.iter().map(|n| canonical_bits(*n)).collect();
                numbers.len() > distinct.len()
            }
        }
    }

    fn position(&self, book: &Book, position: SeriesPosition) -> bool {
        let Some(number) = book.series_number() else {
            return false;
        };
        let numbers = self.numbers();

        match position {
            SeriesPosition::FirstInSeries => {
                numbers.iter().copied().fold(f64::INFINITY, f64::min) == number
            }
            SeriesPosition::LastInSeries => {
                numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max) == number
            }
            SeriesPosition::NextUnread => {
                if book.status() == ReadStatus::Read {
                    return false;
                }
                let mut earlier = self
                    .0
                    .iter()
                    .filter(|b| b.series_number().is_some_and(|n| n < number))
                    .peekable();
                earlier.peek().is_some() && earlier.all(|b| b.status() == ReadStatus::Read)
            }
        }
    }

    fn numbers(&self) -> Vec<f64> {
        self.0.iter().filter_map(|b| b.series_number()).collect()
    }

    /// Largest declared series total across the set.
    fn max_total(&self) -> Option<f64> {
        self.0
            .iter()
            .filter_map(|b| b.series_total())
            .reduce(f64::max)
    }

    /// Returns `true` if some book's whole series number equals `total`.
    fn has_floor(&self, total: f64) -> bool {
        self.0
            .iter()
            .filter_map(|b| b.series_number())
            .any(|n| n.floor() == total)
    }
}

fn canonical_bits(n: f64) -> u64 {
    if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookMetadata;

    fn volume(id: u64, series: &str, number: Option<f64>, status: ReadStatus) -> Book {
        let mut book = Book::new(id);
        book.read_status = Some(status);
        book.metadata = Some(BookMetadata {
            series_name: Some(series.into()),
            series_number: number,
            ..BookMetadata::default()
        });
        book
    }

    fn with_total(mut book: Book, total: f64) -> Book {
        if let Some(meta) = book.metadata.as_mut() {
            meta.series_total = Some(total);
        }
        book
    }

    fn check(books: &[Book], id: u64, field: Field, value: &str) -> bool {
        let book = books.iter().find(|b| b.id == id).unwrap();
        evaluate(book, &field, value, SeriesSource::Scan(books))
    }

    #[test]
    fn status_reading_and_not_started() {
        let books = vec![
            volume(1, "Expanse", Some(1.0), ReadStatus::Read),
            volume(2, "Expanse", Some(2.0), ReadStatus::Reading),
            volume(3, "Culture", Some(1.0), ReadStatus::Unread),
            volume(4, "Culture", Some(2.0), ReadStatus::Paused),
        ];
        assert!(check(&books, 1, Field::SeriesStatus, "reading"));
        assert!(!check(&books, 3, Field::SeriesStatus, "reading"));
        assert!(check(&books, 3, Field::SeriesStatus, "not_started"));
        assert!(!check(&books, 1, Field::SeriesStatus, "not_started"));
    }

    #[test]
    fn status_fully_read() {
        let books = vec![
            volume(1, "Earthsea", Some(1.0), ReadStatus::Read),
            volume(2, "Earthsea", Some(2.0), ReadStatus::Read),
            volume(3, "Gormenghast", Some(1.0), ReadStatus::Read),
            volume(4, "Gormenghast", Some(2.0), ReadStatus::Unread),
        ];
        assert!(check(&books, 2, Field::SeriesStatus, "fully_read"));
        assert!(!check(&books, 3, Field::SeriesStatus, "fully_read"));
    }

    #[test]
    fn status_completed_and_ongoing_need_a_total() {
        let books = vec![
            with_total(volume(1, "Dune", Some(1.0), ReadStatus::Read), 3.0),
            volume(2, "Dune", Some(3.0), ReadStatus::Unread),
            with_total(volume(3, "Wheel", Some(1.0), ReadStatus::Read), 14.0),
            volume(4, "Loose", Some(1.0), ReadStatus::Read),
        ];
        assert!(check(&books, 2, Field::SeriesStatus, "completed"));
        assert!(!check(&books, 2, Field::SeriesStatus, "ongoing"));
        assert!(check(&books, 3, Field::SeriesStatus, "ongoing"));
        assert!(!check(&books, 3, Field::SeriesStatus, "completed"));
        // No declared total: neither
        assert!(!check(&books, 4, Field::SeriesStatus, "completed"));
        assert!(!check(&books, 4, Field::SeriesStatus, "ongoing"));
    }

    #[test]
    fn gaps() {
        let books = vec![
            with_total(volume(1, "Dune", Some(1.0), ReadStatus::Read), 3.0),
            volume(2, "Dune", Some(3.0), ReadStatus::Unread),
            volume(3, "Foundation", Some(2.0), ReadStatus::Unread),
            volume(4, "Foundation", Some(2.0), ReadStatus::Unread),
            with_total(volume(5, "Foundation", Some(3.5), ReadStatus::Unread), 7.0),
        ];
        assert!(check(&books, 1, Field::SeriesGaps, "any_gap"));
        assert!(!check(&books, 1, Field::SeriesGaps, "missing_first"));
        assert!(!check(&books, 1, Field::SeriesGaps, "missing_latest"));
        assert!(!check(&books, 1, Field::SeriesGaps, "duplicate_number"));

        assert!(check(&books, 3, Field::SeriesGaps, "missing_first"));
        assert!(check(&books, 3, Field::SeriesGaps, "missing_latest"));
        assert!(check(&books, 3, Field::SeriesGaps, "duplicate_number"));
        // floors {2, 3}: two distinct values below a max of 3
        assert!(check(&books, 3, Field::SeriesGaps, "any_gap"));
    }

    #[test]
    fn gaps_without_numbers_never_match() {
        let books = vec![
            volume(1, "Unnumbered", None, ReadStatus::Read),
            volume(2, "Unnumbered", None, ReadStatus::Read),
        ];
        assert!(!check(&books, 1, Field::SeriesGaps, "missing_first"));
        assert!(!check(&books, 1, Field::SeriesGaps, "any_gap"));
    }

    #[test]
    fn positions() {
        let books = vec![
            volume(1, "Culture", Some(1.0), ReadStatus::Read),
            volume(2, "Culture", Some(2.0), ReadStatus::Read),
            volume(3, "Culture", Some(3.0), ReadStatus::Unread),
            volume(4, "Culture", Some(4.0), ReadStatus::Unread),
            volume(5, "Culture", None, ReadStatus::Unread),
        ];
        assert!(check(&books, 1, Field::SeriesPosition, "first_in_series"));
        assert!(!check(&books, 2, Field::SeriesPosition, "first_in_series"));
        assert!(check(&books, 4, Field::SeriesPosition, "last_in_series"));
        assert!(check(&books, 3, Field::SeriesPosition, "next_unread"));
        assert!(!check(&books, 4, Field::SeriesPosition, "next_unread"));
        assert!(!check(&books, 1, Field::SeriesPosition, "next_unread"));
        // Unnumbered books have no position
        assert!(!check(&books, 5, Field::SeriesPosition, "first_in_series"));
    }

    #[test]
    fn next_unread_needs_a_read_predecessor() {
        let books = vec![
            volume(1, "Fresh", Some(1.0), ReadStatus::Unread),
            volume(2, "Fresh", Some(2.0), ReadStatus::Unread),
        ];
        assert!(!check(&books, 1, Field::SeriesPosition, "next_unread"));
        assert!(!check(&books, 2, Field::SeriesPosition, "next_unread"));
    }

    #[test]
    fn series_names_match_exactly() {
        let books = vec![
            volume(1, "Dune", Some(1.0), ReadStatus::Read),
            volume(2, "dune", Some(2.0), ReadStatus::Read),
        ];
        assert!(check(&books, 2, Field::SeriesPosition, "first_in_series"));
        assert!(check(&books, 2, Field::SeriesPosition, "last_in_series"));
    }

    #[test]
    fn record_outside_collection_is_its_own_sibling() {
        let book = volume(9, "Solo", Some(1.0), ReadStatus::Read);
        assert!(evaluate(&book, &Field::SeriesStatus, "fully_read", SeriesSource::Scan(&[])));
        assert!(evaluate(
            &book,
            &Field::SeriesPosition,
            "first_in_series",
            SeriesSource::Scan(&[])
        ));
    }

    #[test]
    fn unknown_values_and_missing_series() {
        let books = vec![volume(1, "Dune", Some(1.0), ReadStatus::Read)];
        assert!(!check(&books, 1, Field::SeriesStatus, "bogus"));

        let loose = Book::new(2);
        assert!(!evaluate(&loose, &Field::SeriesStatus, "not_started", SeriesSource::Scan(&books)));
    }

    #[test]
    fn index_matches_scan() {
        let books = vec![
            volume(1, "Dune", Some(1.0), ReadStatus::Read),
            volume(2, "Dune", Some(2.0), ReadStatus::Unread),
            volume(3, "Culture", Some(1.0), ReadStatus::Unread),
        ];
        let index = SeriesIndex::new(&books);
        assert_eq!(index.len(), 2);
        assert_eq!(index.siblings("Dune").len(), 2);
        assert!(index.siblings("Nope").is_empty());

        for book in &books {
            for value in ["first_in_series", "last_in_series", "next_unread"] {
                assert_eq!(
                    evaluate(book, &Field::SeriesPosition, value, SeriesSource::Scan(&books)),
                    evaluate(book, &Field::SeriesPosition, value, SeriesSource::Indexed(&index)),
                );
            }
        }
    }
}
