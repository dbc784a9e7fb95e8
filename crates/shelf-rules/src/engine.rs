//! The rule engine entry points.

use tracing::debug;

use crate::book::Book;
use crate::config::EngineConfig;
use crate::group::Group;
use crate::rule::{Rule, Scope};
use crate::series::{SeriesIndex, SeriesSource};

/// Evaluates rule groups against books.
///
/// # Example
///
/// ```
/// use shelf_rules::{Book, EngineConfig, Group, Rule, RuleEngine};
///
/// let mut book = Book::new(1);
/// book.book_type = Some("EPUB".into());
/// let books = vec![book];
///
/// let engine = RuleEngine::new(EngineConfig::default());
/// let shelf = Group::and().rule(Rule::new("fileType", "equals", "epub"));
/// assert_eq!(engine.filter(&books, &shelf).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: EngineConfig,
}

impl RuleEngine {
    pub fn new(config: EngineConfig) -> Self {
        RuleEngine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluates `group` for one book. `all` is the collection series
    /// composites look up siblings in; it is scanned on every composite rule.
    pub fn evaluate_group(&self, book: &Book, group: &Group, all: &[Book]) -> bool {
        group.matches(book, &self.scope(SeriesSource::Scan(all)))
    }

    /// Evaluates a single rule for one book.
    pub fn evaluate_rule(&self, book: &Book, rule: &Rule, all: &[Book]) -> bool {
        rule.matches(book, &self.scope(SeriesSource::Scan(all)))
    }

    /// Returns the books matched by `group`, in collection order.
    ///
    /// The clock is read once for the whole pass, and series siblings are
    /// grouped up front when the group uses a composite field.
    pub fn filter<'a>(&self, books: &'a [Book], group: &Group) -> Vec<&'a Book> {
        let index;
        let source = if group.has_composite() {
            index = SeriesIndex::new(books);
            SeriesSource::Indexed(&index)
        } else {
            SeriesSource::Scan(books)
        };
        let scope = self.scope(source);

        let matched: Vec<&'a Book> = books
            .iter()
            .filter(|book| group.matches(book, &scope))
            .collect();
        debug!(total = books.len(), matched = matched.len(), "rule group applied");
        matched
    }

    /// Number of books matched by `group`.
    pub fn count(&self, books: &[Book], group: &Group) -> usize {
        self.filter(books, group).len()
    }

    fn scope<'a>(&self, series: SeriesSource<'a>) -> Scope<'a> {
        Scope {
            now: self.config.now(),
            week_start: self.config.week_start,
            series,
        }
    }
}

/// Evaluates `group` for one book with the default configuration.
pub fn evaluate_group(book: &Book, group: &Group, all: &[Book]) -> bool {
    RuleEngine::default().evaluate_group(book, group, all)
}

/// Evaluates one rule for one book with the default configuration.
pub fn evaluate_rule(book: &Book, rule: &Rule, all: &[Book]) -> bool {
    RuleEngine::default().evaluate_rule(book, rule, all)
}
