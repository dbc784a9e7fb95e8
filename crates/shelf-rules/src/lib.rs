//! Shelf Rules - filter and rule evaluation over in-memory book collections.
//!
//! Two engines share one data model:
//!
//! - The **rule engine** evaluates a recursive tree of rules joined by AND/OR
//!   against each book. Saved trees back "magic shelves".
//! - The **facet engine** applies a flat map of selected values per sidebar
//!   dimension and counts the candidate values of each dimension.
//!
//! Both are pure functions of their inputs. Nothing here performs I/O, and
//! malformed or missing data never produces an error during evaluation: every
//! path resolves to a defined boolean.
//!
//! # Quick Start
//!
//! ```rust
//! use shelf_rules::{Book, BookMetadata, EngineConfig, Group, Rule, RuleEngine};
//!
//! let mut dune = Book::new(1);
//! dune.book_type = Some("EPUB".into());
//! dune.metadata = Some(BookMetadata {
//!     title: Some("Dune".into()),
//!     page_count: Some(412.0),
//!     ..BookMetadata::default()
//! });
//! let books = vec![dune];
//!
//! let long_epubs = Group::and()
//!     .rule(Rule::new("fileType", "equals", "epub"))
//!     .rule(Rule::new("pageCount", "greater_than", 400));
//!
//! let engine = RuleEngine::new(EngineConfig::default());
//! assert_eq!(engine.filter(&books, &long_epubs).len(), 1);
//! ```
//!
//! # Evaluation Semantics
//!
//! ```text
//! and group = every child matches   (no children: true)
//! or group  = some child matches    (no children: false)
//! ```
//!
//! Values are normalized before comparison: text that parses as a date
//! becomes a date, other text is lower-cased. On multi-valued fields,
//! positive operators need some element to match and negated operators
//! (`not_equals`, `does_not_contain`) need every element to match.
//!
//! | Field type | Operators |
//! |------------|-----------|
//! | String | `equals`, `not_equals`, `contains`, `does_not_contain`, `starts_with`, `ends_with`, `is_empty`, `is_not_empty` |
//! | Array | the string operators plus `includes_any`, `includes_all`, `excludes_all` |
//! | Number, Decimal | `equals`, `not_equals`, `greater_than`, `greater_than_equal_to`, `less_than`, `less_than_equal_to`, `in_between` |
//! | Date | the number operators plus `within_last`, `older_than`, `this_period` |
//! | Composite | `equals`, `not_equals`, `includes_any`, `includes_all`, `excludes_all` |
//!
//! An operator name the engine does not know parses as [`Operator::Unknown`]
//! and never matches.

mod book;
mod compare;
mod config;
mod engine;
mod error;
mod extract;
mod field;
mod group;
mod op;
mod rule;
mod series;
mod temporal;
mod value;

pub mod facet;

// Re-export public API
pub use book::{Book, BookMetadata, Progress, ReadStatus, ShelfRef};
pub use config::{EngineConfig, DEFAULT_FACET_LIMIT};
pub use engine::{evaluate_group, evaluate_rule, RuleEngine};
pub use error::{Result, RulesError};
pub use extract::{canonical_file_type, extract, extract_projection};
pub use facet::{Facet, FacetEngine, FacetField, FilterMap, FilterMode};
pub use field::{Field, FieldType};
pub use group::{Group, Join, RuleNode};
pub use op::Operator;
pub use rule::{Rule, Scope};
pub use series::{SeriesGap, SeriesIndex, SeriesPosition, SeriesSource, SeriesStatus};
pub use temporal::{DateUnit, Period, WeekStart};
pub use value::{parse_date, Value};
