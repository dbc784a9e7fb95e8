//! `shelfq`: batch evaluation of magic shelves and sidebar filters over a
//! library export.
//!
//! The binary is a thin shell over [`run`], which loads the inputs named on
//! the command line, calls into [`shelf_rules`], and returns the rendered
//! report.

pub mod cli;
pub mod load;
pub mod output;

use anyhow::Result;
use shelf_rules::facet::filter_query;
use shelf_rules::{Book, EngineConfig, FacetEngine, FacetField, FilterMode, Group, RuleEngine};
use tracing::info;

pub use cli::{Cli, Command, OutputFormat};
use output::{BookList, FacetList, Report};

/// Executes a parsed command line and returns what should be printed.
pub fn run(cli: &Cli) -> Result<String> {
    let mut config = load::config(cli.config.as_deref())?;
    if let Some(now) = cli.now {
        config = config.with_now(now);
    }

    match &cli.command {
        Command::Eval { books, rules } => {
            let books = load::books(books)?;
            let group = load::group(rules)?;
            eval(&books, &group, config).render(cli.output)
        }
        Command::Facets {
            books,
            filters,
            mode,
            field,
        } => {
            let books = load::books(books)?;
            facets(&books, filters, *mode, *field, &config).render(cli.output)
        }
        Command::Filter { books, filters, mode } => {
            let books = load::books(books)?;
            filter(&books, filters, *mode, &config).render(cli.output)
        }
    }
}

/// Books matched by a rule group.
pub fn eval(books: &[Book], group: &Group, config: EngineConfig) -> BookList {
    let matched = RuleEngine::new(config).filter(books, group);
    info!(matched = matched.len(), total = books.len(), "rule group evaluated");
    BookList::new(books.len(), &matched)
}

/// Cascading facets of `field` under the filters in `query`.
pub fn facets(
    books: &[Book],
    query: &str,
    mode: FilterMode,
    field: FacetField,
    config: &EngineConfig,
) -> FacetList {
    let filters = filter_query::decode(query);
    let facets = FacetEngine::new(config).facets(books, &filters, mode, field);
    FacetList {
        field: field.key().to_string(),
        facets,
    }
}

/// Books passing the filters in `query`.
pub fn filter(books: &[Book], query: &str, mode: FilterMode, config: &EngineConfig) -> BookList {
    let filters = filter_query::decode(query);
    let matched = FacetEngine::new(config).filter(books, &filters, mode);
    info!(matched = matched.len(), total = books.len(), %mode, "filters applied");
    BookList::new(books.len(), &matched)
}
