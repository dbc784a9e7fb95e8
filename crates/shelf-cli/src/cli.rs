//! Command-line arguments.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use shelf_rules::{FacetField, FilterMode};

/// Evaluate magic shelves and sidebar facets over a library export.
#[derive(Parser, Debug)]
#[command(name = "shelfq")]
#[command(version)]
pub struct Cli {
    /// Engine configuration file (YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Evaluation time for relative dates, e.g. 2024-06-15 or an RFC 3339 timestamp
    #[arg(long, global = true, value_parser = parse_now)]
    pub now: Option<DateTime<Utc>>,

    /// Output format
    #[arg(long, short, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the books matched by a saved rule group
    Eval {
        /// Library export: a JSON array of books
        #[arg(long)]
        books: PathBuf,

        /// Rule group JSON
        #[arg(long)]
        rules: PathBuf,
    },

    /// Show cascading facets for one dimension
    Facets {
        #[arg(long)]
        books: PathBuf,

        /// Active filters, e.g. "author:Le Guin|Butler,readStatus:READ"
        #[arg(long, default_value = "")]
        filters: String,

        /// How selections combine: and, or, single
        #[arg(long, default_value = "and")]
        mode: FilterMode,

        /// Dimension to count, e.g. author or pageCount
        #[arg(long)]
        field: FacetField,
    },

    /// List the books passing a flat filter map
    Filter {
        #[arg(long)]
        books: PathBuf,

        #[arg(long)]
        filters: String,

        #[arg(long, default_value = "and")]
        mode: FilterMode,
    },
}

/// Rendering of command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one item per line
    #[default]
    Text,
    Json,
    Yaml,
}

fn parse_now(s: &str) -> Result<DateTime<Utc>, String> {
    shelf_rules::parse_date(s)
        .ok_or_else(|| format!("invalid date '{}': expected YYYY-MM-DD or RFC 3339", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_facets_command() {
        let cli = Cli::try_parse_from([
            "shelfq",
            "facets",
            "--books",
            "books.json",
            "--field",
            "readStatus",
            "--mode",
            "OR",
            "--output",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Command::Facets {
                field, mode, filters, ..
            } => {
                assert_eq!(field, FacetField::ReadStatus);
                assert_eq!(mode, FilterMode::Or);
                assert_eq!(filters, "");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_dimension_and_mode() {
        assert!(
            Cli::try_parse_from(["shelfq", "facets", "--books", "b.json", "--field", "colour"])
                .is_err()
        );
        assert!(Cli::try_parse_from([
            "shelfq", "filter", "--books", "b.json", "--filters", "", "--mode", "xor"
        ])
        .is_err());
    }

    #[test]
    fn parses_now() {
        let cli = Cli::try_parse_from([
            "shelfq",
            "--now",
            "2024-06-15",
            "eval",
            "--books",
            "b.json",
            "--rules",
            "r.json",
        ])
        .unwrap();
        assert_eq!(cli.now.map(|d| d.to_rfc3339()), Some("2024-06-15T00:00:00+00:00".to_string()));
        assert!(Cli::try_parse_from([
            "shelfq", "--now", "soon", "eval", "--books", "b", "--rules", "r"
        ])
        .is_err());
    }
}
