//! Command results and their renderings.

use anyhow::Result;
use serde::Serialize;
use shelf_rules::{Book, Facet};

use crate::cli::OutputFormat;

/// Something a command prints.
pub trait Report: Serialize {
    /// Plain-text rendering.
    fn to_text(&self) -> String;

    fn render(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Text => self.to_text(),
            OutputFormat::Json => serde_json::to_string_pretty(self)?,
            OutputFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRow {
    pub id: u64,
    pub title: Option<String>,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        BookRow {
            id: book.id,
            title: book.title().map(str::to_string),
        }
    }
}

/// Books selected out of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookList {
    pub total: usize,
    pub matched: usize,
    pub books: Vec<BookRow>,
}

impl BookList {
    pub fn new(total: usize, books: &[&Book]) -> Self {
        BookList {
            total,
            matched: books.len(),
            books: books.iter().map(|b| BookRow::from(*b)).collect(),
        }
    }
}

impl Report for BookList {
    fn to_text(&self) -> String {
        let mut out = String::new();
        for row in &self.books {
            out.push_str(&format!("{}\t{}\n", row.id, row.title.as_deref().unwrap_or("-")));
        }
        out.push_str(&format!("{} of {} books\n", self.matched, self.total));
        out
    }
}

/// Facets of one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetList {
    pub field: String,
    pub facets: Vec<Facet>,
}

impl Report for FacetList {
    fn to_text(&self) -> String {
        let width = self.facets.iter().map(|f| f.value.chars().count()).max().unwrap_or(0);
        let mut out = format!("{}\n", self.field);
        for facet in &self.facets {
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                facet.value,
                facet.book_count,
                width = width
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> BookList {
        BookList {
            total: 3,
            matched: 2,
            books: vec![
                BookRow {
                    id: 1,
                    title: Some("Dune".into()),
                },
                BookRow { id: 7, title: None },
            ],
        }
    }

    #[test]
    fn book_list_text() {
        assert_eq!(list().to_text(), "1\tDune\n7\t-\n2 of 3 books\n");
    }

    #[test]
    fn book_list_json() {
        let json = list().render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["matched"], 2);
        assert_eq!(value["books"][1]["title"], serde_json::Value::Null);
    }

    #[test]
    fn facet_list_text_is_aligned() {
        let facets = FacetList {
            field: "readStatus".into(),
            facets: vec![
                Facet {
                    value: "UNREAD".into(),
                    book_count: 12,
                },
                Facet {
                    value: "READ".into(),
                    book_count: 3,
                },
            ],
        };
        assert_eq!(facets.to_text(), "readStatus\n  UNREAD  12\n  READ    3\n");
        assert!(facets.render(OutputFormat::Yaml).unwrap().contains("bookCount: 12"));
    }
}
