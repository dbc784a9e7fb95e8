//! Reading exports, rule groups and configuration from disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use shelf_rules::{Book, EngineConfig, Group};
use tracing::debug;

/// Reads a JSON array of books.
pub fn books(path: &Path) -> Result<Vec<Book>> {
    let text = read(path)?;
    let books: Vec<Book> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse books from {}", path.display()))?;
    debug!(path = %path.display(), count = books.len(), "books loaded");
    Ok(books)
}

/// Reads a persisted rule group.
pub fn group(path: &Path) -> Result<Group> {
    let text = read(path)?;
    Group::from_json(&text)
        .with_context(|| format!("failed to parse rule group from {}", path.display()))
}

/// Reads the engine configuration, or the defaults when no file is given.
pub fn config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = read(path)?;
    if text.trim().is_empty() {
        return Ok(EngineConfig::default());
    }
    serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse config from {}", path.display()))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_rules::WeekStart;
    use std::io::Write;

    fn file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn config_from_yaml() {
        let yaml = file("week_start: monday\nfacet_limit: 5\nnow: 2024-06-15T12:00:00Z\n");
        let config = config(Some(yaml.path())).unwrap();
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.facet_limit, 5);
        assert!(config.now.is_some());
    }

    #[test]
    fn missing_or_empty_config_uses_defaults() {
        assert_eq!(config(None).unwrap(), EngineConfig::default());
        let empty = file("");
        assert_eq!(config(Some(empty.path())).unwrap(), EngineConfig::default());
    }

    #[test]
    fn errors_name_the_file() {
        let broken = file("[{\"id\": \"one\"}]");
        let err = books(broken.path()).unwrap_err();
        assert!(format!("{err}").contains("failed to parse books"));

        let err = group(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(format!("{err}").contains("failed to read /nonexistent/rules.json"));
    }
}
