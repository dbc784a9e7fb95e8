//! Query-string form of a filter map: `author:Le Guin|Butler,readStatus:READ`.
//!
//! Dimensions are separated by `,`, values by `|`, and a key from its values
//! by the first `:`. Values cannot contain `,` or `|`.

use super::filter::FilterMap;

/// Encodes a filter map. Dimensions without values are omitted.
pub fn encode(filters: &FilterMap) -> String {
    filters
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(key, values)| format!("{}:{}", key, values.join("|")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Decodes a filter map, skipping segments without a key or without values.
pub fn decode(query: &str) -> FilterMap {
    let mut filters = FilterMap::new();
    for segment in query.split(',') {
        let Some((key, values)) = segment.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let values: Vec<String> = values
            .split('|')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        if key.is_empty() || values.is_empty() {
            continue;
        }
        filters.entry(key.to_string()).or_default().extend(values);
    }
    filters
}
