use serde_json::Value;

use crate::data_models::SearchResult;
use crate::error::SearchError;

/// Narrow a raw opensearch payload `[query, titles, extracts, urls]` into a
/// [`SearchResult`].
///
/// Checks run in order: the payload is an array of exactly 4 elements, the
/// first is a string, the rest are arrays of strings, and the three arrays
/// have equal length. Every failure collapses into the same generic
/// [`SearchError::InvalidSearchResult`].
pub fn validate(raw: Value) -> Result<SearchResult, SearchError> {
    let Value::Array(parts) = raw else {
        return Err(SearchError::InvalidSearchResult);
    };
    let [query, titles, first_paragraphs, urls]: [Value; 4] = parts
        .try_into()
        .map_err(|_| SearchError::InvalidSearchResult)?;

    let Value::String(query) = query else {
        return Err(SearchError::InvalidSearchResult);
    };
    let titles = string_array(titles)?;
    let first_paragraphs = string_array(first_paragraphs)?;
    let urls = string_array(urls)?;

    if titles.len() != first_paragraphs.len() || first_paragraphs.len() != urls.len() {
        return Err(SearchError::InvalidSearchResult);
    }

    Ok(SearchResult {
        query,
        titles,
        first_paragraphs,
        urls,
    })
}

fn string_array(value: Value) -> Result<Vec<String>, SearchError> {
    let Value::Array(items) = value else {
        return Err(SearchError::InvalidSearchResult);
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            _ => Err(SearchError::InvalidSearchResult),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_array_accepts_only_strings() {
        assert_eq!(
            string_array(json!(["a", "b"])).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(string_array(json!(["a", 1])).is_err());
        assert!(string_array(json!("a")).is_err());
        assert!(string_array(json!(null)).is_err());
    }

    #[test]
    fn empty_arrays_are_a_valid_result() {
        let result = validate(json!(["nothing", [], [], []])).unwrap();
        assert_eq!(result.query, "nothing");
        assert!(result.is_empty());
    }
}
