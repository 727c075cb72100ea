use std::time::Duration;

use reqwest::Url;
use serde_json::Value;

use crate::bridge::Bridge;
use crate::config::CONFIG;
use crate::data_models::SearchResult;
use crate::error::SearchError;
use crate::validator;

/// Wikipedia opensearch client: builds the query URL, fetches it through the
/// callback bridge, validates the payload.
pub struct WikiClient {
    api_url: Url,
    bridge: Bridge,
}

impl WikiClient {
    pub fn new(api_url: Url, timeout: Duration) -> Self {
        Self {
            api_url,
            bridge: Bridge::new(timeout),
        }
    }

    /// Build a client from environment configuration. Panics on a malformed
    /// `WIKI_API_URL`, like the rest of startup config.
    pub fn from_config() -> Self {
        let api_url = Url::parse(&CONFIG.wiki_api_url)
            .unwrap_or_else(|e| panic!("invalid WIKI_API_URL {}: {e}", CONFIG.wiki_api_url));
        Self::new(api_url, Duration::from_millis(CONFIG.request_timeout_ms))
    }

    /// The opensearch query URL for `query`. The callback parameter is
    /// appended later by the bridge.
    pub fn opensearch_url(&self, query: &str) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "opensearch")
            .append_pair("namespace", "0")
            .append_pair("format", "json")
            .append_pair("search", query);
        url
    }

    pub async fn search(&self, query: &str) -> Result<SearchResult, SearchError> {
        let raw: Value = self.bridge.fetch(self.opensearch_url(query)).await?;
        validator::validate(raw)
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> WikiClient {
        WikiClient::new(
            Url::parse("https://en.wikipedia.org/w/api.php").unwrap(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn opensearch_url_carries_the_fixed_parameters() {
        let url = test_client().opensearch_url("zz top");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("action".to_string(), "opensearch".to_string())));
        assert!(pairs.contains(&("namespace".to_string(), "0".to_string())));
        assert!(pairs.contains(&("format".to_string(), "json".to_string())));
        assert!(pairs.contains(&("search".to_string(), "zz top".to_string())));
    }

    #[test]
    fn opensearch_url_encodes_the_query() {
        let url = test_client().opensearch_url("C++ & Rust?");
        assert!(url.as_str().contains("search=C%2B%2B+%26+Rust%3F"));
    }

    #[test]
    fn opensearch_url_preserves_existing_query_params() {
        let client = WikiClient::new(
            Url::parse("http://127.0.0.1:9/w/api.php?delay_ms=50").unwrap(),
            Duration::from_secs(5),
        );
        let url = client.opensearch_url("rust");
        assert!(url.as_str().contains("delay_ms=50"));
        assert!(url.as_str().contains("search=rust"));
    }
}
