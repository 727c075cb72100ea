use thiserror::Error;

/// Everything that can go wrong between submitting a query and holding a
/// validated result.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The opensearch payload failed a structural check. Deliberately carries
    /// no detail about which check broke.
    #[error("Invalid search result")]
    InvalidSearchResult,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The pending callback was never completed within the deadline.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// The response body did not wrap the payload in the expected
    /// `<callback>(...)` envelope.
    #[error("response body is not a callback envelope for {0}")]
    MalformedPadding(String),

    /// A newer search was issued before this one finished.
    #[error("search was superseded by a newer query")]
    Superseded,

    /// The pending request was dropped without ever being settled.
    #[error("request was canceled")]
    Canceled,
}
