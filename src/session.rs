use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::client::WikiClient;
use crate::data_models::SearchResult;
use crate::error::SearchError;

/// Arbitrates overlapping searches.
///
/// Every search is tagged with a monotonically increasing sequence number and
/// cancels any *older* search still in flight. A result whose sequence number
/// is no longer the newest is never surfaced, so a slow early search cannot
/// overwrite the results of a fast later one.
pub struct SearchSession {
    client: WikiClient,
    latest_seq: AtomicU64,
    /// Sequence number and cancellation token of the installed search.
    /// Swapped together so an older search that grabbed its sequence number
    /// first can never cancel a newer one that won the lock.
    current: Mutex<(u64, CancellationToken)>,
}

impl SearchSession {
    pub fn new(client: WikiClient) -> Self {
        Self {
            client,
            latest_seq: AtomicU64::new(0),
            current: Mutex::new((0, CancellationToken::new())),
        }
    }

    pub async fn search(&self, query: &str) -> Result<SearchResult, SearchError> {
        let seq = self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let token = CancellationToken::new();
        {
            let mut current = self.current.lock().await;
            if current.0 > seq {
                // A newer search won the lock first; ours is already stale.
                return Err(SearchError::Superseded);
            }
            current.1.cancel(); // supersede whatever is still in flight
            *current = (seq, token.clone());
        }

        let result = tokio::select! {
            _ = token.cancelled() => Err(SearchError::Superseded),
            res = self.client.search(query) => res,
        };

        // The response may have raced a newer submission.
        if self.latest_seq.load(Ordering::SeqCst) != seq {
            log::info!("dropping stale result for {query:?} (seq {seq})");
            return Err(SearchError::Superseded);
        }
        result
    }

    pub fn client(&self) -> &WikiClient {
        &self.client
    }
}
