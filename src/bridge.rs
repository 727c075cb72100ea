use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use nanoid::nanoid;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::SearchError;

static CALLBACK_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a callback name unique for the lifetime of the process.
///
/// Timestamp plus random suffix, strengthened with an atomic counter so two
/// names can never collide no matter how close together they are minted.
pub fn next_callback_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = CALLBACK_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("callback_jsonp_{}_{}_{}", millis, seq, nanoid!(8))
}

/// Extract the JSON payload from a `name(<json>)` callback envelope.
///
/// MediaWiki prefixes JSONP bodies with `/**/` and some servers append a
/// trailing semicolon; both are tolerated. The envelope must name exactly the
/// callback we registered, anything else is rejected.
pub fn strip_callback_padding(body: &str, name: &str) -> Result<Value, SearchError> {
    let trimmed = body.trim();
    let trimmed = trimmed.strip_prefix("/**/").unwrap_or(trimmed).trim_start();
    let inner = trimmed
        .strip_prefix(name)
        .and_then(|rest| rest.trim_start().strip_prefix('('))
        .and_then(|rest| {
            let rest = rest.trim_end();
            let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
            rest.strip_suffix(')')
        })
        .ok_or_else(|| SearchError::MalformedPadding(name.to_string()))?;
    serde_json::from_str(inner).map_err(|_| SearchError::MalformedPadding(name.to_string()))
}

/// Process-wide table of pending callbacks, keyed by generated callback name.
///
/// Entries are removed on completion, on failure, and on timeout, so a settled
/// request never leaves anything behind.
pub struct CallbackRegistry {
    pending: DashMap<String, oneshot::Sender<Result<Value, SearchError>>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
        }
    }

    /// Register a one-shot handler under `name` and hand back the receiving
    /// end the caller will await.
    pub fn register(&self, name: &str) -> oneshot::Receiver<Result<Value, SearchError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.insert(name.to_string(), tx);
        rx
    }

    /// Deliver a payload to the named pending callback. Returns false if no
    /// such callback is registered (already settled, timed out, or unknown).
    pub fn complete(&self, name: &str, payload: Value) -> bool {
        self.settle(name, Ok(payload))
    }

    /// Deliver a failure to the named pending callback.
    pub fn fail(&self, name: &str, err: SearchError) -> bool {
        self.settle(name, Err(err))
    }

    /// Drop a pending entry without delivering anything (the timeout path).
    pub fn remove(&self, name: &str) -> bool {
        self.pending.remove(name).is_some()
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.contains_key(name)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn settle(&self, name: &str, outcome: Result<Value, SearchError>) -> bool {
        match self.pending.remove(name) {
            Some((_, tx)) => tx.send(outcome).is_ok(),
            None => false,
        }
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes the named registry entry when the request future goes away,
/// whether it settled, timed out, or was dropped mid-flight.
struct PendingGuard<'a> {
    registry: &'a CallbackRegistry,
    name: &'a str,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        // No-op when the entry already settled
        self.registry.remove(self.name);
    }
}

/// Issues correlated one-shot requests.
///
/// Each request gets a fresh callback name appended to its URL, a pending
/// entry in the registry, and a detached transport task. The caller never
/// awaits the transport directly, only the registry entry, which settles
/// exactly once: completed with the unwrapped payload, failed with a
/// transport error, or abandoned by our timeout.
pub struct Bridge {
    http: reqwest::Client,
    registry: Arc<CallbackRegistry>,
    timeout: Duration,
}

impl Bridge {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            registry: Arc::new(CallbackRegistry::new()),
            timeout,
        }
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    pub async fn fetch<T: DeserializeOwned>(&self, mut url: Url) -> Result<T, SearchError> {
        let name = next_callback_name();
        url.query_pairs_mut().append_pair("callback", &name);

        let rx = self.registry.register(&name);
        // Reclaims the entry even if this future is dropped before settling
        let _guard = PendingGuard {
            registry: &self.registry,
            name: &name,
        };

        let http = self.http.clone();
        let registry = Arc::clone(&self.registry);
        let task_name = name.clone();
        // Slightly more than our own timeout, so the caller-side deadline is
        // the one that decides the error while a hung transport still gets
        // reaped shortly after.
        let deadline = self.timeout + Duration::from_millis(100);
        tokio::spawn(async move {
            let delivered = match Self::transport(&http, url, &task_name, deadline).await {
                Ok(payload) => registry.complete(&task_name, payload),
                Err(err) => registry.fail(&task_name, err),
            };
            if !delivered {
                log::debug!("callback {task_name} arrived after its request settled");
            }
        });

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(Ok(payload))) => {
                serde_json::from_value(payload).map_err(|_| SearchError::InvalidSearchResult)
            }
            Ok(Ok(Err(err))) => Err(err),
            Ok(Err(_)) => Err(SearchError::Canceled),
            Err(_) => Err(SearchError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    async fn transport(
        http: &reqwest::Client,
        url: Url,
        name: &str,
        deadline: Duration,
    ) -> Result<Value, SearchError> {
        // The transport is bounded on its own so a hung endpoint cannot pin
        // this task forever.
        let body = http
            .get(url)
            .timeout(deadline)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        strip_callback_padding(&body, name)
    }
}
