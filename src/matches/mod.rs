//! Match entities and lazy detail resolution
//!
//! A `PlaceMatch` is one normalized candidate result. The remote variant
//! caches its resolved detail payload; the on-device variant resolves
//! through the platform engine on every call.

use crate::config::RemoteSettings;
use crate::error::{FailureCallback, PlaceError};
use crate::locales::Language;
use crate::network::{endpoint, JsonTransport};
use crate::providers::ondevice::{CompletionEngine, DeviceCompletion};
use crate::providers::remote::REMOTE_PROVIDER_NAME;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Opaque full place payload returned by a successful detail resolution
pub type DetailPayload = serde_json::Value;

/// Success callback slot for detail resolution
pub type DetailCallback = Arc<dyn Fn(Arc<DetailPayload>) + Send + Sync>;

/// One candidate search result from either backend
#[derive(Clone)]
pub enum PlaceMatch {
    Remote(RemoteMatch),
    OnDevice(DeviceMatch),
}

impl PlaceMatch {
    /// Primary display label
    pub fn primary_label(&self) -> &str {
        match self {
            PlaceMatch::Remote(m) => &m.primary,
            PlaceMatch::OnDevice(m) => &m.primary,
        }
    }

    /// Secondary display label
    pub fn secondary_label(&self) -> &str {
        match self {
            PlaceMatch::Remote(m) => &m.secondary,
            PlaceMatch::OnDevice(m) => &m.secondary,
        }
    }

    /// Lazily resolve this match into its full detail payload.
    ///
    /// Returns immediately; the outcome arrives through the callbacks.
    /// The on-device engine owns its own timing, so `timeout` only
    /// applies to the remote variant. Must be called within a tokio
    /// runtime.
    pub fn detail(&self, timeout: Duration, on_success: DetailCallback, on_fail: FailureCallback) {
        match self {
            PlaceMatch::Remote(m) => m.detail(timeout, on_success, on_fail),
            PlaceMatch::OnDevice(m) => m.detail(on_success, on_fail),
        }
    }
}

impl fmt::Debug for PlaceMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceMatch::Remote(m) => fmt::Debug::fmt(m, f),
            PlaceMatch::OnDevice(m) => fmt::Debug::fmt(m, f),
        }
    }
}

/// Match produced by the remote autocomplete provider.
///
/// Carries everything needed to resolve itself later: the stable place
/// identifier, the transport handle, the remote settings, and the
/// language recorded at match-creation time.
#[derive(Clone)]
pub struct RemoteMatch {
    /// Stable place identifier used for detail resolution
    pub place_id: String,
    /// Full human-readable description
    pub description: String,
    /// Primary display label
    pub primary: String,
    /// Secondary display label
    pub secondary: String,
    /// Result-type tags, copied verbatim from the payload
    pub types: Vec<String>,
    language: Language,
    transport: Arc<dyn JsonTransport>,
    remote: Arc<RemoteSettings>,
    // Fills at most once; clones of this match share the slot.
    detail: Arc<OnceCell<Arc<DetailPayload>>>,
}

impl RemoteMatch {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        place_id: String,
        description: String,
        primary: String,
        secondary: String,
        types: Vec<String>,
        language: Language,
        transport: Arc<dyn JsonTransport>,
        remote: Arc<RemoteSettings>,
    ) -> Self {
        Self {
            place_id,
            description,
            primary,
            secondary,
            types,
            language,
            transport,
            remote,
            detail: Arc::new(OnceCell::new()),
        }
    }

    /// Language this match was fetched with
    pub fn language(&self) -> Language {
        self.language
    }

    /// Resolved detail payload, if a previous resolution succeeded
    pub fn cached_detail(&self) -> Option<Arc<DetailPayload>> {
        self.detail.get().cloned()
    }

    /// Resolve the full detail payload for this match.
    ///
    /// A cached payload is delivered synchronously and no transport call
    /// is made. On transport failure the cache stays empty, so a later
    /// call may retry.
    pub fn detail(&self, timeout: Duration, on_success: DetailCallback, on_fail: FailureCallback) {
        if let Some(cached) = self.detail.get() {
            debug!("detail cache hit for {}", self.place_id);
            on_success(cached.clone());
            return;
        }

        let key = match self.remote.api_key.clone() {
            Some(key) => key,
            None => {
                on_fail(PlaceError::MissingCredential {
                    service: REMOTE_PROVIDER_NAME,
                });
                return;
            }
        };

        let this = self.clone();
        tokio::spawn(async move {
            let url = match endpoint(&this.remote.base_url, &["place", "details", "json"]) {
                Ok(url) => url,
                Err(e) => {
                    on_fail(PlaceError::Transport(e));
                    return;
                }
            };
            let params = [
                ("placeid", this.place_id.clone()),
                ("key", key),
                ("language", this.language.code().to_string()),
            ];

            match this.transport.get_json(&url, &params, timeout).await {
                Err(e) => on_fail(PlaceError::Transport(e)),
                Ok(json) => match json.get("result") {
                    None | Some(serde_json::Value::Null) => {
                        on_fail(PlaceError::NoDataAvailable)
                    }
                    Some(result) => {
                        let payload = Arc::new(result.clone());
                        // A racing resolution keeps the first stored value.
                        let stored = this.detail.get_or_init(|| payload).clone();
                        on_success(stored);
                    }
                },
            }
        });
    }
}

impl fmt::Debug for RemoteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteMatch")
            .field("place_id", &self.place_id)
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .field("types", &self.types)
            .finish()
    }
}

/// Match produced by the on-device completion provider.
///
/// Wraps the native completion it came from; detail resolution goes back
/// through the same engine and is not cached across calls.
#[derive(Clone)]
pub struct DeviceMatch {
    /// Primary display label
    pub primary: String,
    /// Secondary display label (derived when the native subtitle is empty)
    pub secondary: String,
    completion: DeviceCompletion,
    engine: Arc<dyn CompletionEngine>,
}

impl DeviceMatch {
    pub fn new(completion: DeviceCompletion, engine: Arc<dyn CompletionEngine>) -> Self {
        let secondary = derive_secondary(&completion.title, &completion.subtitle);
        Self {
            primary: completion.title.clone(),
            secondary,
            completion,
            engine,
        }
    }

    /// The native completion this match wraps
    pub fn completion(&self) -> &DeviceCompletion {
        &self.completion
    }

    /// Resolve this match through the device engine. No network key is
    /// required and nothing is memoized across calls.
    pub fn detail(&self, on_success: DetailCallback, on_fail: FailureCallback) {
        let engine = self.engine.clone();
        let completion = self.completion.clone();
        tokio::spawn(async move {
            match engine.resolve(&completion).await {
                Err(e) => on_fail(PlaceError::Platform(e.to_string())),
                Ok(items) => match items.into_iter().next() {
                    None => on_fail(PlaceError::NoDataAvailable),
                    Some(item) => on_success(Arc::new(item)),
                },
            }
        });
    }
}

impl fmt::Debug for DeviceMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceMatch")
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .finish()
    }
}

/// Derive a secondary label when the native completion has none: last
/// comma-separated segment of the title, trimmed.
fn derive_secondary(title: &str, subtitle: &str) -> String {
    if !subtitle.is_empty() {
        return subtitle.to_string();
    }
    title.rsplit(',').next().unwrap_or(title).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    struct MockTransport {
        calls: AtomicUsize,
        responses: Mutex<VecDeque<anyhow::Result<serde_json::Value>>>,
    }

    impl MockTransport {
        fn new(responses: Vec<anyhow::Result<serde_json::Value>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                responses: Mutex::new(responses.into()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JsonTransport for MockTransport {
        async fn get_json(
            &self,
            _url: &str,
            _params: &[(&str, String)],
            _timeout: Duration,
        ) -> anyhow::Result<serde_json::Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("no scripted response")))
        }
    }

    fn remote_match(transport: Arc<MockTransport>, api_key: Option<&str>) -> RemoteMatch {
        let remote = Arc::new(RemoteSettings {
            api_key: api_key.map(String::from),
            base_url: "https://places.example.com/api".to_string(),
        });
        RemoteMatch::new(
            "pid-1".to_string(),
            "Springfield, IL, USA".to_string(),
            "Springfield".to_string(),
            "IL, USA".to_string(),
            vec!["locality".to_string()],
            Language::English,
            transport,
            remote,
        )
    }

    #[test]
    fn test_derive_secondary_from_title() {
        assert_eq!(derive_secondary("Springfield, IL", ""), "IL");
        assert_eq!(derive_secondary("Paris, Île-de-France, France", ""), "France");
        assert_eq!(derive_secondary("Tokyo", ""), "Tokyo");
    }

    #[test]
    fn test_native_subtitle_kept_verbatim() {
        assert_eq!(derive_secondary("Springfield, IL", "Illinois, USA"), "Illinois, USA");
    }

    #[tokio::test]
    async fn test_remote_detail_cached_after_first_resolution() {
        let transport = MockTransport::new(vec![Ok(json!({
            "status": "OK",
            "result": {"name": "Springfield"}
        }))]);
        let m = remote_match(transport.clone(), Some("key"));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let tx2 = tx.clone();
        m.detail(
            Duration::from_secs(5),
            Arc::new(move |payload| {
                let _ = tx2.send(payload);
            }),
            Arc::new(|err| panic!("unexpected failure: {err}")),
        );
        let first = rx.recv().await.unwrap();
        assert_eq!(first["name"], "Springfield");
        assert_eq!(transport.calls(), 1);

        // Second call resolves synchronously from the cache.
        let hit = Arc::new(AtomicBool::new(false));
        let hit2 = hit.clone();
        let first2 = first.clone();
        m.detail(
            Duration::from_secs(5),
            Arc::new(move |payload| {
                assert_eq!(payload, first2);
                hit2.store(true, Ordering::SeqCst);
            }),
            Arc::new(|err| panic!("unexpected failure: {err}")),
        );
        assert!(hit.load(Ordering::SeqCst));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_remote_detail_missing_key_is_synchronous() {
        let transport = MockTransport::new(vec![]);
        let m = remote_match(transport.clone(), None);

        let failed = Arc::new(AtomicBool::new(false));
        let failed2 = failed.clone();
        m.detail(
            Duration::from_secs(5),
            Arc::new(|_| panic!("unexpected success")),
            Arc::new(move |err| {
                assert_eq!(err.kind(), "missing_credential");
                failed2.store(true, Ordering::SeqCst);
            }),
        );
        assert!(failed.load(Ordering::SeqCst));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_detail_failure_leaves_cache_empty() {
        let transport = MockTransport::new(vec![
            Err(anyhow!("connection reset")),
            Ok(json!({"result": {"name": "retry"}})),
        ]);
        let m = remote_match(transport.clone(), Some("key"));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let err_tx = tx.clone();
        m.detail(
            Duration::from_secs(5),
            Arc::new(|_| panic!("unexpected success")),
            Arc::new(move |err| {
                let _ = err_tx.send(err.kind());
            }),
        );
        assert_eq!(rx.recv().await.unwrap(), "transport");
        assert!(m.cached_detail().is_none());

        // Retry succeeds and populates the cache.
        let (ok_tx, mut ok_rx) = mpsc::unbounded_channel();
        m.detail(
            Duration::from_secs(5),
            Arc::new(move |payload| {
                let _ = ok_tx.send(payload);
            }),
            Arc::new(|err| panic!("unexpected failure: {err}")),
        );
        let payload = ok_rx.recv().await.unwrap();
        assert_eq!(payload["name"], "retry");
        assert!(m.cached_detail().is_some());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_remote_detail_without_result_is_no_data() {
        let transport = MockTransport::new(vec![Ok(json!({"status": "OK"}))]);
        let m = remote_match(transport, Some("key"));

        let (tx, mut rx) = mpsc::unbounded_channel();
        m.detail(
            Duration::from_secs(5),
            Arc::new(|_| panic!("unexpected success")),
            Arc::new(move |err| {
                let _ = tx.send(err.kind());
            }),
        );
        assert_eq!(rx.recv().await.unwrap(), "no_data");
    }

    struct MockEngine {
        items: Vec<DetailPayload>,
    }

    #[async_trait]
    impl CompletionEngine for MockEngine {
        fn set_query_fragment(
            &self,
            _fragment: &str,
            _observer: Arc<dyn crate::providers::ondevice::CompletionObserver>,
        ) {
        }

        fn cancel(&self) {}

        async fn resolve(&self, _completion: &DeviceCompletion) -> anyhow::Result<Vec<DetailPayload>> {
            Ok(self.items.clone())
        }
    }

    #[tokio::test]
    async fn test_device_detail_takes_first_item() {
        let engine = Arc::new(MockEngine {
            items: vec![json!({"name": "first"}), json!({"name": "second"})],
        });
        let m = DeviceMatch::new(
            DeviceCompletion {
                title: "Springfield, IL".to_string(),
                subtitle: String::new(),
            },
            engine,
        );
        assert_eq!(m.secondary, "IL");

        let (tx, mut rx) = mpsc::unbounded_channel();
        m.detail(
            Arc::new(move |payload| {
                let _ = tx.send(payload);
            }),
            Arc::new(|err| panic!("unexpected failure: {err}")),
        );
        assert_eq!(rx.recv().await.unwrap()["name"], "first");
    }

    #[tokio::test]
    async fn test_device_detail_empty_is_no_data() {
        let engine = Arc::new(MockEngine { items: vec![] });
        let m = DeviceMatch::new(
            DeviceCompletion {
                title: "Nowhere".to_string(),
                subtitle: "At all".to_string(),
            },
            engine,
        );

        let (tx, mut rx) = mpsc::unbounded_channel();
        m.detail(
            Arc::new(|_| panic!("unexpected success")),
            Arc::new(move |err| {
                let _ = tx.send(err.kind());
            }),
        );
        assert_eq!(rx.recv().await.unwrap(), "no_data");
    }
}
