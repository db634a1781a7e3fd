//! Public search request handle
//!
//! A `SearchRequest` is the caller-owned entry point: it holds the input
//! text, options, and callback slots, and owns at most one active
//! provider invocation at a time.

use crate::error::{FailureCallback, PlaceError};
use crate::locales::Language;
use crate::matches::PlaceMatch;
use crate::providers::{CallbackSink, MatchesCallback, ProviderInvocation, SearchProvider, SearchQuery};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// What `execute()` does when a previous invocation from the same
/// request is still active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Leave the prior invocation running; it may still deliver until it
    /// completes. Overlapping queries are the caller's to sort out.
    #[default]
    Allow,
    /// Cancel the prior invocation before starting the new one.
    CancelPrevious,
}

/// A search request bound to one provider.
///
/// `execute()` and `cancel()` return immediately; outcomes arrive
/// through the callback slots on whatever thread the provider's
/// collaborator chooses.
pub struct SearchRequest {
    provider: Arc<dyn SearchProvider>,
    input: String,
    timeout: Duration,
    language: Option<Language>,
    overlap: OverlapPolicy,
    on_success: Option<MatchesCallback>,
    on_failure: Option<FailureCallback>,
    active: Mutex<Option<ActiveInvocation>>,
}

struct ActiveInvocation {
    cancelled: Arc<AtomicBool>,
    handle: Box<dyn ProviderInvocation>,
}

impl SearchRequest {
    pub fn new(provider: Arc<dyn SearchProvider>, input: impl Into<String>) -> Self {
        Self {
            provider,
            input: input.into(),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
            language: None,
            overlap: OverlapPolicy::default(),
            on_success: None,
            on_failure: None,
            active: Mutex::new(None),
        }
    }

    /// Timeout passed through to the provider's collaborator
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Language for the remote backend (English when unset)
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Behavior of `execute()` while a prior invocation is in flight
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap = policy;
        self
    }

    /// Success callback slot
    pub fn on_success(mut self, cb: impl Fn(Vec<PlaceMatch>) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(cb));
        self
    }

    /// Failure callback slot
    pub fn on_failure(mut self, cb: impl Fn(PlaceError) + Send + Sync + 'static) -> Self {
        self.on_failure = Some(Arc::new(cb));
        self
    }

    /// Current input text
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input text, typically before re-executing as the
    /// user types
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Start a provider invocation with the current input and options.
    ///
    /// Returns immediately. A provider that refuses to start (missing
    /// credential) fails synchronously through the failure slot before
    /// this method returns, and no invocation is stored. Must be called
    /// within a tokio runtime.
    pub fn execute(&self) {
        if self.overlap == OverlapPolicy::CancelPrevious {
            self.cancel();
        }

        let on_success: MatchesCallback = match &self.on_success {
            Some(cb) => cb.clone(),
            None => Arc::new(|_| {}),
        };
        let on_failure: FailureCallback = match &self.on_failure {
            Some(cb) => cb.clone(),
            None => Arc::new(|_| {}),
        };

        let cancelled = Arc::new(AtomicBool::new(false));
        let sink = CallbackSink::new(cancelled.clone(), on_success, on_failure.clone());
        let query = SearchQuery {
            input: self.input.clone(),
            language: self.language,
            timeout: self.timeout,
        };

        match self.provider.execute(&query, sink) {
            Ok(handle) => {
                // Under `Allow` a still-running prior invocation keeps its
                // own flag and stays deliverable; only the newest one is
                // reachable through cancel().
                *self.active.lock().unwrap() = Some(ActiveInvocation { cancelled, handle });
            }
            Err(err) => {
                debug!("{} refused to start: {}", self.provider.name(), err);
                on_failure(err);
            }
        }
    }

    /// Cancel the active invocation, if any. Idempotent; a no-op when
    /// nothing is in flight. Deliveries attempted after this returns are
    /// dropped by the sink.
    pub fn cancel(&self) {
        let taken = self.active.lock().unwrap().take();
        if let Some(active) = taken {
            debug!("cancelling active {} invocation", self.provider.name());
            active.cancelled.store(true, Ordering::SeqCst);
            active.handle.cancel();
        }
    }
}
