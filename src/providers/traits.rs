//! Provider traits and the shared callback contract

use crate::error::{FailureCallback, PlaceError};
use crate::locales::Language;
use crate::matches::PlaceMatch;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Success callback slot for a search invocation
pub type MatchesCallback = Arc<dyn Fn(Vec<PlaceMatch>) + Send + Sync>;

/// How many success deliveries one invocation may produce.
///
/// The difference is part of the contract: callers of a `Streaming`
/// provider must not assume exactly-once delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Exactly one of success/failure fires per invocation
    SingleShot,
    /// Success may fire repeatedly, each delivery carrying the complete
    /// current result set rather than a delta
    Streaming,
}

/// Query snapshot handed to a provider at execute time
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Free-text input
    pub input: String,
    /// Language for the remote backend; English when unset
    pub language: Option<Language>,
    /// Timeout passed through to the collaborator, which enforces it
    pub timeout: Duration,
}

/// Callback pair plus the cancellation flag for one invocation.
///
/// The flag is set by `SearchRequest::cancel`; any delivery attempted
/// after that is dropped here, on the request side, regardless of what
/// the collaborator does. This closes the race between cancellation and
/// a callback already in flight.
#[derive(Clone)]
pub struct CallbackSink {
    cancelled: Arc<AtomicBool>,
    on_success: MatchesCallback,
    on_failure: FailureCallback,
}

impl CallbackSink {
    pub fn new(
        cancelled: Arc<AtomicBool>,
        on_success: MatchesCallback,
        on_failure: FailureCallback,
    ) -> Self {
        Self {
            cancelled,
            on_success,
            on_failure,
        }
    }

    /// Whether the owning invocation has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Deliver a result set through the success slot
    pub fn deliver_matches(&self, matches: Vec<PlaceMatch>) {
        if self.is_cancelled() {
            debug!("dropping {} matches delivered after cancel", matches.len());
            return;
        }
        (self.on_success)(matches);
    }

    /// Deliver an error through the failure slot
    pub fn deliver_failure(&self, error: PlaceError) {
        if self.is_cancelled() {
            debug!("dropping {} failure delivered after cancel", error.kind());
            return;
        }
        (self.on_failure)(error);
    }
}

/// Handle to one in-flight provider invocation
pub trait ProviderInvocation: Send + Sync {
    /// Best-effort cancellation, forwarded to the collaborator. Does not
    /// guarantee suppression of a callback already in flight; the sink's
    /// cancellation flag handles that side.
    fn cancel(&self);
}

/// Backend-specific driver turning a query into `PlaceMatch` entities
pub trait SearchProvider: Send + Sync {
    /// Provider name, also used in `MissingCredential` errors
    fn name(&self) -> &'static str;

    /// Delivery cardinality of this provider
    fn delivery(&self) -> Delivery;

    /// Start one invocation. Returns immediately; outcomes arrive
    /// through the sink on whatever thread the collaborator chooses.
    /// A returned error means no invocation was started and nothing was
    /// sent to the collaborator.
    fn execute(
        &self,
        query: &SearchQuery,
        sink: CallbackSink,
    ) -> Result<Box<dyn ProviderInvocation>, PlaceError>;
}
