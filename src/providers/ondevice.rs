//! On-device completion provider
//!
//! Streaming: one `execute()` may fire success many times, once per
//! result-set update from the platform completion engine. Each delivery
//! carries the complete current set, not a delta. Available wherever a
//! `CompletionEngine` implementation is supplied; no network credential
//! is involved.

use super::traits::{CallbackSink, Delivery, ProviderInvocation, SearchProvider, SearchQuery};
use crate::error::PlaceError;
use crate::matches::{DetailPayload, DeviceMatch, PlaceMatch};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Service name used in logs
pub const ONDEVICE_PROVIDER_NAME: &str = "on-device";

/// A single native completion produced by the platform engine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceCompletion {
    /// Primary text of the completion
    pub title: String,
    /// Secondary text; may be empty, in which case a label is derived
    /// from the title at match construction
    pub subtitle: String,
}

/// Receives incremental outcomes from the completion engine, on whatever
/// thread the engine chooses
pub trait CompletionObserver: Send + Sync {
    /// The engine's current result set changed; `completions` is the
    /// entire set
    fn results_updated(&self, completions: Vec<DeviceCompletion>);

    /// The engine failed for the current fragment
    fn failed(&self, message: &str);
}

/// Opaque platform completion engine collaborator.
///
/// The crate drives any implementation of this trait but never
/// implements the platform side itself.
#[async_trait]
pub trait CompletionEngine: Send + Sync {
    /// Replace the current query fragment. Zero or more
    /// `results_updated` calls (or one `failed`) follow asynchronously
    /// until the fragment is replaced or cancelled.
    fn set_query_fragment(&self, fragment: &str, observer: Arc<dyn CompletionObserver>);

    /// Stop producing updates for the current fragment
    fn cancel(&self);

    /// Resolve one completion into zero-or-more result items; callers
    /// use the first
    async fn resolve(&self, completion: &DeviceCompletion) -> anyhow::Result<Vec<DetailPayload>>;
}

/// Provider backed by the on-device completion engine
pub struct OnDeviceProvider {
    engine: Arc<dyn CompletionEngine>,
}

impl OnDeviceProvider {
    pub fn new(engine: Arc<dyn CompletionEngine>) -> Self {
        Self { engine }
    }
}

struct SinkObserver {
    sink: CallbackSink,
    engine: Arc<dyn CompletionEngine>,
}

impl CompletionObserver for SinkObserver {
    fn results_updated(&self, completions: Vec<DeviceCompletion>) {
        debug!("on-device update: {} completions", completions.len());
        let matches = completions
            .into_iter()
            .map(|c| PlaceMatch::OnDevice(DeviceMatch::new(c, self.engine.clone())))
            .collect();
        self.sink.deliver_matches(matches);
    }

    fn failed(&self, message: &str) {
        self.sink
            .deliver_failure(PlaceError::Platform(message.to_string()));
    }
}

impl SearchProvider for OnDeviceProvider {
    fn name(&self) -> &'static str {
        ONDEVICE_PROVIDER_NAME
    }

    fn delivery(&self) -> Delivery {
        Delivery::Streaming
    }

    fn execute(
        &self,
        query: &SearchQuery,
        sink: CallbackSink,
    ) -> Result<Box<dyn ProviderInvocation>, PlaceError> {
        debug!("on-device fragment '{}'", query.input);
        let observer = Arc::new(SinkObserver {
            sink,
            engine: self.engine.clone(),
        });
        // The engine owns timing and threading from here on.
        self.engine.set_query_fragment(&query.input, observer);
        Ok(Box::new(DeviceInvocation {
            engine: self.engine.clone(),
        }))
    }
}

struct DeviceInvocation {
    engine: Arc<dyn CompletionEngine>,
}

impl ProviderInvocation for DeviceInvocation {
    fn cancel(&self) {
        self.engine.cancel();
    }
}
