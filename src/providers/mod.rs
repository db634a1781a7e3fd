//! Search providers
//!
//! A provider builds a backend-specific query, drives its collaborator,
//! maps the outcome into `PlaceMatch` entities, and reports once
//! (remote) or repeatedly (on-device) through the shared callback
//! contract.

pub mod ondevice;
pub mod remote;
mod traits;

pub use ondevice::{CompletionEngine, CompletionObserver, DeviceCompletion, OnDeviceProvider};
pub use remote::RemotePlacesProvider;
pub use traits::{
    CallbackSink, Delivery, MatchesCallback, ProviderInvocation, SearchProvider, SearchQuery,
};
