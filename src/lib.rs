//! Placefinder: place search over interchangeable autocomplete providers
//!
//! One `SearchRequest` abstraction fronts two structurally different
//! backends: a remote HTTP autocomplete service (single-shot) and an
//! on-device completion engine (streaming). Matches resolve lazily into
//! full place details via a second asynchronous call.

pub mod config;
pub mod error;
pub mod locales;
pub mod matches;
pub mod network;
pub mod providers;
pub mod request;

pub use config::Settings;
pub use error::PlaceError;
pub use locales::Language;
pub use matches::PlaceMatch;
pub use providers::{Delivery, SearchProvider};
pub use request::{OverlapPolicy, SearchRequest};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for provider requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;
