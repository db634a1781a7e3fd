//! Error types shared across providers and matches

use std::sync::Arc;
use thiserror::Error;

/// Why a search or detail operation failed.
///
/// Errors are carried, never thrown: every failure is delivered exactly
/// once through the relevant failure callback, and the caller decides
/// whether to retry by issuing a new `execute()`/`detail()` call.
/// Cancellation is not an error; it only suppresses further deliveries.
#[derive(Debug, Error)]
pub enum PlaceError {
    /// Required API key is absent; detected synchronously, before any
    /// collaborator call is made.
    #[error("missing API key for {service}")]
    MissingCredential {
        /// Name of the provider that needed the credential
        service: &'static str,
    },

    /// The transport collaborator failed; its error passes through
    /// unchanged.
    #[error("transport failure: {0}")]
    Transport(anyhow::Error),

    /// The backend responded but signaled a non-success status.
    #[error("provider returned status {status}")]
    ProviderStatus {
        /// Raw status string from the payload
        status: String,
    },

    /// A detail resolution completed without producing a usable item.
    #[error("no data available")]
    NoDataAvailable,

    /// Passthrough of a platform collaborator error.
    #[error("platform error: {0}")]
    Platform(String),
}

impl PlaceError {
    /// Short tag for logging and assertions
    pub fn kind(&self) -> &'static str {
        match self {
            PlaceError::MissingCredential { .. } => "missing_credential",
            PlaceError::Transport(_) => "transport",
            PlaceError::ProviderStatus { .. } => "provider_status",
            PlaceError::NoDataAvailable => "no_data",
            PlaceError::Platform(_) => "platform",
        }
    }
}

/// Failure callback slot shared by search and detail resolution
pub type FailureCallback = Arc<dyn Fn(PlaceError) + Send + Sync>;
