//! Remote HTTP autocomplete provider
//!
//! Single-shot: one `execute()` fires exactly one of success/failure.
//! Drives the JSON transport collaborator against the remote place
//! service's autocomplete endpoint.

use super::traits::{CallbackSink, Delivery, ProviderInvocation, SearchProvider, SearchQuery};
use crate::config::RemoteSettings;
use crate::error::PlaceError;
use crate::locales::Language;
use crate::matches::{PlaceMatch, RemoteMatch};
use crate::network::{endpoint, JsonTransport};
use serde::Deserialize;
use std::sync::Arc;
use tokio::task::AbortHandle;
use tracing::debug;

/// Service name reported in `MissingCredential` errors
pub const REMOTE_PROVIDER_NAME: &str = "remote-places";

/// The literal success marker in the autocomplete payload
const STATUS_OK: &str = "OK";

/// Autocomplete provider backed by the remote place service
pub struct RemotePlacesProvider {
    transport: Arc<dyn JsonTransport>,
    settings: Arc<RemoteSettings>,
}

impl RemotePlacesProvider {
    pub fn new(transport: Arc<dyn JsonTransport>, settings: RemoteSettings) -> Self {
        Self {
            transport,
            settings: Arc::new(settings),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    place_id: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    structured_formatting: StructuredFormatting,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StructuredFormatting {
    #[serde(default)]
    main_text: String,
    #[serde(default)]
    secondary_text: String,
}

impl SearchProvider for RemotePlacesProvider {
    fn name(&self) -> &'static str {
        REMOTE_PROVIDER_NAME
    }

    fn delivery(&self) -> Delivery {
        Delivery::SingleShot
    }

    fn execute(
        &self,
        query: &SearchQuery,
        sink: CallbackSink,
    ) -> Result<Box<dyn ProviderInvocation>, PlaceError> {
        let key = self
            .settings
            .api_key
            .clone()
            .ok_or(PlaceError::MissingCredential {
                service: REMOTE_PROVIDER_NAME,
            })?;

        let language = query.language.unwrap_or_default();
        let transport = self.transport.clone();
        let settings = self.settings.clone();
        let input = query.input.clone();
        let timeout = query.timeout;

        debug!("autocomplete '{}' lang={}", input, language);

        let task = tokio::spawn(async move {
            let url = match endpoint(&settings.base_url, &["place", "autocomplete", "json"]) {
                Ok(url) => url,
                Err(e) => {
                    sink.deliver_failure(PlaceError::Transport(e));
                    return;
                }
            };
            let params = [
                ("input", input),
                ("language", language.code().to_string()),
                ("key", key),
            ];

            match transport.get_json(&url, &params, timeout).await {
                Err(e) => sink.deliver_failure(PlaceError::Transport(e)),
                Ok(json) => match map_autocomplete(json, language, &transport, &settings) {
                    Ok(matches) => sink.deliver_matches(matches),
                    Err(e) => sink.deliver_failure(e),
                },
            }
        });

        Ok(Box::new(RemoteInvocation {
            task: task.abort_handle(),
        }))
    }
}

/// Map a decoded autocomplete payload into matches, preserving order
fn map_autocomplete(
    json: serde_json::Value,
    language: Language,
    transport: &Arc<dyn JsonTransport>,
    settings: &Arc<RemoteSettings>,
) -> Result<Vec<PlaceMatch>, PlaceError> {
    let decoded: AutocompleteResponse =
        serde_json::from_value(json).map_err(|e| PlaceError::Transport(e.into()))?;

    if decoded.status != STATUS_OK {
        return Err(PlaceError::ProviderStatus {
            status: decoded.status,
        });
    }

    let matches = decoded
        .predictions
        .into_iter()
        .filter_map(|p| {
            // Without a stable identifier the match could never be
            // resolved, so the entry is dropped rather than failed.
            let place_id = p.place_id?;
            Some(PlaceMatch::Remote(RemoteMatch::new(
                place_id,
                p.description,
                p.structured_formatting.main_text,
                p.structured_formatting.secondary_text,
                p.types,
                language,
                transport.clone(),
                settings.clone(),
            )))
        })
        .collect();

    Ok(matches)
}

struct RemoteInvocation {
    task: AbortHandle,
}

impl ProviderInvocation for RemoteInvocation {
    fn cancel(&self) {
        self.task.abort();
    }
}
