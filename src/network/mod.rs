//! HTTP networking module
//!
//! The transport collaborator seam: providers speak to `JsonTransport`,
//! production code plugs in `HttpClient`, tests plug in mocks.

mod client;

pub use client::HttpClient;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Opaque "fetch JSON at URL" collaborator.
///
/// One HTTP GET, decoded JSON or an error. Timeout enforcement lives
/// behind this trait; callers neither measure nor retry.
#[async_trait]
pub trait JsonTransport: Send + Sync {
    /// Perform a GET request and decode the body as JSON
    async fn get_json(
        &self,
        url: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<serde_json::Value>;
}

/// Join path segments onto a base URL, tolerating a trailing slash
pub fn endpoint(base: &str, segments: &[&str]) -> Result<String> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("base URL cannot take a path: {}", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let url = endpoint("https://maps.googleapis.com/maps/api", &["place", "autocomplete", "json"]).unwrap();
        assert_eq!(url, "https://maps.googleapis.com/maps/api/place/autocomplete/json");
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let url = endpoint("https://example.com/api/", &["place", "details", "json"]).unwrap();
        assert_eq!(url, "https://example.com/api/place/details/json");
    }

    #[test]
    fn test_endpoint_rejects_invalid_base() {
        assert!(endpoint("not a url", &["x"]).is_err());
    }
}
