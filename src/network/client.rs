//! HTTP client for talking to the remote place service

use super::JsonTransport;
use crate::config::OutgoingSettings;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper with placefinder-specific configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: Duration::from_secs_f64(settings.request_timeout),
        })
    }

    /// Default per-request timeout from the outgoing settings
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}

#[async_trait]
impl JsonTransport for HttpClient {
    async fn get_json(
        &self,
        url: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<serde_json::Value> {
        debug!("GET {} ({} params, timeout {:?})", url, params.len(), timeout);

        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(timeout)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error: {}", status.as_u16());
        }

        let text = response.text().await?;
        let json = serde_json::from_str(&text)?;
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/place/autocomplete/json"))
            .and(query_param("input", "coffee shop"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"status":"OK","predictions":[]}"#),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/place/autocomplete/json", server.uri());
        let params = [("input", "coffee shop".to_string())];
        let json = client
            .get_json(&url, &params, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(json["status"], "OK");
    }

    #[tokio::test]
    async fn test_get_json_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let result = client
            .get_json(&server.uri(), &[], Duration::from_secs(5))
            .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_get_json_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let result = client
            .get_json(&server.uri(), &[], Duration::from_secs(5))
            .await;

        assert!(result.is_err());
    }
}
