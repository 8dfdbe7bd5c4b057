//! Production transport backed by `reqwest`.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use url::Url;

use super::{RequestOptions, Response, Transport, TransportFailure};

/// Media type requested from the server.
const HAL_JSON: &str = "application/hal+json, application/json;q=0.9";

/// HTTP client that resolves hrefs against a base URL.
///
/// HAL hrefs are usually relative (`/orders/123`), so every uri is joined onto `base`
/// before the request is sent. Absolute hrefs replace the base entirely.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base: Url,
}

impl ReqwestTransport {
    /// Create a new transport with a default `reqwest` client.
    pub fn new(base: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    pub fn with_client(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, uri: &str, options: &RequestOptions) -> Result<Response, TransportFailure> {
        let url = self
            .base
            .join(uri)
            .map_err(|e| TransportFailure::new(0, format!("Invalid uri {uri}: {e}")))?;

        let mut request = self.client.get(url).header(ACCEPT, HAL_JSON);
        for (key, value) in &options.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportFailure::new(0, e.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.json::<serde_json::Value>().await.ok();
            let failure = TransportFailure::new(status.as_u16(), format!("GET {uri} returned {status}"));
            return Err(match body {
                Some(data) => failure.with_data(data),
                None => failure,
            });
        }

        let data = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TransportFailure::new(status.as_u16(), e.to_string()))?;
        Ok(Response {
            data,
            status: status.as_u16(),
        })
    }
}
