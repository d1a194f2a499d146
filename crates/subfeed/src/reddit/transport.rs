use std::time::Duration;

use crate::prelude::*;
use subfeed_core::reddit::config::WidgetConfig;
use subfeed_core::reddit::request::ListingRequest;

/// Longest response excerpt included in an error message
const ERROR_BODY_EXCERPT: usize = 256;

/// Executes one listing request and returns the body of a successful response
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, request: &ListingRequest) -> Result<String, Error>;
}

/// Proxy settings for listing requests
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProxyOptions {
    pub url: String,
    pub allow_insecure: bool,
}

/// `reqwest` backed transport, optionally routed through a proxy
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    proxied: bool,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(f!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            proxied: false,
        })
    }

    pub fn with_proxy(proxy: &ProxyOptions, timeout: Duration) -> Result<Self, Error> {
        let reqwest_proxy = reqwest::Proxy::all(&proxy.url)
            .map_err(|e| Error::Config(f!("invalid proxy URL {}: {e}", proxy.url)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .proxy(reqwest_proxy)
            .danger_accept_invalid_certs(proxy.allow_insecure)
            .build()
            .map_err(|e| Error::Network(f!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            proxied: true,
        })
    }

    /// A request URL template replaces the proxy; both are never used together
    pub fn for_config(
        config: &WidgetConfig,
        proxy: Option<&ProxyOptions>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        match proxy {
            Some(_) if !config.request_url_template.is_empty() => {
                log::warn!("request URL template is set, ignoring proxy");
                Self::new(timeout)
            }
            Some(proxy) => Self::with_proxy(proxy, timeout),
            None => Self::new(timeout),
        }
    }

    pub fn is_proxied(&self) -> bool {
        self.proxied
    }
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(ERROR_BODY_EXCERPT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

impl Transport for HttpTransport {
    async fn get(&self, request: &ListingRequest) -> Result<String, Error> {
        let mut builder = self.client.get(&request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(f!("Failed to fetch {}: {e}", request.url)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(f!("Failed to read response body: {e}")))?;

        if status != reqwest::StatusCode::OK {
            return Err(Error::Network(f!(
                "unexpected status code {} from {}, response: {}",
                status.as_u16(),
                request.url,
                excerpt(&body)
            )));
        }

        Ok(body)
    }
}
