use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use crate::config::HttpConfig;
use crate::errors::{AppError, AppResult, SourceError, SourceResult};
use crate::utils::url::UrlUtils;

/// Fetches a remote document as text
///
/// Any failure (transport, timeout, non-2xx) is a [`SourceError`]; callers
/// treat it as "no result" for that source.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> SourceResult<String>;
}

/// Default implementation of DocumentFetcher using reqwest
pub struct StandardHttpClient {
    client: Client,
}

impl StandardHttpClient {
    /// Create a client sending `headers` (plus User-Agent) on every request
    pub fn new(timeout: Duration, user_agent: &str, headers: &HashMap<String, String>) -> AppResult<Self> {
        let mut default_headers = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AppError::config(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AppError::config(format!("invalid value for header '{name}': {e}")))?;
            default_headers.insert(name, value);
        }
        if !user_agent.is_empty() {
            let value = HeaderValue::from_str(user_agent)
                .map_err(|e| AppError::config(format!("invalid user agent: {e}")))?;
            default_headers.insert(USER_AGENT, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| AppError::internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    pub fn from_config(config: &HttpConfig) -> AppResult<Self> {
        Self::new(config.timeout()?, &config.user_agent, &config.headers)
    }
}

#[async_trait]
impl DocumentFetcher for StandardHttpClient {
    async fn fetch_text(&self, url: &str) -> SourceResult<String> {
        let safe_url = UrlUtils::obfuscate_credentials(url);
        debug!("Fetching text content from: {}", safe_url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::timeout(&safe_url)
            } else {
                SourceError::network(&safe_url, UrlUtils::obfuscate_credentials(&e.to_string()))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::http(&safe_url, status.as_u16()));
        }

        let content = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::timeout(&safe_url)
            } else {
                SourceError::decode(&safe_url, e.to_string())
            }
        })?;

        debug!("Fetched {} characters from {}", content.len(), safe_url);
        Ok(content)
    }
}
