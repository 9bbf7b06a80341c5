//! Endpoint lookup for catalog channels
//!
//! Each channel is looked up in stages: API endpoints by resource id, API
//! endpoints by slug, then the channel page itself. The first stage that
//! yields any stream URL wins.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info};

use super::ssr::ChannelRef;
use super::tree::string_leaves;
use crate::errors::ParseResult;
use crate::extract::patterns::{CompiledPattern, UrlPattern};
use crate::utils::url::UrlUtils;
use crate::utils::DocumentFetcher;

/// Queries endpoints for a channel's stream URLs
pub struct EndpointScanner {
    page_url: String,
    api_templates: Vec<String>,
    slug_templates: Vec<String>,
    m3u8: CompiledPattern,
}

impl EndpointScanner {
    pub fn new(page_url: &str, api_templates: &[String], slug_templates: &[String]) -> ParseResult<Self> {
        Ok(Self {
            page_url: page_url.to_string(),
            api_templates: api_templates.to_vec(),
            slug_templates: slug_templates.to_vec(),
            m3u8: UrlPattern::http_m3u8().compile()?,
        })
    }

    /// Stream URLs for `channel`, deduplicated in first-seen order
    pub async fn scan(&self, fetcher: &dyn DocumentFetcher, channel: &ChannelRef) -> Vec<String> {
        if let Some(id) = &channel.resource_id {
            let endpoints = fill_templates(&self.api_templates, "{id}", id);
            let found = self.scan_endpoints(fetcher, &endpoints).await;
            if !found.is_empty() {
                info!("'{}': {} stream(s) via API by id", channel.title(), found.len());
                return found;
            }
        }

        if let Some(slug) = channel.slug() {
            let endpoints = fill_templates(&self.slug_templates, "{slug}", &slug);
            let found = self.scan_endpoints(fetcher, &endpoints).await;
            if !found.is_empty() {
                info!("'{}': {} stream(s) via API by slug", channel.title(), found.len());
                return found;
            }
        }

        if let Some(uri) = &channel.uri {
            match UrlUtils::join(&self.page_url, uri) {
                Ok(page) => {
                    let found = self.scan_endpoints(fetcher, &[page]).await;
                    if !found.is_empty() {
                        info!("'{}': {} stream(s) on channel page", channel.title(), found.len());
                    }
                    return found;
                }
                Err(e) => debug!("Cannot resolve channel uri '{}': {}", uri, e),
            }
        }

        Vec::new()
    }

    /// Every endpoint of one stage is tried; failures are skipped
    async fn scan_endpoints(&self, fetcher: &dyn DocumentFetcher, endpoints: &[String]) -> Vec<String> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        for endpoint in endpoints {
            match fetcher.fetch_text(endpoint).await {
                Ok(body) => {
                    for url in stream_urls_in(&body, &self.m3u8) {
                        if seen.insert(url.clone()) {
                            found.push(url);
                        }
                    }
                }
                Err(e) => debug!("Endpoint skipped: {}", e),
            }
        }
        found
    }
}

fn fill_templates(templates: &[String], placeholder: &str, value: &str) -> Vec<String> {
    templates
        .iter()
        .map(|template| template.replace(placeholder, value))
        .collect()
}

/// Stream URLs in a response body
///
/// JSON bodies contribute the `.m3u8` matches of their serialized form plus
/// any `http` string value that looks like a stream. Other bodies contribute
/// their `.m3u8` matches.
pub fn stream_urls_in(body: &str, m3u8: &CompiledPattern) -> Vec<String> {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return m3u8.find_all(body).map(str::to_string).collect();
    };

    let serialized = json.to_string();
    let mut urls: Vec<String> = m3u8.find_all(&serialized).map(str::to_string).collect();
    urls.extend(
        string_leaves(&json)
            .into_iter()
            .filter(|s| looks_like_stream(s))
            .map(str::to_string),
    );
    urls
}

fn looks_like_stream(value: &str) -> bool {
    value.starts_with("http")
        && (value.contains(".m3u8")
            || value.contains("/live/")
            || value.ends_with(".ts")
            || value.ends_with(".mp4"))
}
