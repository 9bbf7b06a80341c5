//! Channel discovery on server-rendered collection pages
//!
//! Collection pages embed their state as `window._SSR_CACHE_ = {...};`.
//! Channel cards live somewhere inside that tree with a `resource_type` of
//! `channel` or `channel_group`. Pages without the cache fall back to plain
//! `/channels/...` links.

use std::collections::HashMap;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};

use super::tree::collect_nodes;
use crate::errors::{ParseError, ParseResult};
use crate::utils::url::UrlUtils;

const SSR_MARKER: &str = "window._SSR_CACHE_";
const CHANNEL_RESOURCE_TYPES: &[&str] = &["channel", "channel_group"];

/// A channel card found on a collection page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelRef {
    pub name: Option<String>,
    pub resource_id: Option<String>,
    /// Site-relative page, e.g. `/channels/tnt`
    pub uri: Option<String>,
    pub deeplink: Option<String>,
}

impl ChannelRef {
    /// Name to write in the playlist
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .or(self.uri.as_deref())
            .or(self.deeplink.as_deref())
            .unwrap_or("Unknown")
    }

    /// Last path segment of `uri`
    pub fn slug(&self) -> Option<String> {
        self.uri.as_deref().and_then(UrlUtils::last_path_segment)
    }

    fn dedup_key(&self, raw: &Value) -> String {
        self.resource_id
            .clone()
            .or_else(|| self.uri.clone())
            .or_else(|| self.deeplink.clone())
            .unwrap_or_else(|| raw.to_string())
    }
}

const SSR_PATTERN: &str = r"(?s)window\._SSR_CACHE_\s*=\s*(\{.*?\});";
// `://` is left alone so URLs inside strings survive
const LINE_COMMENT_PATTERN: &str = r"(?m)(^|[^:])//[^\n]*";

/// Parse the `window._SSR_CACHE_` object embedded in `html`
///
/// The object literal runs up to the first `};`. Returns `None` when the
/// page has no cache or it cannot be parsed even after stripping `//`
/// comments.
pub fn extract_ssr_cache(html: &str) -> Option<Value> {
    if !html.contains(SSR_MARKER) {
        return None;
    }
    let ssr_re = Regex::new(SSR_PATTERN).ok()?;
    let raw = ssr_re.captures(html)?.get(1)?.as_str();
    match parse_ssr_literal(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring unparseable SSR cache: {}", e);
            None
        }
    }
}

fn parse_ssr_literal(raw: &str) -> ParseResult<Value> {
    match serde_json::from_str(raw) {
        Ok(value) => Ok(value),
        Err(first) => {
            debug!("SSR cache is not plain JSON ({}), retrying without comments", first);
            let comment_re = Regex::new(LINE_COMMENT_PATTERN)
                .map_err(|e| ParseError::pattern(LINE_COMMENT_PATTERN, e.to_string()))?;
            let cleaned = comment_re.replace_all(raw, "${1}");
            serde_json::from_str(&cleaned).map_err(|e| ParseError::json(SSR_MARKER, e.to_string()))
        }
    }
}

/// Channel cards anywhere in the SSR tree
///
/// Cards are deduplicated by resource id (then uri, then deeplink); a later
/// card replaces an earlier one but keeps its position.
pub fn find_channel_refs(ssr: &Value) -> Vec<ChannelRef> {
    let cards = collect_nodes(ssr, |node| {
        node.get("resource_type")
            .and_then(Value::as_str)
            .is_some_and(|kind| CHANNEL_RESOURCE_TYPES.contains(&kind))
    });

    let mut refs: Vec<ChannelRef> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for card in cards {
        let channel = ChannelRef {
            name: first_string(card, &["name", "additional_name", "title"]),
            resource_id: first_id(card, &["resource_id", "resourceId", "id"]),
            uri: first_string(card, &["uri"]),
            deeplink: first_string(card, &["deeplink"]),
        };
        let key = channel.dedup_key(card);
        match positions.get(&key) {
            Some(&index) => refs[index] = channel,
            None => {
                positions.insert(key, refs.len());
                refs.push(channel);
            }
        }
    }
    refs
}

fn first_string(node: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| node.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_id(node: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match node.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// `/channels/...` links, for pages without an SSR cache
pub fn anchor_channel_refs(html: &str) -> Vec<ChannelRef> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href^='/channels/']") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let text = anchor
                .text()
                .flat_map(|s| s.split_whitespace())
                .collect::<Vec<_>>()
                .join(" ");
            Some(ChannelRef {
                name: (!text.is_empty()).then_some(text),
                uri: Some(href.to_string()),
                ..ChannelRef::default()
            })
        })
        .collect()
}
