//! Candidate extraction
//!
//! Pulls plausible stream URLs out of a page. Three sources are combined:
//! anchor targets (resolved against the page URL), `http(s)` HLS URLs found
//! anywhere in the raw text, and transport-level (`rtsp`/`rtmp`/`udp`) HLS
//! URLs in the raw text. The result is duplicate-free and keeps the order in
//! which candidates were first seen.

pub mod patterns;

use std::collections::HashSet;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::errors::ParseResult;
use crate::models::Candidate;
use crate::utils::url::UrlUtils;
use patterns::{CompiledPattern, UrlPattern, CANDIDATE_SCHEMES};

/// Which anchors contribute candidates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorFilter {
    /// Only `href`s containing `.m3u8`; `href`s with whitespace are dropped
    #[default]
    M3u8Only,
    /// Every anchor with a stream-capable scheme
    All,
}

/// Ordered set of candidates
#[derive(Debug, Default)]
struct CandidateSet {
    seen: HashSet<Candidate>,
    items: Vec<Candidate>,
}

impl CandidateSet {
    fn insert(&mut self, candidate: Candidate) {
        if self.seen.insert(candidate.clone()) {
            self.items.push(candidate);
        }
    }
}

pub struct CandidateExtractor {
    anchor_filter: AnchorFilter,
    anchor_selector: Selector,
    text_patterns: Vec<CompiledPattern>,
}

impl CandidateExtractor {
    pub fn new(anchor_filter: AnchorFilter) -> ParseResult<Self> {
        Self::with_patterns(
            anchor_filter,
            &[UrlPattern::http_m3u8(), UrlPattern::transport_m3u8()],
        )
    }

    /// Build an extractor with custom raw-text patterns
    pub fn with_patterns(anchor_filter: AnchorFilter, patterns: &[UrlPattern]) -> ParseResult<Self> {
        let text_patterns = patterns
            .iter()
            .map(UrlPattern::compile)
            .collect::<ParseResult<Vec<_>>>()?;
        let anchor_selector = Selector::parse("a[href]").map_err(|e| {
            crate::errors::ParseError::pattern("a[href]", format!("{e:?}"))
        })?;
        Ok(Self {
            anchor_filter,
            anchor_selector,
            text_patterns,
        })
    }

    /// Extract every candidate from `document`
    ///
    /// Relative anchor targets are resolved against `base_url`; when the base
    /// itself does not parse, only absolute targets survive.
    pub fn extract(&self, document: &str, base_url: &str) -> Vec<Candidate> {
        let mut set = CandidateSet::default();
        if document.trim().is_empty() {
            return set.items;
        }

        let base = Url::parse(base_url).ok();
        for candidate in self.anchor_candidates(document, base.as_ref()) {
            set.insert(candidate);
        }

        for pattern in &self.text_patterns {
            for found in pattern.find_all(document) {
                let found = found.trim();
                if !UrlUtils::is_valid(found) {
                    debug!("Dropping malformed URL from text: {}", found);
                    continue;
                }
                set.insert(Candidate::new(found, ""));
            }
        }

        debug!("Extracted {} candidates", set.items.len());
        set.items
    }

    fn anchor_candidates(&self, document: &str, base: Option<&Url>) -> Vec<Candidate> {
        let html = Html::parse_document(document);
        let mut candidates = Vec::new();

        for element in html.select(&self.anchor_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            if href.is_empty() {
                continue;
            }
            if self.anchor_filter == AnchorFilter::M3u8Only {
                if !href.to_lowercase().contains(".m3u8") {
                    continue;
                }
                if href.chars().any(char::is_whitespace) {
                    debug!("Dropping anchor with whitespace in href: {}", href);
                    continue;
                }
            }

            let Some(resolved) = resolve(base, href) else {
                continue;
            };
            let text = element
                .text()
                .flat_map(|s| s.split_whitespace())
                .collect::<Vec<_>>()
                .join(" ");
            candidates.push(Candidate::new(resolved.to_string(), text));
        }

        candidates
    }
}

/// Resolve `href` to an absolute URL with a stream-capable scheme
fn resolve(base: Option<&Url>, href: &str) -> Option<Url> {
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base?.join(href).ok()?,
        Err(_) => return None,
    };
    CANDIDATE_SCHEMES
        .contains(&url.scheme())
        .then_some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://tv.example.com/channels/";

    fn extractor(filter: AnchorFilter) -> CandidateExtractor {
        CandidateExtractor::new(filter).unwrap()
    }

    #[test]
    fn test_relative_anchor_is_resolved() {
        let html = "<a href='/live/tnt2.m3u8'>ТНТ+2</a>";
        let candidates = extractor(AnchorFilter::M3u8Only).extract(html, BASE);
        assert_eq!(
            candidates,
            vec![Candidate::new("https://tv.example.com/live/tnt2.m3u8", "ТНТ+2")]
        );
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        assert!(extractor(AnchorFilter::M3u8Only).extract("", BASE).is_empty());
        assert!(extractor(AnchorFilter::All).extract("   \n", BASE).is_empty());
    }

    #[test]
    fn test_filter_mode_drops_non_hls_and_whitespace() {
        let html = r#"
            <a href="/about">About</a>
            <a href="/live/bad link.m3u8">Broken</a>
            <a href="/live/ok.M3U8?x=1">Ok</a>
        "#;
        let candidates = extractor(AnchorFilter::M3u8Only).extract(html, BASE);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "https://tv.example.com/live/ok.M3U8?x=1");
        assert_eq!(candidates[0].text, "Ok");
    }

    #[test]
    fn test_all_mode_keeps_every_stream_anchor() {
        let html = r#"
            <a href="/about">About us</a>
            <a href="mailto:team@example.com">Mail</a>
            <a href="rtmp://media.example.com/live/one">One</a>
        "#;
        let candidates = extractor(AnchorFilter::All).extract(html, BASE);
        let urls: Vec<_> = candidates.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://tv.example.com/about",
                "rtmp://media.example.com/live/one"
            ]
        );
        assert_eq!(candidates[0].text, "About us");
    }

    #[test]
    fn test_raw_text_urls_are_collected_once() {
        let html = r#"
            <script>
              var player = {src: "https://cdn.example.com/hls/ch1.m3u8?token=1"};
              var backup = 'rtsp://cam.example.com/feed/ch1.m3u8';
            </script>
        "#;
        let candidates = extractor(AnchorFilter::M3u8Only).extract(html, BASE);
        assert_eq!(
            candidates,
            vec![
                Candidate::new("https://cdn.example.com/hls/ch1.m3u8?token=1", ""),
                Candidate::new("rtsp://cam.example.com/feed/ch1.m3u8", ""),
            ]
        );
    }

    #[test]
    fn test_anchor_and_text_sources_are_unioned() {
        let html = r#"<a href="https://cdn.example.com/a.m3u8">A</a>"#;
        let candidates = extractor(AnchorFilter::M3u8Only).extract(html, BASE);
        assert_eq!(
            candidates,
            vec![
                Candidate::new("https://cdn.example.com/a.m3u8", "A"),
                Candidate::new("https://cdn.example.com/a.m3u8", ""),
            ]
        );
    }

    #[test]
    fn test_invalid_base_keeps_absolute_anchors_only() {
        let html = r#"<a href="/rel.m3u8">Rel</a><a href="http://x.example.com/abs.m3u8">Abs</a>"#;
        let candidates = extractor(AnchorFilter::M3u8Only).extract(html, "not a url");
        assert_eq!(candidates[0], Candidate::new("http://x.example.com/abs.m3u8", "Abs"));
        assert!(candidates.iter().all(|c| !c.url.contains("rel.m3u8")));
    }
}
