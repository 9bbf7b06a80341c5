//! Heuristic relevance scoring of candidates against a channel
//!
//! Exact slug matches are weighted far above incidental keyword matches,
//! and an allow-list of provider domains compensates for generic slugs.
//! Weights are tuned for a handful of sites and are configurable.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::slug::{core_keywords, slug_variants};
use crate::models::{Candidate, ChannelTarget, ScoredCandidate};
use crate::utils::url::UrlUtils;

/// Points awarded by each scoring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// URL contains a slug variant of the channel
    pub slug: i64,
    /// Core keyword appears as a whole word in the URL or label
    pub keyword: i64,
    /// URL host is an allow-listed provider
    pub provider: i64,
    /// URL mentions `hls`
    pub hls: i64,
    /// URL points at an `.m3u8` playlist
    pub m3u8: i64,
    /// URL uses `http` or `https`
    pub http_scheme: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            slug: 50,
            keyword: 10,
            provider: 30,
            hls: 5,
            m3u8: 8,
            http_scheme: 1,
        }
    }
}

/// Precomputed matching data for one channel
#[derive(Debug, Clone)]
pub struct TargetProfile {
    pub name: String,
    pub slug_variants: Vec<String>,
    keyword_patterns: Vec<Regex>,
}

impl TargetProfile {
    pub fn new(target: &ChannelTarget) -> Self {
        let keyword_patterns = core_keywords(&target.name)
            .iter()
            .filter_map(|keyword| {
                RegexBuilder::new(&format!(r"\b{}\b", regex::escape(keyword)))
                    .case_insensitive(true)
                    .build()
                    .ok()
            })
            .collect();

        Self {
            name: target.name.clone(),
            slug_variants: slug_variants(target.slug_source()),
            keyword_patterns,
        }
    }

    fn matches_slug(&self, url: &str) -> bool {
        self.slug_variants.iter().any(|slug| url.contains(slug.as_str()))
    }

    fn matches_keyword(&self, url: &str, text: &str) -> bool {
        self.keyword_patterns
            .iter()
            .any(|re| re.is_match(url) || re.is_match(text))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CandidateScorer {
    weights: ScoringWeights,
    provider_domains: Vec<String>,
}

impl CandidateScorer {
    pub fn new(weights: ScoringWeights, provider_domains: &[String]) -> Self {
        Self {
            weights,
            provider_domains: provider_domains
                .iter()
                .map(|d| d.trim().trim_start_matches('.').to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Score one candidate; pure and deterministic
    pub fn score(&self, candidate: &Candidate, profile: &TargetProfile) -> i64 {
        let u = candidate.url.to_lowercase();
        let t = candidate.text.to_lowercase();
        let mut score = 0;

        if profile.matches_slug(&u) {
            score += self.weights.slug;
        }
        if profile.matches_keyword(&u, &t) {
            score += self.weights.keyword;
        }
        if self.is_provider(&u) {
            score += self.weights.provider;
        }
        if u.contains("hls") {
            score += self.weights.hls;
        }
        if u.contains(".m3u8") {
            score += self.weights.m3u8;
        }
        if u.starts_with("http://") || u.starts_with("https://") {
            score += self.weights.http_scheme;
        }

        score
    }

    /// Score every candidate, keeping extraction order
    pub fn score_all(&self, candidates: &[Candidate], profile: &TargetProfile) -> Vec<ScoredCandidate> {
        candidates
            .iter()
            .map(|candidate| ScoredCandidate {
                score: self.score(candidate, profile),
                candidate: candidate.clone(),
            })
            .collect()
    }

    fn is_provider(&self, url: &str) -> bool {
        let Some(host) = UrlUtils::extract_domain(url).map(|h| h.to_lowercase()) else {
            return false;
        };
        self.provider_domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    }
}
