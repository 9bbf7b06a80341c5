//! Channel page → best stream URL

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::AppResult;
use crate::extract::CandidateExtractor;
use crate::models::ChannelTarget;
use crate::scoring::{select_best, CandidateScorer, TargetProfile};
use crate::utils::url::UrlUtils;
use crate::utils::DocumentFetcher;

/// Runs extraction, scoring and selection for one channel at a time
pub struct StreamResolver {
    extractor: CandidateExtractor,
    scorer: CandidateScorer,
}

impl StreamResolver {
    pub fn new(extractor: CandidateExtractor, scorer: CandidateScorer) -> Self {
        Self { extractor, scorer }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let extractor = CandidateExtractor::new(config.extraction.anchor_filter)?;
        let scorer = CandidateScorer::new(
            config.scoring.weights,
            &config.scoring.provider_domains,
        );
        Ok(Self::new(extractor, scorer))
    }

    /// Best stream URL in an already fetched page
    pub fn resolve_document(&self, document: &str, base_url: &str, target: &ChannelTarget) -> Option<String> {
        let candidates = self.extractor.extract(document, base_url);
        if candidates.is_empty() {
            info!("No stream candidates for '{}'", target.name);
            return None;
        }

        let profile = TargetProfile::new(target);
        let scored = self.scorer.score_all(&candidates, &profile);
        for entry in &scored {
            debug!(
                "  [{}] {} ({})",
                entry.score,
                UrlUtils::obfuscate_credentials(&entry.candidate.url),
                entry.candidate.text
            );
        }

        let best = select_best(&scored);
        match &best {
            Some(url) => info!(
                "Selected for '{}': {}",
                target.name,
                UrlUtils::obfuscate_credentials(url)
            ),
            None => info!("No stream selected for '{}'", target.name),
        }
        best
    }

    /// Fetch `page_url` and resolve `target` from it
    ///
    /// A failed fetch counts as "no result".
    pub async fn resolve(
        &self,
        fetcher: &dyn DocumentFetcher,
        target: &ChannelTarget,
        page_url: &str,
    ) -> Option<String> {
        match fetcher.fetch_text(page_url).await {
            Ok(document) => self.resolve_document(&document, page_url, target),
            Err(e) => {
                warn!("Skipping '{}': {}", target.name, e);
                None
            }
        }
    }
}
