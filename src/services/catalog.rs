//! Catalog flow: collection page → channel cards → discovered streams

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::{anchor_channel_refs, extract_ssr_cache, find_channel_refs, ChannelRef, EndpointScanner};
use crate::config::CatalogConfig;
use crate::errors::AppResult;
use crate::models::{ChannelUpdate, MergePolicy};
use crate::playlist::{commit, CommitSummary};
use crate::utils::DocumentFetcher;

pub struct CatalogService {
    fetcher: Arc<dyn DocumentFetcher>,
    scanner: EndpointScanner,
    page_url: String,
    output_path: PathBuf,
    policy: MergePolicy,
}

impl CatalogService {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, config: &CatalogConfig) -> AppResult<Self> {
        let scanner = EndpointScanner::new(&config.page_url, &config.api_templates, &config.slug_templates)?;
        Ok(Self {
            fetcher,
            scanner,
            page_url: config.page_url.clone(),
            output_path: config.output_path.clone(),
            policy: config.policy,
        })
    }

    /// Channel cards on the collection page
    ///
    /// An unreachable page yields no channels.
    pub async fn discover(&self) -> Vec<ChannelRef> {
        let html = match self.fetcher.fetch_text(&self.page_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Cannot load collection page: {}", e);
                return Vec::new();
            }
        };

        match extract_ssr_cache(&html) {
            Some(ssr) => {
                let refs = find_channel_refs(&ssr);
                info!("Found {} channels in SSR cache", refs.len());
                refs
            }
            None => {
                let refs = anchor_channel_refs(&html);
                info!("No SSR cache; found {} channel links", refs.len());
                refs
            }
        }
    }

    /// Discover, scan and commit
    ///
    /// Returns `None` when no stream was found; nothing is written then.
    pub async fn run(&self) -> AppResult<Option<CommitSummary>> {
        let channels = self.discover().await;

        let mut updates = Vec::new();
        for channel in &channels {
            let urls = self.scanner.scan(self.fetcher.as_ref(), channel).await;
            if urls.is_empty() {
                info!("No streams for '{}'", channel.title());
            }
            updates.extend(
                urls.into_iter()
                    .map(|url| ChannelUpdate::new(channel.title(), Some(url))),
            );
        }

        if updates.is_empty() {
            warn!("No streams found on {}", self.page_url);
            return Ok(None);
        }

        let summary = commit(&self.output_path, &updates, self.policy)?;
        Ok(Some(summary))
    }
}
