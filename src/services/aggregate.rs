//! Multi-source flow: remote playlists filtered down to tagged channels

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::config::AggregateConfig;
use crate::errors::AppResult;
use crate::models::{ChannelUpdate, MergePolicy, PlaylistEntry};
use crate::playlist::{commit, filter_by_tags, parse_playlist, CommitSummary};
use crate::utils::url::UrlUtils;
use crate::utils::DocumentFetcher;

pub struct AggregateService {
    fetcher: Arc<dyn DocumentFetcher>,
    sources: Vec<String>,
    tags: Vec<String>,
    output_path: PathBuf,
    policy: MergePolicy,
}

impl AggregateService {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, config: &AggregateConfig) -> Self {
        Self {
            fetcher,
            sources: config.sources.clone(),
            tags: config.tags.clone(),
            output_path: config.output_path.clone(),
            policy: config.policy,
        }
    }

    /// Entries of every reachable source, in configured source order
    ///
    /// Sources are fetched concurrently; failed ones are skipped.
    pub async fn collect_entries(&self) -> Vec<PlaylistEntry> {
        let fetches = self
            .sources
            .iter()
            .map(|source| self.fetcher.fetch_text(source));
        let results = join_all(fetches).await;

        let mut entries = Vec::new();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(text) => {
                    let parsed = parse_playlist(&text);
                    info!(
                        "Parsed {} entries from {}",
                        parsed.len(),
                        UrlUtils::obfuscate_credentials(source)
                    );
                    entries.extend(parsed);
                }
                Err(e) => warn!("Skipping source: {}", e),
            }
        }
        entries
    }

    /// Fetch, filter and commit
    pub async fn run(&self) -> AppResult<CommitSummary> {
        let entries = self.collect_entries().await;
        let matched = filter_by_tags(&entries, &self.tags);
        info!("{} of {} entries match tags {:?}", matched.len(), entries.len(), self.tags);
        if matched.is_empty() {
            warn!("No entries matched; {} will hold no channels", self.output_path.display());
        }

        let updates: Vec<ChannelUpdate> = matched.into_iter().map(ChannelUpdate::from).collect();
        commit(&self.output_path, &updates, self.policy)
    }
}
