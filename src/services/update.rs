//! Single-channel flow
//!
//! Channels are resolved one after another and committed together, so an
//! unresolved channel keeps its info line without touching the others.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use super::resolver::StreamResolver;
use crate::config::{ChannelConfig, UpdateConfig};
use crate::errors::AppResult;
use crate::models::{ChannelUpdate, MergePolicy};
use crate::playlist::{commit, CommitSummary};
use crate::utils::DocumentFetcher;

pub struct UpdateService {
    fetcher: Arc<dyn DocumentFetcher>,
    resolver: StreamResolver,
    channels: Vec<ChannelConfig>,
    output_path: PathBuf,
    policy: MergePolicy,
}

impl UpdateService {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, resolver: StreamResolver, config: &UpdateConfig) -> Self {
        Self {
            fetcher,
            resolver,
            channels: config.channels.clone(),
            output_path: config.output_path.clone(),
            policy: config.policy,
        }
    }

    /// Resolve the configured channels (or only those named in `only`) and
    /// commit them
    ///
    /// Returns `None` when no channel was selected; the playlist is then
    /// left untouched.
    pub async fn run(&self, only: &[String]) -> AppResult<Option<CommitSummary>> {
        let selected: Vec<&ChannelConfig> = self
            .channels
            .iter()
            .filter(|channel| {
                only.is_empty()
                    || only
                        .iter()
                        .any(|name| name.trim().to_lowercase() == channel.name.trim().to_lowercase())
            })
            .collect();

        if selected.is_empty() {
            warn!("No channels to update");
            return Ok(None);
        }

        let mut updates = Vec::with_capacity(selected.len());
        for channel in selected {
            let url = self
                .resolver
                .resolve(self.fetcher.as_ref(), &channel.target(), &channel.page_url)
                .await;
            if url.is_none() {
                info!("'{}' keeps its current stream (if any)", channel.name);
            }
            updates.push(ChannelUpdate::new(&channel.name, url));
        }

        let summary = commit(&self.output_path, &updates, self.policy)?;
        Ok(Some(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::utils::http_client::testing::StaticFetcher;
    use tempfile::TempDir;

    fn channel(name: &str, page_url: &str) -> ChannelConfig {
        ChannelConfig {
            name: name.to_string(),
            slug: None,
            page_url: page_url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_run_updates_and_keeps_unresolved() {
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("playlist.m3u");
        std::fs::write(
            &output_path,
            "#EXTM3U\n#EXTINF:-1,Звезда\nhttp://old/zvezda.m3u8\n#EXTINF:-1,ТНТ +2\nhttp://old/tnt2.m3u8\n",
        )
        .unwrap();

        let fetcher = StaticFetcher::new().with_page(
            "https://tv.example.com/tnt",
            r#"<a href="/live/tnt2.m3u8">ТНТ+2</a>"#,
        );
        let config = UpdateConfig {
            output_path: output_path.clone(),
            policy: MergePolicy::MergeInPlace,
            channels: vec![
                channel("ТНТ +2", "https://tv.example.com/tnt"),
                channel("Звезда", "https://tv.example.com/zvezda"),
            ],
        };
        let resolver = StreamResolver::from_config(&Config::default()).unwrap();
        let service = UpdateService::new(Arc::new(fetcher), resolver, &config);

        let summary = service.run(&[]).await.unwrap().unwrap();
        assert_eq!(summary.changed, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(
            std::fs::read_to_string(&output_path).unwrap(),
            "#EXTM3U\n#EXTINF:-1,Звезда\nhttp://old/zvezda.m3u8\n#EXTINF:-1,ТНТ +2\nhttps://tv.example.com/live/tnt2.m3u8\n"
        );
    }

    #[tokio::test]
    async fn test_run_with_unknown_channel_filter_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("playlist.m3u");
        let config = UpdateConfig {
            output_path: output_path.clone(),
            policy: MergePolicy::MergeInPlace,
            channels: vec![channel("ТНТ", "https://tv.example.com/tnt")],
        };
        let resolver = StreamResolver::from_config(&Config::default()).unwrap();
        let service = UpdateService::new(Arc::new(StaticFetcher::new()), resolver, &config);

        assert!(service.run(&["Мир".to_string()]).await.unwrap().is_none());
        assert!(!output_path.exists());
    }

    #[tokio::test]
    async fn test_run_channel_filter_ignores_case() {
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("playlist.m3u");
        let fetcher = StaticFetcher::new().with_page(
            "https://tv.example.com/tnt",
            r#"<a href="/live/tnt.m3u8">ТНТ</a>"#,
        );
        let config = UpdateConfig {
            output_path: output_path.clone(),
            policy: MergePolicy::MergeInPlace,
            channels: vec![
                channel("ТНТ", "https://tv.example.com/tnt"),
                channel("Мир", "https://tv.example.com/mir"),
            ],
        };
        let resolver = StreamResolver::from_config(&Config::default()).unwrap();
        let service = UpdateService::new(Arc::new(fetcher), resolver, &config);

        let summary = service.run(&[" тнт ".to_string()]).await.unwrap().unwrap();
        assert_eq!(summary.changed, 1);
        assert_eq!(
            std::fs::read_to_string(&output_path).unwrap(),
            "#EXTM3U\n#EXTINF:-1,ТНТ\nhttps://tv.example.com/live/tnt.m3u8\n"
        );
    }
}
