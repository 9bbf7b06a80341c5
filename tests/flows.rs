//! End-to-end runs of the update and aggregate flows against canned pages

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use m3u_updater::config::{AggregateConfig, ChannelConfig, Config, UpdateConfig};
use m3u_updater::errors::{SourceError, SourceResult};
use m3u_updater::extract::{AnchorFilter, CandidateExtractor};
use m3u_updater::models::{Candidate, ChannelTarget, MergePolicy};
use m3u_updater::scoring::{select_best, CandidateScorer, ScoringWeights, TargetProfile};
use m3u_updater::services::{AggregateService, StreamResolver, UpdateService};
use m3u_updater::utils::DocumentFetcher;
use tempfile::TempDir;

/// Serves fixed bodies; anything else is a 404
#[derive(Default)]
struct CannedFetcher {
    pages: HashMap<String, String>,
}

impl CannedFetcher {
    fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl DocumentFetcher for CannedFetcher {
    async fn fetch_text(&self, url: &str) -> SourceResult<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::http(url, 404))
    }
}

fn update_config(output_path: PathBuf, channels: Vec<ChannelConfig>) -> UpdateConfig {
    UpdateConfig {
        output_path,
        policy: MergePolicy::MergeInPlace,
        channels,
    }
}

#[test]
fn tnt_plus_two_anchor_is_selected() {
    let extractor = CandidateExtractor::new(AnchorFilter::M3u8Only).unwrap();
    let candidates = extractor.extract(
        "<a href='/live/tnt2.m3u8'>ТНТ+2</a>",
        "https://tv.example.com/channels/",
    );
    assert_eq!(
        candidates,
        vec![Candidate::new("https://tv.example.com/live/tnt2.m3u8", "ТНТ+2")]
    );

    let scorer = CandidateScorer::new(ScoringWeights::default(), &[]);
    let profile = TargetProfile::new(&ChannelTarget::new("ТНТ +2"));
    let scored = scorer.score_all(&candidates, &profile);
    assert!(scored[0].score >= ScoringWeights::default().slug);
    assert_eq!(
        select_best(&scored).as_deref(),
        Some("https://tv.example.com/live/tnt2.m3u8")
    );
}

#[test]
fn slug_and_provider_outscore_plain_candidate() {
    let scorer = CandidateScorer::new(ScoringWeights::default(), &["cdn.example.tv".to_string()]);
    let profile = TargetProfile::new(&ChannelTarget::new("Звезда").with_slug("zvezda"));

    let matching = Candidate::new("https://edge.cdn.example.tv/zvezda/index.m3u8", "");
    let plain = Candidate::new("https://other.example.com/stream/index.m3u8", "");
    assert!(scorer.score(&matching, &profile) > scorer.score(&plain, &profile));
}

#[tokio::test]
async fn update_resolves_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("playlist.m3u");
    std::fs::write(
        &output_path,
        "#EXTM3U\n#EXTINF:-1,Мир\nhttp://mir/1.m3u8\n#EXTINF:-1,ТНТ +2\nhttp://old/tnt2.m3u8\n#EXTINF:-1,ТНТ +2\nhttp://older/tnt2.m3u8\n",
    )
    .unwrap();

    let fetcher = Arc::new(CannedFetcher::default().page(
        "https://tv.example.com/channels/tnt2",
        "<html><a href='/live/tnt2.m3u8'>ТНТ+2</a><a href='/live/tnt.m3u8'>ТНТ</a></html>",
    ));
    let config = update_config(
        output_path.clone(),
        vec![ChannelConfig {
            name: "ТНТ +2".to_string(),
            slug: None,
            page_url: "https://tv.example.com/channels/tnt2".to_string(),
        }],
    );
    let resolver = StreamResolver::from_config(&Config::default()).unwrap();
    let service = UpdateService::new(fetcher, resolver, &config);

    let first = service.run(&[]).await.unwrap().unwrap();
    assert_eq!(first.duplicates_removed, 1);
    let after_first = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(
        after_first,
        "#EXTM3U\n#EXTINF:-1,Мир\nhttp://mir/1.m3u8\n#EXTINF:-1,ТНТ +2\nhttps://tv.example.com/live/tnt2.m3u8\n"
    );

    let second = service.run(&[]).await.unwrap().unwrap();
    assert_eq!(second.unchanged, 1);
    assert_eq!(std::fs::read_to_string(&output_path).unwrap(), after_first);
}

#[tokio::test]
async fn update_of_empty_page_appends_info_line() {
    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("playlist.m3u");
    let fetcher = Arc::new(CannedFetcher::default().page("https://tv.example.com/empty", ""));
    let config = update_config(
        output_path.clone(),
        vec![ChannelConfig {
            name: "ТНТ +2".to_string(),
            slug: None,
            page_url: "https://tv.example.com/empty".to_string(),
        }],
    );
    let resolver = StreamResolver::from_config(&Config::default()).unwrap();

    UpdateService::new(fetcher, resolver, &config)
        .run(&[])
        .await
        .unwrap();
    assert_eq!(
        std::fs::read_to_string(&output_path).unwrap(),
        "#EXTM3U\n#EXTINF:-1,ТНТ +2\n"
    );
}

#[tokio::test]
async fn aggregate_replaces_previous_content_with_tagged_entries() {
    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("aggregate.m3u");
    std::fs::write(&output_path, "#EXTM3U\n#EXTINF:-1,Старый\nhttp://stale/1\n").unwrap();

    let fetcher = Arc::new(
        CannedFetcher::default()
            .page(
                "http://lists.example.com/a.m3u",
                "#EXTM3U\n#EXTINF:-1,Первый\nhttp://a/1\n#EXTINF:-1,ТНТ\nhttp://a/tnt\n#EXTINF:-1,Мир\nhttp://a/mir\n",
            )
            .page(
                "http://lists.example.com/b.m3u",
                "#EXTM3U\n#EXTINF:-1,Звезда\nhttp://b/z\n#EXTINF:-1,Россия 1\nhttp://b/r1\n",
            ),
    );
    let config = AggregateConfig {
        output_path: output_path.clone(),
        policy: MergePolicy::Replace,
        sources: vec![
            "http://lists.example.com/a.m3u".to_string(),
            "http://lists.example.com/b.m3u".to_string(),
        ],
        tags: vec!["ТНТ".to_string()],
    };

    let summary = AggregateService::new(fetcher, &config).run().await.unwrap();
    assert_eq!(summary.written, 1);
    assert_eq!(
        std::fs::read_to_string(&output_path).unwrap(),
        "#EXTM3U\n#EXTINF:-1,ТНТ\nhttp://a/tnt\n"
    );
}
