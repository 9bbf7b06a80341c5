//! Entry extraction and tag filtering for remote playlists

use std::path::Path;

use crate::errors::AppResult;
use crate::models::{ChannelUpdate, MergePolicy, PlaylistEntry, EXTINF_PREFIX};

use super::writer::commit;

/// Pair every `#EXTINF` line with the next `http` line
///
/// An info line with no URL before the next info line is dropped.
pub fn parse_playlist(text: &str) -> Vec<PlaylistEntry> {
    let mut entries = Vec::new();
    let mut current_info: Option<&str> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.starts_with(EXTINF_PREFIX) {
            current_info = Some(line);
        } else if line.starts_with("http") {
            if let Some(info) = current_info.take() {
                entries.push(PlaylistEntry {
                    info_line: info.to_string(),
                    url_line: line.to_string(),
                });
            }
        }
    }

    entries
}

/// Keep entries whose info line contains any of `tags`, case-insensitively
pub fn filter_by_tags(entries: &[PlaylistEntry], tags: &[String]) -> Vec<PlaylistEntry> {
    let tags: Vec<String> = tags
        .iter()
        .map(|t| t.to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    entries
        .iter()
        .filter(|entry| {
            let info = entry.info_line.to_lowercase();
            tags.iter().any(|tag| info.contains(tag.as_str()))
        })
        .cloned()
        .collect()
}

/// Overwrite `path` with a header followed by `entries`
pub fn write_fresh(entries: &[PlaylistEntry], path: &Path) -> AppResult<()> {
    let updates: Vec<ChannelUpdate> = entries.iter().cloned().map(ChannelUpdate::from).collect();
    commit(path, &updates, MergePolicy::Replace).map(|_| ())
}
