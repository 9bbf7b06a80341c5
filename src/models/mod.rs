use serde::{Deserialize, Serialize};

/// Extended M3U header line
pub const EXTM3U_HEADER: &str = "#EXTM3U";

/// Prefix of an entry's info line
pub const EXTINF_PREFIX: &str = "#EXTINF";

/// A possible stream URL discovered in a document, not yet confirmed to be
/// the right one
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub url: String,
    /// Anchor text, empty when the URL was found in raw text
    pub text: String,
}

impl Candidate {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: i64,
}

/// One `#EXTINF` line paired with its stream URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub info_line: String,
    pub url_line: String,
}

impl PlaylistEntry {
    /// Display name: the text after the last comma of the info line
    pub fn name(&self) -> &str {
        entry_label(&self.info_line).unwrap_or("")
    }
}

/// Extract the display name of an `#EXTINF` line
///
/// `#EXTINF:-1 tvg-id="x" group-title="News, Local",Channel One` yields
/// `Channel One`. Returns `None` for lines that are not info lines or carry
/// no comma.
pub fn entry_label(line: &str) -> Option<&str> {
    let line = line.trim();
    if !line.starts_with(EXTINF_PREFIX) {
        return None;
    }
    line.rfind(',').map(|pos| line[pos + 1..].trim())
}

/// A channel the updater tries to resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTarget {
    /// Display name as written in the playlist
    pub name: String,
    /// Identifier used to build slug variants; derived from `name` when absent
    #[serde(default)]
    pub slug: Option<String>,
}

impl ChannelTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Text slug variants are derived from
    pub fn slug_source(&self) -> &str {
        self.slug.as_deref().unwrap_or(&self.name)
    }
}

/// The unit every flow hands to the playlist writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelUpdate {
    pub name: String,
    /// Info line used when the channel has no entry yet
    pub info_line: String,
    pub url: Option<String>,
}

impl ChannelUpdate {
    /// Update with the default `#EXTINF:-1,<name>` info line
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        let name = name.into();
        Self {
            info_line: default_info_line(&name),
            name,
            url,
        }
    }
}

impl From<PlaylistEntry> for ChannelUpdate {
    fn from(entry: PlaylistEntry) -> Self {
        Self {
            name: entry.name().to_string(),
            info_line: entry.info_line,
            url: Some(entry.url_line),
        }
    }
}

pub fn default_info_line(name: &str) -> String {
    format!("{EXTINF_PREFIX}:-1,{name}")
}

/// How a flow's results are written to its output playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Write a fresh playlist holding only this run's entries
    Replace,
    /// Reconcile each entry into the existing playlist, leaving others alone
    MergeInPlace,
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergePolicy::Replace => write!(f, "replace"),
            MergePolicy::MergeInPlace => write!(f, "merge_in_place"),
        }
    }
}
