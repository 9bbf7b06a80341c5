//! In-memory extended M3U document
//!
//! The document is kept as raw lines so that entries the updater does not
//! touch are written back byte for byte.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::errors::AppResult;
use crate::models::{entry_label, PlaylistEntry, EXTINF_PREFIX, EXTM3U_HEADER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDocument {
    pub(super) lines: Vec<String>,
}

impl Default for PlaylistDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaylistDocument {
    /// Empty playlist holding only the header
    pub fn new() -> Self {
        Self {
            lines: vec![EXTM3U_HEADER.to_string()],
        }
    }

    /// Build a document from playlist text, inserting the header if missing
    pub fn parse(content: &str) -> Self {
        let mut doc = Self {
            lines: content.lines().map(str::to_string).collect(),
        };
        doc.ensure_header();
        doc
    }

    /// Load a playlist from disk
    ///
    /// A missing file is not an error: an empty document is returned and
    /// created on the next save.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!("Playlist {} does not exist yet, starting empty", path.display());
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Insert the `#EXTM3U` header as first line if it is missing
    ///
    /// Returns whether the header was inserted.
    pub fn ensure_header(&mut self) -> bool {
        let has_header = self
            .lines
            .first()
            .is_some_and(|line| line.trim_start_matches('\u{feff}').starts_with(EXTM3U_HEADER));
        if !has_header {
            self.lines.insert(0, EXTM3U_HEADER.to_string());
        }
        !has_header
    }

    /// Indices of the info lines whose label equals `channel_name`,
    /// compared case-insensitively, in document order
    pub fn find_entries(&self, channel_name: &str) -> Vec<usize> {
        let wanted = channel_name.trim().to_lowercase();
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| {
                entry_label(line).is_some_and(|label| label.to_lowercase() == wanted)
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Entries a playlist line `info_line` would be found again as
    ///
    /// Lines with a label match by label, like [`find_entries`]. Lines
    /// without one only match identical info lines.
    ///
    /// [`find_entries`]: Self::find_entries
    pub fn find_matching(&self, info_line: &str) -> Vec<usize> {
        if let Some(label) = entry_label(info_line) {
            return self.find_entries(label);
        }
        let wanted = info_line.trim();
        if !wanted.starts_with(EXTINF_PREFIX) {
            return Vec::new();
        }
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| entry_label(line).is_none() && line.trim() == wanted)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Well-formed `(info, url)` pairs in document order
    pub fn entries(&self) -> Vec<PlaylistEntry> {
        self.lines
            .windows(2)
            .filter(|pair| {
                let url = pair[1].trim();
                pair[0].trim_start().starts_with(EXTINF_PREFIX) && !url.is_empty() && !url.starts_with('#')
            })
            .map(|pair| PlaylistEntry {
                info_line: pair[0].clone(),
                url_line: pair[1].trim().to_string(),
            })
            .collect()
    }

    /// Full file content, newline terminated
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// Overwrite `path` with this document
    ///
    /// The content is written to a temporary file next to the target and
    /// then renamed over it, so a failed write never leaves a truncated
    /// playlist behind.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let content = self.render();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;

        debug!("Wrote {} lines to {}", self.lines.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "#EXTM3U\n#EXTINF:-1,ТНТ\nhttp://a.example.com/tnt.m3u8\n#EXTINF:-1 group-title=\"Kids\",Carousel\nhttp://a.example.com/carousel.m3u8\n";

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let doc = PlaylistDocument::load(&dir.path().join("absent.m3u")).unwrap();
        assert_eq!(doc.lines(), &["#EXTM3U".to_string()]);
    }

    #[test]
    fn test_header_inserted_when_missing() {
        let mut doc = PlaylistDocument {
            lines: vec!["#EXTINF:-1,A".to_string(), "http://a".to_string()],
        };
        assert!(doc.ensure_header());
        assert!(!doc.ensure_header());
        assert_eq!(doc.lines()[0], "#EXTM3U");
        assert_eq!(doc.lines().len(), 3);
    }

    #[test]
    fn test_header_with_attributes_is_kept() {
        let doc = PlaylistDocument::parse("#EXTM3U url-tvg=\"http://epg\"\n");
        assert_eq!(doc.lines(), &["#EXTM3U url-tvg=\"http://epg\"".to_string()]);
    }

    #[test]
    fn test_find_entries_case_insensitive() {
        let doc = PlaylistDocument::parse(SAMPLE);
        assert_eq!(doc.find_entries("тнт"), vec![1]);
        assert_eq!(doc.find_entries("carousel"), vec![3]);
        assert!(doc.find_entries("Zvezda").is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist.m3u");
        std::fs::write(&path, SAMPLE).unwrap();

        PlaylistDocument::load(&path).unwrap().save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE);
    }

    #[test]
    fn test_round_trip_adds_missing_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("playlist.m3u");
        std::fs::write(&path, "#EXTINF:-1,A\nhttp://a.example.com/a.m3u8\n").unwrap();

        PlaylistDocument::load(&path).unwrap().save(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "#EXTM3U\n#EXTINF:-1,A\nhttp://a.example.com/a.m3u8\n"
        );
    }

    #[test]
    fn test_crlf_input_is_normalized() {
        let doc = PlaylistDocument::parse("#EXTM3U\r\n#EXTINF:-1,A\r\nhttp://a\r\n");
        assert_eq!(doc.render(), "#EXTM3U\n#EXTINF:-1,A\nhttp://a\n");
    }

    #[test]
    fn test_entries_skip_broken_pairs() {
        let doc = PlaylistDocument::parse("#EXTM3U\n#EXTINF:-1,A\n#EXTINF:-1,B\nhttp://b\n\n#EXTINF:-1,C\n");
        let entries = doc.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), "B");
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.m3u");
        PlaylistDocument::new().save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "#EXTM3U\n");
    }
}
