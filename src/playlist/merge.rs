//! Minimal, idempotent reconciliation of one channel into a playlist
//!
//! Only the lines of the target channel are ever touched. Duplicate entries
//! left by earlier runs are collapsed into the first one, and a channel that
//! could not be resolved keeps its previous URL.

use crate::extract::patterns::has_stream_scheme;
use crate::models::default_info_line;

use super::document::PlaylistDocument;

/// What happened to the channel's entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Existing URL line replaced with a different URL
    Replaced,
    /// Entry had no URL line; one was inserted after it
    Inserted,
    /// Nothing to change (no URL resolved, or the URL was already current)
    Unchanged,
    /// New entry appended with its URL
    Appended,
    /// New entry appended without a URL
    AppendedInfoOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateReport {
    pub outcome: UpdateOutcome,
    pub duplicates_removed: usize,
}

/// Reconcile `channel_name` into `doc` with the default info line for new
/// entries
pub fn update(doc: &mut PlaylistDocument, channel_name: &str, resolved_url: Option<&str>) -> UpdateReport {
    upsert(doc, &default_info_line(channel_name), resolved_url)
}

/// Reconcile the entry described by `info_line` into `doc`
///
/// Existing entries are found the same way a later run will find the line
/// written here (see [`PlaylistDocument::find_matching`]). `info_line` is
/// only written when there is no entry yet; existing info lines are never
/// rewritten.
pub fn upsert(doc: &mut PlaylistDocument, info_line: &str, resolved_url: Option<&str>) -> UpdateReport {
    doc.ensure_header();

    let entries = doc.find_matching(info_line);
    let duplicates_removed = entries.len().saturating_sub(1);
    // Back to front so earlier indices stay valid
    for &idx in entries.iter().skip(1).rev() {
        remove_entry(doc, idx);
    }

    let outcome = match entries.first() {
        Some(&entry) => match resolved_url {
            Some(url) => set_entry_url(doc, entry, url.trim()),
            None => UpdateOutcome::Unchanged,
        },
        None => {
            doc.lines.push(info_line.to_string());
            match resolved_url {
                Some(url) => {
                    doc.lines.push(url.trim().to_string());
                    UpdateOutcome::Appended
                }
                None => UpdateOutcome::AppendedInfoOnly,
            }
        }
    };

    UpdateReport {
        outcome,
        duplicates_removed,
    }
}

/// Remove the info line at `idx` and the URL line belonging to it
///
/// Blank lines between the two go as well. A following directive line is
/// another entry and stays.
fn remove_entry(doc: &mut PlaylistDocument, idx: usize) {
    let mut end = idx + 1;
    while end < doc.lines.len() && doc.lines[end].trim().is_empty() {
        end += 1;
    }
    if end < doc.lines.len() && !doc.lines[end].trim_start().starts_with('#') {
        end += 1;
    } else {
        // No URL line; keep the blank lines as they were
        end = idx + 1;
    }
    doc.lines.drain(idx..end);
}

fn set_entry_url(doc: &mut PlaylistDocument, entry: usize, url: &str) -> UpdateOutcome {
    let mut next = entry + 1;
    while next < doc.lines.len() && doc.lines[next].trim().is_empty() {
        next += 1;
    }

    if next < doc.lines.len() && has_stream_scheme(&doc.lines[next]) {
        // Stray blank lines between the entry and its URL are dropped
        doc.lines.drain(entry + 1..next);
        let current = &mut doc.lines[entry + 1];
        if current.trim() == url {
            UpdateOutcome::Unchanged
        } else {
            *current = url.to_string();
            UpdateOutcome::Replaced
        }
    } else {
        doc.lines.insert(entry + 1, url.to_string());
        UpdateOutcome::Inserted
    }
}
