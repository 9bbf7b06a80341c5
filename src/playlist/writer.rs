//! Single commit path for every flow
//!
//! `Replace` writes a fresh playlist made of this run's updates only;
//! `MergeInPlace` reconciles each update into the existing playlist. Either
//! way the new content is fully built in memory before the file is touched.

use std::path::Path;

use tracing::{debug, info};

use crate::errors::AppResult;
use crate::models::{ChannelUpdate, MergePolicy};

use super::document::PlaylistDocument;
use super::merge::{upsert, UpdateOutcome};

/// Counts for the run summary log line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub written: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub duplicates_removed: usize,
}

/// Build the document `policy` produces from `updates`
pub fn apply(
    mut doc: PlaylistDocument,
    updates: &[ChannelUpdate],
    policy: MergePolicy,
) -> (PlaylistDocument, CommitSummary) {
    let mut summary = CommitSummary::default();

    if policy == MergePolicy::Replace {
        let mut fresh = PlaylistDocument::new();
        for update in updates {
            fresh.lines.push(update.info_line.clone());
            if let Some(url) = &update.url {
                fresh.lines.push(url.clone());
            }
            summary.written += 1;
            summary.changed += 1;
        }
        return (fresh, summary);
    }

    for update in updates {
        let report = upsert(&mut doc, &update.info_line, update.url.as_deref());
        debug!(
            "Channel '{}': {:?} ({} duplicates removed)",
            update.name, report.outcome, report.duplicates_removed
        );
        summary.written += 1;
        summary.duplicates_removed += report.duplicates_removed;
        if report.outcome == UpdateOutcome::Unchanged {
            summary.unchanged += 1;
        } else {
            summary.changed += 1;
        }
    }
    (doc, summary)
}

/// Write `updates` to the playlist at `path` according to `policy`
pub fn commit(path: &Path, updates: &[ChannelUpdate], policy: MergePolicy) -> AppResult<CommitSummary> {
    let existing = match policy {
        MergePolicy::Replace => PlaylistDocument::new(),
        MergePolicy::MergeInPlace => PlaylistDocument::load(path)?,
    };

    let (doc, summary) = apply(existing, updates, policy);
    doc.save(path)?;

    info!(
        "Committed {} channels to {} (policy: {}, changed: {}, unchanged: {}, duplicates removed: {})",
        summary.written,
        path.display(),
        policy,
        summary.changed,
        summary.unchanged,
        summary.duplicates_removed
    );
    Ok(summary)
}
