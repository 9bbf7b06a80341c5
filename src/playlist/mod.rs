//! Extended M3U playlist handling: the document model, the per-channel
//! merge engine, remote playlist aggregation and the policy-driven writer.

pub mod aggregate;
pub mod document;
pub mod merge;
pub mod writer;

pub use aggregate::{filter_by_tags, parse_playlist, write_fresh};
pub use document::PlaylistDocument;
pub use merge::{update, upsert, UpdateOutcome, UpdateReport};
pub use writer::{commit, CommitSummary};
