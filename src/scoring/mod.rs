//! Candidate scoring and best-match selection

pub mod scorer;
pub mod selector;
pub mod slug;

pub use scorer::{CandidateScorer, ScoringWeights, TargetProfile};
pub use selector::select_best;
