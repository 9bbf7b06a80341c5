//! Centralized error handling for the playlist updater
//!
//! # Error Categories
//!
//! - **Source Errors**: fetching a page or remote playlist failed; recovered
//!   by skipping the source
//! - **Parse Errors**: malformed input structure; recovered by falling back
//! - **I/O Errors**: writing the playlist failed; the one hard failure
//!
//! A channel that cannot be resolved is not an error at all: resolution
//! returns `None` and the playlist entry is left alone.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for Parse Results
pub type ParseResult<T> = Result<T, ParseError>;
