//! Error type definitions for the playlist updater
//!
//! Only I/O on the final playlist write and configuration loading are meant
//! to abort a run. Source and parse errors are recovered by the callers
//! (skip the source, fall back to a weaker extraction method), so they carry
//! enough context to be logged and discarded.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Filesystem errors while reading or writing a playlist
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a source document failed
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Malformed input structure
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors raised while fetching a remote document
///
/// Every variant is treated as "no result" by the flows: the source is
/// skipped and the run continues.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Connection refused, DNS failure, TLS failure...
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    /// Request exceeded the configured timeout
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    /// Non-2xx response
    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    /// Body could not be read or decoded as text
    #[error("Failed to decode body from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Errors for malformed input structures
#[derive(Error, Debug)]
pub enum ParseError {
    /// Embedded JSON (e.g. an SSR cache) could not be parsed
    #[error("Invalid JSON in {context}: {message}")]
    Json { context: String, message: String },

    /// A URL pattern could not be compiled
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

impl AppError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Create a network error
    pub fn network<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<U: Into<String>>(url: U) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Create an HTTP status error
    pub fn http<U: Into<String>>(url: U, status: u16) -> Self {
        Self::Http {
            url: url.into(),
            status,
        }
    }

    /// Create a decode error
    pub fn decode<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl ParseError {
    /// Create a JSON parse error
    pub fn json<C: Into<String>, M: Into<String>>(context: C, message: M) -> Self {
        Self::Json {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a pattern compilation error
    pub fn pattern<P: Into<String>, M: Into<String>>(pattern: P, message: M) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
