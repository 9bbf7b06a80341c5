//! URL pattern tokenizer
//!
//! A [`UrlPattern`] describes which URLs to pick out of raw text: a set of
//! schemes and an optional substring the URL must contain. Patterns are
//! compiled into a single regex so rules stay data and can be tested on
//! their own.

use regex::{Regex, RegexBuilder};

use crate::errors::{ParseError, ParseResult};

/// Schemes a stream candidate may use
pub const CANDIDATE_SCHEMES: &[&str] = &["http", "https", "rtsp", "rtmp", "udp", "srt"];

/// Characters that terminate a URL found in raw text
const URL_TERMINATORS: &str = r#"\s"'<>"#;

/// Scheme set plus substring constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPattern {
    pub schemes: Vec<String>,
    /// Literal the URL must contain, matched case-insensitively
    pub required: Option<String>,
}

impl UrlPattern {
    pub fn new<S: AsRef<str>>(schemes: &[S], required: Option<&str>) -> Self {
        Self {
            schemes: schemes.iter().map(|s| s.as_ref().to_lowercase()).collect(),
            required: required.map(str::to_string),
        }
    }

    /// `http`/`https` URLs pointing at an HLS playlist
    pub fn http_m3u8() -> Self {
        Self::new(&["http", "https"], Some(".m3u8"))
    }

    /// Transport-level URLs (`rtsp`, `rtmp`, `udp`) as well as HTTP ones
    /// pointing at an HLS playlist
    pub fn transport_m3u8() -> Self {
        Self::new(&["http", "https", "rtsp", "rtmp", "udp"], Some(".m3u8"))
    }

    /// Build the regex source for this pattern
    ///
    /// The body is lazy up to the required literal, then greedy up to the
    /// next terminator, so query strings and fragments are kept.
    pub fn to_regex_source(&self) -> String {
        let schemes = self
            .schemes
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");
        match &self.required {
            Some(required) => format!(
                r"(?:{schemes})://[^{t}]+?{req}[^{t}]*",
                t = URL_TERMINATORS,
                req = regex::escape(required)
            ),
            None => format!(r"(?:{schemes})://[^{t}]+", t = URL_TERMINATORS),
        }
    }

    pub fn compile(&self) -> ParseResult<CompiledPattern> {
        if self.schemes.is_empty() {
            return Err(ParseError::pattern(
                self.to_regex_source(),
                "pattern needs at least one scheme",
            ));
        }
        let source = self.to_regex_source();
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| ParseError::pattern(&source, e.to_string()))?;
        Ok(CompiledPattern { regex })
    }
}

/// A [`UrlPattern`] ready for matching
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
}

impl CompiledPattern {
    /// All matches in `text`, in order of appearance
    pub fn find_all<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.regex.find_iter(text).map(|m| m.as_str())
    }
}

/// True when `line` starts with one of the candidate schemes followed by `://`
pub fn has_stream_scheme(line: &str) -> bool {
    let lower = line.trim_start().to_lowercase();
    CANDIDATE_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(&format!("{scheme}://")))
}
