//! Configuration default values
//!
//! All default values for configuration options live here so they can be
//! changed in one place.

// HTTP defaults
pub const DEFAULT_HTTP_TIMEOUT: &str = "20s";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";

// Output defaults
pub const DEFAULT_UPDATE_OUTPUT: &str = "./playlist.m3u";
pub const DEFAULT_AGGREGATE_OUTPUT: &str = "./aggregate.m3u";
pub const DEFAULT_CATALOG_OUTPUT: &str = "./catalog.m3u";
