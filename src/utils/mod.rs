pub mod http_client;
pub mod url;

pub use http_client::{DocumentFetcher, StandardHttpClient};
pub use url::UrlUtils;
