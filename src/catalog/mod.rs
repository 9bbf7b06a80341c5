//! Catalog discovery: collection page → channel cards → stream endpoints

pub mod endpoints;
pub mod ssr;
pub mod tree;

pub use endpoints::{stream_urls_in, EndpointScanner};
pub use ssr::{anchor_channel_refs, extract_ssr_cache, find_channel_refs, ChannelRef};
pub use tree::collect_nodes;
