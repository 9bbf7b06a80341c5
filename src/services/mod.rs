//! Flow orchestration over a [`DocumentFetcher`](crate::utils::DocumentFetcher)

pub mod aggregate;
pub mod catalog;
pub mod resolver;
pub mod update;

pub use aggregate::AggregateService;
pub use catalog::CatalogService;
pub use resolver::StreamResolver;
pub use update::UpdateService;
