// Re-export modules
pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod frontier;
pub mod normalize;
pub mod output;
pub mod results;
pub mod robots;
pub mod sitemap;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{CrawlConfig, FetchMode};
pub use error::CrawlError;
pub use output::OutputFormat;
pub use results::{ContentElement, CrawlReport, PageContent, PageType};
