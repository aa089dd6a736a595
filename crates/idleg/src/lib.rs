pub mod aggregator;
pub mod cache;
mod fetcher;
pub mod parser;
pub mod scraper;
pub mod types;
pub mod utils;

pub use aggregator::{Aggregator, LegislatureSource};
pub use cache::CacheStore;
pub use scraper::{ScraperConfig, ScraperError, WebScraper};

pub(crate) const BASE_URL: &str = "https://legislature.idaho.gov";

pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
