use std::future::Future;

use crate::cache::CacheStore;
use crate::scraper::ScraperError;
use crate::types::AggregateResult;

/// A live source for the full legislature listing.
pub trait LegislatureSource {
    fn fetch_all(&self) -> impl Future<Output = Result<AggregateResult, ScraperError>> + Send;
}

/// Combines the cache and a live source into a fetch that never fails.
///
/// Each call tries, in order: a fresh cache entry, a live scrape (which is
/// then cached), the last cached entry however old, and finally an empty
/// result. [`Aggregator::refresh`] starts from the live scrape.
#[derive(Debug)]
pub struct Aggregator<S> {
    source: S,
    cache: CacheStore,
}

impl<S: LegislatureSource> Aggregator<S> {
    pub fn new(source: S, cache: CacheStore) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub async fn get_all_data(&self) -> AggregateResult {
        if let Some(data) = self.cache.load() {
            log::info!("Using fresh cached data");
            return data;
        }
        self.scrape_or_fallback().await
    }

    /// Like [`Aggregator::get_all_data`] but ignores a fresh cache entry.
    /// The cached record is only replaced by a successful scrape, so it is
    /// still available as the fallback.
    pub async fn refresh(&self) -> AggregateResult {
        self.scrape_or_fallback().await
    }

    async fn scrape_or_fallback(&self) -> AggregateResult {
        match self.source.fetch_all().await {
            Ok(data) => {
                log::info!(
                    "Scraped {} senators, {} representatives and {} committees",
                    data.senators.len(),
                    data.representatives.len(),
                    data.committees.len()
                );
                self.cache.save(&data);
                data
            }
            Err(e) => {
                log::error!("Error scraping legislature data: {}", e);
                self.cache.load_stale().unwrap_or_else(|| {
                    log::warn!("No cached data available, returning an empty result");
                    AggregateResult::default()
                })
            }
        }
    }
}
