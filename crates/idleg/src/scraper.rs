use crate::aggregator::LegislatureSource;
use crate::fetcher::HttpFetcher;
use crate::parser::parse_member_list;
use crate::types::{AggregateResult, Chamber, Committee, Legislator};

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("No members found for either chamber at {base_url}")]
    NoMembers { base_url: String },
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Pause applied before every request, including the first.
    pub request_delay: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: crate::BASE_URL.to_string(),
            user_agent: crate::USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            request_delay: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    fetcher: HttpFetcher,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_config(ScraperConfig::default())
    }

    pub fn with_config(config: ScraperConfig) -> Result<Self, ScraperError> {
        let fetcher = HttpFetcher::new(&config.user_agent, config.timeout, config.request_delay)?;

        Ok(Self {
            fetcher,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn membership_url(&self, chamber: Chamber) -> String {
        format!("{}/{}/membership/", self.base_url, chamber.slug())
    }

    /// Members listed on the chamber's membership page, in page order.
    /// A page that cannot be fetched yields no members.
    pub async fn scrape_members(&self, chamber: Chamber) -> Vec<Legislator> {
        let url = self.membership_url(chamber);
        log::info!("Fetching {} members...", chamber.slug());

        let Some(html) = self.fetcher.fetch(&url).await else {
            log::warn!("No {} membership page, returning no members", chamber.slug());
            return Vec::new();
        };

        let members = parse_member_list(&html, chamber);
        log::info!("Parsed {} {} members", members.len(), chamber.slug());
        members
    }

    pub async fn scrape_committees(&self) -> Vec<Committee> {
        let mut committees = Vec::new();
        for chamber in Chamber::ALL {
            committees.extend(self.scrape_chamber_committees(chamber).await);
        }
        committees
    }

    // TODO: parse committee rosters once the legislature's committee page markup is pinned down.
    async fn scrape_chamber_committees(&self, chamber: Chamber) -> Vec<Committee> {
        log::debug!("Committee scraping for {} is not available", chamber.slug());
        Vec::new()
    }
}

impl LegislatureSource for WebScraper {
    async fn fetch_all(&self) -> Result<AggregateResult, ScraperError> {
        let senators = self.scrape_members(Chamber::Senate).await;
        let representatives = self.scrape_members(Chamber::House).await;

        if senators.is_empty() && representatives.is_empty() {
            return Err(ScraperError::NoMembers {
                base_url: self.base_url.clone(),
            });
        }

        let committees = self.scrape_committees().await;

        Ok(AggregateResult {
            senators,
            representatives,
            committees,
        })
    }
}
