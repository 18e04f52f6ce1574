//! The scrape pipeline: version, listings, vehicle pages.

use futures::{stream, StreamExt, TryStreamExt};

use crate::config::{self, Config, Selection};
use crate::detail::{rewrite_url, DetailExtractor};
use crate::error::{Result, ScraperError};
use crate::index::IndexCrawler;
use crate::net::Fetcher;
use crate::record::VehicleRecord;
use crate::version::VersionResolver;

pub struct Scraper {
    config: Config,
    fetcher: Fetcher,
    version: VersionResolver,
    index: IndexCrawler,
    detail: DetailExtractor,
}

impl Scraper {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(&config.http)?,
            version: VersionResolver::new()?,
            index: IndexCrawler::new(config.layout)?,
            detail: DetailExtractor::new(config.layout)?,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn game_version(&self) -> Result<String> {
        let url = self.config.layout.version_url(&self.config.wiki)?;
        let html = self.fetcher.fetch(url.as_str()).await?;
        let version = self.version.resolve(&html, self.config.region, url.as_str())?;
        log::info!("Game version ({} server): {}", self.config.region, version);
        Ok(version)
    }

    /// Vehicle page URLs in output order.
    pub async fn vehicle_urls(&self) -> Result<Vec<String>> {
        let layout = self.config.layout;
        let wiki = &self.config.wiki;
        match &self.config.selection {
            Selection::Vehicles(names) => names
                .iter()
                .map(|name| layout.vehicle_url(wiki, name).map(String::from))
                .collect(),
            Selection::Countries { countries, classes } => {
                let mut urls = Vec::new();
                for country in countries {
                    let listing = layout.country_url(wiki, country.trim())?;
                    log::info!("Listing {} vehicles", country.trim());
                    let html = self.fetcher.fetch(listing.as_str()).await?;
                    for link in self.index.collect_links(&html, classes)? {
                        urls.push(config::resolve(wiki, &link)?.to_string());
                    }
                }
                Ok(urls)
            }
        }
    }

    /// Fetch and extract every vehicle page.
    ///
    /// Up to `concurrency` pages are in flight; records come back in the
    /// order of `urls` and the first failed fetch ends the whole batch.
    pub async fn vehicles(&self, urls: Vec<String>) -> Result<Vec<VehicleRecord>> {
        let concurrency = self.config.http.concurrency.max(1);
        stream::iter(urls)
            .map(|url| async move {
                let url = rewrite_url(&url);
                log::info!("Looking for: {}", url);
                let html = self.fetcher.fetch(&url).await?;
                Ok::<_, ScraperError>(self.detail.extract(&url, &html))
            })
            .buffered(concurrency)
            .try_collect()
            .await
    }
}
