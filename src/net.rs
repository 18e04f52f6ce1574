use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::HttpConfig;
use crate::error::{Result, ScraperError};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Page fetcher shared by every stage of a run.
pub struct Fetcher {
    client: reqwest::Client,
    delay: Duration,
    // Earliest start of the next request.
    next_slot: Mutex<Option<Instant>>,
}

impl Fetcher {
    pub fn new(http: &HttpConfig) -> Result<Self> {
        // Build HTTP client with custom configuration
        let mut client_builder = reqwest::Client::builder()
            .user_agent(http.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));

        if let Some(timeout) = http.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(proxy_url) = &http.proxy {
            log::debug!("Using proxy: {}", proxy_url);
            client_builder = client_builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: client_builder.build()?,
            delay: http.delay,
            next_slot: Mutex::new(None),
        })
    }

    /// GET a page body. Any transport error or non-success status is fatal
    /// for the run.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        self.wait_for_slot().await;
        log::debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await.inspect_err(|e| {
            log::error!("Failed to open URL: {}: {}", url, e);
        })?;
        let status = response.status();
        if !status.is_success() {
            log::error!("Failed to open URL: {} (status {})", url, status.as_u16());
            return Err(ScraperError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    /// Request starts are spaced `delay` apart, however many are in flight.
    /// The first request of a run starts at once.
    async fn wait_for_slot(&self) {
        if self.delay.is_zero() {
            return;
        }
        let start = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let start = next_slot.map_or(now, |slot| slot.max(now));
            *next_slot = Some(start + self.delay);
            start
        };
        let wait = start.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            log::debug!("Waiting {}ms before next request", wait.as_millis());
            tokio::time::sleep_until(start).await;
        }
    }
}
