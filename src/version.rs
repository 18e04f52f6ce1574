//! Current game version announced on the wiki's front page.

use regex::Regex;
use scraper::{Html, Selector};

use crate::config::Region;
use crate::dom::{self, Elements};
use crate::error::{Result, ScraperError};

pub struct VersionResolver {
    label: Selector,
    link: Selector,
}

impl VersionResolver {
    pub fn new() -> Result<Self> {
        Ok(Self {
            label: dom::selector("b")?,
            link: dom::selector("a")?,
        })
    }

    /// The text of the first link after the region's bold server label.
    pub fn resolve(&self, html: &str, region: Region, source: &str) -> Result<String> {
        let document = Html::parse_document(html);
        let elements = Elements::of_document(&document);
        let server = Regex::new(&regex::escape(region.server_label()))?;
        elements
            .find_labelled(&self.label, &server)
            .and_then(|label| elements.find_next(label, &self.link))
            .and_then(|link| elements.get(link))
            .and_then(|link| dom::nth_content(link, 0))
            .map(|version| version.trim().to_string())
            .filter(|version| !version.is_empty())
            .ok_or_else(|| ScraperError::VersionNotFound(region, source.to_string()))
    }
}
