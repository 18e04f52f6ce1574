//! Vehicle links on a country listing page.

use std::collections::HashSet;

use regex::Regex;
use scraper::{Html, Selector};

use crate::config::{Layout, VehicleClass};
use crate::dom::{self, Elements};
use crate::error::Result;

pub struct IndexCrawler {
    layout: Layout,
    heading: Selector,
    list: Selector,
    item: Selector,
    link: Selector,
}

impl IndexCrawler {
    pub fn new(layout: Layout) -> Result<Self> {
        let heading = match layout {
            Layout::Current => "span",
            Layout::Legacy => "div",
        };
        Ok(Self {
            layout,
            heading: dom::selector(heading)?,
            list: dom::selector("ul")?,
            item: dom::selector("li")?,
            link: dom::selector("a")?,
        })
    }

    /// Links listed under each class heading, in class order then page order.
    /// Classes missing from the page and repeated links are skipped.
    pub fn collect_links(&self, html: &str, classes: &[VehicleClass]) -> Result<Vec<String>> {
        let document = Html::parse_document(html);
        let elements = Elements::of_document(&document);
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for class in classes {
            let label = Regex::new(&regex::escape(class.label()))?;
            let Some(heading) = elements.find_labelled(&self.heading, &label) else {
                log::debug!("No {} section", class.label());
                continue;
            };
            let Some(list) = elements.find_next(heading, &self.list).and_then(|i| elements.get(i)) else {
                continue;
            };
            let hrefs: Vec<String> = match self.layout {
                Layout::Current => list
                    .select(&self.link)
                    .filter_map(|a| a.value().attr("href"))
                    .map(str::to_string)
                    .collect(),
                Layout::Legacy => list
                    .select(&self.item)
                    .filter_map(|li| li.select(&self.link).next())
                    .filter_map(|a| a.value().attr("href"))
                    .map(|href| href.trim_matches('/').to_string())
                    .collect(),
            };
            log::debug!("{} link(s) under {}", hrefs.len(), class.label());
            for href in hrefs {
                if seen.insert(href.clone()) {
                    links.push(href);
                }
            }
        }
        Ok(links)
    }
}
