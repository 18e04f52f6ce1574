//! Run configuration: which wiki layout to read, where it lives, what to
//! scrape and how to talk to it.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use url::Url;

use crate::error::{Result, ScraperError};

pub const DEFAULT_COUNTRIES: &[&str] = &["USA", "UK", "Germany", "France", "USSR", "China", "Japan"];
pub const DEFAULT_OUTPUT: &str = "WoT_Tank_Data.csv";
pub const DEFAULT_PLACEHOLDER: &str = "N/A";

/// Game server region whose announced version is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Region {
    #[value(name = "NA")]
    Na,
    #[value(name = "EU")]
    Eu,
    #[value(name = "Asia")]
    Asia,
}

impl Region {
    /// Text of the bold label that precedes the version link.
    pub fn server_label(self) -> &'static str {
        match self {
            Region::Na => "NA Server:",
            Region::Eu => "EU Server:",
            Region::Asia => "Asian Server:",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Region::Na => "NA",
            Region::Eu => "EU",
            Region::Asia => "Asia",
        })
    }
}

/// Markup generation of the wiki.
///
/// `Current` is wiki.wargaming.net: labels are `<span>`s and the value sits in
/// the `span.top` before them. `Legacy` is wiki.worldoftanks.com: labels are
/// `<th>` cells inside `div.Tank` with the value in the `span.top` after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Layout {
    #[default]
    Current,
    Legacy,
}

impl Layout {
    pub fn default_wiki(self) -> &'static str {
        match self {
            Layout::Current => "https://wiki.wargaming.net/",
            Layout::Legacy => "http://wiki.worldoftanks.com/",
        }
    }

    pub fn version_url(self, wiki: &Url) -> Result<Url> {
        match self {
            Layout::Current => resolve(wiki, "/en/World_of_Tanks"),
            Layout::Legacy => Ok(wiki.clone()),
        }
    }

    pub fn country_url(self, wiki: &Url, country: &str) -> Result<Url> {
        match self {
            Layout::Current => resolve(wiki, &format!("/en/{}", country)),
            Layout::Legacy => resolve(wiki, country),
        }
    }

    /// Page of a vehicle named on the command line ("Tiger II" -> Tiger_II).
    pub fn vehicle_url(self, wiki: &Url, name: &str) -> Result<Url> {
        let name = name.trim().replace(' ', "_");
        match self {
            Layout::Current => resolve(wiki, &format!("/en/Tank:{}", name)),
            Layout::Legacy => resolve(wiki, &name),
        }
    }
}

/// Resolve a link found on a wiki page against the wiki base.
///
/// The base is a site root: links starting with `/` replace its path.
///
/// Bare links such as `Tank:T-34` would parse as a `tank:` scheme, so they
/// are joined as `./Tank:T-34`.
pub fn resolve(wiki: &Url, link: &str) -> Result<Url> {
    let joined = if link.starts_with("http://") || link.starts_with("https://") {
        Url::parse(link)
    } else if link.starts_with('/') {
        wiki.join(link)
    } else {
        wiki.join(&format!("./{}", link))
    };
    joined.map_err(|e| ScraperError::InvalidUrl(format!("{}: {}", link, e)))
}

/// Vehicle category section on a country listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleClass {
    Light,
    Medium,
    Heavy,
    TankDestroyer,
    Artillery,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 5] = [
        VehicleClass::Light,
        VehicleClass::Medium,
        VehicleClass::Heavy,
        VehicleClass::TankDestroyer,
        VehicleClass::Artillery,
    ];

    /// Section heading text on the listing page.
    pub fn label(self) -> &'static str {
        match self {
            VehicleClass::Light => "Light Tanks",
            VehicleClass::Medium => "Medium Tanks",
            VehicleClass::Heavy => "Heavy Tanks",
            VehicleClass::TankDestroyer => "Tank Destroyers",
            VehicleClass::Artillery => "Self-Propelled Guns",
        }
    }

    /// Parse a `--types` filter value (Light, Medium, Heavy, TD, SPG).
    pub fn from_filter(s: &str) -> Option<Self> {
        match s.trim() {
            "Light" => Some(VehicleClass::Light),
            "Medium" => Some(VehicleClass::Medium),
            "Heavy" => Some(VehicleClass::Heavy),
            "TD" => Some(VehicleClass::TankDestroyer),
            "SPG" => Some(VehicleClass::Artillery),
            _ => None,
        }
    }
}

/// Keep the valid type filters in the order given; warn about the rest.
pub fn parse_classes(filters: &[String]) -> Vec<VehicleClass> {
    let mut classes = Vec::new();
    for filter in filters {
        match VehicleClass::from_filter(filter) {
            Some(class) if !classes.contains(&class) => classes.push(class),
            Some(_) => {}
            None => log::warn!("Skipping invalid vehicle type: {}", filter),
        }
    }
    classes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Json,
}

/// What to scrape: whole country listings, or named vehicles only.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Countries {
        countries: Vec<String>,
        classes: Vec<VehicleClass>,
    },
    Vehicles(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
    pub delay: Duration,
    pub concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub layout: Layout,
    pub wiki: Url,
    pub region: Region,
    pub selection: Selection,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub placeholder: String,
    pub http: HttpConfig,
}

impl Config {
    pub fn new(layout: Layout, wiki: Option<&str>, selection: Selection) -> Result<Self> {
        let wiki = wiki.unwrap_or(layout.default_wiki());
        let wiki = Url::parse(wiki).map_err(|e| ScraperError::InvalidUrl(format!("{}: {}", wiki, e)))?;
        Ok(Self {
            layout,
            wiki,
            region: Region::Na,
            selection,
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: OutputFormat::Tsv,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            http: HttpConfig {
                concurrency: 1,
                ..HttpConfig::default()
            },
        })
    }
}
