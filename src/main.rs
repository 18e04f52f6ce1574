use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use wot_wiki_scraper::config::{
    parse_classes, Config, Layout, OutputFormat, Region, Selection, VehicleClass, DEFAULT_COUNTRIES,
    DEFAULT_OUTPUT, DEFAULT_PLACEHOLDER,
};
use wot_wiki_scraper::report::Report;
use wot_wiki_scraper::Scraper;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "wot-wiki-scraper")]
#[command(
    about = "Scrape vehicle data from the World of Tanks wiki into a spreadsheet",
    long_about = "Scrape vehicle data from the World of Tanks wiki into a spreadsheet. \
By default every vehicle of every country is parsed.\n\n\
Specifying vehicles is mutually exclusive with specifying countries or vehicle types."
)]
struct Args {
    /// Countries to scrape, comma separated (USA, UK, Germany, France, USSR, China, Japan). Default: all
    #[arg(short, long, value_delimiter = ',')]
    countries: Vec<String>,

    /// Vehicle types, comma separated (Light, Medium, Heavy, TD, SPG). Default: all
    #[arg(short, long, value_delimiter = ',')]
    types: Vec<String>,

    /// Vehicle names, comma separated, e.g. "Tiger II,T-34,WZ-120"
    #[arg(short, long, value_delimiter = ',', conflicts_with_all = ["countries", "types"])]
    vehicles: Vec<String>,

    /// File to write data to
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    file: PathBuf,

    /// Output format. JSON writes missing values as null, not the placeholder
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,

    /// Wiki markup generation to parse
    #[arg(long, value_enum, default_value_t = Layout::Current)]
    layout: Layout,

    /// Wiki site root, e.g. https://wiki.wargaming.net/ (defaults to the layout's wiki).
    /// Wiki links starting with "/" resolve against the host, so a path here is not kept
    #[arg(long)]
    wiki: Option<String>,

    /// Server region whose version is reported
    #[arg(long, value_enum, ignore_case = true, default_value_t = Region::Na)]
    region: Region,

    /// Text written in the sheet for values missing from a page
    #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
    placeholder: String,

    /// Request timeout in seconds (none by default)
    #[arg(long)]
    timeout: Option<u64>,

    /// Custom user agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Proxy URL (e.g., http://proxy.example.com:8080)
    #[arg(long)]
    proxy: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long, default_value = "0")]
    delay: u64,

    /// Vehicle pages fetched at once; output order is kept
    #[arg(long, default_value = "1")]
    concurrency: usize,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn selection(&self) -> Selection {
        if !self.vehicles.is_empty() {
            return Selection::Vehicles(self.vehicles.clone());
        }
        let countries = if self.countries.is_empty() {
            DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect()
        } else {
            self.countries.clone()
        };
        let classes = if self.types.is_empty() {
            VehicleClass::ALL.to_vec()
        } else {
            parse_classes(&self.types)
        };
        Selection::Countries { countries, classes }
    }

    fn into_config(self) -> wot_wiki_scraper::Result<Config> {
        let mut config = Config::new(self.layout, self.wiki.as_deref(), self.selection())?;
        config.region = self.region;
        config.output = self.file;
        config.format = self.format;
        config.placeholder = self.placeholder;
        config.http.timeout = self.timeout.map(Duration::from_secs);
        config.http.user_agent = self.user_agent;
        config.http.proxy = self.proxy;
        config.http.delay = Duration::from_millis(self.delay);
        config.http.concurrency = self.concurrency;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = args.into_config()?;
    log::info!("🚀 WoT wiki scraper v{}", env!("CARGO_PKG_VERSION"));
    log::info!("📋 Reading {} ({:?} layout)", config.wiki, config.layout);

    let scraper = Scraper::new(config)?;
    let version = scraper.game_version().await?;
    let urls = scraper.vehicle_urls().await?;
    log::info!("🔎 {} vehicle page(s) to parse", urls.len());
    let vehicles = scraper.vehicles(urls).await?;

    let config = scraper.config();
    log::info!("Writing data to document: {}", config.output.display());
    let report = Report {
        version: &version,
        created: chrono::Local::now().naive_local(),
        vehicles: &vehicles,
        placeholder: &config.placeholder,
    };
    report.write_file(&config.output, config.format)?;

    log::info!("✅ Wrote {} vehicle(s)", vehicles.len());
    Ok(())
}
