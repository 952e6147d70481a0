use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use responsediff::redact::Redactor;
use responsediff::{CrawlConfig, Crawler, Fetch, Fixture, FixtureIdentity, HttpFetcher};

/// Record responses of a running site as fixtures and diff later runs against them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Server to fetch pages from
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,

    /// Directory holding the fixtures
    #[arg(long, default_value = "response_fixtures")]
    fixtures: PathBuf,

    /// Fixture set inside the fixtures directory
    #[arg(long, default_value = "site")]
    name: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare a single page against its fixture
    Check {
        /// Path of the page, such as /about/
        url: String,

        /// Only compare the elements matching this CSS selector
        #[arg(long)]
        selector: Option<String>,
    },
    /// Compare every page reachable from a seed page
    Crawl {
        #[arg(default_value = "/")]
        seed: String,

        /// JSON crawl configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only compare the elements matching this CSS selector (not on the seed)
        #[arg(long)]
        selector: Option<String>,

        /// Query parameter to strip from links, may be repeated
        #[arg(long = "strip-param")]
        strip_parameters: Vec<String>,

        /// Links under this prefix are not crawled
        #[arg(long)]
        static_url: Option<String>,

        /// Origin stripped from absolute links, defaults to the base URL
        #[arg(long)]
        test_host: Option<String>,

        /// Give up after this many pages
        #[arg(long)]
        page_limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let identity = FixtureIdentity::new(cli.fixtures.join(&cli.name).to_string_lossy());
    let mut fetcher = HttpFetcher::new(&cli.base_url)
        .with_context(|| format!("Failed to create HTTP client for {}", cli.base_url))?;

    match cli.command {
        Command::Check { url, selector } => {
            let redactor = Redactor::new(&CrawlConfig::default().redactions)?;
            let mut fetched = fetcher
                .fetch(&url)
                .with_context(|| format!("Failed to fetch {}", url))?;
            redactor.apply(&mut fetched.response);

            let fixture = Fixture::new(identity.join_url(&url));
            fixture
                .compare(&fetched.response, fetched.metadata, selector.as_deref())?
                .into_result()?;
            info!("No diff for {}", url);
        }
        Command::Crawl {
            seed,
            config,
            selector,
            strip_parameters,
            static_url,
            test_host,
            page_limit,
        } => {
            let mut config = match &config {
                Some(path) => CrawlConfig::from_json_file(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => CrawlConfig {
                    test_host: fetcher.base_url().to_string(),
                    ..CrawlConfig::default()
                },
            };
            if selector.is_some() {
                config.selector = selector;
            }
            config.strip_parameters.extend(strip_parameters);
            if let Some(static_url) = static_url {
                config.static_url = static_url;
            }
            if let Some(test_host) = test_host {
                config.test_host = test_host;
            }
            if page_limit.is_some() {
                config.page_limit = page_limit;
            }

            let mut crawler = Crawler::new(fetcher, identity, config)?;
            let covered = crawler.assert_website_same(&seed)?;
            info!("No diff in {} pages", covered.len());
        }
    }

    Ok(())
}
