//! Depth-first walk of a site, comparing every page against its fixture.

use std::collections::HashSet;

use log::{debug, info};

use crate::config::CrawlConfig;
use crate::error::{Error, Result};
use crate::fixture::Fixture;
use crate::identity::FixtureIdentity;
use crate::redact::Redactor;
use crate::report::{Comparison, CrawlReport};
use crate::response::{Fetch, Fetched};
use crate::url::{is_static, strip_parameters, LinkFinder};

/// Everything one crawl has seen so far.
#[derive(Debug, Default)]
pub struct CrawlState {
    covered: Vec<String>,
    seen: HashSet<String>,
    comparison: Comparison,
}

impl CrawlState {
    pub fn is_covered(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// URLs in the order they were visited.
    pub fn covered(&self) -> &[String] {
        &self.covered
    }

    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    fn cover(&mut self, url: &str, comparison: Comparison) {
        if self.seen.insert(url.to_string()) {
            self.covered.push(url.to_string());
        }
        self.comparison.merge(comparison);
    }

    pub fn into_report(self) -> CrawlReport {
        CrawlReport {
            covered: self.covered,
            comparison: self.comparison,
        }
    }
}

type NormalizeHook = Box<dyn Fn(&str) -> String>;
type SkipHook = Box<dyn Fn(&str) -> bool>;

pub struct Crawler<F> {
    fetcher: F,
    identity: FixtureIdentity,
    config: CrawlConfig,
    redactor: Redactor,
    links: LinkFinder,
    normalize: Option<NormalizeHook>,
    skip: Option<SkipHook>,
}

impl<F: Fetch> Crawler<F> {
    /// Pages are stored below `identity`, one fixture per URL.
    pub fn new(fetcher: F, identity: FixtureIdentity, config: CrawlConfig) -> Result<Self> {
        let redactor = Redactor::new(&config.redactions)?;
        let links = LinkFinder::new(&config.test_host)?;
        Ok(Crawler {
            fetcher,
            identity,
            config,
            redactor,
            links,
            normalize: None,
            skip: None,
        })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Replace the default normalization, which strips
    /// `CrawlConfig::strip_parameters` from each link.
    pub fn normalize_with(&mut self, hook: impl Fn(&str) -> String + 'static) -> &mut Self {
        self.normalize = Some(Box::new(hook));
        self
    }

    /// Replace the default skip rule, which skips `CrawlConfig::static_url`.
    pub fn skip_with(&mut self, hook: impl Fn(&str) -> bool + 'static) -> &mut Self {
        self.skip = Some(Box::new(hook));
        self
    }

    pub fn normalize_url(&self, url: &str) -> String {
        match &self.normalize {
            Some(hook) => hook(url),
            None => strip_parameters(&self.config.strip_parameters, url),
        }
    }

    pub fn skip_url(&self, url: &str) -> bool {
        match &self.skip {
            Some(hook) => hook(url),
            None => is_static(&self.config.static_url, url),
        }
    }

    /// Visit `seed` and every page reachable from it, once each.
    ///
    /// Creations and diffs never stop the crawl; they are collected in the
    /// report. Fetch, filesystem and diff tool errors do.
    pub fn crawl(&mut self, seed: &str) -> Result<CrawlReport> {
        info!("Crawling from {}", seed);
        let mut state = CrawlState::default();
        // Children are pushed in reverse so pages come off the stack in the
        // order they were linked.
        let mut pending = vec![seed.to_string()];

        while let Some(url) = pending.pop() {
            if state.is_covered(&url) {
                continue;
            }
            if let Some(limit) = self.config.page_limit {
                if state.covered().len() >= limit {
                    return Err(Error::PageLimit(limit));
                }
            }

            let links = self.visit(&url, url == seed, &mut state)?;
            pending.extend(links.into_iter().rev());
        }

        let report = state.into_report();
        info!(
            "Crawled {} pages: {} fixtures created, {} diffs",
            report.covered.len(),
            report.comparison.created.len(),
            report.comparison.diffs.len()
        );
        Ok(report)
    }

    /// Crawl and fail once with everything that was created or differs.
    pub fn assert_website_same(&mut self, seed: &str) -> Result<Vec<String>> {
        self.crawl(seed)?.into_result()
    }

    /// Compare one page and return the links to follow from it.
    fn visit(&mut self, url: &str, is_seed: bool, state: &mut CrawlState) -> Result<Vec<String>> {
        debug!("Fetching {}", url);
        let Fetched {
            mut response,
            metadata,
        } = self.fetcher.fetch(url)?;
        self.redactor.apply(&mut response);

        // The seed keeps the whole layout, other pages only the selection.
        let selector = if is_seed {
            None
        } else {
            self.config.selector.as_deref()
        };
        let fixture = Fixture::new(self.identity.join_url(url));
        let comparison = fixture.compare(&response, metadata, selector)?;
        state.cover(url, comparison);

        if response.is_streaming() {
            return Ok(Vec::new());
        }

        let links = self
            .links
            .find(&response.content())
            .iter()
            .map(|link| self.normalize_url(link))
            .filter(|link| !state.is_covered(link) && !self.skip_url(link))
            .collect();
        Ok(links)
    }
}

/// Crawl `seed` with the default configuration.
pub fn crawl<F: Fetch>(fetcher: F, identity: FixtureIdentity, seed: &str) -> Result<CrawlReport> {
    Crawler::new(fetcher, identity, CrawlConfig::default())?.crawl(seed)
}
