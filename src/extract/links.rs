use crate::filter::UrlFilter;
use crate::frontier::{Frontier, FrontierEntry};
use crate::normalize;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Finds same-domain URLs worth crawling in a page's anchors.
///
/// Runs against the unmodified document, so links inside navigation chrome
/// are still discovered even though their text never becomes content.
pub struct LinkExtractor {
    anchors: Selector,
    filter: UrlFilter,
    ignore_query: bool,
    max_depth: usize,
}

impl LinkExtractor {
    pub fn new(filter: UrlFilter, ignore_query: bool, max_depth: usize) -> Self {
        Self {
            anchors: Selector::parse("a[href]").unwrap(),
            filter,
            ignore_query,
            max_depth,
        }
    }

    /// Extract frontier entries at `depth + 1`, deduplicated against the
    /// frontier's visited and pending sets and within the page itself.
    /// Returns nothing once `depth` has reached the depth bound.
    pub fn extract(
        &self,
        doc: &Html,
        page_url: &Url,
        depth: usize,
        frontier: &Frontier,
    ) -> Vec<FrontierEntry> {
        if depth >= self.max_depth {
            ::log::debug!("depth bound {} reached at {}", self.max_depth, page_url);
            return Vec::new();
        }

        let mut found: HashSet<String> = HashSet::new();
        let mut links = Vec::new();

        for anchor in doc.select(&self.anchors) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if href.is_empty() || href.starts_with("javascript:") || href.starts_with('#') {
                continue;
            }

            let resolved = match normalize::resolve(page_url, href, self.ignore_query) {
                Ok(url) => url,
                Err(e) => {
                    ::log::debug!("skipping unresolvable href {:?}: {}", href, e);
                    continue;
                }
            };

            if !self.filter.should_crawl(&resolved) {
                continue;
            }

            let key = resolved.to_string();
            if found.contains(&key) || frontier.is_known(&key) {
                continue;
            }
            found.insert(key.clone());
            links.push(FrontierEntry::new(key, depth + 1));
        }

        links
    }
}
