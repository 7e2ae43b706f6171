use crate::normalize;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for URL filtering during link discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Root URL whose host defines the crawl scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_url: Option<String>,

    /// Regex patterns for URLs to include (if empty, all URLs are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Default exclusion patterns: asset/document/media extensions and path
/// keywords for pages that never carry site copy (auth, cart, admin).
pub fn default_exclude_patterns() -> Vec<String> {
    vec![
        r"(?i)\.(jpg|jpeg|png|gif|svg|webp|pdf|doc|docx|xls|xlsx|zip|tar|gz|mp3|mp4|avi|mov)$"
            .to_string(),
        r"(?i)(logout|signout|login|signin|cart|checkout|wp-admin|wp-content|feed)".to_string(),
    ]
}

impl Default for UrlFilterConfig {
    fn default() -> Self {
        Self {
            root_url: None,
            include_patterns: Vec::new(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// URL filter that uses regex patterns and a same-domain rule to decide
/// which discovered URLs enter the frontier
#[derive(Debug)]
pub struct UrlFilter {
    root: Option<Url>,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl UrlFilter {
    /// Create a new URL filter from configuration
    pub fn new(config: UrlFilterConfig) -> Result<Self, regex::Error> {
        let root = config
            .root_url
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok());

        let mut include_regexes = Vec::with_capacity(config.include_patterns.len());
        for pattern in &config.include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            root,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Build a filter scoped to `root` with the default exclusions plus any
    /// user-supplied patterns
    pub fn for_root(root: &Url, extra_exclude: &[String]) -> Result<Self, regex::Error> {
        let mut exclude_patterns = default_exclude_patterns();
        exclude_patterns.extend(extra_exclude.iter().cloned());

        Self::new(UrlFilterConfig {
            root_url: Some(root.to_string()),
            include_patterns: Vec::new(),
            exclude_patterns,
        })
    }

    /// Determine if a URL should be crawled based on all filtering rules
    pub fn should_crawl(&self, url: &Url) -> bool {
        if !self.is_in_domain_scope(url) {
            return false;
        }

        // Exclusions take precedence
        let url_str = url.as_str();
        for regex in &self.exclude_regexes {
            if regex.is_match(url_str) {
                return false;
            }
        }

        // If include patterns are specified, at least one must match
        if !self.include_regexes.is_empty() {
            return self.include_regexes.iter().any(|r| r.is_match(url_str));
        }

        true
    }

    /// Check if a URL is on the same domain as the crawl root
    fn is_in_domain_scope(&self, url: &Url) -> bool {
        match &self.root {
            Some(root) => normalize::same_domain(root, url),
            None => true,
        }
    }
}
