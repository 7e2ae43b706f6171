use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How page bodies are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Plain HTTP requests with a minimal user-agent
    Plain,
    /// HTTP requests with browser-like headers (helps with bot-hostile sites)
    #[default]
    Headers,
    /// A WebDriver-controlled browser renders each page before extraction
    WebDriver,
}

/// Configuration for a site crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// URL to start crawling from
    pub start_url: String,

    /// Maximum number of pages to process
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum link depth from the root URL
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Delay between requests in seconds
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,

    /// Whether to honor robots.txt rules
    #[serde(default = "default_true")]
    pub respect_robots: bool,

    /// Whether URLs differing only by query string collapse to one page
    #[serde(default = "default_true")]
    pub ignore_query_params: bool,

    /// Whether to seed the queue from /sitemap.xml before crawling
    #[serde(default = "default_true")]
    pub check_sitemap: bool,

    /// User-agent string sent with requests and matched against robots.txt
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// How page bodies are fetched
    #[serde(default)]
    pub fetch_mode: FetchMode,

    /// URL for the WebDriver instance (fetch_mode = webdriver)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Seconds to let a rendered page settle before reading its source
    #[serde(default = "default_page_load_wait")]
    pub page_load_wait_secs: u64,

    /// Extra regex patterns for URLs to exclude from crawling
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl CrawlConfig {
    /// Create a new configuration with default values
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            delay_secs: default_delay_secs(),
            respect_robots: true,
            ignore_query_params: true,
            check_sitemap: true,
            user_agent: default_user_agent(),
            fetch_mode: FetchMode::default(),
            webdriver_url: default_webdriver_url(),
            page_load_wait_secs: default_page_load_wait(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Apply the WEBDRIVER_URL environment override, if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }
}

fn default_max_pages() -> usize {
    1000
}

fn default_max_depth() -> usize {
    10
}

fn default_delay_secs() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36"
        .to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_page_load_wait() -> u64 {
    3
}
