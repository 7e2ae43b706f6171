use clap::{Parser, ValueEnum};
use copycrawl::{CrawlConfig, FetchMode, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "copycrawl")]
#[command(about = "Crawl a website and extract its readable content")]
#[command(version)]
pub struct Args {
    /// Root URL of the website to crawl
    pub url: String,

    /// Directory to write extracted content into
    #[arg(short, long, default_value = "output")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Readable)]
    pub format: FormatArg,

    /// Maximum number of pages to process
    #[arg(short, long, default_value_t = 1000)]
    pub max_pages: usize,

    /// Maximum link depth from the root URL
    #[arg(short = 'd', long, default_value_t = 10)]
    pub max_depth: usize,

    /// Seconds to wait between page fetches
    #[arg(short = 'w', long, default_value_t = 1.0)]
    pub delay: f64,

    /// How pages are fetched (plain HTTP, browser-like headers, or a WebDriver session)
    #[arg(long, value_enum, default_value_t = JsModeArg::Headers)]
    pub js_mode: JsModeArg,

    /// Seconds to let a WebDriver page settle before reading its source
    #[arg(long, default_value_t = 3)]
    pub page_load_wait: u64,

    /// Crawl without consulting robots.txt
    #[arg(long)]
    pub ignore_robots: bool,

    /// Treat URLs differing only in query string as distinct pages
    #[arg(long)]
    pub respect_params: bool,

    /// Do not seed the frontier from the site's sitemap
    #[arg(long)]
    pub skip_sitemap: bool,

    /// Extra URL patterns (regex) to exclude from the crawl
    #[arg(short = 'x', long = "exclude")]
    pub exclude_patterns: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Txt,
    Markdown,
    Readable,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum JsModeArg {
    /// Plain HTTP requests with a minimal header set
    None,
    /// HTTP requests with browser-like headers
    Headers,
    /// Render pages through a WebDriver session
    Webdriver,
}

impl Args {
    pub fn to_config(&self) -> CrawlConfig {
        let mut config = CrawlConfig::new(&self.url);
        config.max_pages = self.max_pages;
        config.max_depth = self.max_depth;
        config.delay_secs = self.delay;
        config.respect_robots = !self.ignore_robots;
        config.ignore_query_params = !self.respect_params;
        config.check_sitemap = !self.skip_sitemap;
        config.page_load_wait_secs = self.page_load_wait;
        config.fetch_mode = match self.js_mode {
            JsModeArg::None => FetchMode::Plain,
            JsModeArg::Headers => FetchMode::Headers,
            JsModeArg::Webdriver => FetchMode::WebDriver,
        };
        config
            .exclude_patterns
            .extend(self.exclude_patterns.iter().cloned());
        config
    }

    pub fn output_format(&self) -> OutputFormat {
        match self.format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Txt => OutputFormat::Txt,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Readable => OutputFormat::Readable,
        }
    }
}
