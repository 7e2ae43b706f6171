use thiserror::Error;

/// Errors raised while crawling a site.
///
/// Everything except `Io` is local to a single URL: the crawl loop logs the
/// error and moves on to the next queued entry. `Io` surfaces before any
/// crawling begins (the output directory could not be created).
#[derive(Debug, Error)]
pub enum CrawlError {
    /// URL could not be parsed even after defaulting the scheme
    #[error("malformed URL {url:?}: {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Network-level fetch failure (connect, timeout, body read)
    #[error("fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Response was not HTML (or looked like binary data served as HTML)
    #[error("unsupported content type {content_type:?} for {url}")]
    UnsupportedContentType { url: String, content_type: String },

    /// Document could not be turned into something extractable
    #[error("parse failure for {url}: {reason}")]
    Parse { url: String, reason: String },

    /// robots.txt disallows fetching this URL
    #[error("robots policy denies {url}")]
    PolicyDenied { url: String },

    /// WebDriver command error
    #[error("webdriver error: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    /// Could not establish a WebDriver session
    #[error("webdriver session error: {0}")]
    WebDriverSession(#[from] fantoccini::error::NewSessionError),

    /// Invalid user-supplied filter pattern
    #[error("invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Filesystem error while preparing or writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
