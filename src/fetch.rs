use crate::config::{CrawlConfig, FetchMode};
use crate::error::CrawlError;
use fantoccini::{Client, ClientBuilder};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use url::Url;

/// A fetched resource: final URL after redirects, content type, and body text.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub final_url: Url,
    pub content_type: String,
    pub body: String,
}

impl FetchedPage {
    pub fn is_html(&self) -> bool {
        self.content_type.contains("text/html")
    }
}

/// Obtains raw page content for the crawl loop.
///
/// How the bytes are produced (plain request vs. rendered browser session)
/// is opaque to the caller; the loop only sees a [`FetchedPage`].
pub trait Fetcher {
    async fn fetch(&mut self, url: &Url) -> Result<FetchedPage, CrawlError>;

    /// Release any session held by the fetcher. Must be called on every exit
    /// path of a crawl.
    async fn close(&mut self);
}

/// Checks whether a body looks like binary data served with a text content
/// type: known file signatures, or too many control bytes in the first 4 KB.
pub fn looks_binary(body: &[u8]) -> bool {
    const SIGNATURES: [&[u8]; 4] = [b"%PDF-", b"\x89PNG\r\n", b"GIF8", b"\xFF\xD8\xFF"];
    if SIGNATURES.iter().any(|sig| body.starts_with(sig)) {
        return true;
    }

    let sample = &body[..body.len().min(4000)];
    if sample.is_empty() {
        return false;
    }
    let binary_chars = sample
        .iter()
        .filter(|&&b| b < 9 || (14..32).contains(&b) || b > 126)
        .count();
    binary_chars > sample.len() / 10
}

/// Plain HTTP fetcher backed by reqwest, following redirects.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Self {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(15));

        // Browser-like headers help with sites that reject obvious bots
        if config.fetch_mode != FetchMode::Plain {
            let mut headers = HeaderMap::new();
            headers.insert(
                "Accept",
                HeaderValue::from_static(
                    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
                ),
            );
            headers.insert("Accept-Language", HeaderValue::from_static("en-US,en;q=0.5"));
            headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
            headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
            headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
            headers.insert("Sec-Fetch-Site", HeaderValue::from_static("none"));
            headers.insert("Sec-Fetch-User", HeaderValue::from_static("?1"));
            headers.insert("Cache-Control", HeaderValue::from_static("max-age=0"));
            builder = builder.default_headers(headers);
        }

        Self {
            client: builder.build().expect("reqwest client construction"),
        }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&mut self, url: &Url) -> Result<FetchedPage, CrawlError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| CrawlError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        let bytes = response.bytes().await.map_err(|source| CrawlError::Fetch {
            url: url.to_string(),
            source,
        })?;

        if looks_binary(&bytes) {
            return Err(CrawlError::UnsupportedContentType {
                url: url.to_string(),
                content_type,
            });
        }

        Ok(FetchedPage {
            status: status.as_u16(),
            final_url,
            content_type,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    async fn close(&mut self) {}
}

/// Fetcher that renders each page in a WebDriver-controlled browser.
///
/// Non-HTML resources (robots.txt, sitemaps) go through an inner
/// [`HttpFetcher`] since a browser would wrap their text in markup.
pub struct WebDriverFetcher {
    client: Option<Client>,
    webdriver_url: String,
    page_load_wait: Duration,
    http: HttpFetcher,
}

impl WebDriverFetcher {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            client: None,
            webdriver_url: config.webdriver_url.clone(),
            page_load_wait: Duration::from_secs(config.page_load_wait_secs),
            http: HttpFetcher::new(config),
        }
    }

    /// Connect to the configured WebDriver, trying common fallback ports if
    /// the configured URL refuses the session.
    async fn connect(&mut self) -> Result<&mut Client, CrawlError> {
        if self.client.is_none() {
            let mut last_err = None;
            let fallbacks = [
                "http://localhost:9515", // ChromeDriver default
                "http://localhost:4444", // Selenium default
                "http://127.0.0.1:4444",
            ];

            match ClientBuilder::native().connect(&self.webdriver_url).await {
                Ok(client) => {
                    ::log::debug!("connected to WebDriver at {}", self.webdriver_url);
                    self.client = Some(client);
                }
                Err(e) => {
                    ::log::warn!(
                        "failed to connect to WebDriver at {}: {}",
                        self.webdriver_url,
                        e
                    );
                    last_err = Some(e);
                    for candidate in fallbacks {
                        if candidate == self.webdriver_url {
                            continue;
                        }
                        if let Ok(client) = ClientBuilder::native().connect(candidate).await {
                            ::log::info!("connected to fallback WebDriver at {}", candidate);
                            self.client = Some(client);
                            last_err = None;
                            break;
                        }
                    }
                }
            }

            if let Some(e) = last_err {
                return Err(CrawlError::WebDriverSession(e));
            }
        }

        Ok(self.client.as_mut().expect("client connected above"))
    }
}

impl Fetcher for WebDriverFetcher {
    async fn fetch(&mut self, url: &Url) -> Result<FetchedPage, CrawlError> {
        let path = url.path();
        if path.ends_with(".txt") || path.ends_with(".xml") {
            return self.http.fetch(url).await;
        }

        let wait = self.page_load_wait;
        let client = self.connect().await?;

        client.goto(url.as_str()).await?;
        tokio::time::sleep(wait).await;

        let current = client.current_url().await?;
        let source = client.source().await?;

        Ok(FetchedPage {
            status: 200,
            final_url: current,
            content_type: "text/html".to_string(),
            body: source,
        })
    }

    async fn close(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("failed to close WebDriver session: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_signatures_detected() {
        assert!(looks_binary(b"%PDF-1.4 rest of file"));
        assert!(looks_binary(b"\x89PNG\r\n\x1a\n"));
        assert!(looks_binary(b"GIF89a"));
        assert!(looks_binary(b"\xFF\xD8\xFF\xE0"));
    }

    #[test]
    fn test_text_not_flagged_as_binary() {
        assert!(!looks_binary(b"<html><body>hello</body></html>"));
        assert!(!looks_binary(b""));
        // Tabs and newlines are fine
        assert!(!looks_binary(b"line one\n\tline two\n"));
    }

    #[test]
    fn test_high_control_byte_ratio_flagged() {
        let mut junk = Vec::new();
        for _ in 0..100 {
            junk.extend_from_slice(b"\x00\x01\x02text");
        }
        assert!(looks_binary(&junk));
    }
}
