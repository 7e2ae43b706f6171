use crate::config::{CrawlConfig, FetchMode};
use crate::error::CrawlError;
use crate::extract::{ContentExtractor, LinkExtractor};
use crate::fetch::{Fetcher, HttpFetcher, WebDriverFetcher};
use crate::filter::UrlFilter;
use crate::frontier::{Frontier, FrontierEntry};
use crate::results::CrawlReport;
use crate::normalize;
use crate::robots::{RobotsGate, RobotsTxt};
use crate::sitemap;
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Crawl a site with the fetcher selected by configuration.
pub async fn run(config: &CrawlConfig) -> Result<CrawlReport, CrawlError> {
    match config.fetch_mode {
        FetchMode::WebDriver => {
            let fetcher = WebDriverFetcher::new(config);
            Crawler::new(config.clone(), fetcher)?.crawl().await
        }
        _ => {
            let fetcher = HttpFetcher::new(config);
            Crawler::new(config.clone(), fetcher)?.crawl().await
        }
    }
}

/// Breadth-first site crawler.
///
/// Owns all mutable crawl state (frontier, result store); pages are fetched
/// and processed one at a time so the inter-request delay holds and no
/// locking is needed.
pub struct Crawler<F: Fetcher> {
    config: CrawlConfig,
    fetcher: F,
    root: Url,
    frontier: Frontier,
    gate: RobotsGate,
    content: ContentExtractor,
    links: LinkExtractor,
    report: CrawlReport,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(config: CrawlConfig, fetcher: F) -> Result<Self, CrawlError> {
        let root = normalize::normalize(&config.start_url, config.ignore_query_params)?;
        let filter = UrlFilter::for_root(&root, &config.exclude_patterns)?;
        let links = LinkExtractor::new(filter, config.ignore_query_params, config.max_depth);

        let mut frontier = Frontier::new();
        frontier.push(FrontierEntry::new(root.to_string(), 0));

        Ok(Self {
            config,
            fetcher,
            root,
            frontier,
            gate: RobotsGate::allow_all(),
            content: ContentExtractor::default(),
            links,
            report: CrawlReport::default(),
        })
    }

    /// Run the crawl to completion. The fetcher's session is released on
    /// every exit path, including errors.
    pub async fn crawl(mut self) -> Result<CrawlReport, CrawlError> {
        ::log::info!(
            "starting crawl of {} (max {} pages, depth {})",
            self.root,
            self.config.max_pages,
            self.config.max_depth
        );

        self.prepare().await;
        self.run_loop().await;
        self.fetcher.close().await;

        self.report.visited = self.frontier.visited_count();
        ::log::info!(
            "crawl complete: visited {} URLs, extracted content from {} pages",
            self.report.visited,
            self.report.pages.len()
        );
        Ok(self.report)
    }

    /// Load the robots policy and seed from the sitemap. Neither failing is
    /// fatal.
    async fn prepare(&mut self) {
        self.gate = self.load_robots().await;

        if self.config.check_sitemap {
            let seeded = sitemap::seed(
                &mut self.fetcher,
                &self.root,
                self.config.ignore_query_params,
                &mut self.frontier,
            )
            .await;
            if seeded > 0 {
                ::log::info!("seeded {} URLs from sitemap", seeded);
            }
        }
    }

    async fn load_robots(&mut self) -> RobotsGate {
        if !self.config.respect_robots {
            return RobotsGate::allow_all();
        }
        let Ok(robots_url) = self.root.join("/robots.txt") else {
            return RobotsGate::allow_all();
        };
        match self.fetcher.fetch(&robots_url).await {
            Ok(page) => RobotsGate::new(RobotsTxt::parse(&page.body), &self.config.user_agent),
            Err(e) => {
                ::log::warn!("could not read robots.txt, allowing all: {}", e);
                RobotsGate::allow_all()
            }
        }
    }

    async fn run_loop(&mut self) {
        while self.report.processed < self.config.max_pages {
            let Some(entry) = self.frontier.pop() else {
                break;
            };

            if self.frontier.is_visited(&entry.url) {
                continue;
            }

            match self.process(&entry).await {
                Ok(processed) => {
                    if processed {
                        self.report.processed += 1;
                        self.pause().await;
                    }
                }
                Err(e) => {
                    // Local failure: skip this URL, keep crawling
                    ::log::warn!("error crawling {}: {}", entry.url, e);
                }
            }
        }
    }

    /// Process one frontier entry. Returns whether a page was fetched and
    /// parsed (and therefore counts against the page budget).
    async fn process(&mut self, entry: &FrontierEntry) -> Result<bool, CrawlError> {
        let url = Url::parse(&entry.url).map_err(|source| CrawlError::MalformedUrl {
            url: entry.url.clone(),
            source,
        })?;

        if !self.gate.can_fetch(&url) {
            // Marked visited so the check is never repeated
            self.frontier.mark_visited(&entry.url);
            ::log::info!("robots policy denies {}, skipping", url);
            return Ok(false);
        }

        self.frontier.mark_visited(&entry.url);
        ::log::info!("crawling {} (depth {})", url, entry.depth);

        let page = self.fetcher.fetch(&url).await?;

        if !page.is_html() {
            ::log::info!(
                "skipping non-HTML content type {:?} at {}",
                page.content_type,
                url
            );
            return Ok(false);
        }

        // A redirect is re-enqueued at the same depth and the original is
        // never extracted, so the final URL is processed exactly once.
        let final_url =
            normalize::normalize(page.final_url.as_str(), self.config.ignore_query_params)?;
        if final_url.as_str() != entry.url {
            ::log::info!("redirected to {}", final_url);
            self.frontier
                .push(FrontierEntry::new(final_url.to_string(), entry.depth));
            return Ok(false);
        }

        let doc = Html::parse_document(&page.body);

        if let Some(content) = self.content.extract(&doc, &url) {
            ::log::info!("extracted {} elements from {}", content.elements.len(), url);
            self.report.insert(content);
        }

        let new_links = self.links.extract(&doc, &url, entry.depth, &self.frontier);
        for link in new_links {
            ::log::debug!("queuing {} at depth {}", link.url, link.depth);
            self.frontier.push(link);
        }

        Ok(true)
    }

    /// Politeness delay between consecutive fetches.
    async fn pause(&self) {
        if self.config.delay_secs > 0.0 && !self.frontier.is_empty() {
            tokio::time::sleep(Duration::from_secs_f64(self.config.delay_secs)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchedPage;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Canned-response fetcher; records every fetch attempt.
    struct StubFetcher {
        pages: HashMap<String, FetchedPage>,
        fetched: Arc<Mutex<Vec<String>>>,
    }

    impl StubFetcher {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                fetched: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn with_html(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                FetchedPage {
                    status: 200,
                    final_url: Url::parse(url).unwrap(),
                    content_type: "text/html".to_string(),
                    body: body.to_string(),
                },
            );
            self
        }

        fn with_redirect(mut self, url: &str, target: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                FetchedPage {
                    status: 200,
                    final_url: Url::parse(target).unwrap(),
                    content_type: "text/html".to_string(),
                    body: String::new(),
                },
            );
            self
        }

        fn with_text(mut self, url: &str, content_type: &str, body: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                FetchedPage {
                    status: 200,
                    final_url: Url::parse(url).unwrap(),
                    content_type: content_type.to_string(),
                    body: body.to_string(),
                },
            );
            self
        }

        fn log_handle(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.fetched)
        }
    }

    impl Fetcher for StubFetcher {
        async fn fetch(&mut self, url: &Url) -> Result<FetchedPage, CrawlError> {
            self.fetched.lock().unwrap().push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| CrawlError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                })
        }

        async fn close(&mut self) {}
    }

    fn test_config(start: &str) -> CrawlConfig {
        let mut config = CrawlConfig::new(start);
        config.delay_secs = 0.0;
        config.respect_robots = false;
        config.check_sitemap = false;
        config
    }

    #[tokio::test]
    async fn test_single_page_with_nav_link() {
        let fetcher = StubFetcher::new().with_html(
            "http://example.com/",
            r#"<html><head><title>T</title></head><body>
                <h1>Welcome</h1><p>Hello</p>
                <nav><a href="/x">X</a></nav>
            </body></html>"#,
        );
        let log = fetcher.log_handle();

        let report = Crawler::new(test_config("http://example.com/"), fetcher)
            .unwrap()
            .crawl()
            .await
            .unwrap();

        let page = report.pages.get("http://example.com/").unwrap();
        assert_eq!(page.elements.len(), 2);

        // The nav link was discovered and attempted (404s quietly)
        let fetched = log.lock().unwrap();
        assert!(fetched.contains(&"http://example.com/x".to_string()));
        assert_eq!(report.pages.len(), 1);
    }

    #[tokio::test]
    async fn test_redirect_processed_exactly_once() {
        let fetcher = StubFetcher::new()
            .with_redirect("http://example.com/old", "http://example.com/new")
            .with_html(
                "http://example.com/new",
                "<html><body><main><p>Moved here</p></main></body></html>",
            );
        let log = fetcher.log_handle();

        let report = Crawler::new(test_config("http://example.com/old"), fetcher)
            .unwrap()
            .crawl()
            .await
            .unwrap();

        assert!(report.pages.contains_key("http://example.com/new"));
        assert!(!report.pages.contains_key("http://example.com/old"));

        let fetched = log.lock().unwrap();
        let new_fetches = fetched
            .iter()
            .filter(|u| u.as_str() == "http://example.com/new")
            .count();
        assert_eq!(new_fetches, 1);
    }

    #[tokio::test]
    async fn test_robots_denial_prevents_fetch() {
        let fetcher = StubFetcher::new()
            .with_text(
                "http://example.com/robots.txt",
                "text/plain",
                "User-agent: *\nDisallow: /private\n",
            )
            .with_html(
                "http://example.com/",
                r#"<html><body><main><p>Home</p>
                    <a href="/private/page">Secret</a>
                    <a href="/public">Open</a>
                </main></body></html>"#,
            )
            .with_html(
                "http://example.com/public",
                "<html><body><main><p>Open</p></main></body></html>",
            );
        let log = fetcher.log_handle();

        let mut config = test_config("http://example.com/");
        config.respect_robots = true;

        let report = Crawler::new(config, fetcher).unwrap().crawl().await.unwrap();

        let fetched = log.lock().unwrap();
        assert!(!fetched.contains(&"http://example.com/private/page".to_string()));
        assert!(fetched.contains(&"http://example.com/public".to_string()));
        assert_eq!(report.pages.len(), 2);
    }

    #[tokio::test]
    async fn test_page_cap_respected() {
        let fetcher = StubFetcher::new()
            .with_html(
                "http://example.com/",
                r#"<html><body><main><p>Home</p>
                    <a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>
                </main></body></html>"#,
            )
            .with_html("http://example.com/a", "<html><body><main><p>A</p></main></body></html>")
            .with_html("http://example.com/b", "<html><body><main><p>B</p></main></body></html>")
            .with_html("http://example.com/c", "<html><body><main><p>C</p></main></body></html>");

        let mut config = test_config("http://example.com/");
        config.max_pages = 2;

        let report = Crawler::new(config, fetcher).unwrap().crawl().await.unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(report.pages.len(), 2);
    }

    #[tokio::test]
    async fn test_depth_bound_respected() {
        let fetcher = StubFetcher::new()
            .with_html(
                "http://example.com/",
                r#"<html><body><main><p>Home</p><a href="/a">A</a></main></body></html>"#,
            )
            .with_html(
                "http://example.com/a",
                r#"<html><body><main><p>A</p><a href="/b">B</a></main></body></html>"#,
            )
            .with_html("http://example.com/b", "<html><body><main><p>B</p></main></body></html>");
        let log = fetcher.log_handle();

        let mut config = test_config("http://example.com/");
        config.max_depth = 1;

        let report = Crawler::new(config, fetcher).unwrap().crawl().await.unwrap();

        // /a is at depth 1; its links are beyond the bound
        assert!(report.pages.contains_key("http://example.com/a"));
        assert!(!report.pages.contains_key("http://example.com/b"));
        let fetched = log.lock().unwrap();
        assert!(!fetched.contains(&"http://example.com/b".to_string()));
    }

    #[tokio::test]
    async fn test_non_html_skipped_without_counting() {
        let fetcher = StubFetcher::new()
            .with_html(
                "http://example.com/",
                r#"<html><body><main><p>Home</p><a href="/data">D</a></main></body></html>"#,
            )
            .with_text("http://example.com/data", "application/json", "{}");

        let report = Crawler::new(test_config("http://example.com/"), fetcher)
            .unwrap()
            .crawl()
            .await
            .unwrap();

        assert_eq!(report.processed, 1);
        assert!(!report.pages.contains_key("http://example.com/data"));
        assert_eq!(report.visited, 2);
    }

    #[tokio::test]
    async fn test_empty_page_counts_against_budget() {
        let fetcher = StubFetcher::new()
            .with_html(
                "http://example.com/",
                r#"<html><body><main><p>Home</p><a href="/empty">E</a></main></body></html>"#,
            )
            .with_html(
                "http://example.com/empty",
                "<html><body><footer><p>Chrome only</p></footer></body></html>",
            );

        let report = Crawler::new(test_config("http://example.com/"), fetcher)
            .unwrap()
            .crawl()
            .await
            .unwrap();

        // Fetched and parsed, so it counts, but it yields no PageContent
        assert_eq!(report.processed, 2);
        assert!(!report.pages.contains_key("http://example.com/empty"));
    }

    #[tokio::test]
    async fn test_sitemap_seeds_frontier() {
        let fetcher = StubFetcher::new()
            .with_text(
                "http://example.com/sitemap.xml",
                "application/xml",
                r#"<urlset>
                    <url><loc>http://example.com/deep/page</loc></url>
                    <url><loc>http://other.com/foreign</loc></url>
                </urlset>"#,
            )
            .with_html("http://example.com/", "<html><body><main><p>Home</p></main></body></html>")
            .with_html(
                "http://example.com/deep/page",
                "<html><body><main><p>Deep</p></main></body></html>",
            );
        let log = fetcher.log_handle();

        let mut config = test_config("http://example.com/");
        config.check_sitemap = true;

        let report = Crawler::new(config, fetcher).unwrap().crawl().await.unwrap();

        assert!(report.pages.contains_key("http://example.com/deep/page"));
        let fetched = log.lock().unwrap();
        assert!(!fetched.contains(&"http://other.com/foreign".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_errors_do_not_abort() {
        let fetcher = StubFetcher::new().with_html(
            "http://example.com/",
            r#"<html><body><main><p>Home</p>
                <a href="/missing">M</a><a href="/alive">A</a>
            </main></body></html>"#,
        );
        // /missing 404s, /alive also 404s; the crawl still completes
        let report = Crawler::new(test_config("http://example.com/"), fetcher)
            .unwrap()
            .crawl()
            .await
            .unwrap();

        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.visited, 3);
    }
}
