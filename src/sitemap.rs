use crate::fetch::Fetcher;
use crate::frontier::{Frontier, FrontierEntry};
use crate::normalize;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Pulls candidate URLs out of a sitemap body: `<loc>` elements when
/// present, otherwise a permissive scan for anything URL-shaped.
pub fn parse_sitemap(body: &str) -> Vec<String> {
    let doc = Html::parse_document(body);
    let loc = Selector::parse("loc").unwrap();

    let urls: Vec<String> = doc
        .select(&loc)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();
    if !urls.is_empty() {
        return urls;
    }

    let url_shaped = Regex::new(r#"https?://[^\s<>"']+"#).unwrap();
    url_shaped
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Seeds the frontier from `/sitemap.xml` before crawling begins.
///
/// Same-domain, not-yet-seen URLs enter at depth 0. When the sitemap is
/// missing, `/sitemap_index.xml` is probed as a fallback but its contents
/// are not expanded. Every failure here is logged and swallowed: seeding
/// must never abort a crawl.
pub async fn seed<F: Fetcher>(
    fetcher: &mut F,
    root: &Url,
    ignore_query: bool,
    frontier: &mut Frontier,
) -> usize {
    let Ok(sitemap_url) = root.join("/sitemap.xml") else {
        return 0;
    };

    let body = match fetcher.fetch(&sitemap_url).await {
        Ok(page) => page.body,
        Err(e) => {
            ::log::info!("no sitemap at {}: {}", sitemap_url, e);
            probe_sitemap_index(fetcher, root).await;
            return 0;
        }
    };

    let candidates = parse_sitemap(&body);
    if candidates.is_empty() {
        ::log::info!("sitemap at {} contained no URLs", sitemap_url);
        probe_sitemap_index(fetcher, root).await;
        return 0;
    }

    ::log::info!("found {} URLs in {}", candidates.len(), sitemap_url);
    let mut seeded = 0;
    for candidate in candidates {
        let url = match normalize::normalize(&candidate, ignore_query) {
            Ok(url) => url,
            Err(e) => {
                ::log::debug!("skipping sitemap entry {:?}: {}", candidate, e);
                continue;
            }
        };
        if !normalize::same_domain(root, &url) {
            continue;
        }
        if frontier.push(FrontierEntry::new(url.to_string(), 0)) {
            ::log::debug!("seeded from sitemap: {}", url);
            seeded += 1;
        }
    }
    seeded
}

/// A sitemap index may exist where no plain sitemap does. Its nested
/// sitemaps are not fetched; this only reports what was found.
async fn probe_sitemap_index<F: Fetcher>(fetcher: &mut F, root: &Url) {
    let Ok(index_url) = root.join("/sitemap_index.xml") else {
        return;
    };
    match fetcher.fetch(&index_url).await {
        Ok(_) => ::log::info!(
            "sitemap index found at {} but not expanded; seed its sitemaps directly if needed",
            index_url
        ),
        Err(e) => ::log::debug!("no sitemap index at {}: {}", index_url, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loc_elements() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc>http://example.com/</loc></url>
              <url><loc> http://example.com/about </loc></url>
            </urlset>"#;

        let urls = parse_sitemap(body);
        assert_eq!(
            urls,
            vec!["http://example.com/", "http://example.com/about"]
        );
    }

    #[test]
    fn test_fallback_url_scan() {
        let body = "some text http://example.com/a and https://example.com/b?x=1 trailing";
        let urls = parse_sitemap(body);
        assert_eq!(
            urls,
            vec!["http://example.com/a", "https://example.com/b?x=1"]
        );
    }

    #[test]
    fn test_empty_sitemap() {
        assert!(parse_sitemap("").is_empty());
        assert!(parse_sitemap("<urlset></urlset>").is_empty());
    }
}
