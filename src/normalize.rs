use crate::error::CrawlError;
use url::Url;

/// Normalizes a raw URL string into the canonical key used for visited-set
/// membership and queue deduplication.
///
/// - a missing scheme defaults to `http://`
/// - a single trailing slash is stripped unless the path is just `/`
/// - the query string is dropped when `ignore_query` is set
/// - the fragment is always dropped
pub fn normalize(raw: &str, ignore_query: bool) -> Result<Url, CrawlError> {
    let trimmed = raw.trim();

    let mut url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("http://{}", trimmed)).map_err(|source| {
                CrawlError::MalformedUrl {
                    url: trimmed.to_string(),
                    source,
                }
            })?
        }
        Err(source) => {
            return Err(CrawlError::MalformedUrl {
                url: trimmed.to_string(),
                source,
            });
        }
    };

    let path = url.path();
    if path.ends_with('/') && path != "/" {
        let stripped = path.trim_end_matches('/').to_string();
        url.set_path(&stripped);
    }

    if ignore_query {
        url.set_query(None);
    }
    url.set_fragment(None);

    Ok(url)
}

/// Resolves `href` against `base` and normalizes the result.
pub fn resolve(base: &Url, href: &str, ignore_query: bool) -> Result<Url, CrawlError> {
    let joined = base.join(href).map_err(|source| CrawlError::MalformedUrl {
        url: href.to_string(),
        source,
    })?;
    normalize(joined.as_str(), ignore_query)
}

/// Checks whether two URLs share a host, ignoring a leading `www.`.
pub fn same_domain(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(ha), Some(hb)) => strip_www(ha) == strip_www(hb),
        _ => false,
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_defaulted() {
        let url = normalize("example.com/page", true).unwrap();
        assert_eq!(url.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let url = normalize("http://example.com/a/", true).unwrap();
        assert_eq!(url.as_str(), "http://example.com/a");

        // Root path keeps its slash
        let root = normalize("http://example.com/", true).unwrap();
        assert_eq!(root.as_str(), "http://example.com/");
    }

    #[test]
    fn test_query_handling() {
        let dropped = normalize("http://example.com/p?a=1&b=2", true).unwrap();
        assert_eq!(dropped.as_str(), "http://example.com/p");

        let kept = normalize("http://example.com/p?a=1&b=2", false).unwrap();
        assert_eq!(kept.as_str(), "http://example.com/p?a=1&b=2");
    }

    #[test]
    fn test_fragment_always_dropped() {
        let url = normalize("http://example.com/p#section", false).unwrap();
        assert_eq!(url.as_str(), "http://example.com/p");
    }

    #[test]
    fn test_equivalent_urls_collapse() {
        let a = normalize("example.com/a/", true).unwrap();
        let b = normalize("http://example.com/a", true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "example.com",
            "http://example.com/a/b/?x=1#y",
            "https://www.example.com/a/",
        ] {
            let once = normalize(raw, true).unwrap();
            let twice = normalize(once.as_str(), true).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_malformed_url_rejected() {
        assert!(normalize("http://", true).is_err());
    }

    #[test]
    fn test_same_domain_ignores_www() {
        let a = Url::parse("http://www.example.com/").unwrap();
        let b = Url::parse("http://example.com/about").unwrap();
        let c = Url::parse("http://other.com/").unwrap();
        assert!(same_domain(&a, &b));
        assert!(!same_domain(&a, &c));
    }

    #[test]
    fn test_resolve_relative() {
        let base = Url::parse("http://example.com/blog/post").unwrap();
        let url = resolve(&base, "/about/", true).unwrap();
        assert_eq!(url.as_str(), "http://example.com/about");
    }
}
