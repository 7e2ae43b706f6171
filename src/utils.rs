use url::Url;

/// Host name used to prefix output files, e.g. `example.com_content.json`.
pub fn domain_slug(url: &Url) -> String {
    url.host_str().unwrap_or("site").to_string()
}

/// Convert a URL path to a flat filename stem; the root path becomes `index`.
pub fn path_to_stem(url: &Url) -> String {
    let path = url.path().trim_matches('/');
    if path.is_empty() {
        "index".to_string()
    } else {
        path.replace(['/', ':', '?', '&', '=', '#', '%'], "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_slug() {
        let url = Url::parse("https://www.example.com/a").unwrap();
        assert_eq!(domain_slug(&url), "www.example.com");
    }

    #[test]
    fn test_path_to_stem() {
        let root = Url::parse("http://example.com/").unwrap();
        assert_eq!(path_to_stem(&root), "index");

        let nested = Url::parse("http://example.com/blog/my-post").unwrap();
        assert_eq!(path_to_stem(&nested), "blog_my-post");
    }
}
