use crate::results::PageType;
use regex::Regex;
use url::Url;

/// Ordered path-pattern rules mapping a URL to a [`PageType`].
///
/// Checked in priority order, first match wins. The table is data, not code:
/// new site conventions are added by extending it, not by editing the
/// traversal logic.
#[derive(Debug)]
pub struct PageTypeRules {
    rules: Vec<(Regex, PageType)>,
}

impl Default for PageTypeRules {
    fn default() -> Self {
        let table = [
            (r"^/?$", PageType::Homepage),
            (r"(?i)/(about|about-us)/?$", PageType::About),
            (r"(?i)/(contact|contact-us)/?$", PageType::Contact),
            (r"(?i)/blog/?$", PageType::BlogIndex),
            (r"(?i)(/blog/|/news/|/article/|/post/)", PageType::BlogPost),
            (r"(?i)/(product|products)/?$", PageType::ProductIndex),
            (r"(?i)/(product|products)/[^/]+/?$", PageType::ProductDetail),
        ];
        Self {
            rules: table
                .into_iter()
                .map(|(pattern, label)| {
                    (
                        Regex::new(pattern).expect("built-in page type pattern"),
                        label,
                    )
                })
                .collect(),
        }
    }
}

impl PageTypeRules {
    /// Classify a URL by its path shape.
    pub fn classify(&self, url: &Url) -> PageType {
        let path = url.path();
        for (pattern, label) in &self.rules {
            if pattern.is_match(path) {
                return *label;
            }
        }
        PageType::Unknown
    }
}
