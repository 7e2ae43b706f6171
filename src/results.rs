use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse classification of a page derived from its URL path shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Homepage,
    About,
    Contact,
    BlogIndex,
    BlogPost,
    ProductIndex,
    ProductDetail,
    Unknown,
}

impl PageType {
    /// Human-facing label, e.g. "Blog Post"
    pub fn label(&self) -> &'static str {
        match self {
            PageType::Homepage => "Homepage",
            PageType::About => "About",
            PageType::Contact => "Contact",
            PageType::BlogIndex => "Blog Index",
            PageType::BlogPost => "Blog Post",
            PageType::ProductIndex => "Product Index",
            PageType::ProductDetail => "Product Detail",
            PageType::Unknown => "Unknown",
        }
    }

    /// Directory-friendly name, e.g. "blog_post"
    pub fn slug(&self) -> &'static str {
        match self {
            PageType::Homepage => "homepage",
            PageType::About => "about",
            PageType::Contact => "contact",
            PageType::BlogIndex => "blog_index",
            PageType::BlogPost => "blog_post",
            PageType::ProductIndex => "product_index",
            PageType::ProductDetail => "product_detail",
            PageType::Unknown => "unknown",
        }
    }
}

/// One extracted piece of page copy, in the order the extraction passes
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentElement {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    List { ordered: bool, items: Vec<String> },
    Blockquote { text: String },
}

/// Structured text content extracted from one page. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    pub url: String,
    pub title: String,
    pub page_type: PageType,
    pub meta_description: String,
    pub elements: Vec<ContentElement>,
}

/// In-memory result store plus end-of-run counters, handed read-only to the
/// output serializers.
#[derive(Debug, Default, Serialize)]
pub struct CrawlReport {
    /// Extracted content keyed by normalized URL
    pub pages: BTreeMap<String, PageContent>,

    /// URLs popped and processed, regardless of fetch outcome
    pub visited: usize,

    /// Pages fetched and parsed (counted against the page budget)
    pub processed: usize,
}

impl CrawlReport {
    pub fn insert(&mut self, content: PageContent) {
        self.pages.insert(content.url.clone(), content);
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages grouped by type, for the writers that organize output that way
    pub fn pages_by_type(&self) -> BTreeMap<PageType, Vec<&PageContent>> {
        let mut grouped: BTreeMap<PageType, Vec<&PageContent>> = BTreeMap::new();
        for content in self.pages.values() {
            grouped.entry(content.page_type).or_default().push(content);
        }
        for pages in grouped.values_mut() {
            pages.sort_by(|a, b| a.title.cmp(&b.title));
        }
        grouped
    }
}
