use crate::extract::page_type::PageTypeRules;
use crate::extract::text::clean_text;
use crate::results::{ContentElement, PageContent};
use regex::Regex;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Common content-container selectors, tried in order: semantic tags first,
/// then class/id conventions. The first non-empty match is the content root.
const CONTENT_WRAPPERS: [&str; 13] = [
    "main",
    "article",
    "section",
    "div.content",
    "div.main",
    "div.post",
    "div#content",
    "div#main",
    "div.entry",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".content-area",
];

/// Classifies a page, locates its main content region, and emits the ordered
/// element sequence. Boilerplate (navigation, headers, footers, widgets) is
/// excluded via a node set built before the element passes run, so the
/// passes see a cleaned view of the subtree without mutating the document.
pub struct ContentExtractor {
    wrappers: Vec<Selector>,
    body: Selector,
    title: Selector,
    meta_description: Selector,
    noise_tags: Selector,
    noise_class: Regex,
    headings: Vec<Selector>,
    paragraphs: Selector,
    lists: Selector,
    blockquotes: Selector,
    page_rules: PageTypeRules,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self {
            wrappers: CONTENT_WRAPPERS
                .iter()
                .map(|s| Selector::parse(s).unwrap())
                .collect(),
            body: Selector::parse("body").unwrap(),
            title: Selector::parse("title").unwrap(),
            meta_description: Selector::parse(r#"meta[name="description"]"#).unwrap(),
            noise_tags: Selector::parse("nav, header, footer").unwrap(),
            noise_class: Regex::new("nav|menu|footer|header|sidebar|widget").unwrap(),
            headings: (1..=6)
                .map(|level| Selector::parse(&format!("h{}", level)).unwrap())
                .collect(),
            paragraphs: Selector::parse("p").unwrap(),
            lists: Selector::parse("ul, ol").unwrap(),
            blockquotes: Selector::parse("blockquote").unwrap(),
            page_rules: PageTypeRules::default(),
        }
    }
}

impl ContentExtractor {
    /// Extract structured content from a parsed page. Returns `None` when no
    /// elements survive the passes; such pages are left out of the result
    /// store.
    pub fn extract(&self, doc: &Html, url: &Url) -> Option<PageContent> {
        let title = doc
            .select(&self.title)
            .next()
            .map(|t| clean_text(&t.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "No Title".to_string());

        let meta_description = doc
            .select(&self.meta_description)
            .next()
            .and_then(|m| m.value().attr("content"))
            .map(clean_text)
            .unwrap_or_default();

        let root = self.find_content_root(doc);
        let noise = self.collect_noise(&root);
        let elements = self.element_passes(&root, &noise);

        if elements.is_empty() {
            ::log::debug!("no content elements extracted from {}", url);
            return None;
        }

        Some(PageContent {
            url: url.to_string(),
            title,
            page_type: self.page_rules.classify(url),
            meta_description,
            elements,
        })
    }

    /// First wrapper selector with a non-empty match wins; otherwise the
    /// document body, otherwise the whole document.
    fn find_content_root<'a>(&self, doc: &'a Html) -> ElementRef<'a> {
        for wrapper in &self.wrappers {
            if let Some(element) = doc.select(wrapper).find(has_text) {
                return element;
            }
        }
        doc.select(&self.body)
            .next()
            .unwrap_or_else(|| doc.root_element())
    }

    /// Nodes under the content root that are navigation/boilerplate: nav,
    /// header and footer tags, plus anything class-named like chrome.
    fn collect_noise(&self, root: &ElementRef) -> HashSet<NodeId> {
        let mut noise: HashSet<NodeId> = HashSet::new();
        for element in root.select(&self.noise_tags) {
            noise.insert(element.id());
        }
        for node in root.descendants() {
            if node.id() == root.id() {
                continue;
            }
            if let Some(element) = ElementRef::wrap(node) {
                if let Some(class) = element.value().attr("class") {
                    if self.noise_class.is_match(class) {
                        noise.insert(element.id());
                    }
                }
            }
        }
        noise
    }

    /// Fixed pass order: headings h1..h6, paragraphs, lists, blockquotes.
    /// Element order reflects these passes, not true source order.
    fn element_passes(
        &self,
        root: &ElementRef,
        noise: &HashSet<NodeId>,
    ) -> Vec<ContentElement> {
        let mut elements = Vec::new();

        for (idx, selector) in self.headings.iter().enumerate() {
            for heading in root.select(selector) {
                if in_noise(&heading, noise, root.id()) {
                    continue;
                }
                let text = clean_text(&heading.text().collect::<String>());
                if !text.is_empty() {
                    elements.push(ContentElement::Heading {
                        level: idx as u8 + 1,
                        text,
                    });
                }
            }
        }

        for paragraph in root.select(&self.paragraphs) {
            if in_noise(&paragraph, noise, root.id()) {
                continue;
            }
            let text = clean_text(&paragraph.text().collect::<String>());
            if !text.is_empty() {
                elements.push(ContentElement::Paragraph { text });
            }
        }

        for list in root.select(&self.lists) {
            if in_noise(&list, noise, root.id()) || is_nav_list(&list) {
                continue;
            }
            let items: Vec<String> = list
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == "li")
                .map(|li| clean_text(&li.text().collect::<String>()))
                .filter(|text| !text.is_empty())
                .collect();
            if !items.is_empty() {
                elements.push(ContentElement::List {
                    ordered: list.value().name() == "ol",
                    items,
                });
            }
        }

        for quote in root.select(&self.blockquotes) {
            if in_noise(&quote, noise, root.id()) {
                continue;
            }
            let text = clean_text(&quote.text().collect::<String>());
            if !text.is_empty() {
                elements.push(ContentElement::Blockquote { text });
            }
        }

        elements
    }
}

fn has_text(element: &ElementRef) -> bool {
    element.text().any(|t| !t.trim().is_empty())
}

/// Lists whose class suggests navigation carry no copy.
fn is_nav_list(list: &ElementRef) -> bool {
    list.value()
        .classes()
        .any(|class| class.contains("nav") || class.contains("menu"))
}

/// Whether the element or any ancestor below the content root is in the
/// noise set.
fn in_noise(element: &ElementRef, noise: &HashSet<NodeId>, root_id: NodeId) -> bool {
    if noise.contains(&element.id()) {
        return true;
    }
    for ancestor in element.ancestors() {
        if ancestor.id() == root_id {
            break;
        }
        if noise.contains(&ancestor.id()) {
            return true;
        }
    }
    false
}
