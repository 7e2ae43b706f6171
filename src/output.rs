use crate::error::CrawlError;
use crate::results::{ContentElement, CrawlReport, PageContent};
use crate::utils;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use url::Url;

/// Supported serializations of a crawl report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Txt,
    Markdown,
    Readable,
}

/// Serialize the report into `out_dir` in the chosen format. The report is
/// read-only here; writers never touch crawl state.
pub fn write_report(
    report: &CrawlReport,
    root: &Url,
    format: OutputFormat,
    out_dir: &Path,
) -> Result<(), CrawlError> {
    match format {
        OutputFormat::Json => write_json(report, root, out_dir),
        OutputFormat::Txt => write_txt(report, root, out_dir),
        OutputFormat::Markdown => write_markdown(report, root, out_dir),
        OutputFormat::Readable => write_readable(report, root, out_dir),
    }
}

fn write_json(report: &CrawlReport, root: &Url, out_dir: &Path) -> Result<(), CrawlError> {
    let path = out_dir.join(format!("{}_content.json", utils::domain_slug(root)));
    let pages: Vec<&PageContent> = report.pages.values().collect();
    let json = serde_json::to_string_pretty(&pages)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(&path, json)?;
    ::log::info!("content saved as JSON to {}", path.display());
    Ok(())
}

fn write_txt(report: &CrawlReport, root: &Url, out_dir: &Path) -> Result<(), CrawlError> {
    let domain = utils::domain_slug(root);
    let mut out = String::new();

    let _ = writeln!(out, "# {} Website Content\n", domain);
    let _ = writeln!(out, "## Table of Contents\n");
    for (page_type, pages) in report.pages_by_type() {
        let _ = writeln!(out, "* {}", page_type.label());
        for page in pages {
            let _ = writeln!(out, "  - {}", page.title);
        }
    }
    let _ = writeln!(out, "\n{}\n", "=".repeat(80));

    for page in report.pages.values() {
        let _ = writeln!(out, "# {}\n", page.title);
        let _ = writeln!(out, "URL: {}", page.url);
        let _ = writeln!(out, "Type: {}", page.page_type.label());
        if !page.meta_description.is_empty() {
            let _ = writeln!(out, "Description: {}", page.meta_description);
        }
        out.push('\n');

        for element in &page.elements {
            match element {
                ContentElement::Heading { level, text } => {
                    // One level below the page title
                    let _ = writeln!(out, "{} {}\n", "#".repeat(*level as usize + 1), text);
                }
                ContentElement::Paragraph { text } => {
                    let _ = writeln!(out, "{}\n", text);
                }
                ContentElement::List { ordered, items } => {
                    for (idx, item) in items.iter().enumerate() {
                        if *ordered {
                            let _ = writeln!(out, "{}. {}", idx + 1, item);
                        } else {
                            let _ = writeln!(out, "* {}", item);
                        }
                    }
                    out.push('\n');
                }
                ContentElement::Blockquote { text } => {
                    for line in text.lines() {
                        let _ = writeln!(out, "> {}", line);
                    }
                    out.push('\n');
                }
            }
        }
        let _ = writeln!(out, "\n{}\n", "=".repeat(80));
    }

    let path = out_dir.join(format!("{}_content.txt", domain));
    fs::write(&path, out)?;
    ::log::info!("content saved as text to {}", path.display());
    Ok(())
}

fn write_markdown(report: &CrawlReport, root: &Url, out_dir: &Path) -> Result<(), CrawlError> {
    let grouped = report.pages_by_type();

    for (page_type, pages) in &grouped {
        let type_dir = out_dir.join(page_type.slug());
        fs::create_dir_all(&type_dir)?;

        for page in pages {
            let stem = Url::parse(&page.url)
                .map(|u| utils::path_to_stem(&u))
                .unwrap_or_else(|_| "page".to_string());
            let mut out = String::new();

            let _ = writeln!(out, "# {}\n", page.title);
            if !page.meta_description.is_empty() {
                let _ = writeln!(out, "_{}_\n", page.meta_description);
            }
            let _ = writeln!(out, "URL: {}\n", page.url);

            for element in &page.elements {
                match element {
                    ContentElement::Heading { level, text } => {
                        let level = (*level as usize + 1).min(6);
                        let _ = writeln!(out, "{} {}\n", "#".repeat(level), text);
                    }
                    ContentElement::Paragraph { text } => {
                        let _ = writeln!(out, "{}\n", text);
                    }
                    ContentElement::List { ordered, items } => {
                        for item in items {
                            if *ordered {
                                let _ = writeln!(out, "1. {}", item);
                            } else {
                                let _ = writeln!(out, "* {}", item);
                            }
                        }
                        out.push('\n');
                    }
                    ContentElement::Blockquote { text } => {
                        let _ = writeln!(out, "> {}\n", text);
                    }
                }
            }

            fs::write(type_dir.join(format!("{}.md", stem)), out)?;
        }
    }

    // Index linking every page, grouped by type
    let mut index = String::new();
    let _ = writeln!(index, "# {} Content\n", utils::domain_slug(root));
    let _ = writeln!(index, "## Contents\n");
    for (page_type, pages) in &grouped {
        let _ = writeln!(index, "### {}\n", page_type.label());
        for page in pages {
            let stem = Url::parse(&page.url)
                .map(|u| utils::path_to_stem(&u))
                .unwrap_or_else(|_| "page".to_string());
            let _ = writeln!(
                index,
                "* [{}]({}/{}.md)",
                page.title,
                page_type.slug(),
                stem
            );
        }
        index.push('\n');
    }
    fs::write(out_dir.join("index.md"), index)?;

    ::log::info!("content saved as markdown files to {}", out_dir.display());
    Ok(())
}

fn write_readable(report: &CrawlReport, root: &Url, out_dir: &Path) -> Result<(), CrawlError> {
    let domain = utils::domain_slug(root);
    let mut out = String::new();

    let header = format!("{} Website Content", domain);
    let _ = writeln!(out, "{}", header);
    let _ = writeln!(out, "{}\n", "=".repeat(header.len()));
    let _ = writeln!(
        out,
        "Generated on {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    for (page_type, pages) in report.pages_by_type() {
        let section = page_type.label();
        let _ = writeln!(out, "\n\n{}", section);
        let _ = writeln!(out, "{}\n", "-".repeat(section.len()));

        for page in pages {
            let _ = writeln!(out, "{}", page.title);
            let _ = writeln!(out, "{}\n", ".".repeat(page.title.len()));

            if !page.meta_description.is_empty() {
                let _ = writeln!(out, "{}\n", page.meta_description);
            }

            for element in &page.elements {
                match element {
                    ContentElement::Heading { level, text } => {
                        let _ = writeln!(out, "\n{}", text);
                        if *level <= 2 {
                            let _ = writeln!(out, "{}", "-".repeat(text.len()));
                        }
                    }
                    ContentElement::Paragraph { text } => {
                        let _ = writeln!(out, "{}\n", text);
                    }
                    ContentElement::List { ordered, items } => {
                        out.push('\n');
                        for (idx, item) in items.iter().enumerate() {
                            if *ordered {
                                let _ = writeln!(out, "{}. {}", idx + 1, item);
                            } else {
                                let _ = writeln!(out, "\u{2022} {}", item);
                            }
                        }
                        out.push('\n');
                    }
                    ContentElement::Blockquote { text } => {
                        let _ = writeln!(out, "\n    {}\n", text.replace('\n', "\n    "));
                    }
                }
            }

            let _ = writeln!(out, "\n{}\n", "-".repeat(80));
        }
    }

    let path = out_dir.join(format!("{}_content_readable.txt", domain));
    fs::write(&path, out)?;
    ::log::info!("human-readable content saved to {}", path.display());
    Ok(())
}
