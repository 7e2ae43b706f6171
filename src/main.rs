use clap::Parser;
use copycrawl::{FetchMode, crawler, normalize, output};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut config = args.to_config().with_env_overrides();

    if config.fetch_mode == FetchMode::WebDriver {
        println!("Note: --js-mode webdriver requires a WebDriver server (e.g., ChromeDriver).");
        println!(
            "Set WEBDRIVER_URL environment variable if not using the default {}",
            config.webdriver_url
        );
    }

    let root = match normalize::normalize(&config.start_url, config.ignore_query_params) {
        Ok(url) => url,
        Err(e) => {
            ::log::error!("Invalid start URL: {}", e);
            std::process::exit(1);
        }
    };
    config.start_url = root.to_string();

    let out_dir = std::path::PathBuf::from(&args.output);
    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        ::log::error!("Cannot create output directory {}: {}", out_dir.display(), e);
        std::process::exit(1);
    }

    ::log::info!("Starting crawl of {}", root);
    let start_time = std::time::Instant::now();

    let report = match crawler::run(&config).await {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Crawl failed: {}", e);
            std::process::exit(1);
        }
    };

    let duration = start_time.elapsed();
    ::log::info!(
        "Crawl complete - visited {} URLs, extracted {} pages in {:.2} seconds",
        report.visited,
        report.pages.len(),
        duration.as_secs_f64()
    );

    if report.is_empty() {
        ::log::warn!("No content was extracted from {}", root);
    }

    if let Err(e) = output::write_report(&report, &root, args.output_format(), &out_dir) {
        ::log::error!("Failed to write output: {}", e);
        std::process::exit(1);
    }

    println!(
        "Extracted {} pages from {} into {}",
        report.pages.len(),
        root,
        out_dir.display()
    );
}
