//! Command-line interface

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::future::join_all;
use serde::Serialize;

use kodegen_tools_shopscrape::{
    ProductPipeline, ProductResponse, ScrapeConfig, Scraper, SearchResponse,
    SearchResultPipeline, StaticPage,
};

#[derive(Parser)]
#[command(name = "kodegen-shopscrape")]
#[command(about = "Extract product data and shopping search results from rendered pages")]
#[command(version)]
pub struct Cli {
    /// Maximum concurrent browser jobs (overrides SHOPSCRAPE_CONCURRENCY)
    #[arg(short, long, global = true)]
    concurrency: Option<usize>,

    /// Show the browser window
    #[arg(long, global = true)]
    headful: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape product pages; prints one JSON response per line, in argument order
    Product {
        /// Product page URLs
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Run a shopping search and print the results as JSON
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Extract from a saved HTML file without launching a browser
    Extract {
        /// HTML file to read
        file: PathBuf,
        /// URL the page was saved from (used to resolve relative links)
        #[arg(long)]
        url: String,
        /// Treat the file as a search results page
        #[arg(long)]
        search: bool,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut builder = ScrapeConfig::builder().with_env();
    if let Some(concurrency) = cli.concurrency {
        builder = builder.concurrency(concurrency);
    }
    if cli.headful {
        builder = builder.headless(false);
    }
    let config = builder.build();

    match cli.command {
        Commands::Product { urls } => {
            let scraper = Scraper::new(config);
            let responses: Vec<ProductResponse> =
                join_all(urls.iter().map(|url| scraper.scrape_product(url))).await;
            for response in &responses {
                print_json(response)?;
            }
            if responses.iter().any(|r| !r.is_success()) {
                std::process::exit(1);
            }
        }
        Commands::Search { query } => {
            let scraper = Scraper::new(config);
            let response: SearchResponse = scraper.search(&query.join(" ")).await;
            print_json(&response)?;
            if !response.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Extract { file, url, search } => {
            let html = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let page = StaticPage::new(html, Some(url.clone()));

            if search {
                let results = SearchResultPipeline::new(config.search_origin())
                    .extract(&page)
                    .await;
                print_json(&SearchResponse::from_result(Ok(results)))?;
            } else {
                let record = ProductPipeline::new(&config).extract(&page, &url).await;
                print_json(&ProductResponse::Success(record))?;
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let line = serde_json::to_string(value).context("Failed to serialize response")?;
    println!("{line}");
    Ok(())
}
