//! faculty-crawler: discover faculty profiles on university sites, extract and export them.

mod classify;
mod config;
mod crawler;
mod export;
mod extract;
mod fetcher;
mod normalize;
mod pipeline;
mod politeness;
mod profile;
mod site;
mod text;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, DEFAULT_USER_AGENT};
use crate::fetcher::{Fetcher, HttpFetcher};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_OUTPUT_DIR: &str = "database";

#[derive(Parser)]
#[command(name = "faculty-crawler")]
#[command(about = "Find faculty listing pages on university sites, extract profiles and export them")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl every configured university and export the records.
    Crawl {
        /// TOML configuration file.
        #[arg(long, short, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Directory for the CSV and JSON exports.
        #[arg(long, short, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Only crawl the university with this configured name.
        #[arg(long, short)]
        university: Option<String>,
    },

    /// Fetch one profile page and print what the extractors find.
    Inspect {
        /// Profile page URL.
        #[arg(long, short)]
        url: String,

        /// Request timeout in seconds.
        #[arg(long, default_value_t = 15)]
        timeout: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Crawl { config, output_dir, university } => {
            run_crawl(&config, &output_dir, university.as_deref())?;
        }
        Command::Inspect { url, timeout } => {
            run_inspect(&url, timeout)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("faculty_crawler={default_level},warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run_crawl(config_path: &Path, output_dir: &Path, only: Option<&str>) -> anyhow::Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(name) = only {
        config.universities.retain(|u| u.name == name);
        anyhow::ensure!(
            !config.universities.is_empty(),
            "no university named '{name}' in {}",
            config_path.display()
        );
    }

    let fetcher = HttpFetcher::new(
        &config.crawler.user_agent,
        Duration::from_secs(config.crawler.timeout_seconds),
    )
    .context("failed to build HTTP client")?;

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(pipeline::run(&config, Arc::new(fetcher)));

    for summary in &report.summaries {
        println!(
            "{}: {} listing pages, {} profile links, {} records",
            summary.university, summary.listing_pages, summary.profile_urls, summary.records_kept
        );
    }

    if report.records.is_empty() {
        println!("No profiles found to export.");
        println!("Possible reasons:");
        println!("  1. crawler.listing_keywords do not match the universities' URL paths");
        println!("  2. robots.txt blocks the crawler");
        println!("  3. faculty pages are rendered client-side");
        println!("Try `faculty-crawler inspect --url <profile-url>` on a known profile page.");
        return Ok(());
    }

    let paths = export::export(&report.records, output_dir, &export::timestamp())
        .context("failed to export profiles")?;
    println!(
        "Exported {} profiles to {} and {}",
        report.records.len(),
        paths.csv.display(),
        paths.json.display()
    );
    Ok(())
}

fn run_inspect(url: &str, timeout: u64) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(timeout))
        .context("failed to build HTTP client")?;
    let rt = tokio::runtime::Runtime::new()?;
    let html = rt
        .block_on(fetcher.fetch(url))
        .with_context(|| format!("could not fetch {url}"))?;

    let record = extract::extract_profile(&html, url);
    println!("{}", serde_json::to_string_pretty(&record)?);
    if !record.is_valid() {
        println!("(no name or email found; this page would be dropped)");
    }
    Ok(())
}
