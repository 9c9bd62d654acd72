// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (progress and warnings go to stderr)
// 3. Normalize the gallery URL and mirror it
// 4. Print a summary and exit with the proper code
//    (0 = done, 1 = bad arguments, 2 = the run was aborted)
//
// An aborted run is resumed by running the same command again: everything
// already on disk is skipped.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod fetch;
mod gallery;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use cli::Cli;
use crawl::{CrawlSummary, Crawler};
use fetch::{FetchCache, HttpTransport};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors and --help both count as "invalid invocation"
            let _ = e.print();
            let code = if e.kind() == ErrorKind::DisplayVersion { 0 } else { 1 };
            std::process::exit(code);
        }
    };

    init_tracing(&cli);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole cause chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let root_url = crawl::normalize_root_url(&cli.root_url);
    let config = cli.crawl_config();

    info!("Mirroring {} into {}", root_url, config.target_dir.display());

    let transport = HttpTransport::new(config.timeout, &config.user_agent)
        .context("could not create HTTP client")?;
    let cache = FetchCache::new(transport, config.pages_dir.clone(), config.request_delay);
    let mut crawler = Crawler::new(cache, config);

    let summary = crawler
        .run(&root_url)
        .await
        .with_context(|| format!("mirroring {} stopped", root_url))?;

    print_summary(&summary, cli.json)
}

// Prints the summary either as a small table or as JSON on stdout
fn print_summary(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!();
    println!("📊 Summary:");
    println!("   📁 Albums:            {}", summary.albums);
    println!(
        "   📄 Pages:             {} fetched, {} cached, {} missing",
        summary.pages_downloaded, summary.pages_cached, summary.pages_missing
    );
    println!(
        "   🖼️  Images:            {} fetched, {} cached, {} missing",
        summary.images_downloaded, summary.images_cached, summary.images_missing
    );
    println!("   ⚠️  Label mismatches:  {}", summary.label_mismatches);
    println!("   ⏭️  Skipped:           {}", summary.skipped);
    println!("   🌐 Network requests:  {}", summary.network_fetches());
    Ok(())
}
