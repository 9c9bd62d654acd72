// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
//   zenmirror <root-url> [target-directory] [options]
//
// Anything clap can't make sense of (and --help) ends the program with exit
// code 1; see main.rs.
// =============================================================================

use crate::config::{CrawlConfig, SortOrder, DEFAULT_DELAY_MS, DEFAULT_TIMEOUT_SECS};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "zenmirror",
    version,
    about = "Mirror a zenphoto photo gallery onto local disk",
    long_about = "zenmirror downloads every album and image of a zenphoto gallery into a \
                  directory tree that mirrors the album hierarchy. Files already on disk \
                  are skipped, so an interrupted run is resumed by running it again."
)]
pub struct Cli {
    /// Gallery URL (e.g. https://photos.example.com or example.com/zen/)
    ///
    /// "http://" is added if there is no scheme, and "index.php" if the URL
    /// names no script and has no query.
    pub root_url: String,

    /// Directory to mirror into (default: current directory)
    pub target_directory: Option<PathBuf>,

    /// Order in which sub-albums are crawled, by title
    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    pub album_order: SortOrder,

    /// Pause after every real download, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Abort when an image caption disagrees with its file name
    #[arg(long)]
    pub strict: bool,

    /// Also fetch every image's own page and cross-check the full-size URL
    #[arg(long)]
    pub verify_pages: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Show cache hits and other debug output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        let target_dir = self
            .target_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        CrawlConfig {
            request_delay: Duration::from_millis(self.delay_ms),
            timeout: Duration::from_secs(self.timeout_secs),
            album_order: self.album_order,
            strict_labels: self.strict,
            verify_pages: self.verify_pages,
            ..CrawlConfig::new(target_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_arguments() {
        let cli = Cli::try_parse_from(["zenmirror", "photos.example.com"]).unwrap();
        let config = cli.crawl_config();
        assert_eq!(config.target_dir, PathBuf::from("."));
        assert_eq!(config.album_order, SortOrder::Desc);
        assert_eq!(config.request_delay, Duration::from_millis(2000));
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "zenmirror",
            "http://h/zen/",
            "out",
            "--album-order",
            "asc",
            "--delay-ms",
            "0",
            "--strict",
            "--verify-pages",
        ])
        .unwrap();
        let config = cli.crawl_config();
        assert_eq!(config.target_dir, PathBuf::from("out"));
        assert_eq!(config.pages_dir, PathBuf::from("out/website_html"));
        assert_eq!(config.album_order, SortOrder::Asc);
        assert!(config.request_delay.is_zero());
        assert!(config.strict_labels);
        assert!(config.verify_pages);
    }

    #[test]
    fn test_rejects_bad_argument_counts() {
        assert!(Cli::try_parse_from(["zenmirror"]).is_err());
        assert!(Cli::try_parse_from(["zenmirror", "a", "b", "c"]).is_err());
        assert!(Cli::try_parse_from(["zenmirror", "-h"]).is_err());
    }
}
