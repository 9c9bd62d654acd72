// src/crawl/mod.rs
// =============================================================================
// This module handles crawling a gallery.
//
// Features:
// - Depth-first descent into sub-albums, one directory per album
// - Pagination followed into the same directory
// - Resumable: anything already on disk is skipped
// - Polite: strictly one request at a time, with a pause after each
// - Fails fast if the gallery's links ever loop back on themselves
// =============================================================================

mod context;
mod orchestrator;

pub use context::normalize_root_url;
pub use orchestrator::{CrawlSummary, Crawler};
