// src/crawl/context.rs
// =============================================================================
// Where we are in the crawl: the gallery base URL, the directory images go
// into, and how deep in the album tree we are (for indenting log lines).
//
// The context is passed by value down the recursion, so every call works
// with its own copy and nothing is shared or global.
// =============================================================================

use crate::error::CrawlError;
use std::path::{Path, PathBuf};
use url::Url;

/// Listing script appended to a root URL that names none
const DEFAULT_ENDPOINT: &str = "index.php";

#[derive(Debug, Clone)]
pub struct CrawlContext {
    /// Gallery base, always ending in '/', so relative hrefs join under it
    pub base_url: Url,
    /// Directory that receives this album's images
    pub current_path: PathBuf,
    /// Album nesting depth, 0 for the root
    pub depth: usize,
}

impl CrawlContext {
    /// Context for the root listing page of a gallery.
    /// `root_url` must already be normalized.
    pub fn root(root_url: &str, target_dir: &Path) -> Result<Self, CrawlError> {
        let base = format!("{}/", base_url_of(root_url));
        let base_url = Url::parse(&base).map_err(|source| CrawlError::InvalidUrl {
            url: root_url.to_string(),
            source,
        })?;
        Ok(Self {
            base_url,
            current_path: target_dir.to_path_buf(),
            depth: 0,
        })
    }

    /// Base URL without the trailing slash, for building asset URLs
    pub fn base_str(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Context for a sub-album stored in `dir`
    pub fn enter_album(&self, dir: PathBuf) -> Self {
        Self {
            base_url: self.base_url.clone(),
            current_path: dir,
            depth: self.depth + 1,
        }
    }

    pub fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

// Turns what the user typed into a listing page URL
//
// Examples:
//   "gallery.test"                  -> "http://gallery.test/index.php"
//   "https://h/zen/"                -> "https://h/zen/index.php"
//   "http://h/index.php?album=a"    -> unchanged
pub fn normalize_root_url(raw: &str) -> String {
    let mut url = raw.trim().to_string();
    if !url.starts_with("http") && !url.contains("//") {
        url.insert_str(0, "http://");
    }
    if !url.ends_with(".php") && !url.contains('?') {
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(DEFAULT_ENDPOINT);
    }
    url
}

// The directory part of a listing URL: everything before the last '/' of
// the path. The query is ignored because album identifiers may contain '/'.
pub fn base_url_of(root_url: &str) -> &str {
    let path = root_url.split_once('?').map_or(root_url, |(path, _)| path);
    match path.rsplit_once('/') {
        Some((dir, _script)) if !dir.ends_with('/') => dir,
        _ => path.trim_end_matches('/'),
    }
}
