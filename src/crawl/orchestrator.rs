// src/crawl/orchestrator.rs
// =============================================================================
// Walks a gallery depth-first and mirrors it onto disk.
//
// For every listing page, in this order:
// 1. Download each image on the page into the current directory
// 2. For each sub-album: create its directory and recurse into it
// 3. If there is a next page: recurse into it with the SAME directory
//    (pagination continues an album, it is not a new level)
//
// The order is fixed so output is deterministic and log lines for one album
// stay together.
//
// Album thumbnails are never downloaded. They are auto-picked, frequently
// broken, and a file browser shows better previews anyway.
//
// Everything is sequential: one request at a time, with the fetch cache
// pausing after every real download. Re-running after an interruption
// skips everything already on disk.
//
// Rust concepts:
// - Box::pin: an async fn that calls itself has to box the recursive call,
//   otherwise its future would have to contain itself
// - HashSet: per-run record of visited listing pages
// =============================================================================

use super::context::CrawlContext;
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::fetch::{path_component, sanitize, FetchCache, FetchOutcome, Transport};
use crate::gallery::{
    parse_image_page, parse_index, resolve_image, GalleryIndex, ImageRef, ResolvedImage,
};
use scraper::Html;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

// Counters for one run, printed at the end
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub pages_downloaded: usize,
    pub pages_cached: usize,
    pub pages_missing: usize,
    pub albums: usize,
    pub images_downloaded: usize,
    pub images_cached: usize,
    pub images_missing: usize,
    /// Captions (or detail pages) that disagree with the resolved name
    pub label_mismatches: usize,
    /// Images skipped because their link or detail page was unusable
    pub skipped: usize,
}

impl CrawlSummary {
    /// Requests that actually went over the network
    pub fn network_fetches(&self) -> usize {
        self.pages_downloaded + self.images_downloaded
    }
}

pub struct Crawler<T> {
    cache: FetchCache<T>,
    config: CrawlConfig,
    visited: HashSet<String>,
    summary: CrawlSummary,
}

impl<T: Transport> Crawler<T> {
    pub fn new(cache: FetchCache<T>, config: CrawlConfig) -> Self {
        Self {
            cache,
            config,
            visited: HashSet::new(),
            summary: CrawlSummary::default(),
        }
    }

    /// Mirrors the gallery whose (normalized) listing URL is `root_url`
    /// into the configured target directory.
    pub async fn run(&mut self, root_url: &str) -> Result<CrawlSummary, CrawlError> {
        create_dir(self.cache.pages_dir()).await?;
        create_dir(&self.config.target_dir).await?;

        let ctx = CrawlContext::root(root_url, &self.config.target_dir)?;
        info!("album {} ({}) ...", ctx.current_path.display(), root_url);
        self.crawl(root_url.to_string(), ctx).await?;

        Ok(self.summary.clone())
    }

    async fn crawl(&mut self, url: String, ctx: CrawlContext) -> Result<(), CrawlError> {
        if !self.visited.insert(url.clone()) {
            return Err(CrawlError::Cycle { url });
        }

        let Some(index) = self.load_index(&url, &ctx).await? else {
            return Ok(());
        };

        for image in &index.images {
            self.mirror_image(image, &ctx).await?;
        }

        for album in &index.albums {
            let Some(dir_name) = album_dir_name(&album.title, &album.url) else {
                warn!("{}skipping album '{}' ({}): no usable directory name", ctx.indent(), album.title, album.url);
                continue;
            };
            let dir = ctx.current_path.join(dir_name);
            create_dir(&dir).await?;
            self.summary.albums += 1;
            info!("{}album {} ({}) ...", ctx.indent(), dir.display(), album.url);
            if let Some(thumbnail) = &album.thumbnail_url {
                debug!("{}  not fetching thumbnail {}", ctx.indent(), thumbnail);
            }
            let child = ctx.enter_album(dir);
            Box::pin(self.crawl(album.url.clone(), child)).await?;
        }

        if let Some(next_page) = index.next_page {
            info!("{}next page for {} ...", ctx.indent(), ctx.current_path.display());
            Box::pin(self.crawl(next_page, ctx)).await?;
        }

        Ok(())
    }

    // Fetches (or reuses) a listing page and parses it.
    // A missing page yields None: the album is simply empty for us.
    async fn load_index(
        &mut self,
        url: &str,
        ctx: &CrawlContext,
    ) -> Result<Option<GalleryIndex>, CrawlError> {
        let Some(document) = self.load_page(url, &ctx.indent()).await? else {
            warn!("{}listing page not found: {}", ctx.indent(), url);
            return Ok(None);
        };
        Ok(Some(parse_index(
            &document,
            &ctx.base_url,
            self.config.album_order,
        )))
    }

    async fn load_page(&mut self, url: &str, indent: &str) -> Result<Option<Html>, CrawlError> {
        let outcome = self.cache.fetch_page(url, indent).await?;
        let path = match &outcome {
            FetchOutcome::Downloaded(path) => {
                self.summary.pages_downloaded += 1;
                path
            }
            FetchOutcome::Cached(path) => {
                self.summary.pages_cached += 1;
                path
            }
            FetchOutcome::NotFound => {
                self.summary.pages_missing += 1;
                return Ok(None);
            }
        };

        let bytes = tokio::fs::read(path).await.map_err(|source| CrawlError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Some(Html::parse_document(&String::from_utf8_lossy(&bytes))))
    }

    async fn mirror_image(&mut self, image: &ImageRef, ctx: &CrawlContext) -> Result<(), CrawlError> {
        let indent = ctx.indent();

        let resolved = match resolve_image(ctx.base_str(), &image.page_url) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("{}skipping '{}': {}", indent, image.label, e);
                self.summary.skipped += 1;
                return Ok(());
            }
        };

        if !resolved.matches_label(&image.label) {
            warn!("{}alt difference: {} != {}", indent, image.label, resolved.name);
            self.summary.label_mismatches += 1;
            if self.config.strict_labels {
                return Err(CrawlError::LabelMismatch {
                    label: image.label.clone(),
                    name: resolved.name,
                    url: image.page_url.clone(),
                });
            }
        }

        if self.config.verify_pages && !self.verify_detail(image, &resolved, ctx).await? {
            self.summary.skipped += 1;
            return Ok(());
        }

        let Some(file_name) = path_component(&resolved.file_name()) else {
            warn!("{}skipping '{}': no usable file name", indent, image.page_url);
            self.summary.skipped += 1;
            return Ok(());
        };
        let dest = ctx.current_path.join(file_name);
        let outcome = self.cache.fetch(&resolved.asset_url, &dest, &indent).await?;
        match outcome.path() {
            None => self.summary.images_missing += 1,
            Some(_) if outcome.was_downloaded() => self.summary.images_downloaded += 1,
            Some(_) => self.summary.images_cached += 1,
        }

        Ok(())
    }

    // Cross-checks a resolved image against its detail page.
    // Returns false when the page is unusable and the image should be skipped.
    async fn verify_detail(
        &mut self,
        image: &ImageRef,
        resolved: &ResolvedImage,
        ctx: &CrawlContext,
    ) -> Result<bool, CrawlError> {
        let indent = ctx.indent();

        let Some(document) = self.load_page(&image.page_url, &indent).await? else {
            warn!("{}detail page not found, skipping: {}", indent, image.page_url);
            return Ok(false);
        };
        let detail = match parse_image_page(&document, &ctx.base_url) {
            Ok(detail) => detail,
            Err(e) => {
                warn!("{}malformed detail page {}: {}", indent, image.page_url, e);
                return Ok(false);
            }
        };

        if !detail.agrees_with(resolved) {
            warn!("{}bug for {} ({})", indent, image.label, image.page_url);
            warn!(
                "{}  detail page: {}.{} ({})",
                indent, detail.name, detail.extension, detail.asset_url
            );
            warn!(
                "{}  resolved:    {}.{} ({})",
                indent, resolved.name, resolved.extension, resolved.asset_url
            );
            self.summary.label_mismatches += 1;
            if self.config.strict_labels {
                return Err(CrawlError::DetailMismatch {
                    page_url: image.page_url.clone(),
                    detail_url: detail.asset_url,
                    resolved_url: resolved.asset_url.clone(),
                });
            }
        }

        Ok(true)
    }
}

// Directory name for an album. Titles that can't be a single path component
// (empty, ".", "..") fall back to the album's sanitized URL, which is at
// least unique per album.
fn album_dir_name(title: &str, url: &str) -> Option<String> {
    path_component(title).or_else(|| path_component(&sanitize(url, false, true)))
}

async fn create_dir(path: &Path) -> Result<(), CrawlError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| CrawlError::Io {
            path: path.to_path_buf(),
            source,
        })
}
