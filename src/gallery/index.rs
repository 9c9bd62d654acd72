// src/gallery/index.rs
// =============================================================================
// Parses an album listing page into sub-albums, images and the next page.
//
// A zenphoto listing page looks roughly like this:
//
//   <div class="album">
//     <div class="thumb"><a href="..."><img alt="Summer_2004" src="..."></a></div>
//     <div class="albumdesc"><h3><a href="/index.php?album=summer">Summer_2004</a></h3></div>
//   </div>
//   <div id="images">
//     <div class="image"><a href="/index.php?album=x&image=a.jpg" title="a.jpg">...</a></div>
//   </div>
//   <ul class="pagelist"><li class="next"><a href="...&page=2">next</a></li></ul>
//
// Albums come from two separate scans that are joined on the title:
// the description links give (title, url), the thumbnails give
// (alt text, image src). The title is the only join key the markup offers,
// so two distinct albums with the same title on one page end up merged.
// That is a limitation of the gallery format and is left as-is.
//
// Rust concepts:
// - BTreeMap: a sorted map, so albums come out ordered by title for free
// - Iterators: .rev() flips the order for descending sorts
// =============================================================================

use crate::config::SortOrder;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use tracing::warn;
use url::Url;

const ALBUM_LINKS: &str = ".albumdesc h3 a";
const ALBUM_THUMBS: &str = ".album .thumb img";
const IMAGE_LINKS: &str = "#images .image a";
const NEXT_PAGE: &str = "ul.pagelist li.next a";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Display title, underscores turned into spaces
    pub title: String,
    pub url: String,
    /// Never downloaded, but kept for logging
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// The image's own page, whose query names the album and the file
    pub page_url: String,
    /// Caption text; may or may not carry an extension, may be wrong
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryIndex {
    pub albums: Vec<Album>,
    pub images: Vec<ImageRef>,
    pub next_page: Option<String>,
}

// Parses one listing page
//
// Parameters:
//   document: the parsed listing page
//   base: the gallery base URL, with a trailing slash, for relative hrefs
//   order: direction to sort albums by title
pub fn parse_index(document: &Html, base: &Url, order: SortOrder) -> GalleryIndex {
    GalleryIndex {
        albums: parse_albums(document, base, order),
        images: parse_images(document, base),
        next_page: select(document, NEXT_PAGE)
            .into_iter()
            .find_map(|a| a.value().attr("href"))
            .and_then(|href| resolve(base, href)),
    }
}

fn parse_albums(document: &Html, base: &Url, order: SortOrder) -> Vec<Album> {
    // Keyed by the raw title so the thumbnail alt text can find its album
    let mut albums: BTreeMap<String, Album> = BTreeMap::new();

    for link in select(document, ALBUM_LINKS) {
        let Some(url) = link.value().attr("href").and_then(|href| resolve(base, href)) else {
            continue;
        };
        let title = element_text(&link);
        albums.insert(
            title.clone(),
            Album {
                title,
                url,
                thumbnail_url: None,
            },
        );
    }

    for thumb in select(document, ALBUM_THUMBS) {
        let alt = thumb.value().attr("alt").unwrap_or_default();
        let src = thumb.value().attr("src").and_then(|src| resolve(base, src));
        match albums.get_mut(alt) {
            Some(album) => album.thumbnail_url = src,
            None => warn!("thumbnail '{}' matches no album on this page", alt),
        }
    }

    let sorted: Vec<Album> = match order {
        SortOrder::Asc => albums.into_values().collect(),
        SortOrder::Desc => albums.into_values().rev().collect(),
    };

    sorted
        .into_iter()
        .map(|album| Album {
            title: album.title.replace('_', " ").trim().to_string(),
            ..album
        })
        .collect()
}

fn parse_images(document: &Html, base: &Url) -> Vec<ImageRef> {
    select(document, IMAGE_LINKS)
        .into_iter()
        .filter_map(|link| {
            let page_url = resolve(base, link.value().attr("href")?)?;
            let label = match link.value().attr("title") {
                Some(title) => title.to_string(),
                None => element_text(&link),
            };
            Some(ImageRef { page_url, label })
        })
        .collect()
}

// Text of an element with its text nodes joined by spaces
fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub(crate) fn select<'a>(document: &'a Html, css: &'static str) -> Vec<ElementRef<'a>> {
    // All selectors in this crate are constants, so a parse failure is a
    // programming error
    let selector = Selector::parse(css).expect("static CSS selector");
    document.select(&selector).collect()
}

// Resolves an href against the gallery base, dropping ones that don't parse
pub(crate) fn resolve(base: &Url, href: &str) -> Option<String> {
    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            warn!("skipping unparseable link '{}': {}", href, e);
            None
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does "let ... else" do?
//    - let Some(url) = ... else { continue; } binds url if the pattern
//      matches, and otherwise runs the else block (which must leave the scope)
//
// 2. Why ..album in the final map?
//    - Struct update syntax: take every field we don't name from `album`
//    - Only the title is rewritten, url and thumbnail_url move over as-is
// -----------------------------------------------------------------------------
