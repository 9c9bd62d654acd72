// src/gallery/detail.rs
// =============================================================================
// Parses an image's own page, for the optional --verify-pages check.
//
// The page shows a resized image and a row of size radio buttons; the one
// with id "sx" carries the full-size file in its `url` attribute:
//
//   <div id="image"><img src="..." alt="foo bar"></div>
//   <input type="radio" id="sx" url="/albums/2004%2F02/foo%20bar.jpg" ...>
//
// Normally we never download these pages (the asset URL can be computed from
// the listing link), but comparing the two catches galleries where that
// shortcut would give wrong results.
// =============================================================================

use super::index::{resolve, select};
use super::image::{label_stem, ResolvedImage};
use crate::error::DetailError;
use scraper::Html;
use url::Url;

const IMAGE_ELEMENT: &str = "#image img";
const FULL_SIZE_BUTTON: &str = "input#sx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDetail {
    pub asset_url: String,
    /// The alt text of the displayed image, extension stripped
    pub name: String,
    pub extension: String,
}

impl ImageDetail {
    /// Whether this page points at the same file as a resolved image.
    ///
    /// The full-size link may carry extra query parameters, so it only has to
    /// start with the resolved asset URL.
    pub fn agrees_with(&self, resolved: &ResolvedImage) -> bool {
        let asset_matches = self.asset_url.starts_with(&resolved.asset_url)
            || decoded(&self.asset_url).starts_with(&decoded(&resolved.asset_url));
        asset_matches && self.name == resolved.name && self.extension == resolved.extension
    }
}

pub fn parse_image_page(document: &Html, base: &Url) -> Result<ImageDetail, DetailError> {
    let img = select(document, IMAGE_ELEMENT)
        .into_iter()
        .next()
        .ok_or(DetailError::MissingElement {
            selector: IMAGE_ELEMENT,
        })?;
    let button = select(document, FULL_SIZE_BUTTON)
        .into_iter()
        .next()
        .ok_or(DetailError::MissingElement {
            selector: FULL_SIZE_BUTTON,
        })?;

    let href = button
        .value()
        .attr("url")
        .ok_or(DetailError::MissingElement {
            selector: FULL_SIZE_BUTTON,
        })?;
    let asset_url = resolve(base, href).ok_or_else(|| DetailError::BadLink {
        href: href.to_string(),
    })?;

    // "foo.jpg&w=100" -> "jpg"
    let file_part = asset_url.rsplit('/').next().unwrap_or_default();
    let extension = file_part
        .rsplit_once('.')
        .map(|(_, tail)| tail.split('&').next().unwrap_or(tail))
        .unwrap_or_default()
        .to_string();
    let alt = img.value().attr("alt").unwrap_or_default();
    let name = label_stem(alt, &extension).to_string();

    Ok(ImageDetail {
        asset_url,
        name,
        extension,
    })
}

fn decoded(url: &str) -> String {
    urlencoding::decode(url)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| url.to_string())
}
