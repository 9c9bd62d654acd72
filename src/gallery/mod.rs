// src/gallery/mod.rs
// =============================================================================
// Understanding zenphoto pages.
//
// Submodules:
// - index: album listing pages -> albums, images, next page
// - image: image page URL -> asset URL and file name (no network)
// - detail: image page HTML -> full-size URL (only with --verify-pages)
//
// Nothing in here touches the network or the filesystem.
// =============================================================================

mod detail;
mod image;
mod index;

pub use detail::parse_image_page;
pub use image::{resolve_image, ResolvedImage};
pub use index::{parse_index, GalleryIndex, ImageRef};
