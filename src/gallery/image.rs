// src/gallery/image.rs
// =============================================================================
// Works out where an image lives and what to call it, from its page URL alone.
//
// An image page URL looks like:
//   http://host/index.php?album=2004%2F02&image=foo%20bar.jpg
// and the full-size file is served from:
//   http://host/albums/2004%2F02/foo%20bar.jpg
//
// The query is split by hand instead of with a form-urlencoded parser: the
// album and image values are path-like and must be pasted into the asset URL
// exactly as they appear. Only the image value is decoded, and only to get
// the local file name.
//
// The caption (label) shown next to an image is typed in by people and is
// sometimes wrong. The name derived here always wins; a disagreement is just
// reported by the caller.
// =============================================================================

use crate::error::ResolveError;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub asset_url: String,
    /// Decoded file name without extension
    pub name: String,
    /// Extension as found in the identifier (case kept), may be empty
    pub extension: String,
}

impl ResolvedImage {
    /// Local file name: the name plus the lowercased extension
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.extension.to_lowercase())
        }
    }

    /// Whether a caption agrees with the resolved name.
    ///
    /// Captions only sometimes include the extension, so a trailing
    /// ".<extension>" is ignored before comparing.
    pub fn matches_label(&self, label: &str) -> bool {
        label_stem(label, &self.extension) == self.name
    }
}

// Strips ".<extension>" from the end of a label if it's there
pub fn label_stem<'a>(label: &'a str, extension: &str) -> &'a str {
    if extension.is_empty() {
        return label;
    }
    label
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(label)
}

// Builds the asset URL and file name for an image page
//
// Parameters:
//   base_url: gallery base without trailing slash, e.g. "http://host/zen"
//   page_url: the image's page URL from the listing
pub fn resolve_image(base_url: &str, page_url: &str) -> Result<ResolvedImage, ResolveError> {
    let params = raw_query_params(page_url);
    let param = |name: &'static str| {
        params
            .get(name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ResolveError::MissingParam {
                url: page_url.to_string(),
                param: name,
            })
    };
    let album = param("album")?;
    let image = param("image")?;

    let asset_url = format!(
        "{}/albums/{}/{}",
        base_url.trim_end_matches('/'),
        album,
        image
    );

    let decoded = urlencoding::decode(image).map_err(|_| ResolveError::Decode {
        value: image.clone(),
    })?;
    let (name, extension) = match decoded.rsplit_once('.') {
        Some((name, extension)) => (name.to_string(), extension.to_string()),
        None => (decoded.to_string(), String::new()),
    };

    Ok(ResolvedImage {
        asset_url,
        name,
        extension,
    })
}

// Splits a URL's query into key/value pairs without percent-decoding.
// '+' means a space in query strings, so it is rewritten to "%20" which
// works both in a path and for the later decode.
fn raw_query_params(url: &str) -> HashMap<&str, String> {
    let Some((_, query)) = url.split_once('?') else {
        return HashMap::new();
    };
    let query = query.split_once('#').map_or(query, |(query, _fragment)| query);

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key, value.replace('+', "%20"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_album_encoded() {
        let resolved = resolve_image(
            "http://h",
            "http://h/index.php?album=2004%2F02&image=foo%20bar.jpg",
        )
        .unwrap();

        assert_eq!(resolved.name, "foo bar");
        assert_eq!(resolved.extension, "jpg");
        assert_eq!(resolved.asset_url, "http://h/albums/2004%2F02/foo%20bar.jpg");
        assert!(resolved.asset_url.contains("2004%2F02"));
    }

    #[test]
    fn test_plus_is_a_space() {
        let resolved =
            resolve_image("http://h/zen/", "http://h/zen/index.php?image=my+pic.PNG&album=a").unwrap();
        assert_eq!(resolved.asset_url, "http://h/zen/albums/a/my%20pic.PNG");
        assert_eq!(resolved.name, "my pic");
        assert_eq!(resolved.file_name(), "my pic.png");
    }

    #[test]
    fn test_last_dot_splits_extension() {
        let resolved = resolve_image("http://h", "http://h/?album=a&image=v1.2.final.jpeg").unwrap();
        assert_eq!(resolved.name, "v1.2.final");
        assert_eq!(resolved.extension, "jpeg");
    }

    #[test]
    fn test_no_extension() {
        let resolved = resolve_image("http://h", "http://h/?album=a&image=README").unwrap();
        assert_eq!(resolved.name, "README");
        assert_eq!(resolved.extension, "");
        assert_eq!(resolved.file_name(), "README");
    }

    #[test]
    fn test_missing_image_param() {
        let err = resolve_image("http://h", "http://h/index.php?album=a").unwrap_err();
        assert!(matches!(err, ResolveError::MissingParam { param: "image", .. }));
    }

    #[test]
    fn test_label_with_and_without_extension() {
        let resolved = resolve_image("http://h", "http://h/?album=a&image=IMG_01.JPG").unwrap();
        assert!(resolved.matches_label("IMG_01.JPG"));
        assert!(resolved.matches_label("IMG_01"));
        assert!(!resolved.matches_label("Canon EOS 300D"));
        // only the real extension is stripped
        assert!(!resolved.matches_label("IMG_01.jpg"));
    }

    #[test]
    fn test_label_stem() {
        assert_eq!(label_stem("a.jpg", "jpg"), "a");
        assert_eq!(label_stem("ajpg", "jpg"), "ajpg");
        assert_eq!(label_stem("a.jpg", ""), "a.jpg");
    }
}
