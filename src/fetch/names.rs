// src/fetch/names.rs
// =============================================================================
// Turns a URL into a flat, deterministic file name for the page cache.
//
// Example (domain and scheme dropped, query kept):
//   "http://host/a/b?x=1" -> "a--b-Px=1"
//
// Path separators become "--". Backslashes are escaped as well because some
// file browsers treat '\' as '/', which would make two names collide.
// '?' and '&' become "-P" so the result can be served back by a static file
// server (e.g. `php -S`) without being read as a query string.
//
// Two different URLs can still map to the same name; nothing checks for that.
// =============================================================================

/// Name used when a URL sanitizes to nothing (e.g. the bare site root)
const EMPTY_NAME: &str = "index";

pub fn sanitize(url: &str, keep_domain: bool, keep_params: bool) -> String {
    // Strip "scheme://"
    let mut name = match url.split_once("//") {
        Some((_scheme, rest)) => rest,
        None => url,
    };

    if !keep_domain {
        name = match name.split_once('/') {
            Some((_host, path)) => path,
            None => "",
        };
    }

    let name = name
        .trim_end_matches('/')
        .replace(['/', '\\'], "--");
    let name = name.trim_matches('-');

    let name = if keep_params {
        name.replace(['?', '&'], "-P")
    } else {
        match name.split_once('?') {
            Some((path, _params)) => path.to_string(),
            None => name.to_string(),
        }
    };

    if name.is_empty() {
        EMPTY_NAME.to_string()
    } else {
        name
    }
}

// Turns a remote-supplied album title or image file name into exactly one
// path component. Separators are escaped like in `sanitize`, so the result
// can't climb out of (or nest below) the directory it is joined onto.
// Returns None for names that would still mean "this directory" or "parent".
pub fn path_component(raw: &str) -> Option<String> {
    let name = raw.replace(['/', '\\'], "--");
    match name.trim() {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_params() {
        assert_eq!(sanitize("http://host/a/b?x=1", false, true), "a--b-Px=1");
    }

    #[test]
    fn test_drop_params() {
        assert_eq!(sanitize("http://host/a/b?x=1&y=2", false, false), "a--b");
    }

    #[test]
    fn test_keep_domain() {
        assert_eq!(
            sanitize("https://host/index.php?album=x&page=2", true, true),
            "host--index.php-Palbum=x-Ppage=2"
        );
    }

    #[test]
    fn test_trailing_slash_and_backslash() {
        assert_eq!(sanitize("http://host/a\\b/", false, true), "a--b");
    }

    #[test]
    fn test_bare_root_gets_a_name() {
        assert_eq!(sanitize("http://host/", false, true), "index");
        assert_eq!(sanitize("http://host", false, false), "index");
    }

    #[test]
    fn test_deterministic() {
        let url = "http://h/index.php?album=2004%2F02&image=a.jpg";
        assert_eq!(sanitize(url, false, true), sanitize(url, false, true));
    }

    #[test]
    fn test_path_component_escapes_separators() {
        assert_eq!(path_component("../escaped.jpg").as_deref(), Some("..--escaped.jpg"));
        assert_eq!(path_component("a/b").as_deref(), Some("a--b"));
        assert_eq!(path_component("/etc").as_deref(), Some("--etc"));
        assert_eq!(path_component("a\\b").as_deref(), Some("a--b"));
        assert_eq!(path_component("Summer 2004").as_deref(), Some("Summer 2004"));
    }

    #[test]
    fn test_path_component_rejects_relative_names() {
        assert_eq!(path_component(""), None);
        assert_eq!(path_component("   "), None);
        assert_eq!(path_component("."), None);
        assert_eq!(path_component(".."), None);
    }
}
