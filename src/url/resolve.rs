//! Link resolver
//!
//! Merges a relative reference against a moving base URL: anchor-prefixed
//! paths, domain-rooted paths, and parent-directory (`..`) backtracking.

use crate::url::classify::is_web_file;
use crate::url::normalize::{domain, prefix, stripped};

/// Result of merging a relative reference against a base URL
///
/// `url` is empty when the reference over-popped past the domain root and is
/// unresolvable; callers treat that as a non-reference. `over_pops` counts the
/// failed parent-directory pops so each can be surfaced as a
/// too-many-back-links diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub url: String,
    pub over_pops: u32,
}

/// Resolves `path` against `base_ref` into an absolute reference
///
/// Resolution steps:
///
/// 1. Take the base's prefix and trim one trailing slash.
/// 2. If the base is a web file, resolve relative to its containing
///    directory.
/// 3. Strip fragment lead-ins (`#/`, `/#/`); fragments never change the
///    resolved resource.
/// 4. A `/`-rooted path restarts at the base's domain.
/// 5. Each leading `..` pops one segment off the base; popping past the
///    domain root leaves the base degenerate and the merge unresolvable.
pub fn merge_url(base_ref: &str, path: &str) -> Merged {
    let detected = prefix(base_ref).value;
    let mut base = base_ref.to_string();
    let mut path = path.to_string();
    let mut over_pops = 0;

    if base.ends_with('/') {
        base.truncate(base.len() - 1);
    }

    if is_web_file(&base) {
        if let Some(index) = base.rfind('/') {
            base.truncate(index);
        }
    }

    while path.starts_with("#/") || path.starts_with("/#/") {
        if let Some(index) = path.find('#') {
            path = path[index + 1..].to_string();
        }
    }

    if path.starts_with('/') {
        return Merged {
            url: format!("{}{}{}", detected, domain(&base), path),
            over_pops,
        };
    }

    while path.starts_with("..") {
        let cut = path.find("..").map_or(path.len(), |i| i + 3).min(path.len());
        path = path[cut..].to_string();

        let bare = stripped(&base);
        match bare.rfind('/') {
            Some(index) => base = format!("{}{}", detected, &bare[..index]),
            None => {
                // Popped past the domain root; the base degenerates to its
                // bare prefix.
                over_pops += 1;
                base = detected.clone();
            }
        }
    }

    if base != detected {
        return Merged {
            url: format!("{}{}/{}", detected, stripped(&base), path),
            over_pops,
        };
    }

    Merged {
        url: String::new(),
        over_pops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_relative_from_web_file() {
        let merged = merge_url("http://example.org/a/b.html", "../c");
        assert_eq!(merged.url, "http://example.org/c");
        assert_eq!(merged.over_pops, 0);
    }

    #[test]
    fn test_domain_rooted_path() {
        let merged = merge_url("http://example.org/a/b.html", "/d");
        assert_eq!(merged.url, "http://example.org/d");
        assert_eq!(merged.over_pops, 0);
    }

    #[test]
    fn test_plain_relative_path() {
        let merged = merge_url("http://example.org/a", "b");
        assert_eq!(merged.url, "http://example.org/a/b");
    }

    #[test]
    fn test_relative_to_containing_directory() {
        // The file component is dropped before merging.
        let merged = merge_url("http://example.org/a/b.html", "c");
        assert_eq!(merged.url, "http://example.org/a/c");
    }

    #[test]
    fn test_over_pop_past_root() {
        let merged = merge_url("http://example.org", "../x");
        assert_eq!(merged.url, "");
        assert_eq!(merged.over_pops, 1);
    }

    #[test]
    fn test_double_parent_pop() {
        let merged = merge_url("http://example.org/a/b/c", "../../d");
        assert_eq!(merged.url, "http://example.org/a/d");
        assert_eq!(merged.over_pops, 0);
    }

    #[test]
    fn test_fragment_prefixed_path() {
        let merged = merge_url("http://example.org/a", "#/b");
        assert_eq!(merged.url, "http://example.org/b");
    }

    #[test]
    fn test_slash_fragment_prefixed_path() {
        let merged = merge_url("http://example.org/a", "/#/b");
        assert_eq!(merged.url, "http://example.org/b");
    }

    #[test]
    fn test_trailing_slash_base_trimmed() {
        let merged = merge_url("http://example.org/a/", "b");
        assert_eq!(merged.url, "http://example.org/a/b");
    }

    #[test]
    fn test_preserves_https_prefix() {
        let merged = merge_url("https://example.org/a", "b");
        assert_eq!(merged.url, "https://example.org/a/b");
    }

    #[test]
    fn test_ftp_prefix() {
        let merged = merge_url("ftp://example.org/pub", "file.txt");
        assert_eq!(merged.url, "ftp://example.org/pub/file.txt");
    }
}
