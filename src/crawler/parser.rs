//! Content parsing: markup tag extraction and FTP listing parsing
//!
//! Turns raw fetched content into the raw reference candidates the
//! traversal engine resolves and classifies.

use crate::url::{QUALIFY_ATTRIBUTES, QUALIFY_TAGS};
use scraper::{ElementRef, Html};

/// Extracts the qualifying attribute of every qualifying tag, in document
/// order
///
/// One entry per qualifying tag; `None` marks a tag that carried no `href`
/// or `src`, which the engine uses to detect pages with tags but no usable
/// attributes. The descendant walk (rather than a CSS selector) is what
/// lets namespaced tags like `atom:link` qualify.
pub fn extract_tag_attributes(content: &str) -> Vec<Option<String>> {
    let document = Html::parse_document(content);
    let mut attributes = Vec::new();

    for node in document.tree.nodes() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };

        if !QUALIFY_TAGS.contains(&element.value().name()) {
            continue;
        }

        let value = QUALIFY_ATTRIBUTES
            .iter()
            .find_map(|name| element.value().attr(name))
            .map(str::to_string);

        attributes.push(value);
    }

    attributes
}

/// Parses an FTP directory listing into synthetic path strings
///
/// Each line is whitespace-tokenized; the first eight tokens are the
/// fixed-format metadata columns (permissions, owner, size, date), and the
/// remainder is the filename. Multi-token filenames are rejoined with `%20`
/// so the resulting path is percent-encoded. Empty listings produce an
/// empty sequence.
pub fn parse_ftp_listing(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| {
            line.split(' ')
                .filter(|token| !token.is_empty())
                .skip(8)
                .collect::<Vec<_>>()
                .join("%20")
        })
        .collect()
}
