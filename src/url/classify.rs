//! Reference classification
//!
//! Predicates that decide what a discovered reference is: a crawlable page, a
//! static web file, an FTP resource, or a contact (`mailto:`/`tel:`), plus the
//! contact-stripping helpers used by the logging sink.

use crate::url::normalize::{domain, stripped};

/// File extensions that mark a reference as a web file (crawlable document)
pub const QUALIFY_ENDINGS: [&str; 5] = [".html", ".htm", ".php", ".asp", ".cfm"];

/// Suffixes that disqualify a reference from crawling outright
pub const DISQUALIFY_ENDINGS: [&str; 1] = ["/LICENSE"];

/// Scheme prefixes that disqualify a reference from crawling outright
pub const DISQUALIFY_BEGINNINGS: [&str; 2] = ["mailto:", "tel:"];

/// Markup tags whose attributes are searched for references
pub const QUALIFY_TAGS: [&str; 6] = ["a", "atom:link", "iframe", "img", "link", "script"];

/// Attributes tried, in order, on each qualifying tag
pub const QUALIFY_ATTRIBUTES: [&str; 2] = ["href", "src"];

/// Returns true if the reference carries an explicit scheme prefix
pub fn has_prefix(reference: &str) -> bool {
    reference.contains("://") || reference.starts_with("//")
}

/// Returns true if the reference names a web file (after trimming one
/// trailing slash, ends with a recognized document extension)
pub fn is_web_file(reference: &str) -> bool {
    let url = reference.strip_suffix('/').unwrap_or(reference);

    QUALIFY_ENDINGS.iter().any(|ending| url.ends_with(ending))
}

/// Returns true if the reference uses an FTP scheme
pub fn is_ftp(reference: &str) -> bool {
    reference.starts_with("ftp://") || reference.starts_with("ftps://")
}

/// Returns true if the resource's content is markup rather than an FTP
/// directory listing
///
/// Everything non-FTP is markup; an FTP resource is markup only when it is a
/// web file served over FTP.
pub fn is_html_parseable(reference: &str) -> bool {
    if !is_ftp(reference) {
        return true;
    }

    is_web_file(reference)
}

/// Returns true if the reference is a usable `mailto:` contact
pub fn is_qualified_email(reference: &str) -> bool {
    reference.starts_with("mailto:") && reference != "mailto:"
}

/// Returns true if the reference is a usable `tel:` contact
pub fn is_qualified_phone(reference: &str) -> bool {
    reference.starts_with("tel:") && reference != "tel:"
}

/// Decides whether a reference is eligible for recursive expansion
///
/// Disqualifying short-circuits run first: dangling backlinks (`..`),
/// disqualified suffixes such as `/LICENSE`, and contact schemes. After
/// removing the seed URL, the domain, and any `/.` sequences from the
/// canonical form, a remaining `.` is treated as a file extension and the
/// reference must be a recognized web file to qualify.
///
/// # Arguments
///
/// * `reference` - The candidate reference
/// * `seed_url` - The raw seed URL of the current crawl, removed before the
///   extension heuristic so a dotted seed domain does not disqualify its own
///   children
pub fn is_qualified_crawl_url(reference: &str, seed_url: &str) -> bool {
    let check = stripped(reference);

    if check.ends_with("..") {
        return false;
    }

    for ending in DISQUALIFY_ENDINGS {
        if check.ends_with(&stripped(ending)) {
            return false;
        }
    }

    for beginning in DISQUALIFY_BEGINNINGS {
        if reference.starts_with(&stripped(beginning)) {
            return false;
        }
    }

    let url = reference.strip_suffix('/').unwrap_or(reference);

    let mut check = check;
    if !seed_url.is_empty() {
        check = check.replace(seed_url, "");
    }

    let host = domain(url);
    if !host.is_empty() {
        check = check.replace(&host, "");
    }

    check = check.replace("/.", "");

    if check.contains('.') {
        return is_web_file(url);
    }

    true
}

/// Strips a `mailto:` reference to the bare address
pub fn stripped_email(reference: &str) -> String {
    reference.replace("mailto:", "").replace(' ', "")
}

/// Strips a `tel:` reference to the bare digits
pub fn stripped_phone(reference: &str) -> String {
    let mut phone = reference.to_string();

    for token in ["tel:", "(", ")", "-", " "] {
        phone = phone.replace(token, "");
    }

    phone
}
