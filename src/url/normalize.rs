//! URL normal-form engine
//!
//! Stateless string algebra that reduces the variable-prefix / variable-form
//! URL space (`http`/`https`/`ftp`/`ftps`/`www.`, relative forms, anchor
//! tails) to the canonical comparison key used for visited-set membership and
//! domain scoping. The `url::Url` parser is deliberately not used here: half
//! of the references flowing through are relative or scheme-less and the
//! folding rules (http == https, ftp == ftps, `www.` erased anywhere) are not
//! expressible through it.

/// Substrings erased during canonicalization, applied in order. Every
/// occurrence is removed, not just a leading one, so `www.` vanishes from
/// doubled-up forms like `http://www.http://www.example.org` as well.
const ERASED_TOKENS: [&str; 6] = ["http://", "https://", "ftp://", "ftps://", "www.", " "];

/// A detected or defaulted URL prefix
///
/// `fallback` marks the prefix-not-detected case where `http://` was assumed;
/// callers that care surface it as an informational diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub value: String,
    pub fallback: bool,
}

/// Reduces a reference to its canonical comparison form
///
/// Removes scheme prefixes, `www.`, and whitespace; drops a protocol-relative
/// `//` lead-in, one trailing slash, and a trailing in-page anchor segment
/// such as `/page/#content`. Idempotent: `stripped(stripped(x)) == stripped(x)`.
///
/// # Examples
///
/// ```
/// use tendril::url::stripped;
///
/// assert_eq!(stripped("http://www.example.org/a/"), "example.org/a");
/// assert_eq!(stripped("https://example.org/a"), "example.org/a");
/// ```
pub fn stripped(reference: &str) -> String {
    let mut url = reference.to_string();

    for token in ERASED_TOKENS {
        url = url.replace(token, "");
    }

    if let Some(rest) = url.strip_prefix("//") {
        url = rest.to_string();
    }

    if url.ends_with('/') {
        url.truncate(url.len() - 1);
    }

    // Drop a trailing anchor segment (`/#content`), which never changes the
    // resource identity.
    if let Some(index) = url.rfind('/') {
        if index + 1 < url.len() && url[index..].starts_with("/#") {
            url.truncate(index);
        }
    }

    url
}

/// Extracts the scheme prefix of a reference, through the `//` inclusive
///
/// Email and phone schemes carry no prefix. A reference with no detectable
/// prefix defaults to `http://` with `fallback` set; that default is a
/// deliberate recovery, not a silent success.
pub fn prefix(reference: &str) -> Prefix {
    use crate::url::classify::{is_qualified_email, is_qualified_phone};

    if is_qualified_email(reference) || is_qualified_phone(reference) {
        return Prefix {
            value: String::new(),
            fallback: false,
        };
    }

    if let Some(index) = reference.find("//") {
        if index != 0 {
            return Prefix {
                value: reference[..index + 2].to_string(),
                fallback: false,
            };
        }
    }

    Prefix {
        value: "http://".to_string(),
        fallback: true,
    }
}

/// Extracts the domain of a reference
///
/// The canonical form is searched with a synthetic trailing `/` so a bare
/// domain with no path yields the whole string.
pub fn domain(reference: &str) -> String {
    let url = stripped(reference) + "/";
    let end = url.find('/').unwrap_or(url.len());
    url[..end].to_string()
}

/// Builds the canonical identity key used by the visit ledger
///
/// The key folds `http`/`https` (and `ftp`/`ftps`) together while keeping
/// web and FTP identities distinct, which the bare `stripped` form would
/// erase.
pub fn check_link(reference: &str) -> String {
    let detected = prefix(reference);
    let bare = stripped(reference);

    if detected.value.starts_with("http") {
        format!("http://{}", bare)
    } else if detected.value.starts_with("ftp") {
        format!("ftp://{}", bare)
    } else {
        // Email, phone, and unknown schemes carry no prefix.
        bare
    }
}

/// Rebuilds the canonical absolute form used for fetching and display
pub fn rebuilt_link(reference: &str) -> String {
    format!("{}{}", prefix(reference).value, stripped(reference)).replace(' ', "")
}
