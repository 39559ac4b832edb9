//! URL handling module for Tendril
//!
//! Provides the normal-form engine (canonical comparison keys, prefixes,
//! domains), reference classification, and relative-link resolution.

pub mod classify;
pub mod normalize;
pub mod resolve;

// Re-export main functions
pub use classify::{
    has_prefix, is_ftp, is_html_parseable, is_qualified_crawl_url, is_qualified_email,
    is_qualified_phone, is_web_file, stripped_email, stripped_phone, QUALIFY_ATTRIBUTES,
    QUALIFY_TAGS,
};
pub use normalize::{check_link, domain, prefix, rebuilt_link, stripped, Prefix};
pub use resolve::{merge_url, Merged};
