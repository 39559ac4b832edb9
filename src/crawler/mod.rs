//! Crawler module for Tendril
//!
//! Splits into the traversal engine, the fetch transport, and the
//! content parsers (HTML tag walk and FTP listing).

pub mod engine;
pub mod fetcher;
pub mod parser;

pub use engine::{run_crawl, CrawlJob};
pub use fetcher::{Fetcher, HttpFetcher};
pub use parser::{extract_tag_attributes, parse_ftp_listing};
