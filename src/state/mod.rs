//! Crawl state tracking
//!
//! Holds the visit ledger: the per-job table of every resource visited, its
//! deepest observed remaining depth, and its cached discovered references.

mod ledger;

pub use ledger::{CrawlRecord, VisitLedger};
