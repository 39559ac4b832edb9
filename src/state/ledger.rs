//! Visit ledger
//!
//! Records, per canonical key, the deepest remaining-depth value at which a
//! resource has been visited and the references discovered in it. The ledger
//! is the cycle breaker: a link cycle simply becomes a cache hit on the
//! second encounter.

use crate::{Result, TendrilError};
use std::collections::HashMap;

/// One visited resource, keyed by its canonical key in the ledger
#[derive(Debug, Clone)]
pub struct CrawlRecord {
    /// Rebuilt absolute form used for fetching and display
    pub url: String,

    /// Deepest remaining-depth value at which this record has been visited;
    /// monotonically increases across re-visits, never decreases
    pub depth: u32,

    /// References discovered in this resource's content, insertion-ordered,
    /// deduplicated by exact string equality at discovery time
    pub discovered_refs: Vec<String>,

    /// Raw fetched content, retained for diagnostics
    pub source: String,
}

/// The canonical-key → crawl-record table for one job run
///
/// Records are append-once: `put` never replaces, and re-visits only mutate
/// `depth` in place through `bump_depth`.
#[derive(Debug, Default)]
pub struct VisitLedger {
    records: HashMap<String, CrawlRecord>,
}

impl VisitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a record exists for `key`
    pub fn has(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Returns the record for `key`
    ///
    /// Callers check `has` first; a miss here indicates a ledger invariant
    /// violation and surfaces as an error rather than a panic.
    pub fn get(&self, key: &str) -> Result<&CrawlRecord> {
        self.records
            .get(key)
            .ok_or_else(|| TendrilError::LedgerMiss(key.to_string()))
    }

    /// Inserts a record; fails if `key` is already present
    pub fn put(&mut self, key: String, record: CrawlRecord) -> Result<()> {
        if self.records.contains_key(&key) {
            return Err(TendrilError::LedgerDuplicate(key));
        }

        self.records.insert(key, record);
        Ok(())
    }

    /// Promotes the record's depth to `new_depth` if it is greater
    pub fn bump_depth(&mut self, key: &str, new_depth: u32) -> Result<()> {
        let record = self
            .records
            .get_mut(key)
            .ok_or_else(|| TendrilError::LedgerMiss(key.to_string()))?;

        record.depth = record.depth.max(new_depth);
        Ok(())
    }

    /// Policy gate for re-expanding a cache hit's children
    ///
    /// True when relogging is unconditionally enabled or when the resource is
    /// now reachable at a strictly greater remaining depth than recorded.
    pub fn should_relog(&self, key: &str, current_depth: u32, relog_enabled: bool) -> Result<bool> {
        let record = self.get(key)?;
        Ok(relog_enabled || current_depth > record.depth)
    }

    /// Number of distinct resources visited
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(depth: u32) -> CrawlRecord {
        CrawlRecord {
            url: "http://example.org".to_string(),
            depth,
            discovered_refs: vec!["http://example.org/a".to_string()],
            source: String::new(),
        }
    }

    #[test]
    fn test_put_and_get() {
        let mut ledger = VisitLedger::new();
        ledger.put("http://example.org".to_string(), record(3)).unwrap();

        assert!(ledger.has("http://example.org"));
        assert_eq!(ledger.get("http://example.org").unwrap().depth, 3);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_get_miss_is_error() {
        let ledger = VisitLedger::new();
        assert!(matches!(
            ledger.get("http://example.org"),
            Err(TendrilError::LedgerMiss(_))
        ));
    }

    #[test]
    fn test_put_duplicate_is_error() {
        let mut ledger = VisitLedger::new();
        ledger.put("k".to_string(), record(2)).unwrap();

        assert!(matches!(
            ledger.put("k".to_string(), record(3)),
            Err(TendrilError::LedgerDuplicate(_))
        ));
    }

    #[test]
    fn test_bump_depth_promotes() {
        let mut ledger = VisitLedger::new();
        ledger.put("k".to_string(), record(1)).unwrap();

        ledger.bump_depth("k", 3).unwrap();
        assert_eq!(ledger.get("k").unwrap().depth, 3);
    }

    #[test]
    fn test_bump_depth_never_regresses() {
        let mut ledger = VisitLedger::new();
        ledger.put("k".to_string(), record(3)).unwrap();

        ledger.bump_depth("k", 1).unwrap();
        assert_eq!(ledger.get("k").unwrap().depth, 3);
    }

    #[test]
    fn test_should_relog_on_deeper_visit() {
        let mut ledger = VisitLedger::new();
        ledger.put("k".to_string(), record(1)).unwrap();

        assert!(ledger.should_relog("k", 3, false).unwrap());
        assert!(!ledger.should_relog("k", 1, false).unwrap());
        assert!(!ledger.should_relog("k", 0, false).unwrap());
    }

    #[test]
    fn test_should_relog_when_enabled() {
        let mut ledger = VisitLedger::new();
        ledger.put("k".to_string(), record(3)).unwrap();

        assert!(ledger.should_relog("k", 1, true).unwrap());
    }

    #[test]
    fn test_discovered_refs_preserved() {
        let mut ledger = VisitLedger::new();
        ledger.put("k".to_string(), record(2)).unwrap();
        ledger.bump_depth("k", 4).unwrap();

        // Depth bumps never touch the cached reference list.
        assert_eq!(
            ledger.get("k").unwrap().discovered_refs,
            vec!["http://example.org/a".to_string()]
        );
    }
}
