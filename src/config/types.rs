use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for a crawl job
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Seed URLs; each establishes its own domain-scope boundary
    #[serde(default)]
    pub seeds: Vec<String>,

    /// Depth ceiling for the traversal (remaining depth starts here)
    #[serde(rename = "total-depth", default = "default_total_depth")]
    pub total_depth: u32,

    /// Whether to collect email and phone contacts
    #[serde(rename = "scrape-contacts", default = "default_true")]
    pub scrape_contacts: bool,

    /// Whether to persist URL/email/phone logs to disk
    #[serde(rename = "persist-logs", default = "default_true")]
    pub persist_logs: bool,

    /// Relog policy for already-visited resources
    #[serde(default)]
    pub redundancy: RedundancyLevel,

    /// Console display level
    #[serde(default)]
    pub display: DisplayLevel,

    /// Directory the per-job log tree is created under
    #[serde(rename = "log-dir", default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Per-fetch timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            total_depth: default_total_depth(),
            scrape_contacts: true,
            persist_logs: true,
            redundancy: RedundancyLevel::default(),
            display: DisplayLevel::default(),
            log_dir: default_log_dir(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_total_depth() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_timeout_secs() -> u64 {
    20
}

/// Relog policy for resources the ledger has already seen
///
/// * `Unique` logs each URL once and only once (flat list).
/// * `Standard` logs a tree while skipping already-crawled subtrees unless a
///   deeper revisit promotes them.
/// * `Redundant` replays the full tree including already-crawled subtrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum RedundancyLevel {
    #[default]
    Unique,
    Standard,
    Redundant,
}

impl RedundancyLevel {
    /// True when cache hits unconditionally re-expand their children
    pub fn relog_enabled(&self) -> bool {
        matches!(self, Self::Redundant)
    }

    /// True when each URL is logged at most once per job
    pub fn unique_only(&self) -> bool {
        matches!(self, Self::Unique)
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for RedundancyLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unique),
            1 => Ok(Self::Standard),
            2 => Ok(Self::Redundant),
            other => Err(format!("redundancy must be 0, 1, or 2, got {other}")),
        }
    }
}

/// Console display level for URL log lines
///
/// `Quiet` prints nothing, `Standard` prints only beta (near-root) entries,
/// `Verbose` prints everything including diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum DisplayLevel {
    Quiet,
    #[default]
    Standard,
    Verbose,
}

impl DisplayLevel {
    /// Print gate for a URL entry given its beta status
    pub fn shows_url(&self, beta: bool) -> bool {
        match self {
            Self::Quiet => false,
            Self::Standard => beta,
            Self::Verbose => true,
        }
    }

    /// Print gate for diagnostics
    pub fn shows_diagnostics(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for DisplayLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Quiet),
            1 => Ok(Self::Standard),
            2 => Ok(Self::Verbose),
            other => Err(format!("display must be 0, 1, or 2, got {other}")),
        }
    }
}
