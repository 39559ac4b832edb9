//! Log entry and diagnostic types
//!
//! Every discovered item is routed through one `LogEntry` variant; every
//! recoverable anomaly becomes a `Diagnostic` with a monotonic sequence
//! number assigned by the sink at write time.

use crate::url::{check_link, rebuilt_link, stripped_email, stripped_phone};

/// One fixed-width indent unit per tree level
pub const TAB: &str = "    ";

/// Divider between persisted debug entries
pub const DEBUG_DIVIDER: &str = "==================================================";

/// Returns true if a resource at `depth` remaining is within one level of
/// the seed's root (display emphasis only; never a traversal decision)
pub fn is_beta(total_depth: u32, depth: u32) -> bool {
    total_depth <= depth + 1
}

/// A classified item headed for the URL, email, or phone sink
#[derive(Debug, Clone)]
pub enum LogEntry {
    Url(UrlEntry),
    Email(EmailEntry),
    Phone(PhoneEntry),
}

/// A URL log line with tree position and optional annotation
#[derive(Debug, Clone)]
pub struct UrlEntry {
    /// Canonical key, used for once-per-job uniqueness
    pub key: String,

    /// Rebuilt absolute form shown in the log
    pub display: String,

    /// Remaining depth at emit time; drives tree indentation
    pub depth: u32,

    /// Console annotation (`Crawling...` / `Already crawled`)
    pub note: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct EmailEntry {
    /// Bare address, `mailto:` and whitespace removed
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct PhoneEntry {
    /// Bare digits, `tel:` and punctuation removed
    pub phone: String,
}

impl LogEntry {
    /// Builds a URL entry from a raw reference
    pub fn url(reference: &str, depth: u32, note: Option<&'static str>) -> Self {
        Self::Url(UrlEntry {
            key: check_link(reference),
            display: rebuilt_link(reference),
            depth,
            note,
        })
    }

    /// Builds an email entry from a raw `mailto:` reference
    pub fn email(reference: &str) -> Self {
        Self::Email(EmailEntry {
            email: stripped_email(reference),
        })
    }

    /// Builds a phone entry from a raw `tel:` reference
    pub fn phone(reference: &str) -> Self {
        Self::Phone(PhoneEntry {
            phone: stripped_phone(reference),
        })
    }
}

impl UrlEntry {
    fn indent(&self, total_depth: u32, indented: bool) -> String {
        if indented {
            TAB.repeat(total_depth.saturating_sub(self.depth) as usize)
        } else {
            String::new()
        }
    }

    /// Line persisted to the URL sink (annotation omitted)
    pub fn log_line(&self, total_depth: u32, indented: bool) -> String {
        format!("{}{}", self.indent(total_depth, indented), self.display)
    }

    /// Line printed to the console (annotation included)
    pub fn print_line(&self, total_depth: u32, indented: bool) -> String {
        let line = self.log_line(total_depth, indented);

        match self.note {
            Some(note) => format!("{line} | {note}"),
            None => line,
        }
    }
}

/// Kinds of recoverable anomalies surfaced during a crawl
///
/// Error kinds carry a stable numeric code in the debug log; informational
/// kinds do not increment the job's error count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Fetch failure: content treated as empty, node still marked visited
    UnableToCrawl,

    /// Parent-link backtracking popped past the domain root
    TooManyBackLinks,

    /// No scheme detected; `http://` assumed
    PrefixNotDetected,

    /// A fetched resource yielded zero tags
    NoTagsDetected,

    /// Tags were found but none carried a qualifying attribute
    NoAttributesDetected,

    /// Job-start banner with the configuration echo
    JobStart,
}

impl DiagnosticKind {
    /// Stable error code, or None for informational kinds
    pub fn code(&self) -> Option<u8> {
        match self {
            Self::UnableToCrawl => Some(0),
            Self::TooManyBackLinks => Some(1),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.code().is_some()
    }

    pub fn header(&self) -> &'static str {
        match self {
            Self::UnableToCrawl => "Unable to crawl",
            Self::TooManyBackLinks => "Too many back links",
            Self::PrefixNotDetected => "Prefix not detected",
            Self::NoTagsDetected => "No tags detected",
            Self::NoAttributesDetected => "No attributes detected",
            Self::JobStart => "Starting crawl job",
        }
    }
}

/// One debug-log entry: an anomaly or informational marker
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub url: Option<String>,
    pub detail: Option<String>,
    pub payload: Option<String>,
}

impl Diagnostic {
    pub fn fetch_failure(url: &str, error: &str) -> Self {
        Self {
            kind: DiagnosticKind::UnableToCrawl,
            url: Some(url.to_string()),
            detail: None,
            payload: Some(error.to_string()),
        }
    }

    pub fn too_many_back_links(path: &str) -> Self {
        Self {
            kind: DiagnosticKind::TooManyBackLinks,
            url: Some(path.to_string()),
            detail: None,
            payload: None,
        }
    }

    pub fn prefix_not_detected(url: &str) -> Self {
        Self {
            kind: DiagnosticKind::PrefixNotDetected,
            url: Some(url.to_string()),
            detail: Some("The passed URL was scanned, but no prefix was detected".to_string()),
            payload: Some("Result: assuming 'http://'".to_string()),
        }
    }

    pub fn no_tags_detected(url: &str, source: &str) -> Self {
        Self {
            kind: DiagnosticKind::NoTagsDetected,
            url: Some(url.to_string()),
            detail: Some("The URL was parsed, but no tags were detected".to_string()),
            payload: Some(format!("SOURCE:\n\n{source}")),
        }
    }

    pub fn no_attributes_detected(url: &str, source: &str) -> Self {
        Self {
            kind: DiagnosticKind::NoAttributesDetected,
            url: Some(url.to_string()),
            detail: Some(
                "The tags were parsed from the URL, but no qualified attributes were detected"
                    .to_string(),
            ),
            payload: Some(format!("SOURCE:\n\n{source}")),
        }
    }

    pub fn job_start(config_echo: String) -> Self {
        Self {
            kind: DiagnosticKind::JobStart,
            url: None,
            detail: Some(format!("START: {} UTC", chrono::Utc::now())),
            payload: Some(config_echo),
        }
    }

    /// Formats the entry for the debug sink
    pub fn log_output(&self, sequence: u64) -> String {
        let mut output = match self.kind.code() {
            Some(code) => format!("#{sequence} ERROR_{code}: {}", self.kind.header()),
            None => format!("#{sequence} INFO: {}", self.kind.header()),
        };

        if let Some(url) = &self.url {
            output.push_str(&format!(" | {url}"));
        }

        if let Some(detail) = &self.detail {
            output.push_str(&format!("\n\n\n{detail}"));
        }

        if let Some(payload) = &self.payload {
            output.push_str(&format!("\n\n\n{payload}"));
        }

        output.push_str(&format!("\n\n\n{DEBUG_DIVIDER}\n\n\n"));

        output
    }

    /// Formats the entry for console printing
    pub fn print_output(&self, sequence: u64) -> String {
        let mut output = match self.kind.code() {
            Some(code) => format!("Entry#{sequence} | ERROR_{code}: {}", self.kind.header()),
            None => format!("Entry#{sequence} | INFO: {}", self.kind.header()),
        };

        if let Some(url) = &self.url {
            output.push_str(&format!(" | {url}"));
        }

        output
    }
}
