//! Classification and logging sink
//!
//! Routes each discovered item to one of the four append-only log
//! destinations (debug, URL tree, email, phone), applying the per-category
//! dedup and display policies. Each job opens its sinks once, identified by a
//! UUID job ID and a timestamp.

use crate::config::{Config, DisplayLevel, RedundancyLevel};
use crate::output::entry::{is_beta, Diagnostic, EmailEntry, LogEntry, PhoneEntry, UrlEntry};
use crate::output::stats::JobStats;
use crate::Result;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// The four per-job log destinations plus their dedup state
///
/// The debug sink is always open; the URL sink requires the save flag; the
/// contact sinks additionally require contact scraping to be enabled.
pub struct LogSinks {
    pub job_id: String,
    pub timestamp: String,

    debug: BufWriter<File>,
    url: Option<BufWriter<File>>,
    email: Option<BufWriter<File>>,
    phone: Option<BufWriter<File>>,

    /// Canonical keys of URL lines already emitted (uniqueness gate)
    logged_urls: HashSet<String>,

    /// Contact values in discovery order, for the end-of-job aggregate
    emails: Vec<String>,
    phones: Vec<String>,
    email_set: HashSet<String>,
    phone_set: HashSet<String>,

    debug_count: u64,
    error_count: u64,

    total_depth: u32,
    redundancy: RedundancyLevel,
    display: DisplayLevel,
    scrape: bool,
    save: bool,
}

impl LogSinks {
    /// Opens the per-job log tree under the configured log directory
    ///
    /// Layout: `1-debug/debug_<ts>.txt`, `2-url/url_<ts>.txt`,
    /// `3-email/email_<ts>.txt`, `4-phone/phone_<ts>.txt`. Every opened file
    /// begins with a `JobID:` header line.
    pub fn new(config: &Config) -> Result<Self> {
        let job_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S").to_string();

        let open = |subdir: &str, name: &str| -> Result<BufWriter<File>> {
            let dir = config.log_dir.join(subdir);
            fs::create_dir_all(&dir)?;

            let path: PathBuf = dir.join(format!("{name}_{timestamp}.txt"));
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "JobID: {job_id}")?;
            writeln!(writer)?;

            Ok(writer)
        };

        let debug = open("1-debug", "debug")?;

        let url = if config.persist_logs {
            Some(open("2-url", "url")?)
        } else {
            None
        };

        let (email, phone) = if config.persist_logs && config.scrape_contacts {
            (Some(open("3-email", "email")?), Some(open("4-phone", "phone")?))
        } else {
            (None, None)
        };

        Ok(Self {
            job_id,
            timestamp,
            debug,
            url,
            email,
            phone,
            logged_urls: HashSet::new(),
            emails: Vec::new(),
            phones: Vec::new(),
            email_set: HashSet::new(),
            phone_set: HashSet::new(),
            debug_count: 0,
            error_count: 0,
            total_depth: config.total_depth,
            redundancy: config.redundancy,
            display: config.display,
            scrape: config.scrape_contacts,
            save: config.persist_logs,
        })
    }

    /// Routes a classified entry to its sink, applying dedup and display
    /// policy
    pub fn write(&mut self, entry: &LogEntry) -> Result<()> {
        match entry {
            LogEntry::Url(url) => self.write_url(url),
            LogEntry::Email(email) => self.write_email(email),
            LogEntry::Phone(phone) => self.write_phone(phone),
        }
    }

    fn write_url(&mut self, entry: &UrlEntry) -> Result<()> {
        let unique = self.logged_urls.insert(entry.key.clone());

        // At the unique level the tree collapses to a flat once-only list,
        // so indentation is suppressed along with repeats.
        let indented = !self.redundancy.unique_only();
        let gate = !self.redundancy.unique_only() || unique;

        let beta = is_beta(self.total_depth, entry.depth);

        if gate && self.display.shows_url(beta) {
            println!("{}", entry.print_line(self.total_depth, indented));
        }

        if gate && self.save {
            if let Some(sink) = &mut self.url {
                writeln!(sink, "{}", entry.log_line(self.total_depth, indented))?;
            }
        }

        Ok(())
    }

    fn write_email(&mut self, entry: &EmailEntry) -> Result<()> {
        if !self.scrape || !self.email_set.insert(entry.email.clone()) {
            return Ok(());
        }

        self.emails.push(entry.email.clone());

        if let Some(sink) = &mut self.email {
            writeln!(sink, "{}", entry.email)?;
        }

        Ok(())
    }

    fn write_phone(&mut self, entry: &PhoneEntry) -> Result<()> {
        if !self.scrape || !self.phone_set.insert(entry.phone.clone()) {
            return Ok(());
        }

        self.phones.push(entry.phone.clone());

        if let Some(sink) = &mut self.phone {
            writeln!(sink, "{}", entry.phone)?;
        }

        Ok(())
    }

    /// Records a diagnostic: counted, printed above the verbosity threshold,
    /// and always persisted to the debug sink
    pub fn diagnostic(&mut self, diag: Diagnostic) -> Result<()> {
        self.debug_count += 1;

        if diag.kind.is_error() {
            self.error_count += 1;
        }

        if self.display.shows_diagnostics() {
            println!("{}", diag.print_output(self.debug_count));
        }

        write!(self.debug, "{}", diag.log_output(self.debug_count))?;

        Ok(())
    }

    /// Marks the end of one seed's traversal in the URL sink
    pub fn end_crawl(&mut self, seed: &str) -> Result<()> {
        if let Some(sink) = &mut self.url {
            writeln!(sink, "END CRAWL: {seed}")?;
            writeln!(sink)?;
        }

        Ok(())
    }

    /// Writes the job stats to the debug sink and flushes everything
    pub fn finish(&mut self, stats: &JobStats) -> Result<()> {
        write!(self.debug, "{}", stats.format_block())?;
        self.debug.flush()?;

        for sink in [&mut self.url, &mut self.email, &mut self.phone]
            .into_iter()
            .flatten()
        {
            sink.flush()?;
        }

        Ok(())
    }

    /// Emails collected so far, in discovery order
    pub fn emails(&self) -> &[String] {
        &self.emails
    }

    /// Phone numbers collected so far, in discovery order
    pub fn phones(&self) -> &[String] {
        &self.phones
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn debug_count(&self) -> u64 {
        self.debug_count
    }
}
