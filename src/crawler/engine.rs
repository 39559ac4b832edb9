//! Traversal engine
//!
//! The control algorithm of a crawl job: given a seed and a depth budget,
//! fetch-or-replay each resource, resolve every discovered reference against
//! the moving base, filter by domain scope and qualification, and expand with
//! a decremented budget. Already-visited resources replay their cached
//! reference lists instead of re-fetching.
//!
//! Traversal is an explicit depth-first frontier rather than recursion:
//! children are pushed in reverse discovery order so the walk order (and the
//! resulting log tree) matches a recursive descent, without recursing through
//! async calls.

use crate::config::{Config, DisplayLevel};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::parser::{extract_tag_attributes, parse_ftp_listing};
use crate::output::entry::{is_beta, Diagnostic, LogEntry};
use crate::output::sinks::LogSinks;
use crate::output::stats::JobStats;
use crate::state::{CrawlRecord, VisitLedger};
use crate::url::{
    check_link, domain, has_prefix, is_html_parseable, is_qualified_crawl_url, is_qualified_email,
    is_qualified_phone, merge_url, prefix, rebuilt_link, stripped,
};
use crate::Result;
use std::time::Instant;

/// One unit of pending traversal work
#[derive(Debug)]
enum Task {
    /// Visit a resource with the given remaining depth
    Visit { reference: String, depth: u32 },

    /// Emit a terminal leaf entry without visiting
    Leaf { entry: LogEntry },
}

/// One crawl job: configuration, transport, sinks, and the shared visit
/// ledger
///
/// The ledger is shared across all seeds of the run, so cross-seed overlap
/// deduplicates naturally; the seed URL and domain scope reset per seed.
pub struct CrawlJob<'a, F: Fetcher> {
    config: &'a Config,
    fetcher: &'a F,
    sinks: &'a mut LogSinks,
    ledger: VisitLedger,
    seed_url: String,
    seed_domain: String,
}

impl<'a, F: Fetcher> CrawlJob<'a, F> {
    pub fn new(config: &'a Config, fetcher: &'a F, sinks: &'a mut LogSinks) -> Self {
        Self {
            config,
            fetcher,
            sinks,
            ledger: VisitLedger::new(),
            seed_url: String::new(),
            seed_domain: String::new(),
        }
    }

    /// Crawls every configured seed in order
    pub async fn run(&mut self) -> Result<()> {
        for seed in self.config.seeds.clone() {
            self.seed_url = seed.clone();
            self.seed_domain = domain(&seed);

            tracing::info!("Crawling seed {} to depth {}", seed, self.config.total_depth);
            self.crawl(&seed).await?;

            self.sinks.end_crawl(&seed)?;
        }

        Ok(())
    }

    /// Depth-first traversal from one seed
    async fn crawl(&mut self, seed: &str) -> Result<()> {
        let mut frontier = vec![Task::Visit {
            reference: seed.to_string(),
            depth: self.config.total_depth,
        }];

        while let Some(task) = frontier.pop() {
            match task {
                Task::Leaf { entry } => self.sinks.write(&entry)?,

                Task::Visit { reference, depth } => {
                    // Leaf boundary: the depth budget is exhausted.
                    if depth == 0 {
                        continue;
                    }

                    let children = self.visit(&reference, depth).await?;

                    for task in children
                        .iter()
                        .map(|child| self.child_task(child, depth))
                        .rev()
                    {
                        frontier.push(task);
                    }
                }
            }
        }

        Ok(())
    }

    /// Visits one resource: fetch-and-record on first contact, replay on a
    /// cache hit
    ///
    /// Returns the references to expand below this node; empty when the
    /// relog policy suppresses re-expansion.
    async fn visit(&mut self, reference: &str, depth: u32) -> Result<Vec<String>> {
        let current_url = rebuilt_link(reference);
        let key = check_link(&current_url);

        if self.ledger.has(&key) {
            return self.revisit(&current_url, &key, depth);
        }

        if prefix(reference).fallback {
            self.sinks
                .diagnostic(Diagnostic::prefix_not_detected(reference))?;
        }

        let content = match self.fetcher.fetch(&current_url).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(error) => {
                // Best-effort: a failed fetch discovers zero children but the
                // node is still marked visited.
                self.sinks
                    .diagnostic(Diagnostic::fetch_failure(&current_url, &error.to_string()))?;
                String::new()
            }
        };

        let note = (is_beta(self.config.total_depth, depth)
            && is_qualified_crawl_url(&current_url, &self.seed_url))
        .then_some("Crawling...");

        // Parse diagnostics sequence ahead of the node's own log line.
        let discovered = self.discover(&current_url, &content)?;

        self.sinks.write(&LogEntry::url(&current_url, depth, note))?;

        self.ledger.put(
            key,
            CrawlRecord {
                url: current_url,
                depth,
                discovered_refs: discovered.clone(),
                source: content,
            },
        )?;

        Ok(discovered)
    }

    /// Replays an already-visited resource
    fn revisit(&mut self, current_url: &str, key: &str, depth: u32) -> Result<Vec<String>> {
        let relog = self
            .ledger
            .should_relog(key, depth, self.config.redundancy.relog_enabled())?;

        self.ledger.bump_depth(key, depth)?;

        self.sinks
            .write(&LogEntry::url(current_url, depth, Some("Already crawled")))?;

        if relog {
            // Replay the cached reference list; no re-fetch, no re-resolve.
            Ok(self.ledger.get(key)?.discovered_refs.clone())
        } else {
            Ok(Vec::new())
        }
    }

    /// Extracts, resolves, and deduplicates the references in a resource's
    /// content
    fn discover(&mut self, current_url: &str, content: &str) -> Result<Vec<String>> {
        let raw_refs: Vec<Option<String>> = if is_html_parseable(current_url) {
            extract_tag_attributes(content)
        } else {
            parse_ftp_listing(content).into_iter().map(Some).collect()
        };

        if raw_refs.is_empty() {
            self.sinks
                .diagnostic(Diagnostic::no_tags_detected(current_url, content))?;
        }

        let mut discovered: Vec<String> = Vec::new();
        let mut has_qualified_attributes = false;

        for attribute in raw_refs {
            let Some(mut reference) = attribute else {
                continue;
            };

            has_qualified_attributes = true;

            // Ignore-list: fragments and empties are never references.
            if reference.is_empty() || reference == "#" {
                continue;
            }

            if !has_prefix(&reference)
                && !is_qualified_email(&reference)
                && !is_qualified_phone(&reference)
            {
                let merged = merge_url(current_url, &reference);

                for _ in 0..merged.over_pops {
                    self.sinks
                        .diagnostic(Diagnostic::too_many_back_links(&reference))?;
                }

                // Over-popped past the root: a non-reference, dropped.
                if merged.url.is_empty() {
                    continue;
                }

                reference = merged.url;
            }

            // Per-page dedup is exact string equality on the resolved raw
            // form; canonical-key folding happens only at the ledger.
            if !discovered.contains(&reference) {
                discovered.push(reference);
            }
        }

        if !has_qualified_attributes {
            self.sinks
                .diagnostic(Diagnostic::no_attributes_detected(current_url, content))?;
        }

        Ok(discovered)
    }

    /// Decides whether a discovered reference recurses or terminates as a
    /// leaf entry
    fn child_task(&self, reference: &str, parent_depth: u32) -> Task {
        let bare = stripped(reference);

        if parent_depth > 1
            && is_qualified_crawl_url(reference, &self.seed_url)
            && bare.starts_with(&self.seed_domain)
            && bare != stripped(&self.seed_url)
        {
            return Task::Visit {
                reference: reference.to_string(),
                depth: parent_depth - 1,
            };
        }

        let entry = if is_qualified_email(reference) {
            LogEntry::email(reference)
        } else if is_qualified_phone(reference) {
            LogEntry::phone(reference)
        } else {
            LogEntry::url(reference, parent_depth - 1, None)
        };

        Task::Leaf { entry }
    }

    /// Read access to the visit ledger (inspection and tests)
    pub fn ledger(&self) -> &VisitLedger {
        &self.ledger
    }
}

/// Runs a complete crawl job: opens sinks, crawls every seed, prints the
/// contact aggregate, and writes the final job stats
///
/// # Arguments
///
/// * `config` - Validated job configuration
///
/// # Returns
///
/// * `Ok(JobStats)` - Summary of the completed job
/// * `Err(TendrilError)` - Sink or client setup failed; crawl-time errors
///   never propagate here
pub async fn run_crawl(config: &Config) -> Result<JobStats> {
    let mut sinks = LogSinks::new(config)?;
    sinks.diagnostic(Diagnostic::job_start(config_echo(config)))?;

    let fetcher = HttpFetcher::new(config.timeout_secs)?;
    let start = Instant::now();

    {
        let mut job = CrawlJob::new(config, &fetcher, &mut sinks);
        job.run().await?;
        tracing::info!("Visited {} distinct resources", job.ledger().len());
    }

    if config.display != DisplayLevel::Quiet && config.scrape_contacts {
        println!("\n\nEmails:");
        println!("{}", sinks.emails().join("\n"));

        println!("\n\nPhone Numbers:");
        println!("{}", sinks.phones().join("\n"));
    }

    let stats = JobStats::new(
        sinks.error_count(),
        start.elapsed().as_secs_f64(),
        sinks.timestamp.clone(),
        sinks.job_id.clone(),
    );

    sinks.finish(&stats)?;

    Ok(stats)
}

/// Configuration echo for the job-start banner in the debug log
fn config_echo(config: &Config) -> String {
    use crate::output::entry::TAB;

    format!(
        "CONFIG:\ntotal_depth = {}\nscrape = {}\nsave = {}\nredundancy = {}\ndisplay = {}\nseeds =\n{TAB}{}",
        config.total_depth,
        config.scrape_contacts,
        config.persist_logs,
        config.redundancy.as_u8(),
        config.display.as_u8(),
        config.seeds.join(&format!("\n{TAB}")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TendrilError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Fetcher that serves canned bodies and counts invocations per URL
    struct ScriptedFetcher {
        pages: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls_for(&self, url: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.as_str() == url)
                .count()
        }

        fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push(url.to_string());

            match self.pages.get(url) {
                Some(body) => Ok(body.clone().into_bytes()),
                None => Err(TendrilError::Fetch {
                    url: url.to_string(),
                    message: "not scripted".to_string(),
                }),
            }
        }
    }

    fn test_config(dir: &std::path::Path, seeds: &[&str], depth: u32) -> Config {
        Config {
            seeds: seeds.iter().map(|s| s.to_string()).collect(),
            total_depth: depth,
            display: DisplayLevel::Quiet,
            log_dir: dir.to_path_buf(),
            ..Config::default()
        }
    }

    async fn run_job(config: &Config, fetcher: &ScriptedFetcher) -> (VisitLedger, u64) {
        let mut sinks = LogSinks::new(config).unwrap();
        let mut job = CrawlJob::new(config, fetcher, &mut sinks);
        job.run().await.unwrap();

        let CrawlJob { ledger, .. } = job;
        let errors = sinks.error_count();
        (ledger, errors)
    }

    fn page(links: &[&str]) -> String {
        let body: String = links
            .iter()
            .map(|l| format!("<a href=\"{l}\">x</a>"))
            .collect();
        format!("<html><body>{body}</body></html>")
    }

    #[tokio::test]
    async fn test_cycle_fetched_once_per_node() {
        let fetcher = ScriptedFetcher::new(&[
            ("http://example.org", &page(&["/b"])),
            ("http://example.org/b", &page(&["/"])),
        ]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org"], 4);
        let (ledger, _) = run_job(&config, &fetcher).await;

        assert_eq!(fetcher.calls_for("http://example.org"), 1);
        assert_eq!(fetcher.calls_for("http://example.org/b"), 1);
        assert_eq!(ledger.len(), 2);
    }

    #[tokio::test]
    async fn test_depth_bounds_traversal() {
        // A chain longer than the depth budget.
        let fetcher = ScriptedFetcher::new(&[
            ("http://example.org", &page(&["/1"])),
            ("http://example.org/1", &page(&["/2"])),
            ("http://example.org/2", &page(&["/3"])),
            ("http://example.org/3", &page(&["/4"])),
        ]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org"], 3);
        let (ledger, _) = run_job(&config, &fetcher).await;

        // Depth 3 visits the seed plus two levels below it; /3 is logged as
        // a leaf but never fetched.
        assert_eq!(fetcher.total_calls(), 3);
        assert!(ledger.has("http://example.org/2"));
        assert!(!ledger.has("http://example.org/3"));
    }

    #[tokio::test]
    async fn test_off_domain_never_recursed() {
        let fetcher = ScriptedFetcher::new(&[(
            "http://example.org",
            &page(&["http://other.org/page"]),
        )]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org"], 4);
        let (ledger, _) = run_job(&config, &fetcher).await;

        assert_eq!(fetcher.calls_for("http://other.org/page"), 0);
        assert!(!ledger.has("http://other.org/page"));
    }

    #[tokio::test]
    async fn test_seed_self_reference_not_recursed() {
        let fetcher = ScriptedFetcher::new(&[(
            "http://example.org",
            &page(&["http://example.org", "https://www.example.org/"]),
        )]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org"], 4);
        let (_, _) = run_job(&config, &fetcher).await;

        // All variants fold to the seed's canonical key.
        assert_eq!(fetcher.calls_for("http://example.org"), 1);
    }

    #[tokio::test]
    async fn test_depth_promotion_on_revisit() {
        // /deep is first reached through a long path at depth 1, then
        // directly from the seed at depth 3.
        let fetcher = ScriptedFetcher::new(&[
            ("http://example.org", &page(&["/a", "/deep"])),
            ("http://example.org/a", &page(&["/b"])),
            ("http://example.org/b", &page(&["/deep"])),
            ("http://example.org/deep", &page(&["/under"])),
            ("http://example.org/under", &page(&[])),
        ]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org"], 4);
        let (ledger, _) = run_job(&config, &fetcher).await;

        // First visit at remaining depth 2, promoted to 3 by the direct edge.
        assert_eq!(ledger.get("http://example.org/deep").unwrap().depth, 3);
        assert_eq!(fetcher.calls_for("http://example.org/deep"), 1);

        // The promotion re-expanded the cached children deep enough to
        // fetch /under.
        assert_eq!(fetcher.calls_for("http://example.org/under"), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_nonfatal() {
        let fetcher = ScriptedFetcher::new(&[(
            "http://example.org",
            &page(&["/missing", "/ok"]),
        ), ("http://example.org/ok", &page(&[]))]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org"], 3);
        let (ledger, errors) = run_job(&config, &fetcher).await;

        // The failed node is still marked visited, the job continued.
        assert!(ledger.has("http://example.org/missing"));
        assert!(ledger.has("http://example.org/ok"));
        assert!(errors >= 1);
    }

    #[tokio::test]
    async fn test_contacts_collected_not_recursed() {
        let fetcher = ScriptedFetcher::new(&[(
            "http://example.org",
            &page(&["mailto:test@example.com", "tel:(555) 123-4567"]),
        )]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org"], 4);

        let mut sinks = LogSinks::new(&config).unwrap();
        let mut job = CrawlJob::new(&config, &fetcher, &mut sinks);
        job.run().await.unwrap();
        drop(job);

        assert_eq!(sinks.emails(), ["test@example.com"]);
        assert_eq!(sinks.phones(), ["5551234567"]);
        assert_eq!(fetcher.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_relative_links_resolved_against_node() {
        let fetcher = ScriptedFetcher::new(&[
            ("http://example.org/docs/index.html", &page(&["../about", "guide.html"])),
            ("http://example.org/about", &page(&[])),
            ("http://example.org/docs/guide.html", &page(&[])),
        ]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org/docs/index.html"], 3);
        let (ledger, _) = run_job(&config, &fetcher).await;

        assert!(ledger.has("http://example.org/about"));
        assert!(ledger.has("http://example.org/docs/guide.html"));
    }

    #[tokio::test]
    async fn test_static_files_logged_not_fetched() {
        let fetcher = ScriptedFetcher::new(&[(
            "http://example.org",
            &page(&["/photo.png", "/page.html"]),
        ), ("http://example.org/page.html", &page(&[]))]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org"], 3);
        let (ledger, _) = run_job(&config, &fetcher).await;

        assert!(!ledger.has("http://example.org/photo.png"));
        assert!(ledger.has("http://example.org/page.html"));
    }

    #[tokio::test]
    async fn test_duplicate_raw_refs_discovered_once() {
        let fetcher = ScriptedFetcher::new(&[(
            "http://example.org",
            &page(&["/a", "/a", "/a/"]),
        ), ("http://example.org/a", &page(&[]))]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org"], 3);
        let (ledger, _) = run_job(&config, &fetcher).await;

        // `/a` and `/a` collapse by exact string equality; `/a/` resolves to
        // a distinct raw form and survives per-page dedup, but folds into
        // the same canonical identity at the ledger.
        let record = ledger.get("http://example.org").unwrap();
        assert_eq!(
            record.discovered_refs,
            vec![
                "http://example.org/a".to_string(),
                "http://example.org/a/".to_string()
            ]
        );
        assert_eq!(fetcher.calls_for("http://example.org/a"), 1);
    }

    #[tokio::test]
    async fn test_ftp_listing_traversal() {
        let seed_listing = "\
-rw-r--r--   1 owner    group        2048 Jan 01 12:00 My File.txt
drwxr-xr-x   2 owner    group        4096 Jan 02 09:30 docs";
        let docs_listing = "-rw-r--r--   1 owner    group        1024 Jan 03 08:00 index.html";

        let fetcher = ScriptedFetcher::new(&[
            ("ftp://example.org/pub", seed_listing),
            ("ftp://example.org/pub/docs", docs_listing),
            ("ftp://example.org/pub/docs/index.html", &page(&[])),
        ]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["ftp://example.org/pub"], 4);
        let (ledger, _) = run_job(&config, &fetcher).await;

        // The listing lines resolve to synthetic paths under the listing's
        // own URL, spaces percent-encoded.
        assert_eq!(
            ledger.get("ftp://example.org/pub").unwrap().discovered_refs,
            vec![
                "ftp://example.org/pub/My%20File.txt".to_string(),
                "ftp://example.org/pub/docs".to_string(),
            ]
        );

        // The plain file is a leaf; the extensionless directory is recursed
        // into as another listing.
        assert_eq!(fetcher.calls_for("ftp://example.org/pub/My%20File.txt"), 0);
        assert!(!ledger.has("ftp://example.org/pub/My%20File.txt"));
        assert_eq!(fetcher.calls_for("ftp://example.org/pub/docs"), 1);

        // A web file served over FTP is fetched and parsed as markup.
        assert_eq!(fetcher.calls_for("ftp://example.org/pub/docs/index.html"), 1);
        assert!(ledger.has("ftp://example.org/pub/docs/index.html"));
    }

    #[tokio::test]
    async fn test_empty_page_diagnostics_precede_node_line() {
        let fetcher =
            ScriptedFetcher::new(&[("http://example.org", "<html><body></body></html>")]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org"], 2);

        let mut sinks = LogSinks::new(&config).unwrap();
        let timestamp = sinks.timestamp.clone();
        let mut job = CrawlJob::new(&config, &fetcher, &mut sinks);
        job.run().await.unwrap();
        drop(job);

        // A tagless page surfaces both parse diagnostics, in parse order,
        // before the node's own line is emitted; neither counts as an error.
        assert_eq!(sinks.debug_count(), 2);
        assert_eq!(sinks.error_count(), 0);

        let stats = JobStats::new(0, 0.0, timestamp.clone(), sinks.job_id.clone());
        sinks.finish(&stats).unwrap();

        let debug = std::fs::read_to_string(
            dir.path().join("1-debug").join(format!("debug_{timestamp}.txt")),
        )
        .unwrap();
        assert!(debug.contains("#1 INFO: No tags detected | http://example.org"));
        assert!(debug.contains("#2 INFO: No attributes detected | http://example.org"));

        let url_log = std::fs::read_to_string(
            dir.path().join("2-url").join(format!("url_{timestamp}.txt")),
        )
        .unwrap();
        assert!(url_log.contains("http://example.org"));
    }

    #[tokio::test]
    async fn test_shared_ledger_across_seeds() {
        let fetcher = ScriptedFetcher::new(&[
            ("http://example.org", &page(&["/shared"])),
            ("http://example.org/shared", &page(&[])),
            ("http://other.org", &page(&["http://example.org/shared"])),
        ]);

        let dir = tempdir().unwrap();
        let config = test_config(dir.path(), &["http://example.org", "http://other.org"], 3);
        let (_, _) = run_job(&config, &fetcher).await;

        // The second seed sees the first seed's visit as a cache hit; the
        // shared page is logged as off-domain leaf either way, never
        // re-fetched.
        assert_eq!(fetcher.calls_for("http://example.org/shared"), 1);
    }
}
