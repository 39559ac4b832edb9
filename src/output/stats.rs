//! End-of-job statistics
//!
//! Aggregate summary printed at job end and appended to the debug sink.

/// Summary of one crawl job
#[derive(Debug, Clone)]
pub struct JobStats {
    /// Recoverable errors encountered (fetch failures, over-popped links)
    pub error_count: u64,

    /// Wall-clock duration of the crawl in seconds
    pub elapsed_secs: f64,

    /// Timestamp the job's log files are named with
    pub timestamp: String,

    /// UUID identifying this job across its log files
    pub job_id: String,
}

impl JobStats {
    pub fn new(error_count: u64, elapsed_secs: f64, timestamp: String, job_id: String) -> Self {
        Self {
            error_count,
            elapsed_secs,
            timestamp,
            job_id,
        }
    }

    /// Block appended to the debug sink
    pub fn format_block(&self) -> String {
        format!(
            "**Job Stats**\nErrors: {}\n{} seconds\nTimestamp: {}\n",
            self.error_count, self.elapsed_secs, self.timestamp
        )
    }

    /// Prints the summary to the console
    pub fn print(&self) {
        println!("\n\n\n{}", self.format_block());
        println!("JobID: {}", self.job_id);
    }
}
