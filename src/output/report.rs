//! End-of-run report
//!
//! The email listing on stdout is the tool's only output contract; the
//! summary line goes through the log.

use crate::crawler::{FrontierStats, StopReason};
use crate::output::EmailSet;
use chrono::{DateTime, Utc};
use std::io::{self, Write};

/// Everything a finished run hands back
#[derive(Debug, Clone)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run stopped
    pub finished_at: DateTime<Utc>,

    /// Why the main loop ended
    pub stop_reason: StopReason,

    /// Page counts at the moment the run stopped
    pub frontier: FrontierStats,

    /// Every address found
    pub emails: EmailSet,
}

impl RunReport {
    /// Returns the wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Logs the one-line run summary
    pub fn log_summary(&self) {
        tracing::info!(
            "Run finished ({}): {} pages tracked, {} explored, {} retired, {} pending, {} emails in {}s",
            self.stop_reason,
            self.frontier.tracked,
            self.frontier.explored,
            self.frontier.retired,
            self.frontier.pending,
            self.emails.len(),
            self.duration_seconds()
        );
    }

    /// Writes the email listing
    pub fn write_emails<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Emails:")?;
        for email in self.emails.iter() {
            writeln!(out, "{}", email)?;
        }
        out.flush()
    }
}

/// Prints the email listing to stdout
pub fn print_report(report: &RunReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    report.write_emails(&mut handle)
}
