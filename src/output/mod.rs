//! Output module for harvest results
//!
//! This module handles:
//! - The deduplicated set of harvested addresses
//! - The end-of-run report and the email listing on stdout

mod email_set;
mod report;

pub use email_set::EmailSet;
pub use report::{print_report, RunReport};
