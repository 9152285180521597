//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `PageProgress`: How far the crawler has clicked through one page
//! - `RunClock`: The wall-clock budget of a run

mod page_progress;
mod run_clock;

// Re-export main types
pub use page_progress::PageProgress;
pub use run_clock::RunClock;
