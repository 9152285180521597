//! Crawler module for exploring a site through a browser
//!
//! This module contains the core harvesting logic, including:
//! - Email extraction from rendered markup
//! - The frontier of pages and their click progress
//! - Navigation that recovers from unreachable pages and redirects
//! - Clicking through a page's elements
//! - Overall run coordination

mod coordinator;
mod crawl_state;
mod extractor;
mod frontier;
mod interaction;
mod navigator;

pub use coordinator::{run_harvest, Coordinator, StopReason};
pub use crawl_state::CrawlState;
pub use extractor::{extract_emails, find_emails};
pub use frontier::{Frontier, FrontierStats};
pub use interaction::{explore_page, ClickEffect, VisitOutcome};
pub use navigator::{navigate_reliably, navigate_to_next_page};
