//! Integration tests for the harvester
//!
//! Most tests drive the real coordinator against a scripted in-memory site.
//! The Chromium tests need a local Chromium install and are ignored by
//! default; run them with `cargo test -- --ignored`.

mod harvest_tests;
