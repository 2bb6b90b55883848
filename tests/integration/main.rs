//! Integration tests for Novel-Harvest
//!
//! These tests use wiremock to serve catalog and chapter pages and drive
//! the harvester end-to-end over HTTP.

mod common;
mod config_tests;
mod content_tests;
mod import_tests;
mod sync_tests;
