//! Integration tests for Page-Tally
//!
//! These tests use wiremock to create mock HTTP servers and run complete
//! scans end-to-end through the public API.

mod log_capture;
mod scan_tests;
