//! End-to-end tests against mock Letterboxd and Trakt servers
//!
//! These tests use wiremock to stand in for both services and drive the
//! export and import pipelines through real HTTP.

mod common;
mod export_tests;
mod import_tests;
