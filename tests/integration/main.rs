//! Integration tests for Showcase-Harvest
//!
//! These tests use wiremock to stand in for the site and run stages
//! end-to-end, writing into temporary directories.

mod coordinator_tests;
mod fixtures;
mod pipeline_tests;
