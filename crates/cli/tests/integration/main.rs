//! CLI integration tests.

mod common;
mod download_tests;
mod plan_tests;
