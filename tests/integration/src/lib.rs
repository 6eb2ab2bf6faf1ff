//! TMB Routes Integration Tests
//!
//! These tests run against a deployed route API. Set `TMB_ROUTES_API_URL`
//! (and `TMB_ROUTES_ID_TOKEN` for the protected route) in the environment or
//! a `.env` file; without the URL every test is skipped.
//!
//! Run with: cargo test --package tmbroutes-integration-tests

pub mod client;
pub mod fixtures;

pub use client::RoutesClient;
pub use fixtures::*;
