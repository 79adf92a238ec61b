//! The service layer of the farmhand web app.
//!
//! This crate bundles everything the app needs to talk to the crop catalog:
//! the [`catalog`] HTTP client, the request-coalescing [`caching`]
//! infrastructure, and the concrete [`caches`] built on top of it, along with
//! configuration, logging and metrics plumbing shared by the binaries.

#[macro_use]
pub mod metrics;

pub mod caches;
pub mod caching;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod utils;
