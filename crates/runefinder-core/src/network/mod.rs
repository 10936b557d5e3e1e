//! Network utilities for fetching the character database.
//!
//! This module provides:
//! - HTTP client with timeout and status checking
//! - Atomic downloader (temp file → fsync → rename)

mod client;
mod download;

pub use client::HttpClient;
pub use download::Downloader;
