//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive the fetcher,
//! the worker pipeline and full crawls end-to-end.

mod crawl_tests;
mod fetch_tests;
mod support;
