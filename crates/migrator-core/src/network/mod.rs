//! Network access to the Asana REST API.
//!
//! This module provides:
//! - Retry logic with exponential backoff and jitter
//! - An authenticated JSON client with offset pagination
//! - The Asana-backed [`GoalRepository`](crate::repository::GoalRepository)

mod asana;
mod client;
mod retry;

pub use asana::AsanaClient;
pub use client::{extract_domain, HttpClient};
pub use retry::{retry_async, RetryConfig, RetryStats};
