//! Preview data gateway.
//!
//! The controller fetches summaries through this seam. The REST
//! implementation lives in [`rest`]; tests substitute their own.

pub mod rest;

use async_trait::async_trait;
use thiserror::Error;

use crate::preview::model::RawSummary;

/// Failure modes of a summary fetch. Logged and dropped; no retry is
/// attempted, the user can dwell again to retry manually.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network-level failure: connect, TLS, or timeout.
    #[error("summary request failed: {0}")]
    Transport(String),
    /// Endpoint answered with a non-success status.
    #[error("summary endpoint returned status {0}")]
    Status(u16),
    /// Response body was not a valid summary payload.
    #[error("malformed summary payload: {0}")]
    Payload(String),
}

/// Asynchronous source of page summaries.
#[async_trait]
pub trait SummaryGateway: Send + Sync {
    /// Fetch the summary for a still-percent-encoded page title.
    async fn fetch_summary(&self, title: &str) -> Result<RawSummary, GatewayError>;
}
