//! REST summary gateway.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use super::{GatewayError, SummaryGateway};
use crate::config::PreviewConfig;
use crate::preview::model::RawSummary;

/// Content negotiation profile pinning the summary payload shape.
const SUMMARY_ACCEPT: &str = "application/json; charset=utf-8; \
    profile=\"https://www.mediawiki.org/wiki/Specs/Summary/1.4.2\"";

/// Summary fetcher backed by the configured REST endpoint.
pub struct RestGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl RestGateway {
    /// Build a gateway from the engine configuration. The configured fetch
    /// timeout bounds every request.
    pub fn new(config: &PreviewConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(SUMMARY_ACCEPT));
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|error| GatewayError::Transport(error.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

/// Titles arrive still percent-encoded from the link href, so they are
/// appended to the endpoint as-is.
fn summary_url(endpoint: &str, title: &str) -> String {
    format!("{endpoint}{title}")
}

#[async_trait]
impl SummaryGateway for RestGateway {
    async fn fetch_summary(&self, title: &str) -> Result<RawSummary, GatewayError> {
        let response = self
            .client
            .get(summary_url(&self.endpoint, title))
            .send()
            .await
            .map_err(|error| GatewayError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        response
            .json::<RawSummary>()
            .await
            .map_err(|error| GatewayError::Payload(error.to_string()))
    }
}
