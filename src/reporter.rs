use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as ReqwestClient, ClientBuilder, StatusCode};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::models::{LocationReport, Position};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Exact content type the endpoint expects, charset syntax included
const REPORT_CONTENT_TYPE: &str = "application/json; utf-8";

#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure that never produced an HTTP status
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Classified result of one send attempt
///
/// Created per attempt, consumed by logging, then discarded; the agent keeps
/// no history of past outcomes.
#[derive(Debug)]
pub enum ReportOutcome {
    /// Endpoint accepted the report (HTTP 200 or 201)
    Success,
    /// Endpoint answered with any other status
    HttpError(u16),
    /// DNS, connection, timeout or serialization failure
    Transport(TransportError),
}

impl ReportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ReportOutcome::Success)
    }
}

/// Serializes positions into the wire payload and POSTs them
///
/// Stateless per call: one request, no retry, outcome always returned rather
/// than raised. The next scheduled tick is the implicit retry mechanism.
#[derive(Clone)]
pub struct Reporter {
    client: Arc<ReqwestClient>,
    endpoint: String,
    device_id: String,
    asset_id: String,
}

#[derive(Default)]
pub struct ReporterBuilder {
    endpoint: Option<String>,
    device_id: Option<String>,
    asset_id: Option<String>,
    timeout: Option<Duration>,
}

impl ReporterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Device identifier transmitted as `BikeId`
    pub fn device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = Some(id.into());
        self
    }

    /// Asset identifier transmitted as `device_code`
    pub fn asset_id(mut self, id: impl Into<String>) -> Self {
        self.asset_id = Some(id.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Reporter, ReporterError> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| ReporterError::Config("Endpoint URL must be provided".to_string()))?;

        // The timeout is mandatory: the scheduler keeps firing new sends, so
        // a hung request must not accumulate unboundedly.
        let client = ClientBuilder::new()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(ReporterError::Network)?;

        Ok(Reporter {
            client: Arc::new(client),
            endpoint,
            device_id: self.device_id.unwrap_or_default(),
            asset_id: self.asset_id.unwrap_or_default(),
        })
    }
}

impl Reporter {
    pub fn builder() -> ReporterBuilder {
        ReporterBuilder::new()
    }

    /// Send one position report and classify the result
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn send(&self, position: Position) -> ReportOutcome {
        let report = LocationReport::new(&self.device_id, &self.asset_id, position);
        let body = match serde_json::to_string(&report) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to serialize location report: {}", e);
                return ReportOutcome::Transport(e.into());
            }
        };

        debug!("POST {}", body);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, REPORT_CONTENT_TYPE)
            .body(body)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                if status == StatusCode::OK || status == StatusCode::CREATED {
                    info!("Location sent successfully. Code: {}", status.as_u16());
                    ReportOutcome::Success
                } else {
                    error!("Failed to send location. Code: {}", status.as_u16());
                    ReportOutcome::HttpError(status.as_u16())
                }
            }
            Err(e) => {
                error!("Error sending location: {}", e);
                ReportOutcome::Transport(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockito::{Matcher, Server};

    fn position() -> Position {
        Position::new(12.5, 77.625, Utc::now())
    }

    fn reporter(endpoint: String) -> Reporter {
        Reporter::builder()
            .endpoint(endpoint)
            .device_id("BIKEODC001")
            .asset_id("DEVODC123")
            .build()
            .unwrap()
    }

    #[test]
    fn build_without_endpoint_fails() {
        let result = Reporter::builder().device_id("BIKEODC001").build();
        assert!(matches!(result, Err(ReporterError::Config(_))));
    }

    #[tokio::test]
    async fn created_report_yields_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("content-type", "application/json; utf-8")
            .match_body(Matcher::PartialJsonString(
                r#"{
                    "BikeId": "BIKEODC001",
                    "device_code": "DEVODC123",
                    "Latitude": "12.5",
                    "Longitude": "77.625",
                    "URL": "",
                    "filename": "",
                    "total_duration": ""
                }"#
                .to_string(),
            ))
            .with_status(201)
            .create_async()
            .await;

        let outcome = reporter(server.url()).send(position()).await;

        assert!(outcome.is_success());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn ok_report_yields_success() {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", "/").with_status(200).create_async().await;

        let outcome = reporter(server.url()).send(position()).await;

        assert!(outcome.is_success());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_report_yields_http_error_with_status() {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", "/").with_status(503).create_async().await;

        let outcome = reporter(server.url()).send(position()).await;

        assert!(matches!(outcome, ReportOutcome::HttpError(503)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_transport_error() {
        let unreachable = Reporter::builder()
            .endpoint("http://127.0.0.1:1")
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        let outcome = unreachable.send(position()).await;

        assert!(matches!(
            outcome,
            ReportOutcome::Transport(TransportError::Network(_))
        ));
    }
}
