use std::time::Duration;

use crate::error::{AgentError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://adsapi.secureworldme.com/api/bike/CreateBikeLocation";
pub const DEFAULT_DEVICE_ID: &str = "BIKEODC001";
pub const DEFAULT_ASSET_ID: &str = "DEVODC123";
pub const DEFAULT_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the reporting agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Endpoint URL the reports are POSTed to
    pub endpoint: String,
    /// Device identifier transmitted as `BikeId`
    pub device_id: String,
    /// Asset identifier transmitted as `device_code`
    pub asset_id: String,
    /// Time between scheduled reports
    pub interval: Duration,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            device_id: DEFAULT_DEVICE_ID.to_string(),
            asset_id: DEFAULT_ASSET_ID.to_string(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(AgentError::Config("endpoint URL is empty".to_string()));
        }
        if self.interval.is_zero() {
            return Err(AgentError::Config(
                "report interval must be non-zero".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(AgentError::Config(
                "request timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
