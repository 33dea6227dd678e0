//! Client configuration for the detection API

use crate::error::{DetectError, Result};
use serde::{Deserialize, Serialize};

/// Default base path of the detection API
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Default request timeout in seconds
///
/// Inference on a 50 MB video can take a while, so the default is
/// deliberately generous.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for an [`ApiClient`](crate::ApiClient)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API, including the `/api` prefix
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 120)
    #[serde(rename = "timeout-secs", skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// User agent string sent with every request
    #[serde(rename = "user-agent", skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            user_agent: Some(format!("spoofdetect/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the API
    pub fn base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the user agent string
    pub fn user_agent<S: Into<String>>(mut self, agent: S) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(DetectError::invalid_parameter(
                "base_url",
                "Base URL must not be empty",
            ));
        }

        if let Some(0) = self.timeout_secs {
            return Err(DetectError::invalid_parameter(
                "timeout_secs",
                "Timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Convert the configuration to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(DetectError::from)
    }

    /// Create a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(DetectError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new()
            .base_url("https://detector.example.com/api/")
            .timeout_secs(30)
            .user_agent("dashboard/1.0");

        assert_eq!(config.base_url, "https://detector.example.com/api/");
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.user_agent.as_deref(), Some("dashboard/1.0"));
    }

    #[test]
    fn test_endpoint_join() {
        let config = ClientConfig::new().base_url("http://localhost:5000/api/");
        assert_eq!(
            config.endpoint("/auth/login"),
            "http://localhost:5000/api/auth/login"
        );

        let config = ClientConfig::new().base_url("http://localhost:5000/api");
        assert_eq!(config.endpoint("/predict"), "http://localhost:5000/api/predict");
    }

    #[test]
    fn test_config_validation() {
        assert!(ClientConfig::new().validate().is_ok());

        let config = ClientConfig::new().base_url("");
        assert!(config.validate().is_err());

        let mut config = ClientConfig::new();
        config.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_json() {
        let config = ClientConfig::new().base_url("http://api.test/api");
        let json = config.to_json().unwrap();
        let parsed = ClientConfig::from_json(&json).unwrap();
        assert_eq!(parsed.base_url, "http://api.test/api");
    }
}
