use serde::{Deserialize, Serialize};

use crate::error::{PrinterError, Result};

/// Port the vendor SDK listens on when none is configured
pub const DEFAULT_PORT: u16 = 8043;

/// Network address of a single printer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            host: host.into(),
            port: port.unwrap_or(DEFAULT_PORT),
        }
    }
}

/// Where the vendor SDK script is served from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkLocation {
    pub url: String,
}

impl SdkLocation {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Construction parameters for a connection manager
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionOptions {
    #[serde(default)]
    pub sdk_url: String,
    #[serde(default, alias = "ip")]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
}

impl ConnectionOptions {
    pub fn new(sdk_url: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            sdk_url: sdk_url.into(),
            host: host.into(),
            port: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Splits the options into the SDK location and printer endpoint,
    /// rejecting empty values.
    pub fn validate(&self) -> Result<(SdkLocation, Endpoint)> {
        if self.sdk_url.is_empty() {
            return Err(PrinterError::Configuration(
                "sdk_url is required".to_string(),
            ));
        }
        if self.host.is_empty() {
            return Err(PrinterError::Configuration(
                "printer host (ip) is required".to_string(),
            ));
        }
        Ok((
            SdkLocation::new(self.sdk_url.clone()),
            Endpoint::new(self.host.clone(), self.port),
        ))
    }
}
