use thiserror::Error;

/// Errors surfaced by the printer connection lifecycle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrinterError {
    /// Missing sdk_url / host at construction, or no host resolvable at connect time
    #[error("Invalid printer configuration: {0}")]
    Configuration(String),

    #[error("Failed to load printer SDK from {url}: {reason}")]
    SdkLoad { url: String, reason: String },

    /// Raw SDK result code (or fault text) is embedded in the message
    #[error("Printer connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Printer device creation failed: {0}")]
    DeviceCreationFailed(String),

    #[error("Not connected to a printer")]
    NotConnected,
}

/// A synchronous exception raised by a vendor SDK primitive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SdkFault(pub String);

impl SdkFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PrinterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failure_embeds_code() {
        let err = PrinterError::ConnectionFailed("ERR_CONNECT".to_string());
        assert!(err.to_string().contains("ERR_CONNECT"));
    }

    #[test]
    fn test_sdk_load_mentions_url() {
        let err = PrinterError::SdkLoad {
            url: "/sdk.js".to_string(),
            reason: "404".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("/sdk.js"));
        assert!(message.contains("404"));
    }
}
