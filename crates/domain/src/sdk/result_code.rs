use serde::{Deserialize, Serialize};
use std::fmt;

/// Result code reported by an SDK completion callback
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultCode(String);

impl ResultCode {
    pub const OK: &'static str = "OK";
    pub const SSL_CONNECT_OK: &'static str = "SSL_CONNECT_OK";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn ok() -> Self {
        Self::new(Self::OK)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_ok(&self) -> bool {
        self.0 == Self::OK
    }

    /// Session connects also succeed over TLS
    pub fn is_connect_success(&self) -> bool {
        self.is_ok() || self.0 == Self::SSL_CONNECT_OK
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResultCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}
