use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of logical device created over a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceType(String);

impl DeviceType {
    pub const PRINTER: &'static str = "type_printer";
    pub const DISPLAY: &'static str = "type_display";

    pub fn new(device_type: impl Into<String>) -> Self {
        Self(device_type.into())
    }

    pub fn printer() -> Self {
        Self::new(Self::PRINTER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceType {
    fn from(device_type: &str) -> Self {
        Self::new(device_type)
    }
}
