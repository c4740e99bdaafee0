use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Externally visible state of a printer connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterStatus {
    /// No session; initial state and the state after a clean disconnect
    Idle,
    /// A connect attempt is in flight
    Connecting,
    /// Session is live and a device handle exists
    Connected,
    /// The last transition attempt failed
    Error,
}

impl PrinterStatus {
    pub const ALL: [PrinterStatus; 4] = [
        Self::Idle,
        Self::Connecting,
        Self::Connected,
        Self::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }

    /// Human-readable label for display surfaces
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Disconnected",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
            Self::Error => "Connection error",
        }
    }

    /// Exact, case-sensitive membership check. Anything that is not a string
    /// holding one of the canonical values is rejected.
    pub fn is_valid(candidate: &Value) -> bool {
        candidate
            .as_str()
            .is_some_and(|s| s.parse::<PrinterStatus>().is_ok())
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl Default for PrinterStatus {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrinterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown printer status: {:?}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_as_str() {
        assert_eq!(PrinterStatus::Idle.as_str(), "idle");
        assert_eq!(PrinterStatus::Connecting.as_str(), "connecting");
        assert_eq!(PrinterStatus::Connected.as_str(), "connected");
        assert_eq!(PrinterStatus::Error.as_str(), "error");
    }

    #[test]
    fn test_every_status_has_label() {
        for status in PrinterStatus::ALL {
            assert!(!status.label().is_empty(), "{} has no label", status);
        }
    }

    #[test]
    fn test_canonical_values_are_valid() {
        for status in PrinterStatus::ALL {
            assert!(PrinterStatus::is_valid(&json!(status.as_str())));
        }
    }

    #[test]
    fn test_non_canonical_strings_are_invalid() {
        for candidate in ["IDLE", "Connected", " idle", "error ", "", "   ", "disconnected"] {
            assert!(
                !PrinterStatus::is_valid(&json!(candidate)),
                "{:?} should be rejected",
                candidate
            );
        }
    }

    #[test]
    fn test_non_string_values_are_invalid() {
        let candidates = [
            Value::Null,
            json!(0),
            json!(1.5),
            json!(true),
            json!(false),
            json!({}),
            json!({ "status": "idle" }),
            json!([]),
            json!(["idle"]),
        ];
        for candidate in candidates {
            assert!(!PrinterStatus::is_valid(&candidate), "{} should be rejected", candidate);
        }
    }

    #[test]
    fn test_from_str_is_exact() {
        assert_eq!("connected".parse::<PrinterStatus>(), Ok(PrinterStatus::Connected));
        assert!("Connected".parse::<PrinterStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_strings() {
        let encoded = serde_json::to_value(PrinterStatus::Connecting).unwrap();
        assert_eq!(encoded, json!("connecting"));
        let decoded: PrinterStatus = serde_json::from_value(json!("error")).unwrap();
        assert_eq!(decoded, PrinterStatus::Error);
    }

    #[test]
    fn test_default() {
        assert_eq!(PrinterStatus::default(), PrinterStatus::Idle);
        assert!(!PrinterStatus::default().is_connected());
    }
}
