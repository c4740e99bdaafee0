//! Infrastructure layer - Configuration and SDK bindings

pub mod config;
pub mod sdk;

pub use config::PrinterSettings;
pub use sdk::{FileScriptHost, MockScriptHost, SimulatedSdk};
