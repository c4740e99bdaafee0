//! Domain layer - Printer connection types and the vendor SDK contract
//!
//! This crate contains:
//! - Status projection (PrinterStatus)
//! - Value objects (Endpoint, SdkLocation, ConnectionOptions, ResultCode)
//! - The error taxonomy
//! - SDK interfaces (traits) implemented by infrastructure
//!
//! No dependencies on infrastructure or an async runtime.

pub mod error;
pub mod printer;
pub mod sdk;

// Re-export commonly used types
pub use error::{PrinterError, SdkFault};
pub use printer::{ConnectionOptions, Endpoint, PrinterStatus, SdkLocation};
pub use sdk::{DeviceHandle, DeviceType, ResultCode};
