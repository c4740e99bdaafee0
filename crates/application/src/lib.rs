//! Application layer - Printer connection lifecycle

pub mod printer;

pub use printer::{PrinterBinding, PrinterConnectionManager, ScriptRegistry};
