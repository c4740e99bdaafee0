pub mod binding;
mod completion;
pub mod manager;
pub mod script_registry;

pub use binding::{BindingState, PrinterBinding};
pub use manager::{DEFAULT_DEVICE_ID, PrinterConnectionManager, SessionTeardown};
pub use script_registry::ScriptRegistry;
