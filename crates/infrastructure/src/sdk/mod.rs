pub mod file_script_host;
pub mod mock_script_host;
pub mod simulated_sdk;

pub use file_script_host::FileScriptHost;
pub use mock_script_host::MockScriptHost;
pub use simulated_sdk::{SdkCall, SimulatedDevice, SimulatedSdk, SimulatorBehavior};
