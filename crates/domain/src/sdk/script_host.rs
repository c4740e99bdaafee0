use std::sync::Arc;

use super::EposSdk;

/// Fired once when a script injection finishes loading or fails
pub type ScriptCallback = Box<dyn FnOnce(Result<(), String>) + Send>;

/// Document context the vendor script is injected into
pub trait ScriptHost: Send + Sync {
    /// The SDK's global entry point, if a script has installed it
    fn entry_point(&self) -> Option<Arc<dyn EposSdk>>;

    /// Inject the script at `url`. The callback receives the load outcome
    /// (load event vs. error event).
    fn inject_script(&self, url: &str, on_complete: ScriptCallback);
}
