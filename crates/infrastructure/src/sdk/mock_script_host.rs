use domain::sdk::{EposSdk, ScriptCallback, ScriptHost};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// In-memory document context for tests.
///
/// Every URL loads successfully unless marked as failing. Completions fire
/// on a later turn of the runtime so concurrent loaders can overlap.
pub struct MockScriptHost {
    sdk: Arc<dyn EposSdk>,
    installed: Arc<RwLock<Option<Arc<dyn EposSdk>>>>,
    failing: Mutex<HashSet<String>>,
    injected: Mutex<Vec<String>>,
}

impl MockScriptHost {
    pub fn new(sdk: Arc<dyn EposSdk>) -> Self {
        Self {
            sdk,
            installed: Arc::new(RwLock::new(None)),
            failing: Mutex::new(HashSet::new()),
            injected: Mutex::new(Vec::new()),
        }
    }

    /// Host whose entry point is present before any injection
    pub fn preloaded(sdk: Arc<dyn EposSdk>) -> Self {
        let host = Self::new(sdk.clone());
        *host.installed.write().unwrap_or_else(PoisonError::into_inner) = Some(sdk);
        host
    }

    pub fn fail_url(&self, url: &str) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string());
    }

    pub fn heal_url(&self, url: &str) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url);
    }

    /// Remove the global entry point, as if the page were reloaded
    pub fn uninstall(&self) {
        *self.installed.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn injected_urls(&self) -> Vec<String> {
        self.injected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn injections(&self) -> usize {
        self.injected_urls().len()
    }
}

impl ScriptHost for MockScriptHost {
    fn entry_point(&self) -> Option<Arc<dyn EposSdk>> {
        self.installed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn inject_script(&self, url: &str, on_complete: ScriptCallback) {
        self.injected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        let fails = self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url);
        let sdk = self.sdk.clone();
        let installed = self.installed.clone();
        let url = url.to_string();

        let complete = move || {
            if fails {
                on_complete(Err(format!("error event loading {}", url)));
            } else {
                *installed.write().unwrap_or_else(PoisonError::into_inner) = Some(sdk);
                on_complete(Ok(()));
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::task::yield_now().await;
                    complete();
                });
            }
            Err(_) => complete(),
        }
    }
}
