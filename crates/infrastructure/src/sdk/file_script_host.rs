use domain::sdk::{EposSdk, ScriptCallback, ScriptHost};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Serves SDK scripts from a local directory.
///
/// A load succeeds when the URL resolves to an existing file under `root`;
/// the supplied SDK is then installed as the global entry point.
pub struct FileScriptHost {
    root: PathBuf,
    sdk: Arc<dyn EposSdk>,
    installed: Arc<OnceLock<Arc<dyn EposSdk>>>,
    injections: AtomicUsize,
}

impl FileScriptHost {
    pub fn new(root: impl Into<PathBuf>, sdk: Arc<dyn EposSdk>) -> Self {
        Self {
            root: root.into(),
            sdk,
            installed: Arc::new(OnceLock::new()),
            injections: AtomicUsize::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn injections(&self) -> usize {
        self.injections.load(Ordering::SeqCst)
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let relative = url.strip_prefix("file://").unwrap_or(url);
        self.root.join(relative.trim_start_matches('/'))
    }
}

impl ScriptHost for FileScriptHost {
    fn entry_point(&self) -> Option<Arc<dyn EposSdk>> {
        self.installed.get().cloned()
    }

    fn inject_script(&self, url: &str, on_complete: ScriptCallback) {
        self.injections.fetch_add(1, Ordering::SeqCst);
        let path = self.resolve(url);
        let sdk = self.sdk.clone();
        let installed = self.installed.clone();

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            on_complete(Err("no async runtime to load the script on".to_string()));
            return;
        };

        handle.spawn(async move {
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => {
                    info!(path = %path.display(), "SDK script found, installing entry point");
                    let _ = installed.set(sdk);
                    on_complete(Ok(()));
                }
                Ok(_) => {
                    warn!(path = %path.display(), "SDK script path is not a file");
                    on_complete(Err(format!("{} is not a file", path.display())));
                }
                Err(e) => {
                    warn!(path = %path.display(), "SDK script could not be read: {}", e);
                    on_complete(Err(e.to_string()));
                }
            }
        });
    }
}
