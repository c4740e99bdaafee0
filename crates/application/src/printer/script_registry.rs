use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::Arc;
use tracing::{debug, info, warn};

use domain::error::{PrinterError, Result};
use domain::sdk::{EposSdk, ScriptHost};

use super::completion::bridge;

type PendingLoad = Shared<BoxFuture<'static, std::result::Result<(), String>>>;

/// Process-wide record of SDK script injections.
///
/// One registry is shared by every manager living in the same document
/// context. It remembers which URLs finished loading and keeps the in-flight
/// load per URL so concurrent callers attach to it instead of injecting the
/// script a second time.
pub struct ScriptRegistry {
    host: Arc<dyn ScriptHost>,
    loaded: DashSet<String>,
    pending: DashMap<String, PendingLoad>,
}

impl ScriptRegistry {
    pub fn new(host: Arc<dyn ScriptHost>) -> Self {
        Self {
            host,
            loaded: DashSet::new(),
            pending: DashMap::new(),
        }
    }

    pub fn entry_point(&self) -> Option<Arc<dyn EposSdk>> {
        self.host.entry_point()
    }

    pub fn is_loaded(&self, url: &str) -> bool {
        self.loaded.contains(url)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Forget every recorded load. In-flight loads keep running for the
    /// callers already awaiting them.
    pub fn reset(&self) {
        self.loaded.clear();
        self.pending.clear();
    }

    /// Load the script at `url` once
    pub async fn load(&self, url: &str) -> Result<()> {
        if self.loaded.contains(url) {
            return Ok(());
        }

        let load = match self.pending.entry(url.to_string()) {
            Entry::Occupied(entry) => {
                debug!(url, "Attaching to in-flight SDK script load");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                info!(url, "Injecting printer SDK script");
                let (complete, completion) = bridge::<std::result::Result<(), String>>();
                self.host.inject_script(url, Box::new(complete));
                let load = async move {
                    completion
                        .wait()
                        .await
                        .unwrap_or_else(|| Err("script load callback dropped".to_string()))
                }
                .boxed()
                .shared();
                entry.insert(load.clone());
                load
            }
        };

        let outcome = load.clone().await;
        // Mark loaded before dropping the pending entry so no caller sees neither
        if outcome.is_ok() {
            self.loaded.insert(url.to_string());
        }
        self.pending.remove_if(url, |_, pending| pending.ptr_eq(&load));

        match outcome {
            Ok(()) => {
                info!(url, "Printer SDK script loaded");
                Ok(())
            }
            Err(reason) => {
                warn!(url, %reason, "Printer SDK script failed to load");
                Err(PrinterError::SdkLoad {
                    url: url.to_string(),
                    reason,
                })
            }
        }
    }
}
