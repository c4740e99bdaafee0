use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use domain::error::Result;
use domain::printer::{ConnectionOptions, PrinterStatus};
use domain::sdk::{DeviceHandle, DeviceType};

use super::manager::{DEFAULT_DEVICE_ID, PrinterConnectionManager};
use super::script_registry::ScriptRegistry;

/// Snapshot published to observers of a binding
#[derive(Debug, Clone, Default)]
pub struct BindingState {
    pub status: PrinterStatus,
    pub error: Option<String>,
    pub printer: Option<DeviceHandle>,
}

/// Scope-bound adapter between one connection manager and its observers.
///
/// `shutdown` disconnects the manager once. A binding dropped without it
/// detaches the session and tears it down on the current Tokio runtime.
pub struct PrinterBinding {
    manager: PrinterConnectionManager,
    device_id: String,
    device_type: Option<DeviceType>,
    state: watch::Sender<BindingState>,
    torn_down: bool,
}

impl PrinterBinding {
    pub fn new(options: &ConnectionOptions, scripts: Arc<ScriptRegistry>) -> Result<Self> {
        let manager = PrinterConnectionManager::new(options, scripts)?;
        let (state, _) = watch::channel(BindingState::default());
        Ok(Self {
            manager,
            device_id: DEFAULT_DEVICE_ID.to_string(),
            device_type: None,
            state,
            torn_down: false,
        })
    }

    pub fn with_device(
        mut self,
        device_id: impl Into<String>,
        device_type: Option<DeviceType>,
    ) -> Self {
        self.device_id = device_id.into();
        self.device_type = device_type;
        self
    }

    pub fn status(&self) -> PrinterStatus {
        self.state.borrow().status
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn printer(&self) -> Option<DeviceHandle> {
        self.state.borrow().printer.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BindingState> {
        self.state.subscribe()
    }

    pub fn manager(&self) -> &PrinterConnectionManager {
        &self.manager
    }

    pub fn is_connected(&self) -> bool {
        self.manager.is_connected()
    }

    /// Connect and create the printer device, publishing each transition
    pub async fn connect(&mut self) -> Result<DeviceHandle> {
        self.state.send_modify(|state| {
            state.status = PrinterStatus::Connecting;
            state.error = None;
        });

        match self.open().await {
            Ok(printer) => {
                info!(device_id = %self.device_id, "Printer binding connected");
                self.state.send_modify(|state| {
                    state.status = PrinterStatus::Connected;
                    state.printer = Some(printer.clone());
                });
                Ok(printer)
            }
            Err(e) => {
                error!(device_id = %self.device_id, "Printer binding failed to connect: {}", e);
                // A session opened before device creation failed must not outlive the error
                self.manager.disconnect().await;
                self.state.send_modify(|state| {
                    state.status = PrinterStatus::Error;
                    state.error = Some(e.to_string());
                    state.printer = None;
                });
                Err(e)
            }
        }
    }

    async fn open(&mut self) -> Result<DeviceHandle> {
        self.manager.connect(None, None).await?;
        self.manager
            .create_printer(Some(&self.device_id), self.device_type.clone())
            .await
    }

    pub async fn disconnect(&mut self) {
        self.manager.disconnect().await;
        self.state.send_replace(BindingState::default());
    }

    /// End of the owning scope
    pub async fn shutdown(mut self) {
        self.manager.disconnect().await;
        self.torn_down = true;
        self.state.send_replace(BindingState::default());
    }
}

impl Drop for PrinterBinding {
    fn drop(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let teardown = self.manager.detach();
        if teardown.is_empty() {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(teardown.run());
            }
            Err(_) => {
                warn!("Printer binding dropped outside a runtime, session left to the SDK");
                drop(teardown);
            }
        }
    }
}
