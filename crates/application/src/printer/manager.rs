use std::sync::Arc;
use tracing::{debug, info, warn};

use domain::error::{PrinterError, Result};
use domain::printer::{ConnectionOptions, Endpoint, SdkLocation};
use domain::sdk::{
    ConnectOptions, DeviceHandle, DeviceOptions, DeviceSession, DeviceType, EposSdk, ResultCode,
};

use super::completion::bridge;
use super::script_registry::ScriptRegistry;

pub const DEFAULT_DEVICE_ID: &str = "local_printer";

/// Owns the single session / device pair for one printer endpoint.
///
/// All transitions are `&mut self`, so one manager never has two SDK calls
/// in flight on the same handle. `is_connected` and `disconnect` never fail.
pub struct PrinterConnectionManager {
    endpoint: Endpoint,
    sdk_location: SdkLocation,
    sdk_loaded: bool,
    scripts: Arc<ScriptRegistry>,
    sdk: Option<Arc<dyn EposSdk>>,
    session: Option<Box<dyn DeviceSession>>,
    printer: Option<DeviceHandle>,
}

impl PrinterConnectionManager {
    pub fn new(options: &ConnectionOptions, scripts: Arc<ScriptRegistry>) -> Result<Self> {
        let (sdk_location, endpoint) = options.validate()?;
        Ok(Self {
            endpoint,
            sdk_location,
            sdk_loaded: false,
            scripts,
            sdk: None,
            session: None,
            printer: None,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Takes effect on the next `connect`; an open session is left alone.
    pub fn set_endpoint(&mut self, host: impl Into<String>, port: Option<u16>) {
        self.endpoint.host = host.into();
        if let Some(port) = port {
            self.endpoint.port = port;
        }
    }

    pub fn sdk_location(&self) -> &SdkLocation {
        &self.sdk_location
    }

    /// Replaces the script URL and forces a reload on next use
    pub fn set_sdk_location(&mut self, url: impl Into<String>) {
        self.sdk_location = SdkLocation::new(url);
        self.sdk_loaded = false;
    }

    pub fn is_sdk_loaded(&self) -> bool {
        self.sdk_loaded
    }

    pub fn printer(&self) -> Option<DeviceHandle> {
        self.printer.clone()
    }

    pub async fn load_sdk(&mut self) -> Result<()> {
        if self.sdk_loaded || self.scripts.entry_point().is_some() {
            self.sdk_loaded = true;
            return Ok(());
        }

        self.scripts.load(&self.sdk_location.url).await?;
        self.sdk_loaded = true;
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        session.is_connected().unwrap_or_else(|fault| {
            debug!(%fault, "Session live-check raised, treating as disconnected");
            false
        })
    }

    /// Open a session. Overrides take precedence over the stored endpoint.
    pub async fn connect(&mut self, host: Option<&str>, port: Option<u16>) -> Result<()> {
        if self.is_connected() {
            debug!(host = %self.endpoint.host, "Already connected, reusing session");
            return Ok(());
        }

        if self.session.is_some() {
            warn!("Clearing stale printer session before reconnecting");
            self.disconnect().await;
        }

        self.load_sdk().await?;
        let sdk = self.scripts.entry_point().ok_or_else(|| PrinterError::SdkLoad {
            url: self.sdk_location.url.clone(),
            reason: "SDK entry point not present after load".to_string(),
        })?;

        let host = match host.filter(|h| !h.is_empty()) {
            Some(host) => host.to_owned(),
            None if !self.endpoint.host.is_empty() => self.endpoint.host.clone(),
            None => {
                return Err(PrinterError::Configuration(
                    "no host available".to_string(),
                ));
            }
        };
        let port = port.unwrap_or(self.endpoint.port);

        info!(%host, port, "Connecting to printer");
        let mut session = sdk.create_session();
        let (complete, completion) = bridge::<ResultCode>();
        session
            .connect(&host, port, ConnectOptions { print: true }, Box::new(complete))
            .map_err(|fault| PrinterError::ConnectionFailed(fault.to_string()))?;

        let code = completion.wait().await.ok_or_else(|| {
            PrinterError::ConnectionFailed("connect callback dropped".to_string())
        })?;

        if !code.is_connect_success() {
            warn!(%host, port, %code, "Printer rejected connection");
            return Err(PrinterError::ConnectionFailed(code.to_string()));
        }

        info!(%host, port, %code, "Printer session open");
        self.session = Some(session);
        self.sdk = Some(sdk);
        Ok(())
    }

    /// Create the device handle on the open session, or return the existing one.
    pub async fn create_printer(
        &mut self,
        device_id: Option<&str>,
        device_type: Option<DeviceType>,
    ) -> Result<DeviceHandle> {
        let Some(session) = self.session.as_mut() else {
            return Err(PrinterError::NotConnected);
        };

        if let Some(printer) = &self.printer {
            return Ok(printer.clone());
        }

        let device_id = device_id.unwrap_or(DEFAULT_DEVICE_ID);
        let device_type = device_type
            .or_else(|| session.default_device_type())
            .or_else(|| self.sdk.as_ref().map(|sdk| sdk.default_device_type()))
            .unwrap_or_else(DeviceType::printer);

        debug!(device_id, %device_type, "Creating printer device");
        let (complete, completion) = bridge::<(Option<DeviceHandle>, ResultCode)>();
        session
            .create_device(
                device_id,
                &device_type,
                DeviceOptions {
                    crypto: false,
                    buffer: false,
                },
                Box::new(move |device, code| complete((device, code))),
            )
            .map_err(|fault| PrinterError::DeviceCreationFailed(fault.to_string()))?;

        let (device, code) = completion.wait().await.ok_or_else(|| {
            PrinterError::DeviceCreationFailed("create device callback dropped".to_string())
        })?;

        match (device, code.is_ok()) {
            (Some(device), true) => {
                info!(device_id, "Printer device ready");
                self.printer = Some(device.clone());
                Ok(device)
            }
            (None, true) => Err(PrinterError::DeviceCreationFailed(
                "SDK reported OK without a device".to_string(),
            )),
            (_, false) => {
                warn!(device_id, %code, "Printer device creation failed");
                Err(PrinterError::DeviceCreationFailed(code.to_string()))
            }
        }
    }

    /// Tear down device and session. Always leaves the manager without handles.
    pub async fn disconnect(&mut self) {
        self.detach().run().await;
    }

    /// Move the handles out so the teardown can run elsewhere
    pub fn detach(&mut self) -> SessionTeardown {
        SessionTeardown {
            session: self.session.take(),
            printer: self.printer.take(),
        }
    }
}

/// Handles detached from a manager, pending teardown
#[must_use = "a detached session stays open until the teardown runs"]
pub struct SessionTeardown {
    session: Option<Box<dyn DeviceSession>>,
    printer: Option<DeviceHandle>,
}

impl SessionTeardown {
    pub fn is_empty(&self) -> bool {
        self.session.is_none()
    }

    /// Delete the device (waiting for its callback) strictly before closing
    /// the session. SDK faults are logged and swallowed.
    pub async fn run(self) {
        let Some(mut session) = self.session else {
            return;
        };

        if let Some(device) = self.printer {
            let (complete, completion) = bridge::<ResultCode>();
            match session.delete_device(&device, Box::new(complete)) {
                Ok(()) => match completion.wait().await {
                    Some(code) if code.is_ok() => {
                        debug!(device_id = device.device_id(), "Printer device deleted")
                    }
                    Some(code) => {
                        warn!(device_id = device.device_id(), %code, "Printer device deletion reported failure")
                    }
                    None => warn!(device_id = device.device_id(), "Delete device callback dropped"),
                },
                Err(fault) => {
                    warn!(device_id = device.device_id(), %fault, "Delete device raised, continuing teardown")
                }
            }
        }

        if let Err(fault) = session.disconnect() {
            warn!(%fault, "Session disconnect raised, continuing teardown");
        }
        info!("Printer session closed");
    }
}
