use std::fmt;
use std::sync::Arc;

use super::{DeviceType, ResultCode};
use crate::error::SdkFault;

/// Fired once when a session connect attempt completes
pub type ConnectCallback = Box<dyn FnOnce(ResultCode) + Send>;

/// Fired once with the created device (if any) and the result code
pub type CreateDeviceCallback = Box<dyn FnOnce(Option<DeviceHandle>, ResultCode) + Send>;

/// Fired once when a device deletion completes
pub type DeleteDeviceCallback = Box<dyn FnOnce(ResultCode) + Send>;

/// Capabilities requested when opening a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    pub print: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self { print: true }
    }
}

/// Options passed to the create-device primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceOptions {
    pub crypto: bool,
    pub buffer: bool,
}

/// Logical printer device living on an open session
pub trait PrinterDevice: Send + Sync + fmt::Debug {
    fn device_id(&self) -> &str;

    fn device_type(&self) -> &DeviceType;
}

pub type DeviceHandle = Arc<dyn PrinterDevice>;

/// Device-session object of the vendor SDK.
///
/// Every asynchronous primitive takes a single completion callback. An `Err`
/// return means the primitive raised synchronously and the callback will not
/// fire.
pub trait DeviceSession: Send + Sync {
    fn connect(
        &mut self,
        host: &str,
        port: u16,
        options: ConnectOptions,
        callback: ConnectCallback,
    ) -> Result<(), SdkFault>;

    fn create_device(
        &mut self,
        device_id: &str,
        device_type: &DeviceType,
        options: DeviceOptions,
        callback: CreateDeviceCallback,
    ) -> Result<(), SdkFault>;

    fn delete_device(
        &mut self,
        device: &DeviceHandle,
        callback: DeleteDeviceCallback,
    ) -> Result<(), SdkFault>;

    fn disconnect(&mut self) -> Result<(), SdkFault>;

    /// Live-check of the underlying connection
    fn is_connected(&self) -> Result<bool, SdkFault>;

    /// Session-level default used when no device type is requested
    fn default_device_type(&self) -> Option<DeviceType> {
        None
    }
}

/// Global entry point the SDK script installs once loaded
pub trait EposSdk: Send + Sync {
    fn create_session(&self) -> Box<dyn DeviceSession>;

    fn default_device_type(&self) -> DeviceType;
}
