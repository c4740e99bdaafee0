//! Contract of the vendor printer SDK, as consumed by the connection manager

mod device_type;
mod result_code;
mod script_host;
mod session;

pub use device_type::DeviceType;
pub use result_code::ResultCode;
pub use script_host::{ScriptCallback, ScriptHost};
pub use session::{
    ConnectCallback, ConnectOptions, CreateDeviceCallback, DeleteDeviceCallback, DeviceHandle,
    DeviceOptions, DeviceSession, EposSdk, PrinterDevice,
};
