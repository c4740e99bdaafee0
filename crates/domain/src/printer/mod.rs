mod endpoint;
mod status;

pub use endpoint::{ConnectionOptions, DEFAULT_PORT, Endpoint, SdkLocation};
pub use status::PrinterStatus;
