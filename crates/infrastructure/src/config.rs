use config::{Config, ConfigError, Environment, File};
use domain::printer::{ConnectionOptions, DEFAULT_PORT};
use domain::sdk::DeviceType;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "EPOS";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PrinterSettings {
    pub sdk_url: String,
    #[serde(alias = "ip")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_device_id")]
    pub device_id: String,
    #[serde(default)]
    pub device_type: Option<String>,
    /// Directory SDK script URLs resolve against
    #[serde(default = "default_script_root")]
    pub script_root: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_device_id() -> String {
    "local_printer".to_string()
}
fn default_script_root() -> String {
    ".".to_string()
}

impl PrinterSettings {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from(config_dir, &run_mode, ENV_PREFIX)
    }

    /// Same layering as `load` with the run mode and env prefix pinned
    pub fn load_from(
        config_dir: &str,
        run_mode: &str,
        env_prefix: &str,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("device_id", default_device_id())?
            // Shared defaults, e.g. config/default.toml
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Per-environment overrides
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. EPOS__HOST=10.0.0.5)
            .add_source(Environment::with_prefix(env_prefix).separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            sdk_url: self.sdk_url.clone(),
            host: self.host.clone(),
            port: Some(self.port),
        }
    }

    pub fn device_type(&self) -> Option<DeviceType> {
        self.device_type.as_deref().map(DeviceType::from)
    }
}
