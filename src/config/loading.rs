use config::{Config, ConfigError, Environment, File};
use log::debug;

use super::models::Settings;

/// Base name of the optional settings file (`label2dymo.toml`, `.yaml`, `.json`, ...).
pub const CONFIG_FILE_NAME: &str = "label2dymo";

pub fn load_config() -> Result<Settings, ConfigError> {
    // As Rust has no native support for .env files,
    // we use the dotenv_flow crate to import to actual ENV vars.
    if let Ok(dotenv_path) = dotenv_flow::dotenv_flow() {
        debug!("Loaded dotenv file: {:?}", dotenv_path);
    }

    build_config(Environment::default()
        .prefix("L2D")
        .separator("_")
        .prefix_separator("_")
        .try_parsing(true))
}

fn build_config(environment: Environment) -> Result<Settings, ConfigError> {
    Config::builder()
        .set_default("dymo.uri", "https://127.0.0.1:41951/DYMO/DLS/Printing/")?
        .set_default("dymo.ignoretlserrors", "true")?
        .set_default("dymo.timeout", "10s")?
        .set_default("label.size", "30336")?
        .set_default("mqtt.enabled", "false")?
        .set_default("mqtt.host", "localhost")?
        .set_default("mqtt.port", "1883")?
        .set_default("mqtt.secure", "false")?
        .set_default("mqtt.ignoretlserrors", "false")?
        .set_default("mqtt.username", "")?
        .set_default("mqtt.password", "")?
        .set_default("mqtt.clientid", "label2dymo")?
        .set_default("mqtt.roottopic", "label2dymo")?
        .set_default("sentrydsn", "")?
        .add_source(File::with_name(CONFIG_FILE_NAME).required(false))
        .add_source(environment)
        .build()?
        .try_deserialize()
}
