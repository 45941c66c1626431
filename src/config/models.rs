use std::time::Duration;

use serde_derive::Deserialize;

// When changing anything here, make sure to add
// #[serde(alias = "ihavenounderscores")]
// where needed, so it can be read from the ENV vars.

#[derive(Debug, Clone, Deserialize)]
pub struct Dymo {
    pub uri: String,
    #[serde(alias = "ignoretlserrors")]
    pub ignore_tls_errors: bool,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    /// DYMO stock number, e.g. `30336`.
    pub size: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mqtt {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub secure: bool,
    #[serde(alias = "ignoretlserrors")]
    pub ignore_tls_errors: bool,
    pub username: String,
    pub password: String,
    #[serde(alias = "clientid")]
    pub client_id: String,
    #[serde(alias = "roottopic")]
    pub root_topic: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub dymo: Dymo,
    pub label: Label,
    pub mqtt: Mqtt,
    #[serde(alias = "sentrydsn")]
    pub sentry_dsn: Option<String>,
}
