use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Failure,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MqttNotification {
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: String,
}

impl MqttNotification {
    pub fn new(level: NotificationLevel, message: &str) -> Self {
        MqttNotification {
            level,
            message: message.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
