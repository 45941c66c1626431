pub mod client;
mod fun_with_tls;
pub mod models;

pub use client::{MqttClient, MqttReporter};
