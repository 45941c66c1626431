//! Check-in label rendering and printing through the DYMO Connect web service.

pub mod config;
pub mod dispatcher;
pub mod dymo_client;
pub mod label;
pub mod mqtt_client;
