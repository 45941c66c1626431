use rumqttc::{tokio_rustls::rustls::ClientConfig, Client, ConnectionError, Event, MqttOptions, Outgoing, QoS};
use std::{sync::{atomic::{AtomicBool, Ordering}, Arc}, thread::{self, JoinHandle}, time::Duration};
use anyhow::Result;
use log::{debug, error, warn};

use crate::config::models::Mqtt;
use crate::dispatcher::Reporter;

use super::fun_with_tls::{get_system_certs, NoopServerCertVerifier};
use super::models::{MqttNotification, NotificationLevel};

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

pub struct MqttClient {
    client: Client,
    closing: Arc<AtomicBool>,
    connection_thread: Option<JoinHandle<()>>,
}

impl MqttClient {
    pub fn new(mqtt_settings: &Mqtt) -> Self {
        let mqtt_options = MqttOptions::new(mqtt_settings.client_id.to_owned(), mqtt_settings.host.to_owned(), mqtt_settings.port)
            .set_credentials(mqtt_settings.username.to_owned(), mqtt_settings.password.to_owned())
            .set_transport(match mqtt_settings.secure {
                true => {
                    let config: ClientConfig = match mqtt_settings.ignore_tls_errors {
                        // TLS without certificate verification.
                        true => ClientConfig::builder().dangerous().with_custom_certificate_verifier(Arc::new(NoopServerCertVerifier {})).with_no_client_auth(),
                        // TLS with certificate verification.
                        false => ClientConfig::builder().with_root_certificates(get_system_certs().clone()).with_no_client_auth(),
                    };
                    rumqttc::Transport::tls_with_config(rumqttc::TlsConfiguration::Rustls(Arc::new(config)))
                }
                // No TLS.
                false => rumqttc::Transport::tcp(),
            })
            .set_keep_alive(Duration::from_secs(10)).to_owned();

        let (client, mut connection) = Client::new(mqtt_options, 10);

        let closing = Arc::new(AtomicBool::new(false));
        let thread_closing = closing.clone();
        // Polling again after an error makes the event loop reconnect.
        let connection_thread = thread::spawn(move || {
            for notification in connection.iter() {
                match notification {
                    Ok(Event::Outgoing(Outgoing::Disconnect)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        if !should_reconnect(&e, thread_closing.load(Ordering::Acquire)) {
                            debug!("MQTT connection closed: {}", e);
                            break;
                        }
                        warn!("MQTT connection error: {}, reconnecting in {}", e, humantime::format_duration(RECONNECT_DELAY));
                        thread::sleep(RECONNECT_DELAY);
                    }
                }
            }
        });

        Self { client, closing, connection_thread: Some(connection_thread) }
    }

    pub fn publish(&self, topic: &str, payload: &[u8]) -> Result<()> {
        Ok(self.client.publish(topic, QoS::AtLeastOnce, false, payload)?)
    }

    /// Sends queued messages and closes the connection.
    pub fn shutdown(&mut self) {
        self.closing.store(true, Ordering::Release);
        if let Err(e) = self.client.disconnect() {
            debug!("MQTT disconnect failed: {}", e);
        }
        if let Some(handle) = self.connection_thread.take() {
            if handle.join().is_err() {
                error!("MQTT connection thread panicked");
            }
        }
    }
}

impl Drop for MqttClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Publishes check-in desk notifications to `{root_topic}/notifications`.
pub struct MqttReporter {
    client: MqttClient,
    topic: String,
}

impl MqttReporter {
    pub fn new(mqtt_settings: &Mqtt) -> Self {
        Self {
            client: MqttClient::new(mqtt_settings),
            topic: notification_topic(&mqtt_settings.root_topic),
        }
    }

    fn publish(&self, level: NotificationLevel, message: &str) {
        let payload = MqttNotification::new(level, message);
        let result = serde_json::to_vec(&payload)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| self.client.publish(&self.topic, &bytes));
        match result {
            Ok(()) => debug!("Published notification to {}", self.topic),
            Err(e) => warn!("Could not publish notification to {}: {:?}", self.topic, e),
        }
    }
}

impl Reporter for MqttReporter {
    fn report_success(&self, message: &str) {
        self.publish(NotificationLevel::Success, message);
    }

    fn report_failure(&self, message: &str) {
        self.publish(NotificationLevel::Failure, message);
    }
}

/// Whether the connection thread should keep polling after `error`.
fn should_reconnect(error: &ConnectionError, closing: bool) -> bool {
    !closing && !matches!(error, ConnectionError::RequestsDone)
}

pub fn notification_topic(root_topic: &str) -> String {
    format!("{}/notifications", root_topic.trim_end_matches('/'))
}
