//! MQTT-over-TLS telemetry link.
//!
//! Implements [`TelemetryPort`] on top of a broker session established once
//! at boot with mutual TLS (client certificate + key, pinned root CA).
//!
//! ```text
//!   connect():  X509 ×3 ──▶ EspMqttClient ──▶ wait CONNACK ──▶ MqttLink
//!   publish():  topic + JSON ──▶ QoS 0, no retain
//! ```
//!
//! On non-espidf targets the link records every publish in memory so the
//! schedule loop can be driven end-to-end from host tests.

use log::info;
#[cfg(target_os = "espidf")]
use log::{error, warn};

use crate::adapters::cert_store::CertBundle;
use crate::adapters::device_id::ClientIdString;
use crate::app::ports::TelemetryPort;
use crate::error::CommsError;

/// How long to wait for the broker's CONNACK before giving up.
pub const CONNACK_TIMEOUT_MS: u32 = 15_000;

/// Broker coordinates and session parameters.
#[derive(Debug, Clone)]
pub struct BrokerSettings {
    pub endpoint: heapless::String<128>,
    pub port: u16,
    pub client_id: ClientIdString,
    pub keepalive_secs: u16,
}

impl BrokerSettings {
    pub fn url(&self) -> String {
        format!("mqtts://{}:{}", self.endpoint, self.port)
    }
}

/// An established broker session.
pub struct MqttLink {
    #[cfg(target_os = "espidf")]
    client: esp_idf_svc::mqtt::client::EspMqttClient<'static>,
    #[cfg(not(target_os = "espidf"))]
    published: Vec<(String, Vec<u8>)>,
    #[cfg(not(target_os = "espidf"))]
    sim_fail_publish: bool,
}

impl MqttLink {
    /// Open the TLS session and block until the broker accepts it.
    #[cfg(target_os = "espidf")]
    pub fn connect(settings: &BrokerSettings, certs: CertBundle) -> Result<Self, CommsError> {
        use core::time::Duration;
        use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration};
        use esp_idf_svc::tls::X509;
        use std::sync::mpsc;

        // The MQTT task keeps pointers into these for the life of the session.
        let leak = |v: &[u8]| -> &'static [u8] { Box::leak(v.to_vec().into_boxed_slice()) };
        let conf = MqttClientConfiguration {
            client_id: Some(settings.client_id.as_str()),
            keep_alive_interval: Some(Duration::from_secs(u64::from(settings.keepalive_secs))),
            server_certificate: Some(X509::pem_until_nul(leak(&certs.root_ca))),
            client_certificate: Some(X509::pem_until_nul(leak(&certs.client_cert))),
            private_key: Some(X509::pem_until_nul(leak(&certs.private_key))),
            ..Default::default()
        };

        let url = settings.url();
        info!("MQTT: connecting to {} as '{}'", url, settings.client_id);
        let (client, mut conn) = EspMqttClient::new(&url, &conf).map_err(|e| {
            error!("MQTT: client init failed: {:?}", e);
            CommsError::BrokerConnectFailed
        })?;

        let (tx, rx) = mpsc::channel::<bool>();
        std::thread::Builder::new()
            .name("mqtt-rx".into())
            .stack_size(6 * 1024)
            .spawn(move || {
                while let Ok(event) = conn.next() {
                    match event.payload() {
                        EventPayload::Connected(_) => {
                            let _ = tx.send(true);
                        }
                        EventPayload::Disconnected => {
                            warn!("MQTT: broker session lost");
                            let _ = tx.send(false);
                        }
                        EventPayload::Error(e) => warn!("MQTT: {:?}", e),
                        _ => {}
                    }
                }
                info!("MQTT: connection closed");
            })
            .map_err(|_| CommsError::BrokerConnectFailed)?;

        match rx.recv_timeout(Duration::from_millis(u64::from(CONNACK_TIMEOUT_MS))) {
            Ok(true) => {
                info!("MQTT: session established");
                Ok(Self { client })
            }
            _ => {
                error!("MQTT: no CONNACK within {} ms", CONNACK_TIMEOUT_MS);
                Err(CommsError::BrokerConnectFailed)
            }
        }
    }

    /// Simulation: always connects; the certificate bundle is only checked
    /// for presence by the caller.
    #[cfg(not(target_os = "espidf"))]
    pub fn connect(settings: &BrokerSettings, _certs: CertBundle) -> Result<Self, CommsError> {
        info!("MQTT(sim): connected to {} as '{}'", settings.url(), settings.client_id);
        Ok(Self::sim())
    }

    /// Simulation: a session with no broker behind it.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim() -> Self {
        Self {
            published: Vec::new(),
            sim_fail_publish: false,
        }
    }

    /// Simulation: make every subsequent publish fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_publish_failure(&mut self, fail: bool) {
        self.sim_fail_publish = fail;
    }

    /// Simulation: everything published so far, in order.
    #[cfg(not(target_os = "espidf"))]
    pub fn published(&self) -> &[(String, Vec<u8>)] {
        &self.published
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::QoS;

        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .map(|_| ())
            .map_err(|e| {
                warn!("MQTT: publish to '{}' failed: {:?}", topic, e);
                CommsError::MqttPublishFailed
            })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        if self.sim_fail_publish {
            return Err(CommsError::MqttPublishFailed);
        }
        self.published.push((topic.to_owned(), payload.to_vec()));
        Ok(())
    }
}

impl TelemetryPort for MqttLink {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        self.platform_publish(topic, payload)
    }
}
