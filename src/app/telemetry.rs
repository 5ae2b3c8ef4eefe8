//! Telemetry record and publisher.
//!
//! Wire format (one JSON object per message, field names fixed by the
//! dashboard that consumes them):
//!
//! ```text
//! {"punto":3,"lm35":24.17,"dht_temp":24.0,"dht_hum":55.0,"luz":61.2,"humedad_suelo":28.4,"bomba":true}
//! ```

use log::info;
use serde::Serialize;

use crate::error::CommsError;
use crate::sensors::SensorReading;

use super::ports::TelemetryPort;

/// One cycle's worth of state, as published.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    pub point: u8,
    pub reading: SensorReading,
    pub pump_engaged: bool,
}

#[derive(Serialize)]
struct WireRecord {
    punto: u8,
    lm35: f64,
    dht_temp: f64,
    dht_hum: f64,
    luz: f64,
    humedad_suelo: f64,
    bomba: bool,
}

impl From<&TelemetryRecord> for WireRecord {
    fn from(r: &TelemetryRecord) -> Self {
        Self {
            punto: r.point,
            lm35: r.reading.analog_temperature_c,
            dht_temp: r.reading.digital_temperature_c,
            dht_hum: r.reading.digital_humidity_pct,
            luz: r.reading.light_pct,
            humedad_suelo: r.reading.soil_moisture_pct,
            bomba: r.pump_engaged,
        }
    }
}

impl TelemetryRecord {
    /// Serialise to the JSON wire payload.
    pub fn encode(&self) -> Result<Vec<u8>, CommsError> {
        serde_json::to_vec(&WireRecord::from(self)).map_err(|_| CommsError::EncodeFailed)
    }
}

// ───────────────────────────────────────────────────────────────
// Publisher
// ───────────────────────────────────────────────────────────────

/// Turns records into exactly one publish each on a fixed topic.
#[derive(Debug, Clone)]
pub struct TelemetryPublisher {
    topic: heapless::String<64>,
}

impl TelemetryPublisher {
    pub fn new(topic: heapless::String<64>) -> Self {
        Self { topic }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Encode and publish `record`.  Returns the payload size on success.
    pub fn publish(
        &self,
        record: &TelemetryRecord,
        link: &mut impl TelemetryPort,
    ) -> Result<usize, CommsError> {
        let payload = record.encode()?;
        link.publish(&self.topic, &payload)?;
        info!(
            "published {} <- {}",
            self.topic,
            core::str::from_utf8(&payload).unwrap_or("<non-utf8>")
        );
        Ok(payload.len())
    }
}
