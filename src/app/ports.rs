//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ScheduleLoop (domain)
//! ```
//!
//! Driven adapters (ADC, DHT11, relay, servo, MQTT link, event sinks)
//! implement these traits.  The [`ScheduleLoop`](super::service::ScheduleLoop)
//! consumes them via generics, so the domain core never touches hardware or
//! the network directly.  Sleeping goes through
//! [`embedded_hal::delay::DelayNs`] for the same reason.

use crate::error::{ActuatorError, CommsError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The three analog inputs of the probe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    /// LM35 linear temperature sensor.
    AmbientTemp,
    /// LDR divider; rises with illumination.
    Light,
    /// Resistive soil probe; falls as the soil gets wetter.
    SoilMoisture,
}

/// Result of one DHT11 transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSample {
    pub temperature_c: f64,
    pub humidity_pct: f64,
}

/// Read-side port: the domain calls this to obtain raw sensor data.
pub trait SensorPort {
    /// One sample, normalised to the 16-bit range `0..=65535`.
    fn read_analog(&mut self, channel: AnalogChannel) -> Result<u16, SensorError>;

    /// One full temperature/humidity transaction.
    fn measure_climate(&mut self) -> Result<ClimateSample, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Drive the pump relay.
    fn set_pump(&mut self, engaged: bool) -> Result<(), ActuatorError>;

    /// Move the light-sensor servo to `angle_deg` (0–180).
    fn set_servo_angle(&mut self, angle_deg: u16) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: domain → broker)
// ───────────────────────────────────────────────────────────────

/// An already-established broker session.  Connecting is the adapter's job
/// and happens once, before the loop starts.
pub trait TelemetryPort {
    /// Publish one message.  No buffering, no retry.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
