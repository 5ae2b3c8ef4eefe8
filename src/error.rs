//! Unified error types for the SoilSense firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! schedule loop's error handling uniform.  All variants are `Copy` so they
//! can be carried inside [`AppEvent`](crate::app::events::AppEvent)s
//! without allocation.
//!
//! ## Fatal vs recoverable
//!
//! Connectivity and configuration failures only happen at startup and halt
//! the device.  Everything that can happen inside a cycle (sensor, actuator,
//! publish) is recoverable: the cycle's record is dropped and the loop
//! continues at the next scheduled tick.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// A communication subsystem failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or incomplete.
    Config(&'static str),
}

impl Error {
    /// Whether the schedule loop may drop the current cycle and carry on.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Sensor(_) | Self::Actuator(_) => true,
            Self::Comms(e) => e.is_recoverable(),
            Self::Init(_) | Self::Config(_) => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error.
    AdcReadFailed,
    /// DHT11 did not answer or a bit edge timed out.
    ClimateTimeout,
    /// DHT11 frame checksum mismatch.
    ClimateChecksum,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::ClimateTimeout => write!(f, "DHT11 timeout"),
            Self::ClimateChecksum => write!(f, "DHT11 checksum mismatch"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed (relay).
    GpioWriteFailed,
    /// PWM duty-cycle write failed (servo).
    PwmWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

impl embedded_hal::digital::Error for ActuatorError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl embedded_hal::pwm::Error for ActuatorError {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// Wi-Fi link not up after the retry budget.
    WifiConnectFailed,
    /// A TLS credential artifact is missing or malformed.
    CredentialsMissing,
    /// MQTT/TLS session could not be established.
    BrokerConnectFailed,
    /// The broker client rejected a publish.
    MqttPublishFailed,
    /// The telemetry record could not be encoded.
    EncodeFailed,
}

impl CommsError {
    /// Publish-path failures lose one record; link failures are fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MqttPublishFailed | Self::EncodeFailed)
    }
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WifiConnectFailed => write!(f, "WiFi connect failed"),
            Self::CredentialsMissing => write!(f, "TLS credentials missing or malformed"),
            Self::BrokerConnectFailed => write!(f, "MQTT broker connect failed"),
            Self::MqttPublishFailed => write!(f, "MQTT publish failed"),
            Self::EncodeFailed => write!(f, "telemetry encode failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
