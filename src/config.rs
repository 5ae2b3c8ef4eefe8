//! System configuration parameters
//!
//! Fixed-policy constants for the sense → decide → report loop.  They are
//! read once at startup (defaults, optionally overridden by a JSON blob
//! embedded at build time) and never change while the loop runs.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Build-time JSON override for [`AgentConfig`] (`SOILSENSE_CONFIG`).
pub const CONFIG_OVERRIDE: Option<&str> = option_env!("SOILSENSE_CONFIG");

/// Which of the two operating variants the loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Light-seeking sweep before every reading, one point per period.
    Follower,
    /// Bursts of records without the sweep, then a long pause.
    Burst,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Follower => write!(f, "follower"),
            Self::Burst => write!(f, "burst"),
        }
    }
}

/// Core agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Operating variant, selected at startup.
    pub variant: Variant,

    // --- Irrigation ---
    /// Soil moisture (%) strictly below which the pump is engaged.
    pub moisture_threshold_pct: f64,
    /// Relay board switches on a LOW level.
    pub relay_active_low: bool,

    // --- Light seeking ---
    /// Sweep increment in degrees.
    pub sweep_step_deg: u16,
    /// Last angle of the sweep (inclusive).
    pub sweep_max_deg: u16,
    /// Settle time after each servo move before sampling (ms).
    pub sweep_settle_ms: u32,

    // --- Follower cadence ---
    /// Pause between points (ms).
    pub follower_interval_ms: u32,
    /// Number of points before the counter wraps back to 1.
    pub follower_points: u8,

    // --- Burst cadence ---
    /// Records per burst.
    pub burst_records: u8,
    /// Spacing after each record within a burst (ms).
    pub burst_spacing_ms: u32,
    /// Pause after a burst (ms).
    pub burst_pause_ms: u32,

    // --- Connectivity ---
    /// MQTT topic for every record.
    pub topic: heapless::String<64>,
    /// Wi-Fi link polls before giving up.
    pub wifi_connect_attempts: u8,
    /// Delay between Wi-Fi link polls (ms).
    pub wifi_retry_interval_ms: u32,
    /// MQTT keep-alive (seconds).
    pub mqtt_keepalive_secs: u16,
    /// MQTT over TLS port.
    pub mqtt_port: u16,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let mut topic = heapless::String::new();
        let _ = topic.push_str("riego/inteligente");
        Self {
            variant: Variant::Follower,

            // Irrigation
            moisture_threshold_pct: 30.0,
            relay_active_low: false,

            // Light seeking
            sweep_step_deg: 15,
            sweep_max_deg: 180,
            sweep_settle_ms: 200,

            // Follower
            follower_interval_ms: 30_000,
            follower_points: 24,

            // Burst
            burst_records: 5,
            burst_spacing_ms: 5_000,
            burst_pause_ms: 180_000, // 3 min

            // Connectivity
            topic,
            wifi_connect_attempts: 10,
            wifi_retry_interval_ms: 1_000,
            mqtt_keepalive_secs: 60,
            mqtt_port: 8883,
        }
    }
}

impl AgentConfig {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the build-time override when one was embedded.
    pub fn load() -> Result<Self, ConfigError> {
        match CONFIG_OVERRIDE {
            Some(json) => Self::from_json(json),
            None => Ok(Self::default()),
        }
    }

    /// Reject out-of-range values instead of clamping them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.moisture_threshold_pct) {
            return Err(ConfigError::ValidationFailed("moisture_threshold_pct must be 0-100"));
        }
        if self.sweep_step_deg == 0 {
            return Err(ConfigError::ValidationFailed("sweep_step_deg must be > 0"));
        }
        if self.sweep_max_deg > 180 {
            return Err(ConfigError::ValidationFailed("sweep_max_deg must be <= 180"));
        }
        if self.follower_points == 0 {
            return Err(ConfigError::ValidationFailed("follower_points must be > 0"));
        }
        if self.burst_records == 0 {
            return Err(ConfigError::ValidationFailed("burst_records must be > 0"));
        }
        if self.topic.is_empty() || self.topic.contains(['#', '+']) {
            return Err(ConfigError::ValidationFailed("topic must be a non-empty literal topic"));
        }
        if self.wifi_connect_attempts == 0 {
            return Err(ConfigError::ValidationFailed("wifi_connect_attempts must be > 0"));
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Network credentials (build-time)
// ───────────────────────────────────────────────────────────────

/// Wi-Fi credentials and broker endpoint, baked in at build time.
#[derive(Clone)]
pub struct NetworkConfig {
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,
    pub broker_endpoint: heapless::String<128>,
}

impl fmt::Debug for NetworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("wifi_ssid", &self.wifi_ssid)
            .field("wifi_password", &"<redacted>")
            .field("broker_endpoint", &self.broker_endpoint)
            .finish()
    }
}

impl NetworkConfig {
    pub fn new(
        ssid: Option<&str>,
        password: Option<&str>,
        endpoint: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let ssid = ssid.ok_or(ConfigError::Missing("WIFI_SSID"))?;
        let password = password.unwrap_or("");
        let endpoint = endpoint
            .filter(|e| !e.is_empty())
            .ok_or(ConfigError::Missing("IOT_CORE_ENDPOINT"))?;

        let mut config = Self {
            wifi_ssid: heapless::String::new(),
            wifi_password: heapless::String::new(),
            broker_endpoint: heapless::String::new(),
        };
        config
            .wifi_ssid
            .push_str(ssid)
            .map_err(|_| ConfigError::ValidationFailed("WIFI_SSID longer than 32 bytes"))?;
        config
            .wifi_password
            .push_str(password)
            .map_err(|_| ConfigError::ValidationFailed("WIFI_PASS longer than 64 bytes"))?;
        config
            .broker_endpoint
            .push_str(endpoint)
            .map_err(|_| ConfigError::ValidationFailed("IOT_CORE_ENDPOINT longer than 128 bytes"))?;
        Ok(config)
    }

    /// Read `WIFI_SSID`, `WIFI_PASS` and `IOT_CORE_ENDPOINT` from the build env.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::new(
            option_env!("WIFI_SSID"),
            option_env!("WIFI_PASS"),
            option_env!("IOT_CORE_ENDPOINT"),
        )
    }
}

// ───────────────────────────────────────────────────────────────
// Error type
// ───────────────────────────────────────────────────────────────

/// Errors from loading or validating configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A required build-time value is absent.
    Missing(&'static str),
    /// The embedded override is not valid JSON for this struct.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "missing build-time value {}", name),
            Self::Corrupted => write!(f, "config override is not valid JSON"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Missing(name) => Self::Config(name),
            ConfigError::Corrupted => Self::Config("override not valid JSON"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}
