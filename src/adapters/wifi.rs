//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the hexagonal boundary for the network
//! link the broker session rides on.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stub for host-side tests.
//!
//! ## Connection policy
//!
//! The station is started once and then polled for association, sleeping a
//! fixed interval after each failed poll.  When the attempt budget runs out the caller gets
//! [`ConnectivityError::ConnectionFailed`]; there is no reconnect once the
//! schedule loop is running.

use core::fmt;
use embedded_hal::delay::DelayNs;
use log::{error, info};

use crate::error::{CommsError, Error};

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        match e {
            ConnectivityError::NoCredentials => Error::Comms(CommsError::CredentialsMissing),
            ConnectivityError::InvalidSsid => Error::Config("WIFI_SSID"),
            ConnectivityError::InvalidPassword => Error::Config("WIFI_PASSWORD"),
            ConnectivityError::ConnectionFailed => Error::Comms(CommsError::WifiConnectFailed),
        }
    }
}

pub trait ConnectivityPort {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;

    /// Start the station and block until associated, polling up to
    /// `attempts` times `interval_ms` apart.  Returns the poll count.
    fn connect(
        &mut self,
        attempts: u8,
        interval_ms: u32,
        delay: &mut impl DelayNs,
    ) -> Result<u8, ConnectivityError>;

    fn is_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

/// Poll `link_up` until it reports the link up, sleeping `interval_ms`
/// after every failed poll.  The first poll happens immediately, so an
/// exhausted budget costs `attempts * interval_ms`.
pub fn wait_for_link(
    mut link_up: impl FnMut() -> bool,
    delay: &mut impl DelayNs,
    attempts: u8,
    interval_ms: u32,
) -> Result<u8, ConnectivityError> {
    for attempt in 1..=attempts.max(1) {
        if link_up() {
            return Ok(attempt);
        }
        info!("WiFi: waiting for association ({}/{})", attempt, attempts);
        delay.delay_ms(interval_ms);
    }
    Err(ConnectivityError::ConnectionFailed)
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    #[cfg(target_os = "espidf")]
    wifi: esp_idf_svc::wifi::EspWifi<'static>,
    /// Simulation: polls before the link comes up (`None` never comes up).
    #[cfg(not(target_os = "espidf"))]
    sim_polls_until_up: Option<u8>,
    #[cfg(not(target_os = "espidf"))]
    sim_polls: u8,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: esp_idf_svc::hal::modem::Modem,
        sys_loop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: esp_idf_svc::nvs::EspDefaultNvsPartition,
    ) -> Result<Self, ConnectivityError> {
        let wifi = esp_idf_svc::wifi::EspWifi::new(modem, sys_loop, Some(nvs)).map_err(|e| {
            error!("WiFi: driver init failed: {:?}", e);
            ConnectivityError::ConnectionFailed
        })?;
        Ok(Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            wifi,
        })
    }

    /// Simulation: the link comes up on the first poll.
    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self::with_sim_link(Some(1))
    }

    /// Simulation: the link comes up on poll `polls_until_up`, or never.
    #[cfg(not(target_os = "espidf"))]
    pub fn with_sim_link(polls_until_up: Option<u8>) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            sim_polls_until_up: polls_until_up,
            sim_polls: 0,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> Result<(), ConnectivityError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let conf = Configuration::Client(ClientConfiguration {
            ssid: self
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });

        let started = self
            .wifi
            .set_configuration(&conf)
            .and_then(|()| self.wifi.start())
            .and_then(|()| self.wifi.connect());
        started.map_err(|e| {
            error!("WiFi: station start failed: {:?}", e);
            ConnectivityError::ConnectionFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> Result<(), ConnectivityError> {
        self.sim_polls = 0;
        info!("WiFi(sim): station started for '{}'", self.ssid);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_poll(&mut self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_poll(&mut self) -> bool {
        self.sim_polls = self.sim_polls.saturating_add(1);
        self.sim_polls_until_up.is_some_and(|n| self.sim_polls >= n)
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password.push_str(password).map_err(|_| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials set (SSID='{}')", self.ssid);
        Ok(())
    }

    fn connect(
        &mut self,
        attempts: u8,
        interval_ms: u32,
        delay: &mut impl DelayNs,
    ) -> Result<u8, ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        self.state = WifiState::Connecting;

        let result = self
            .platform_start()
            .and_then(|()| wait_for_link(|| self.platform_poll(), delay, attempts, interval_ms));
        match result {
            Ok(polls) => {
                self.state = WifiState::Connected;
                info!("WiFi: connected after {} poll(s)", polls);
                Ok(polls)
            }
            Err(e) => {
                error!("WiFi: {} after {} attempt(s)", e, attempts);
                self.state = WifiState::Failed;
                Err(e)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
