//! SoilSense: Main Entry Point
//!
//! Hexagonal architecture with a single blocking control thread.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   MqttLink        SystemDelay  │
//! │  (Sensor+Actuator) (EventSink)    (Telemetry)     (DelayNs)    │
//! │  WifiAdapter       CertStore      device_id                    │
//! │  (Connectivity)    (NVS certs)    (client id)                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ScheduleLoop (pure logic)                 │    │
//! │  │  LightSeeker · SensorAggregator · Irrigation · Publish │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  CadencePolicy (follower | burst) · CycleCounter               │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Boot failures (config, peripherals, WiFi, certificates, broker) are
//! fatal: they are logged and the task parks forever.  Nothing after boot
//! ends the loop.
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Context, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info};

use soilsense::adapters::cert_store::CertStore;
use soilsense::adapters::device_id;
use soilsense::adapters::hardware::BoardHardware;
use soilsense::adapters::log_sink::LogEventSink;
use soilsense::adapters::mqtt::{BrokerSettings, MqttLink};
use soilsense::adapters::time::SystemDelay;
use soilsense::adapters::wifi::{ConnectivityPort, WifiAdapter};
use soilsense::app::service::ScheduleLoop;
use soilsense::config::{AgentConfig, NetworkConfig};
use soilsense::drivers::hw_init;
use soilsense::error::Error;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SoilSense v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    if let Err(e) = boot_and_run() {
        error!("Fatal: {:#}", e);
    }
    halt()
}

/// Bring every collaborator up in order, then hand control to the loop.
/// Only returns on a boot failure.
fn boot_and_run() -> Result<()> {
    // ── 2. Configuration ──────────────────────────────────────
    let config = AgentConfig::load()
        .map_err(Error::from)
        .context("agent config")?;
    let network = NetworkConfig::from_build_env()
        .map_err(Error::from)
        .context("network config")?;
    info!("Config: variant={} topic='{}' {:?}", config.variant, config.topic, network);

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()
        .map_err(Error::from)
        .context("peripheral init")?;
    let mut hw = BoardHardware::for_board(config.relay_active_low)
        .context("board wiring")?;

    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 4. WiFi (bounded retry budget) ────────────────────────
    let mut delay = SystemDelay::new();
    let mut wifi = WifiAdapter::new(peripherals.modem, sys_loop, nvs.clone()).map_err(Error::from)?;
    wifi.set_credentials(&network.wifi_ssid, &network.wifi_password)
        .map_err(Error::from)?;
    wifi.connect(
        config.wifi_connect_attempts,
        config.wifi_retry_interval_ms,
        &mut delay,
    )
    .map_err(Error::from)
    .context("wifi")?;

    // ── 5. Broker session ─────────────────────────────────────
    let certs = CertStore::new(nvs)
        .load_bundle()
        .map_err(Error::from)
        .context("certificate store")?;
    let settings = BrokerSettings {
        endpoint: network.broker_endpoint.clone(),
        port: config.mqtt_port,
        client_id: device_id::client_id(&device_id::read_mac()),
        keepalive_secs: config.mqtt_keepalive_secs,
    };
    let mut link = MqttLink::connect(&settings, certs)
        .map_err(Error::from)
        .context("broker session")?;

    // ── 6. Schedule loop ──────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut schedule = ScheduleLoop::new(&config);
    info!("System ready. Entering schedule loop.");
    schedule.run_forever(&mut hw, &mut link, &mut delay, &mut sink)
}

/// Park the control task.  The device stays up for the serial console but
/// does nothing further until it is power-cycled.
fn halt() -> ! {
    error!("Halted.");
    loop {
        FreeRtos::delay_ms(60_000);
    }
}
