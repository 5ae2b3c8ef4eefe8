//! Mock adapters for integration tests.
//!
//! Records every hardware call, publish and sleep so tests can assert on the
//! full history without touching real ADC/GPIO/LEDC registers or a broker.

use embedded_hal::delay::DelayNs;
use soilsense::app::events::AppEvent;
use soilsense::app::ports::{
    ActuatorPort, AnalogChannel, ClimateSample, EventSink, SensorPort, TelemetryPort,
};
use soilsense::error::{ActuatorError, CommsError, SensorError};
use soilsense::scheduler::Phase;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HwCall {
    ReadAnalog(AnalogChannel),
    MeasureClimate,
    SetPump(bool),
    SetServo(u16),
}

// ── MockHardware ──────────────────────────────────────────────

/// Raw values are already on the 16-bit scale.
pub struct MockHardware {
    pub lm35_raw: u16,
    pub soil_raw: u16,
    /// Light seen by the LDR at a given servo angle.
    pub light_at: fn(u16) -> u16,
    pub climate: Result<ClimateSample, SensorError>,
    pub fail_pump: bool,
    pub calls: Vec<HwCall>,
    pub servo_angle: u16,
}

/// 20000 → 100.71 °C, 13107 → 20 % light, 45875 → 30 % moisture.
pub const LM35_RAW: u16 = 20_000;
pub const LIGHT_RAW: u16 = 13_107;
pub const SOIL_RAW_AT_THRESHOLD: u16 = 45_875;
/// 65535 → 0 % moisture.
pub const SOIL_RAW_DRY: u16 = 65_535;

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            lm35_raw: LM35_RAW,
            soil_raw: SOIL_RAW_AT_THRESHOLD,
            light_at: |_| LIGHT_RAW,
            climate: Ok(ClimateSample {
                temperature_c: 24.0,
                humidity_pct: 55.0,
            }),
            fail_pump: false,
            calls: Vec::new(),
            servo_angle: 0,
        }
    }

    pub fn pump_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::SetPump(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn servo_moves(&self) -> Vec<u16> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::SetServo(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    pub fn position_of(&self, call: HwCall) -> Option<usize> {
        self.calls.iter().position(|c| *c == call)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_analog(&mut self, channel: AnalogChannel) -> Result<u16, SensorError> {
        self.calls.push(HwCall::ReadAnalog(channel));
        Ok(match channel {
            AnalogChannel::AmbientTemp => self.lm35_raw,
            AnalogChannel::Light => (self.light_at)(self.servo_angle),
            AnalogChannel::SoilMoisture => self.soil_raw,
        })
    }

    fn measure_climate(&mut self) -> Result<ClimateSample, SensorError> {
        self.calls.push(HwCall::MeasureClimate);
        self.climate
    }
}

impl ActuatorPort for MockHardware {
    fn set_pump(&mut self, engaged: bool) -> Result<(), ActuatorError> {
        if self.fail_pump {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.calls.push(HwCall::SetPump(engaged));
        Ok(())
    }

    fn set_servo_angle(&mut self, angle_deg: u16) -> Result<(), ActuatorError> {
        self.calls.push(HwCall::SetServo(angle_deg));
        self.servo_angle = angle_deg;
        Ok(())
    }
}

// ── RecordingLink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingLink {
    pub messages: Vec<(String, Vec<u8>)>,
    pub fail: bool,
}

#[allow(dead_code)]
impl RecordingLink {
    pub fn json(&self, i: usize) -> serde_json::Value {
        serde_json::from_slice(&self.messages[i].1).expect("payload is JSON")
    }

    pub fn points(&self) -> Vec<u64> {
        (0..self.messages.len())
            .map(|i| self.json(i)["punto"].as_u64().expect("punto"))
            .collect()
    }
}

impl TelemetryPort for RecordingLink {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        if self.fail {
            return Err(CommsError::MqttPublishFailed);
        }
        self.messages.push((topic.to_owned(), payload.to_vec()));
        Ok(())
    }
}

// ── SimClock ──────────────────────────────────────────────────

/// Records every sleep instead of blocking.
#[derive(Default)]
pub struct SimClock {
    pub sleeps_ms: Vec<u32>,
}

#[allow(dead_code)]
impl SimClock {
    pub fn total_ms(&self) -> u64 {
        self.sleeps_ms.iter().map(|&ms| u64::from(ms)).sum()
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.sleeps_ms.push(ms);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn skipped(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::CycleSkipped { point, .. } => Some(*point),
                _ => None,
            })
            .collect()
    }

    /// Point carried by each `Phase::Sleep` entry, in order.
    pub fn sleep_points(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PhaseEntered {
                    point,
                    phase: Phase::Sleep,
                } => Some(*point),
                _ => None,
            })
            .collect()
    }

    pub fn loop_sleeps(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Sleeping { ms } => Some(*ms),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
