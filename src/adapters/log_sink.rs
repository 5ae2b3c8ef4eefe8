//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(variant) => {
                info!("START | variant={}", variant);
            }
            AppEvent::PhaseEntered { point, phase } => {
                debug!("PHASE | point={} {}", point, phase);
            }
            AppEvent::SweepCompleted(sweep) => {
                info!(
                    "SWEEP | best_angle={}\u{00b0} light_raw={}",
                    sweep.best_angle_deg, sweep.best_light_raw
                );
            }
            AppEvent::ReadingTaken { point, reading } => {
                info!(
                    "READ  | point={} | lm35={:.2}\u{00b0}C | dht={:.1}\u{00b0}C/{:.1}% | \
                     light={:.2}% | soil={:.2}%",
                    point,
                    reading.analog_temperature_c,
                    reading.digital_temperature_c,
                    reading.digital_humidity_pct,
                    reading.light_pct,
                    reading.soil_moisture_pct,
                );
            }
            AppEvent::PumpCommanded { point, engaged } => {
                info!("PUMP  | point={} {}", point, if *engaged { "ON" } else { "OFF" });
            }
            AppEvent::Published { point, bytes } => {
                info!("PUBLISH | point={} {}B", point, bytes);
            }
            AppEvent::CycleSkipped { point, error } => {
                warn!("SKIP  | point={} | {}", point, error);
            }
            AppEvent::Sleeping { ms } => {
                info!("SLEEP | {} ms", ms);
            }
        }
    }
}
