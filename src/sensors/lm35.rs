//! LM35 linear temperature sensor (10 mV/°C, 0 V at 0 °C).
//!
//! The 16-bit sample is mapped onto the 3.3 V ADC reference.

use super::round2;

const V_REF: f64 = 3.3;
/// Datasheet slope: 10 mV per degree.
const DEG_PER_VOLT: f64 = 100.0;

/// Sample → volts at the pin.
pub fn raw_to_volts(raw: u16) -> f64 {
    raw as f64 / 65535.0 * V_REF
}

/// Sample → °C, two decimals.
pub fn celsius_from_raw(raw: u16) -> f64 {
    round2(raw_to_volts(raw) * DEG_PER_VOLT)
}
