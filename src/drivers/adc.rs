//! Analog front-end: the three ADC1 inputs, widened to 16 bits.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from static atomics for injection.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

use crate::app::ports::AnalogChannel;
use crate::error::SensorError;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::pins;

static SIM_SOIL_ADC: AtomicU16 = AtomicU16::new(2048);
static SIM_LIGHT_ADC: AtomicU16 = AtomicU16::new(2048);
static SIM_LM35_ADC: AtomicU16 = AtomicU16::new(310); // ~25 °C

#[cfg_attr(target_os = "espidf", allow(dead_code))]
fn sim_slot(channel: AnalogChannel) -> &'static AtomicU16 {
    match channel {
        AnalogChannel::SoilMoisture => &SIM_SOIL_ADC,
        AnalogChannel::Light => &SIM_LIGHT_ADC,
        AnalogChannel::AmbientTemp => &SIM_LM35_ADC,
    }
}

/// Inject a 12-bit sample for the host build.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: AnalogChannel, raw_12bit: u16) {
    sim_slot(channel).store(raw_12bit, Ordering::Relaxed);
}

const ADC_MAX_12BIT: u16 = 4095;

/// Widen a 12-bit sample to the 16-bit domain by bit replication, so that
/// 0 → 0 and 4095 → 65535 exactly.
pub fn widen_12_to_16(raw: u16) -> u16 {
    let r = raw.min(ADC_MAX_12BIT);
    (r << 4) | (r >> 8)
}

/// ADC1 channel number for a logical input.
pub fn adc_channel(channel: AnalogChannel) -> u32 {
    match channel {
        AnalogChannel::SoilMoisture => pins::SOIL_ADC_CHANNEL,
        AnalogChannel::Light => pins::LIGHT_ADC_CHANNEL,
        AnalogChannel::AmbientTemp => pins::LM35_ADC_CHANNEL,
    }
}

#[derive(Debug, Default)]
pub struct AnalogInputs;

impl AnalogInputs {
    pub fn new() -> Self {
        Self
    }

    /// One sample in `0..=65535`.
    pub fn read(&mut self, channel: AnalogChannel) -> Result<u16, SensorError> {
        self.read_raw(channel).map(widen_12_to_16)
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self, channel: AnalogChannel) -> Result<u16, SensorError> {
        hw_init::adc1_read(adc_channel(channel)).map_err(|rc| {
            log::warn!("ADC1 CH{} read failed (rc={})", adc_channel(channel), rc);
            SensorError::AdcReadFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self, channel: AnalogChannel) -> Result<u16, SensorError> {
        Ok(sim_slot(channel).load(Ordering::Relaxed))
    }
}
