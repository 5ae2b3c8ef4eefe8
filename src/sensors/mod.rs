//! Sensor subsystem: per-sensor conversions and the [`SensorAggregator`].
//!
//! The aggregator pulls raw samples through the [`SensorPort`] and produces
//! one immutable [`SensorReading`] per cycle.

pub mod ldr;
pub mod lm35;
pub mod soil;

use crate::app::ports::{AnalogChannel, SensorPort};
use crate::error::SensorError;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Normalised physical readings for one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// LM35, two decimals.
    pub analog_temperature_c: f64,
    /// DHT11 temperature, as reported.
    pub digital_temperature_c: f64,
    /// DHT11 relative humidity, as reported.
    pub digital_humidity_pct: f64,
    /// Always within `0..=100`.
    pub light_pct: f64,
    /// Always within `0..=100`.
    pub soil_moisture_pct: f64,
}

/// Converts raw samples into a [`SensorReading`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SensorAggregator;

impl SensorAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Sample every input once.
    ///
    /// A failed DHT11 transaction aborts the whole reading; no partial
    /// reading is ever produced.
    pub fn read(&self, hw: &mut impl SensorPort) -> Result<SensorReading, SensorError> {
        let raw_temp = hw.read_analog(AnalogChannel::AmbientTemp)?;
        let climate = hw.measure_climate()?;
        let raw_light = hw.read_analog(AnalogChannel::Light)?;
        let raw_soil = hw.read_analog(AnalogChannel::SoilMoisture)?;

        Ok(SensorReading {
            analog_temperature_c: lm35::celsius_from_raw(raw_temp),
            digital_temperature_c: climate.temperature_c,
            digital_humidity_pct: climate.humidity_pct,
            light_pct: ldr::light_pct_from_raw(raw_light),
            soil_moisture_pct: soil::moisture_pct_from_raw(raw_soil),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::ClimateSample;

    struct FixedInputs {
        temp: u16,
        light: u16,
        soil: u16,
        climate: Result<ClimateSample, SensorError>,
        analog_reads: usize,
    }

    impl SensorPort for FixedInputs {
        fn read_analog(&mut self, channel: AnalogChannel) -> Result<u16, SensorError> {
            self.analog_reads += 1;
            Ok(match channel {
                AnalogChannel::AmbientTemp => self.temp,
                AnalogChannel::Light => self.light,
                AnalogChannel::SoilMoisture => self.soil,
            })
        }

        fn measure_climate(&mut self) -> Result<ClimateSample, SensorError> {
            self.climate
        }
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(-0.126), -0.13);
    }

    #[test]
    fn reading_combines_all_channels() {
        let mut hw = FixedInputs {
            temp: 20_000,
            light: 13_107,
            soil: 45_875,
            climate: Ok(ClimateSample {
                temperature_c: 24.5,
                humidity_pct: 55.0,
            }),
            analog_reads: 0,
        };
        let r = SensorAggregator::new().read(&mut hw).unwrap();
        assert!((r.analog_temperature_c - 100.71).abs() < 1e-4);
        assert_eq!(r.digital_temperature_c, 24.5);
        assert_eq!(r.digital_humidity_pct, 55.0);
        assert_eq!(r.light_pct, 20.0);
        assert_eq!(r.soil_moisture_pct, 30.0);
        assert_eq!(hw.analog_reads, 3);
    }

    #[test]
    fn climate_failure_aborts_the_reading() {
        let mut hw = FixedInputs {
            temp: 1,
            light: 1,
            soil: 1,
            climate: Err(SensorError::ClimateChecksum),
            analog_reads: 0,
        };
        assert_eq!(
            SensorAggregator::new().read(&mut hw),
            Err(SensorError::ClimateChecksum)
        );
        // Light and soil are never sampled once the DHT11 fails.
        assert_eq!(hw.analog_reads, 1);
    }
}
