//! DHT11 temperature / humidity sensor (single-wire, open-drain).
//!
//! ```text
//!  host:  ▔▔▔╲______18 ms______╱▔▔ 30 µs ▔▔(release)
//!  dht:                               ╲_80 µs_╱▔80 µs▔╲ 40 bits ...
//!  bit:   ╲_50 µs_╱▔ 26-28 µs ▔╲  = 0      ╲_50 µs_╱▔▔▔ 70 µs ▔▔▔╲  = 1
//! ```
//!
//! Frame: `hum_int, hum_dec, temp_int, temp_dec, checksum` where the
//! checksum is the low byte of the sum of the first four.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs an open-drain [`PinDriver`] with busy-wait timing.
//! A frame corrupted by task preemption fails the checksum and the cycle is
//! skipped.
//! On host/test: returns values injected through static atomics.
//!
//! [`PinDriver`]: esp_idf_svc::hal::gpio::PinDriver

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicI16, AtomicU16, AtomicU8, Ordering};

use crate::app::ports::ClimateSample;
use crate::drivers::hw_init::HwInitError;
use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_X10: AtomicI16 = AtomicI16::new(245);
#[cfg(not(target_os = "espidf"))]
static SIM_HUM_X10: AtomicU16 = AtomicU16::new(550);
/// 0 = ok, 1 = timeout, 2 = checksum.
#[cfg(not(target_os = "espidf"))]
static SIM_FAULT: AtomicU8 = AtomicU8::new(0);

/// Simulation: the next reads return this sample and clear any fault.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(temperature_c: f64, humidity_pct: f64) {
    SIM_TEMP_X10.store((temperature_c * 10.0).round() as i16, Ordering::Relaxed);
    SIM_HUM_X10.store((humidity_pct * 10.0).round() as u16, Ordering::Relaxed);
    SIM_FAULT.store(0, Ordering::Relaxed);
}

/// Simulation: make the next reads fail with `fault` (`None` clears it).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_fault(fault: Option<SensorError>) {
    let code = match fault {
        None => 0,
        Some(SensorError::ClimateChecksum) => 2,
        Some(_) => 1,
    };
    SIM_FAULT.store(code, Ordering::Relaxed);
}

/// Validate and decode a raw 5-byte frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<ClimateSample, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ClimateChecksum);
    }

    let humidity_pct = f64::from(frame[0]) + f64::from(frame[1]) / 10.0;
    let magnitude = f64::from(frame[2]) + f64::from(frame[3] & 0x7F) / 10.0;
    // Bit 7 of the decimal byte flags sub-zero temperatures.
    let temperature_c = if frame[3] & 0x80 != 0 { -magnitude } else { magnitude };

    Ok(ClimateSample {
        temperature_c,
        humidity_pct,
    })
}

pub struct Dht11 {
    #[cfg(target_os = "espidf")]
    pin: esp_idf_svc::hal::gpio::PinDriver<
        'static,
        esp_idf_svc::hal::gpio::AnyIOPin,
        esp_idf_svc::hal::gpio::InputOutput,
    >,
}

impl Dht11 {
    /// Claim `gpio` as an open-drain line and release it high (idle).
    #[cfg(target_os = "espidf")]
    pub fn new(gpio: i32) -> Result<Self, HwInitError> {
        use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver};

        // SAFETY: `gpio` is the DHT11 data line from `pins`; no other driver
        // claims it.
        let mut pin = PinDriver::input_output_od(unsafe { AnyIOPin::new(gpio) })
            .map_err(|e| HwInitError::GpioConfigFailed(e.code()))?;
        pin.set_high()
            .map_err(|e| HwInitError::GpioConfigFailed(e.code()))?;
        Ok(Self { pin })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(_gpio: i32) -> Result<Self, HwInitError> {
        Ok(Self {})
    }

    /// One full transaction.  The sensor needs ≥1 s between reads.
    pub fn read(&mut self) -> Result<ClimateSample, SensorError> {
        self.platform_read()
    }

    #[cfg(target_os = "espidf")]
    fn platform_read(&mut self) -> Result<ClimateSample, SensorError> {
        use esp_idf_svc::hal::delay::FreeRtos;

        // Start signal: hold low ≥18 ms, then release.
        self.pin.set_low().map_err(|_| SensorError::ClimateTimeout)?;
        FreeRtos::delay_ms(20);
        self.pin.set_high().map_err(|_| SensorError::ClimateTimeout)?;

        // Sensor answers after 20-40 µs with 80 µs low, 80 µs high.
        self.wait_while(true, 100)?;
        self.wait_while(false, 100)?;
        self.wait_while(true, 100)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_while(false, 70)?;
            let high_us = self.wait_while(true, 100)?;
            if high_us > 40 {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        decode_frame(frame)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_read(&mut self) -> Result<ClimateSample, SensorError> {
        match SIM_FAULT.load(Ordering::Relaxed) {
            0 => Ok(ClimateSample {
                temperature_c: f64::from(SIM_TEMP_X10.load(Ordering::Relaxed)) / 10.0,
                humidity_pct: f64::from(SIM_HUM_X10.load(Ordering::Relaxed)) / 10.0,
            }),
            2 => Err(SensorError::ClimateChecksum),
            _ => Err(SensorError::ClimateTimeout),
        }
    }

    /// Spin while the line sits at `high`; return how long it stayed there.
    #[cfg(target_os = "espidf")]
    fn wait_while(&self, high: bool, timeout_us: i64) -> Result<i64, SensorError> {
        use esp_idf_svc::sys::esp_timer_get_time;

        // SAFETY: esp_timer_get_time is a plain counter read.
        let start = unsafe { esp_timer_get_time() };
        loop {
            let now = unsafe { esp_timer_get_time() };
            if self.pin.is_high() != high {
                return Ok(now - start);
            }
            if now - start > timeout_us {
                return Err(SensorError::ClimateTimeout);
            }
        }
    }
}
