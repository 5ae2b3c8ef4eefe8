//! GPIO / peripheral pin assignments for the SoilSense probe board.
//!
//! Single source of truth.  Every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Analog inputs (ADC1, 12 dB attenuation)
// ---------------------------------------------------------------------------

/// FC-28 resistive soil probe.  GPIO 4 = ADC1 channel 3 on ESP32-S3.
pub const SOIL_ADC_GPIO: i32 = 4;
pub const SOIL_ADC_CHANNEL: u32 = 3;

/// LDR voltage divider (more light => higher voltage).  GPIO 5 = ADC1 ch 4.
pub const LIGHT_ADC_GPIO: i32 = 5;
pub const LIGHT_ADC_CHANNEL: u32 = 4;

/// LM35 linear temperature sensor (10 mV/°C).  GPIO 6 = ADC1 ch 5.
pub const LM35_ADC_GPIO: i32 = 6;
pub const LM35_ADC_CHANNEL: u32 = 5;

/// ADC attenuation for all channels (12 dB → 0 – 3.3 V range).
pub const ADC_ATTEN: u32 = 3; // ADC_ATTEN_DB_12

// ---------------------------------------------------------------------------
// Digital sensors
// ---------------------------------------------------------------------------

/// DHT11 single-wire data line (open-drain, external pull-up).
pub const DHT11_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Pump relay coil driver.
pub const PUMP_RELAY_GPIO: i32 = 14;

/// SG90 servo carrying the light sensor (follower variant only).
pub const SERVO_PWM_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Hobby servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC timer resolution (bits).  14-bit gives ~1.2 µs steps at 50 Hz.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
