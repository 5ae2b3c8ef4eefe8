//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the analog front-end, the DHT11, the pump relay and the servo,
//! exposing them through [`SensorPort`] and [`ActuatorPort`].  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::{ActuatorPort, AnalogChannel, ClimateSample, SensorPort};
use crate::drivers::adc::AnalogInputs;
use crate::drivers::dht11::Dht11;
use crate::drivers::hw_init::{self, GpioOutput, LedcChannel};
use crate::drivers::relay::RelayDriver;
use crate::drivers::servo::ServoDriver;
use crate::error::{ActuatorError, Error, SensorError};
use crate::pins;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<R: OutputPin, S: SetDutyCycle> {
    analog: AnalogInputs,
    climate: Dht11,
    relay: RelayDriver<R>,
    servo: ServoDriver<S>,
}

/// The board as wired: relay on a GPIO, servo on LEDC.
pub type BoardHardware = HardwareAdapter<GpioOutput, LedcChannel>;

impl<R: OutputPin, S: SetDutyCycle> HardwareAdapter<R, S> {
    pub fn new(
        analog: AnalogInputs,
        climate: Dht11,
        relay: RelayDriver<R>,
        servo: ServoDriver<S>,
    ) -> Self {
        Self {
            analog,
            climate,
            relay,
            servo,
        }
    }

    pub fn pump_engaged(&self) -> bool {
        self.relay.is_engaged()
    }

    pub fn servo_angle(&self) -> Option<u16> {
        self.servo.angle()
    }
}

impl BoardHardware {
    /// Wire the drivers to the pins in [`pins`].  Peripherals must already
    /// be configured by [`hw_init::init_peripherals`].  The relay starts off.
    pub fn for_board(relay_active_low: bool) -> Result<Self, Error> {
        let climate = Dht11::new(pins::DHT11_GPIO)?;
        let relay = RelayDriver::new(GpioOutput::new(pins::PUMP_RELAY_GPIO), relay_active_low)?;
        let servo = ServoDriver::new(LedcChannel::new(hw_init::LEDC_CH_SERVO));
        Ok(Self::new(
            AnalogInputs::new(),
            climate,
            relay,
            servo,
        ))
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<R: OutputPin, S: SetDutyCycle> SensorPort for HardwareAdapter<R, S> {
    fn read_analog(&mut self, channel: AnalogChannel) -> Result<u16, SensorError> {
        self.analog.read(channel)
    }

    fn measure_climate(&mut self) -> Result<ClimateSample, SensorError> {
        self.climate.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<R: OutputPin, S: SetDutyCycle> ActuatorPort for HardwareAdapter<R, S> {
    fn set_pump(&mut self, engaged: bool) -> Result<(), ActuatorError> {
        self.relay.set(engaged)
    }

    fn set_servo_angle(&mut self, angle_deg: u16) -> Result<(), ActuatorError> {
        self.servo.set_angle(angle_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_starts_with_pump_off() {
        let hw = BoardHardware::for_board(false).unwrap();
        assert!(!hw.pump_engaged());
        assert_eq!(hw.servo_angle(), None);
    }

    #[test]
    fn actuator_port_drives_relay_and_servo() {
        let mut hw = BoardHardware::for_board(true).unwrap();
        hw.set_pump(true).unwrap();
        hw.set_servo_angle(135).unwrap();
        assert!(hw.pump_engaged());
        assert_eq!(hw.servo_angle(), Some(135));
    }

    #[test]
    fn sensor_port_surfaces_climate_faults() {
        use crate::drivers::dht11;

        let mut hw = BoardHardware::for_board(false).unwrap();
        dht11::sim_set_climate(21.5, 40.0);
        let sample = hw.measure_climate().unwrap();
        assert_eq!(sample.temperature_c, 21.5);
        assert_eq!(sample.humidity_pct, 40.0);

        dht11::sim_set_fault(Some(SensorError::ClimateChecksum));
        assert_eq!(hw.measure_climate(), Err(SensorError::ClimateChecksum));
        dht11::sim_set_fault(Some(SensorError::ClimateTimeout));
        assert_eq!(hw.measure_climate(), Err(SensorError::ClimateTimeout));

        dht11::sim_set_fault(None);
        assert!(hw.measure_climate().is_ok());
    }
}
