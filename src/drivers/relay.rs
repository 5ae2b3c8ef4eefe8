//! Pump relay driver.
//!
//! A dumb actuator on one `OutputPin`.  Handles board polarity so callers
//! only ever say "engaged" or "not engaged".

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

pub struct RelayDriver<P: OutputPin> {
    pin: P,
    active_low: bool,
    engaged: bool,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Take the pin and drive the relay off.
    pub fn new(pin: P, active_low: bool) -> Result<Self, ActuatorError> {
        let mut relay = Self {
            pin,
            active_low,
            engaged: true,
        };
        relay.set(false)?;
        Ok(relay)
    }

    pub fn set(&mut self, engaged: bool) -> Result<(), ActuatorError> {
        let high = engaged != self.active_low;
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.engaged = engaged;
        Ok(())
    }

    /// Last successfully commanded state.
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}
