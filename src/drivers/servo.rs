//! Hobby servo (SG90) carrying the light sensor.
//!
//! Position is encoded as a 50 Hz PWM pulse between 2.5 % and 12.5 % duty
//! (0.5 ms – 2.5 ms), linear in the angle.

use embedded_hal::pwm::SetDutyCycle;

use crate::error::ActuatorError;

const MIN_DUTY_PCT: f32 = 2.5;
const MAX_DUTY_PCT: f32 = 12.5;
pub const MAX_ANGLE_DEG: u16 = 180;

/// Angle → duty as a fraction of `u16::MAX`.  Angles above 180° are clamped.
pub fn angle_to_duty_u16(angle_deg: u16) -> u16 {
    let angle = angle_deg.min(MAX_ANGLE_DEG) as f32;
    let pct = MIN_DUTY_PCT + angle / MAX_ANGLE_DEG as f32 * (MAX_DUTY_PCT - MIN_DUTY_PCT);
    (pct / 100.0 * u16::MAX as f32).round() as u16
}

pub struct ServoDriver<P: SetDutyCycle> {
    pwm: P,
    angle: Option<u16>,
}

impl<P: SetDutyCycle> ServoDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, angle: None }
    }

    pub fn set_angle(&mut self, angle_deg: u16) -> Result<(), ActuatorError> {
        let angle = angle_deg.min(MAX_ANGLE_DEG);
        self.pwm
            .set_duty_cycle_fraction(angle_to_duty_u16(angle), u16::MAX)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.angle = Some(angle);
        Ok(())
    }

    /// Last commanded angle, `None` before the first move.
    pub fn angle(&self) -> Option<u16> {
        self.angle
    }
}
