//! Light-seeking sweep.
//!
//! Steps the servo across `0..=max_deg`, lets it settle, samples the LDR
//! and remembers the brightest angle.  Ties go to the angle seen first.
//! The servo is parked at the winner before returning, so the next sensor
//! read measures the post-sweep illumination.
//!
//! ```text
//!   0°   15°   30°  ...  165°  180°
//!   │     │     │          │     │
//!   └─ move ─ settle 200 ms ─ sample ─┘  x13  ──▶  park at best
//! ```

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::ports::{ActuatorPort, AnalogChannel, SensorPort};
use crate::error::Error;

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepResult {
    pub best_angle_deg: u16,
    pub best_light_raw: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct LightSeeker {
    step_deg: u16,
    max_deg: u16,
    settle_ms: u32,
}

impl LightSeeker {
    pub fn new(step_deg: u16, max_deg: u16, settle_ms: u32) -> Self {
        Self {
            step_deg: step_deg.max(1),
            max_deg: max_deg.min(180),
            settle_ms,
        }
    }

    /// Angles visited, in order.
    pub fn angles(&self) -> impl Iterator<Item = u16> {
        (0..=self.max_deg).step_by(self.step_deg as usize)
    }

    /// Run the sweep and park the servo at the brightest angle.
    pub fn sweep(
        &self,
        hw: &mut (impl SensorPort + ActuatorPort),
        delay: &mut impl DelayNs,
    ) -> Result<SweepResult, Error> {
        let mut best = SweepResult {
            best_angle_deg: 0,
            best_light_raw: 0,
        };

        for angle in self.angles() {
            hw.set_servo_angle(angle)?;
            delay.delay_ms(self.settle_ms);
            let light = hw.read_analog(AnalogChannel::Light)?;
            debug!("sweep {}° -> {}", angle, light);
            if light > best.best_light_raw {
                best = SweepResult {
                    best_angle_deg: angle,
                    best_light_raw: light,
                };
            }
        }

        hw.set_servo_angle(best.best_angle_deg)?;
        Ok(best)
    }
}
