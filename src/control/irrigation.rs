//! Pump threshold policy.
//!
//! Engage the pump while the soil is strictly drier than the threshold.
//! There is no hysteresis band: a reading hovering at the threshold toggles
//! the relay every cycle.

use crate::app::ports::ActuatorPort;
use crate::error::ActuatorError;

/// `true` = engage the pump.
pub fn decide(soil_moisture_pct: f64, threshold_pct: f64) -> bool {
    soil_moisture_pct < threshold_pct
}

#[derive(Debug, Clone, Copy)]
pub struct IrrigationController {
    threshold_pct: f64,
}

impl IrrigationController {
    pub fn new(threshold_pct: f64) -> Self {
        Self { threshold_pct }
    }

    pub fn threshold_pct(&self) -> f64 {
        self.threshold_pct
    }

    pub fn decide(&self, soil_moisture_pct: f64) -> bool {
        decide(soil_moisture_pct, self.threshold_pct)
    }

    /// Decide and issue exactly one relay command reflecting the decision.
    pub fn apply(
        &self,
        soil_moisture_pct: f64,
        hw: &mut impl ActuatorPort,
    ) -> Result<bool, ActuatorError> {
        let engaged = self.decide(soil_moisture_pct);
        hw.set_pump(engaged)?;
        Ok(engaged)
    }
}
