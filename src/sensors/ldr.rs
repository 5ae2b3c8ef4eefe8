//! LDR light sensor.  Brighter light lowers the LDR's resistance, which
//! raises the divider voltage, so the percentage follows the sample directly.

use super::round2;

/// Sample → illumination percentage (0–100), two decimals.
pub fn light_pct_from_raw(raw: u16) -> f64 {
    round2(raw as f64 / 65535.0 * 100.0).clamp(0.0, 100.0)
}
