//! FC-28 resistive soil-moisture probe.
//!
//! Wet soil conducts better and pulls the probe output down, so the
//! moisture percentage is the inverted sample.  The inversion is a fixed
//! property of the probe, not a tunable.

use super::round2;

/// Sample → soil moisture percentage (0–100), two decimals.
pub fn moisture_pct_from_raw(raw: u16) -> f64 {
    round2((1.0 - raw as f64 / 65535.0) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_probe_reads_zero() {
        assert_eq!(moisture_pct_from_raw(u16::MAX), 0.0);
    }

    #[test]
    fn shorted_probe_reads_full() {
        assert_eq!(moisture_pct_from_raw(0), 100.0);
    }

    #[test]
    fn seventy_percent_of_scale_is_thirty_percent_moisture() {
        assert_eq!(moisture_pct_from_raw(45_875), 30.0);
    }

    #[test]
    fn rounds_in_double_precision() {
        assert_eq!(moisture_pct_from_raw(888), 98.64);
    }

    #[test]
    fn wetter_is_lower_sample() {
        assert!(moisture_pct_from_raw(10_000) > moisture_pct_from_raw(50_000));
    }
}
