//! ESP32 delay adapter.
//!
//! Implements [`DelayNs`] for the schedule loop's blocking sleeps.
//!
//! - **`target_os = "espidf"`**: `FreeRtos` task delay for millisecond
//!   sleeps (yields to the idle task), ROM busy-wait below a tick.
//! - **`not(target_os = "espidf")`**: `std::thread::sleep` for host-side
//!   simulation runs.

use embedded_hal::delay::DelayNs;

/// Blocking delay for the single control task.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDelay;

impl SystemDelay {
    pub fn new() -> Self {
        Self
    }
}

impl DelayNs for SystemDelay {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        // SAFETY: ROM busy-wait, no shared state.
        unsafe { esp_idf_svc::sys::esp_rom_delay_us(ns.div_ceil(1_000)) };
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        esp_idf_svc::hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sleep_blocks_at_least_requested_time() {
        let start = std::time::Instant::now();
        SystemDelay::new().delay_ms(5);
        assert!(start.elapsed() >= std::time::Duration::from_millis(5));
    }
}
