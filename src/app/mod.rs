//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the sense → decide → report loop of the SoilSense
//! probe: the cadence-driven [`service::ScheduleLoop`], the telemetry record
//! and its publisher, and the outbound events.  All interaction with
//! hardware and the broker happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod telemetry;
