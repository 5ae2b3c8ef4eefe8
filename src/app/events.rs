//! Outbound application events.
//!
//! The [`ScheduleLoop`](super::service::ScheduleLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder).

use crate::config::Variant;
use crate::control::light_seeker::SweepResult;
use crate::error::Error;
use crate::scheduler::Phase;
use crate::sensors::SensorReading;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The loop is about to run its first iteration.
    Started(Variant),

    /// A cycle stepped into `phase`.
    PhaseEntered { point: u8, phase: Phase },

    /// The light-seeking sweep finished and the servo was parked.
    SweepCompleted(SweepResult),

    /// A full sensor reading was taken.
    ReadingTaken { point: u8, reading: SensorReading },

    /// The pump relay was commanded.
    PumpCommanded { point: u8, engaged: bool },

    /// One telemetry record left the device.
    Published { point: u8, bytes: usize },

    /// The cycle was dropped; the loop carries on.
    CycleSkipped { point: u8, error: Error },

    /// The loop is about to block.
    Sleeping { ms: u32 },
}
