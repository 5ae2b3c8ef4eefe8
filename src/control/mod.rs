//! Fixed-policy control: the irrigation threshold and the light-seeking sweep.
//!
//! Neither controller keeps state between cycles.

pub mod irrigation;
pub mod light_seeker;

pub use irrigation::IrrigationController;
pub use light_seeker::{LightSeeker, SweepResult};
