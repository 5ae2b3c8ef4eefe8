//! Cadence engine.
//!
//! Pure value objects that tell the [`ScheduleLoop`](crate::app::service::ScheduleLoop)
//! how many records one iteration produces and how long to sleep in between.
//! Both operating variants share the same loop body; only the policy differs.
//!
//! ```text
//!   follower:  ┌──────┐  ┌──────┐  ┌─────────┐  ┌─────────┐  ┌───────────┐
//!              │ SEEK │─▶│ READ │─▶│ ACTUATE │─▶│ PUBLISH │─▶│ SLEEP 30s │─┐
//!              └──────┘  └──────┘  └─────────┘  └─────────┘  └───────────┘ │
//!                 ▲                  point 1..24, wraps                    │
//!                 └────────────────────────────────────────────────────────┘
//!
//!   burst:     ┌──────┐  ┌─────────┐  ┌─────────┐  ┌──────────┐
//!              │ READ │─▶│ ACTUATE │─▶│ PUBLISH │─▶│ SLEEP 5s │─┐  x5 (point 1..5)
//!              └──────┘  └─────────┘  └─────────┘  └──────────┘ │
//!                 ▲                                 ┌───────────┴─┐
//!                 └─────────────────────────────────│ SLEEP 180s  │
//!                                                   └─────────────┘
//! ```

use core::fmt;

use crate::config::{AgentConfig, Variant};

// ═══════════════════════════════════════════════════════════════
//  Cadence policy
// ═══════════════════════════════════════════════════════════════

/// How one loop iteration is paced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CadencePolicy {
    /// One light-sought point per iteration, then `interval_ms`.
    Follower { interval_ms: u32, points: u8 },
    /// `records` points spaced `spacing_ms` apart, then `pause_ms`.
    Burst {
        records: u8,
        spacing_ms: u32,
        pause_ms: u32,
    },
}

impl CadencePolicy {
    pub fn from_config(config: &AgentConfig) -> Self {
        match config.variant {
            Variant::Follower => Self::Follower {
                interval_ms: config.follower_interval_ms,
                points: config.follower_points,
            },
            Variant::Burst => Self::Burst {
                records: config.burst_records,
                spacing_ms: config.burst_spacing_ms,
                pause_ms: config.burst_pause_ms,
            },
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Self::Follower { .. } => Variant::Follower,
            Self::Burst { .. } => Variant::Burst,
        }
    }

    /// Whether each cycle starts with a light-seeking sweep.
    pub fn seeks_light(&self) -> bool {
        matches!(self, Self::Follower { .. })
    }

    /// Cycles attempted per iteration.
    pub fn records_per_iteration(&self) -> u8 {
        match self {
            Self::Follower { .. } => 1,
            Self::Burst { records, .. } => *records,
        }
    }

    /// Sleep after every cycle within an iteration.
    pub fn spacing_ms(&self) -> u32 {
        match self {
            Self::Follower { .. } => 0,
            Self::Burst { spacing_ms, .. } => *spacing_ms,
        }
    }

    /// Sleep once the iteration's cycles are done.
    pub fn pause_ms(&self) -> u32 {
        match self {
            Self::Follower { interval_ms, .. } => *interval_ms,
            Self::Burst { pause_ms, .. } => *pause_ms,
        }
    }

    /// Upper bound of the point index before it wraps back to 1.
    pub fn counter_max(&self) -> u8 {
        match self {
            Self::Follower { points, .. } => *points,
            Self::Burst { records, .. } => *records,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Cycle counter
// ═══════════════════════════════════════════════════════════════

/// Point index that cycles `1..=max`.  Never yields 0 or `max + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleCounter {
    current: u8,
    max: u8,
}

impl CycleCounter {
    pub fn new(max: u8) -> Self {
        Self {
            current: 1,
            max: max.max(1),
        }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    /// Step to the next point and return it.
    pub fn advance(&mut self) -> u8 {
        self.current = if self.current >= self.max {
            1
        } else {
            self.current + 1
        };
        self.current
    }
}

// ═══════════════════════════════════════════════════════════════
//  Phases
// ═══════════════════════════════════════════════════════════════

/// Steps of a single cycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seek,
    Read,
    Actuate,
    Publish,
    Sleep,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Seek => "SEEK",
            Self::Read => "READ",
            Self::Actuate => "ACTUATE",
            Self::Publish => "PUBLISH",
            Self::Sleep => "SLEEP",
        };
        f.write_str(name)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_wraps_after_max() {
        let mut c = CycleCounter::new(24);
        assert_eq!(c.current(), 1);
        let mut seen = vec![c.current()];
        for _ in 0..24 {
            seen.push(c.advance());
        }
        assert_eq!(seen[23], 24);
        assert_eq!(seen[24], 1);
        assert!(seen.iter().all(|&p| (1..=24).contains(&p)));
    }

    #[test]
    fn counter_with_zero_max_stays_at_one() {
        let mut c = CycleCounter::new(0);
        assert_eq!(c.current(), 1);
        assert_eq!(c.advance(), 1);
    }

    #[test]
    fn follower_policy_from_defaults() {
        let policy = CadencePolicy::from_config(&AgentConfig::default());
        assert!(policy.seeks_light());
        assert_eq!(policy.records_per_iteration(), 1);
        assert_eq!(policy.spacing_ms(), 0);
        assert_eq!(policy.pause_ms(), 30_000);
        assert_eq!(policy.counter_max(), 24);
    }

    #[test]
    fn burst_policy_from_config() {
        let config = AgentConfig {
            variant: Variant::Burst,
            ..AgentConfig::default()
        };
        let policy = CadencePolicy::from_config(&config);
        assert!(!policy.seeks_light());
        assert_eq!(policy.variant(), Variant::Burst);
        assert_eq!(policy.records_per_iteration(), 5);
        assert_eq!(policy.spacing_ms(), 5_000);
        assert_eq!(policy.pause_ms(), 180_000);
        assert_eq!(policy.counter_max(), 5);
    }

    #[test]
    fn phase_names() {
        assert_eq!(format!("{}", Phase::Seek), "SEEK");
        assert_eq!(format!("{}", Phase::Publish), "PUBLISH");
    }
}
