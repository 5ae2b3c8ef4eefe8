//! Integration tests for the ScheduleLoop cadence policies.
//!
//! Drive whole iterations against the mock adapters and a simulated clock,
//! then assert on point indices, sleep durations and skip behaviour.

use crate::mock_hw::{MockHardware, RecordingLink, RecordingSink, SimClock};

use soilsense::app::events::AppEvent;
use soilsense::app::ports::ClimateSample;
use soilsense::app::service::ScheduleLoop;
use soilsense::config::{AgentConfig, Variant};
use soilsense::error::{Error, SensorError};

struct Rig {
    lp: ScheduleLoop,
    hw: MockHardware,
    link: RecordingLink,
    clock: SimClock,
    sink: RecordingSink,
}

impl Rig {
    fn new(variant: Variant) -> Self {
        let mut rig = Self {
            lp: ScheduleLoop::new(&AgentConfig {
                variant,
                ..AgentConfig::default()
            }),
            hw: MockHardware::new(),
            link: RecordingLink::default(),
            clock: SimClock::default(),
            sink: RecordingSink::default(),
        };
        rig.lp.start(&mut rig.sink);
        rig
    }

    fn iterate(&mut self, n: usize) {
        for _ in 0..n {
            self.lp
                .run_iteration(&mut self.hw, &mut self.link, &mut self.clock, &mut self.sink);
        }
    }
}

// ── Follower ──────────────────────────────────────────────────

#[test]
fn start_announces_variant() {
    let rig = Rig::new(Variant::Follower);
    assert_eq!(rig.sink.events.first(), Some(&AppEvent::Started(Variant::Follower)));
}

#[test]
fn follower_counter_runs_1_to_24_then_wraps() {
    let mut rig = Rig::new(Variant::Follower);
    rig.iterate(26);

    let expected: Vec<u64> = (1..=24).chain(1..=2).collect();
    assert_eq!(rig.link.points(), expected);
    assert_eq!(rig.lp.next_point(), 3);
    assert_eq!(rig.lp.iterations(), 26);
}

#[test]
fn follower_sleeps_30s_after_each_record() {
    let mut rig = Rig::new(Variant::Follower);
    rig.iterate(3);

    assert_eq!(rig.sink.loop_sleeps(), vec![30_000; 3]);
    // 13 sweep settles of 200 ms per cycle on top of the interval.
    assert_eq!(rig.clock.total_ms(), 3 * (13 * 200 + 30_000));
}

#[test]
fn follower_sleep_phase_reports_completed_point() {
    let mut rig = Rig::new(Variant::Follower);
    rig.iterate(2);

    assert_eq!(rig.sink.sleep_points(), vec![1, 2]);
}

// ── Burst ─────────────────────────────────────────────────────

#[test]
fn burst_publishes_five_records_then_pauses() {
    let mut rig = Rig::new(Variant::Burst);
    rig.iterate(1);

    assert_eq!(rig.link.points(), vec![1, 2, 3, 4, 5]);
    assert_eq!(
        rig.sink.loop_sleeps(),
        vec![5_000, 5_000, 5_000, 5_000, 5_000, 180_000]
    );
    assert!(rig.hw.servo_moves().is_empty());
}

#[test]
fn burst_pause_reports_fifth_point() {
    let mut rig = Rig::new(Variant::Burst);
    rig.iterate(1);

    // Five spacing sleeps, then the long pause, all tagged with the
    // record they follow.
    assert_eq!(rig.sink.sleep_points(), vec![1, 2, 3, 4, 5, 5]);
    assert_eq!(rig.lp.next_point(), 1);
}

#[test]
fn burst_restarts_numbering_each_iteration() {
    let mut rig = Rig::new(Variant::Burst);
    rig.iterate(2);

    assert_eq!(rig.link.points(), vec![1, 2, 3, 4, 5, 1, 2, 3, 4, 5]);
    assert_eq!(rig.clock.total_ms(), 2 * (5 * 5_000 + 180_000));
}

// ── Recoverable failures ──────────────────────────────────────

#[test]
fn climate_failure_skips_cycle_but_loop_continues() {
    let mut rig = Rig::new(Variant::Follower);
    rig.hw.climate = Err(SensorError::ClimateChecksum);
    rig.iterate(1);

    rig.hw.climate = Ok(ClimateSample {
        temperature_c: 21.0,
        humidity_pct: 40.0,
    });
    rig.iterate(1);

    assert_eq!(rig.sink.skipped(), vec![1]);
    assert_eq!(rig.link.points(), vec![2], "skipped cycle still consumes its point");
    assert!(rig.sink.events.contains(&AppEvent::CycleSkipped {
        point: 1,
        error: Error::Sensor(SensorError::ClimateChecksum),
    }));
    // The skipped cycle still sleeps.
    assert_eq!(rig.sink.loop_sleeps(), vec![30_000, 30_000]);
}

#[test]
fn publish_outage_drops_records_without_retry() {
    let mut rig = Rig::new(Variant::Burst);
    rig.link.fail = true;
    rig.iterate(1);

    assert!(rig.link.messages.is_empty());
    assert_eq!(rig.sink.skipped(), vec![1, 2, 3, 4, 5]);

    rig.link.fail = false;
    rig.iterate(1);
    assert_eq!(rig.link.points(), vec![1, 2, 3, 4, 5]);
}
