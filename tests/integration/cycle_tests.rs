//! Integration tests for a single seek → read → actuate → publish cycle.
//!
//! These run on the host (x86_64) against the mock adapters and check the
//! published payload and the ordering of hardware calls.

use crate::mock_hw::{HwCall, MockHardware, RecordingLink, RecordingSink, SimClock, SOIL_RAW_DRY};

use soilsense::app::events::AppEvent;
use soilsense::app::ports::AnalogChannel;
use soilsense::app::service::ScheduleLoop;
use soilsense::config::{AgentConfig, Variant};
use soilsense::control::SweepResult;
use soilsense::error::{ActuatorError, CommsError, Error, SensorError};

fn burst_loop() -> ScheduleLoop {
    ScheduleLoop::new(&AgentConfig {
        variant: Variant::Burst,
        ..AgentConfig::default()
    })
}

fn approx(v: &serde_json::Value, expected: f64) -> bool {
    v.as_f64().is_some_and(|x| (x - expected).abs() < 1e-4)
}

fn position(sink: &RecordingSink, pred: impl Fn(&AppEvent) -> bool) -> usize {
    sink.events.iter().position(pred).expect("event emitted")
}

// ── Payload ───────────────────────────────────────────────────

#[test]
fn record_at_threshold_is_published_without_pump() {
    let lp = burst_loop();
    let (mut hw, mut link, mut clock, mut sink) = (
        MockHardware::new(),
        RecordingLink::default(),
        SimClock::default(),
        RecordingSink::default(),
    );

    let record = lp
        .run_cycle(1, &mut hw, &mut link, &mut clock, &mut sink)
        .unwrap();

    assert!(!record.pump_engaged, "30 % is not below the 30 % threshold");
    assert_eq!(link.messages.len(), 1);
    assert_eq!(link.messages[0].0, "riego/inteligente");

    let json = link.json(0);
    assert_eq!(json["punto"], 1);
    assert!(approx(&json["lm35"], 100.71));
    assert!(approx(&json["dht_temp"], 24.0));
    assert!(approx(&json["dht_hum"], 55.0));
    assert!(approx(&json["luz"], 20.0));
    assert!(approx(&json["humedad_suelo"], 30.0));
    assert_eq!(json["bomba"], false);
    assert_eq!(json.as_object().unwrap().len(), 7);
}

#[test]
fn dry_soil_engages_pump_and_reports_it() {
    let lp = burst_loop();
    let mut hw = MockHardware {
        soil_raw: SOIL_RAW_DRY,
        ..MockHardware::new()
    };
    let (mut link, mut clock, mut sink) =
        (RecordingLink::default(), SimClock::default(), RecordingSink::default());

    lp.run_cycle(3, &mut hw, &mut link, &mut clock, &mut sink).unwrap();

    assert!(hw.pump_on());
    let json = link.json(0);
    assert_eq!(json["punto"], 3);
    assert!(approx(&json["humedad_suelo"], 0.0));
    assert_eq!(json["bomba"], true);
}

// ── Ordering ──────────────────────────────────────────────────

#[test]
fn read_precedes_pump_precedes_publish() {
    let lp = burst_loop();
    let (mut hw, mut link, mut clock, mut sink) = (
        MockHardware::new(),
        RecordingLink::default(),
        SimClock::default(),
        RecordingSink::default(),
    );

    lp.run_cycle(1, &mut hw, &mut link, &mut clock, &mut sink).unwrap();

    let read = position(&sink, |e| matches!(e, AppEvent::ReadingTaken { .. }));
    let pump = position(&sink, |e| matches!(e, AppEvent::PumpCommanded { .. }));
    let publish = position(&sink, |e| matches!(e, AppEvent::Published { .. }));
    assert!(read < pump && pump < publish);

    let soil = hw.position_of(HwCall::ReadAnalog(AnalogChannel::SoilMoisture)).unwrap();
    let relay = hw.position_of(HwCall::SetPump(false)).unwrap();
    assert!(soil < relay);
}

#[test]
fn burst_cycle_never_moves_servo() {
    let lp = burst_loop();
    let (mut hw, mut link, mut clock, mut sink) = (
        MockHardware::new(),
        RecordingLink::default(),
        SimClock::default(),
        RecordingSink::default(),
    );

    lp.run_cycle(1, &mut hw, &mut link, &mut clock, &mut sink).unwrap();

    assert!(hw.servo_moves().is_empty());
    assert!(clock.sleeps_ms.is_empty());
}

#[test]
fn follower_cycle_sweeps_before_reading() {
    let lp = ScheduleLoop::new(&AgentConfig::default());
    let mut hw = MockHardware {
        light_at: |angle| 60_000 - angle.abs_diff(90) * 300,
        ..MockHardware::new()
    };
    let (mut link, mut clock, mut sink) =
        (RecordingLink::default(), SimClock::default(), RecordingSink::default());

    lp.run_cycle(1, &mut hw, &mut link, &mut clock, &mut sink).unwrap();

    let moves = hw.servo_moves();
    assert_eq!(moves.len(), 14, "13 sweep positions plus the park");
    assert_eq!(moves.last(), Some(&90));
    assert!(sink.events.contains(&AppEvent::SweepCompleted(SweepResult {
        best_angle_deg: 90,
        best_light_raw: 60_000,
    })));

    let last_move = hw.calls.iter().rposition(|c| matches!(c, HwCall::SetServo(_))).unwrap();
    let first_temp = hw.position_of(HwCall::ReadAnalog(AnalogChannel::AmbientTemp)).unwrap();
    assert!(last_move < first_temp);

    // Reading is taken with the sensor parked at the peak.
    let json = link.json(0);
    assert!(approx(&json["luz"], 91.55));
}

// ── Failures ──────────────────────────────────────────────────

#[test]
fn climate_failure_aborts_before_actuation() {
    let lp = burst_loop();
    let mut hw = MockHardware {
        climate: Err(SensorError::ClimateTimeout),
        ..MockHardware::new()
    };
    let (mut link, mut clock, mut sink) =
        (RecordingLink::default(), SimClock::default(), RecordingSink::default());

    let err = lp
        .run_cycle(1, &mut hw, &mut link, &mut clock, &mut sink)
        .unwrap_err();

    assert_eq!(err, Error::Sensor(SensorError::ClimateTimeout));
    assert!(err.is_recoverable());
    assert!(!hw.calls.iter().any(|c| matches!(c, HwCall::SetPump(_))));
    assert!(link.messages.is_empty());
}

#[test]
fn relay_failure_skips_publish() {
    let lp = burst_loop();
    let mut hw = MockHardware {
        fail_pump: true,
        ..MockHardware::new()
    };
    let (mut link, mut clock, mut sink) =
        (RecordingLink::default(), SimClock::default(), RecordingSink::default());

    let err = lp
        .run_cycle(1, &mut hw, &mut link, &mut clock, &mut sink)
        .unwrap_err();

    assert_eq!(err, Error::Actuator(ActuatorError::GpioWriteFailed));
    assert!(link.messages.is_empty());
}

#[test]
fn publish_failure_still_commands_pump() {
    let lp = burst_loop();
    let mut hw = MockHardware {
        soil_raw: SOIL_RAW_DRY,
        ..MockHardware::new()
    };
    let mut link = RecordingLink {
        fail: true,
        ..RecordingLink::default()
    };
    let (mut clock, mut sink) = (SimClock::default(), RecordingSink::default());

    let err = lp
        .run_cycle(1, &mut hw, &mut link, &mut clock, &mut sink)
        .unwrap_err();

    assert_eq!(err, Error::Comms(CommsError::MqttPublishFailed));
    assert!(err.is_recoverable());
    assert!(hw.pump_on());
}
