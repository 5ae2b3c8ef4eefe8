//! Application service: the hexagonal core.
//!
//! [`ScheduleLoop`] owns the fixed policies (aggregator, irrigation
//! threshold, light seeker, publisher) and the cycle counter.  All I/O
//! flows through port traits injected at call sites, making the entire
//! loop testable with mock adapters and a simulated clock.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │         ScheduleLoop          │
//! ActuatorPort ◀──│ Seek · Read · Actuate · Pub   │ ──▶ TelemetryPort
//!                 └──────────────┬───────────────┘
//!                                ▼
//!                             DelayNs
//! ```

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::AgentConfig;
use crate::control::{IrrigationController, LightSeeker};
use crate::error::Error;
use crate::scheduler::{CadencePolicy, CycleCounter, Phase};
use crate::sensors::SensorAggregator;

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, SensorPort, TelemetryPort};
use super::telemetry::{TelemetryPublisher, TelemetryRecord};

// ───────────────────────────────────────────────────────────────
// ScheduleLoop
// ───────────────────────────────────────────────────────────────

/// The outer control loop, shared by both operating variants.
pub struct ScheduleLoop {
    policy: CadencePolicy,
    counter: CycleCounter,
    aggregator: SensorAggregator,
    irrigation: IrrigationController,
    /// Present only when the policy asks for light seeking.
    seeker: Option<LightSeeker>,
    publisher: TelemetryPublisher,
    iterations: u64,
}

impl ScheduleLoop {
    /// Construct the loop from configuration.  The variant is fixed here.
    pub fn new(config: &AgentConfig) -> Self {
        let policy = CadencePolicy::from_config(config);
        let seeker = policy.seeks_light().then(|| {
            LightSeeker::new(
                config.sweep_step_deg,
                config.sweep_max_deg,
                config.sweep_settle_ms,
            )
        });

        Self {
            policy,
            counter: CycleCounter::new(policy.counter_max()),
            aggregator: SensorAggregator::new(),
            irrigation: IrrigationController::new(config.moisture_threshold_pct),
            seeker,
            publisher: TelemetryPublisher::new(config.topic.clone()),
            iterations: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the loop.  Call once, after connectivity is up.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        let variant = self.policy.variant();
        sink.emit(&AppEvent::Started(variant));
        info!(
            "ScheduleLoop started: {} ({} record(s)/iteration, pause {} ms)",
            variant,
            self.policy.records_per_iteration(),
            self.policy.pause_ms()
        );
    }

    /// Run iterations until the process is terminated.
    pub fn run_forever(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut impl TelemetryPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> ! {
        self.start(sink);
        loop {
            self.run_iteration(hw, link, delay, sink);
        }
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One pass of the cadence policy: N cycles, each followed by the
    /// inter-record spacing, then the iteration pause.
    ///
    /// The counter advances on every attempted cycle, so a skipped cycle
    /// still consumes its point index.
    pub fn run_iteration(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut impl TelemetryPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        self.iterations += 1;

        let mut last_point = self.counter.current();
        for _ in 0..self.policy.records_per_iteration() {
            let point = self.counter.current();
            last_point = point;
            if let Err(error) = self.run_cycle(point, hw, link, delay, sink) {
                // Only per-cycle failures can happen here; none end the loop.
                warn!("cycle {} skipped: {}", point, error);
                sink.emit(&AppEvent::CycleSkipped { point, error });
            }
            self.counter.advance();

            let spacing = self.policy.spacing_ms();
            if spacing > 0 {
                self.sleep(point, spacing, delay, sink);
            }
        }

        // The pause belongs to the last point handled, not the next one.
        let pause = self.policy.pause_ms();
        self.sleep(last_point, pause, delay, sink);
    }

    /// Seek (optional) → read → actuate → publish for one point.
    ///
    /// Sensor acquisition always precedes the pump decision, which always
    /// precedes the publish, so the record carries the command actually
    /// issued this cycle.
    pub fn run_cycle(
        &self,
        point: u8,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut impl TelemetryPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Result<TelemetryRecord, Error> {
        if let Some(seeker) = &self.seeker {
            sink.emit(&AppEvent::PhaseEntered {
                point,
                phase: Phase::Seek,
            });
            let sweep = seeker.sweep(hw, delay)?;
            sink.emit(&AppEvent::SweepCompleted(sweep));
        }

        sink.emit(&AppEvent::PhaseEntered {
            point,
            phase: Phase::Read,
        });
        let reading = self.aggregator.read(hw)?;
        sink.emit(&AppEvent::ReadingTaken { point, reading });

        sink.emit(&AppEvent::PhaseEntered {
            point,
            phase: Phase::Actuate,
        });
        let engaged = self.irrigation.apply(reading.soil_moisture_pct, hw)?;
        sink.emit(&AppEvent::PumpCommanded { point, engaged });

        sink.emit(&AppEvent::PhaseEntered {
            point,
            phase: Phase::Publish,
        });
        let record = TelemetryRecord {
            point,
            reading,
            pump_engaged: engaged,
        };
        let bytes = self.publisher.publish(&record, link)?;
        sink.emit(&AppEvent::Published { point, bytes });

        Ok(record)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn policy(&self) -> CadencePolicy {
        self.policy
    }

    /// Point index the next cycle will use.
    pub fn next_point(&self) -> u8 {
        self.counter.current()
    }

    /// Iterations started since construction.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    // ── Internal ──────────────────────────────────────────────

    fn sleep(&self, point: u8, ms: u32, delay: &mut impl DelayNs, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::PhaseEntered {
            point,
            phase: Phase::Sleep,
        });
        sink.emit(&AppEvent::Sleeping { ms });
        delay.delay_ms(ms);
    }
}
