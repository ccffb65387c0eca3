//! A retry/circuit-breaker controller built on the engine.
//!
//! The engine supplies only the state graph and trigger dispatch; the
//! breaker's counters, the simulated protected operation, and the deferred
//! firing all live in the application. Handlers enqueue follow-up triggers
//! into the context and the main loop drains the queue, which keeps every
//! `fire` call on one thread.
//!
//! Run with: `cargo run --example circuit_breaker`

use std::collections::VecDeque;
use std::thread;
use std::time::Duration;
use tracing::info;
use trellis::{state_enum, trigger_enum, State, StateMachine};

state_enum! {
    enum Breaker {
        Closed,
        Open,
        HalfOpen,
    }
}

trigger_enum! {
    enum Event {
        SuccessThresholdReached,
        FailureThresholdReached,
        TimeoutTimerExpired,
        OperationFailed,
        Try,
    }
}

const SUCCESS_THRESHOLD: u32 = 2;
const FAILURE_THRESHOLD: u32 = 2;
const OPEN_INTERVAL: Duration = Duration::from_millis(500);
const RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Default)]
struct App {
    successes: u32,
    failures: u32,
    ops_attempted: u32,
    pending: VecDeque<(Event, Duration)>,
}

impl App {
    /// The protected operation: every third call fails.
    fn attempt(&mut self) -> bool {
        self.ops_attempted += 1;
        let ok = self.ops_attempted % 3 != 0;
        if ok {
            info!(op = self.ops_attempted, "operation succeeded");
        } else {
            info!(op = self.ops_attempted, "operation failed");
        }
        ok
    }

    fn fire_later(&mut self, event: Event, delay: Duration) {
        self.pending.push_back((event, delay));
    }

    /// Probe the operation while half-open, counting successes.
    fn probe(&mut self) {
        if self.attempt() {
            self.successes += 1;
            if self.successes >= SUCCESS_THRESHOLD {
                self.fire_later(Event::SuccessThresholdReached, Duration::ZERO);
            } else {
                self.fire_later(Event::Try, RETRY_DELAY);
            }
        } else {
            self.fire_later(Event::OperationFailed, Duration::ZERO);
        }
    }
}

fn build_machine() -> StateMachine<Breaker, Event, App> {
    let mut sm = StateMachine::new(Breaker::Closed);

    sm.configure(Breaker::Closed)
        .permit(Event::FailureThresholdReached, Breaker::Open)
        .expect("closed transitions")
        .permit_reentry(Event::Try)
        .expect("closed reentry")
        .on_entry_from(Event::SuccessThresholdReached, |app: &mut App, _| {
            info!("entered closed via SuccessThresholdReached");
            app.failures = 0;
            app.fire_later(Event::Try, RETRY_DELAY);
        })
        .expect("closed entry")
        .on_entry_from(Event::Try, |app: &mut App, _| {
            info!("entered closed via Try");
            if !app.attempt() {
                app.failures += 1;
            }
            if app.failures >= FAILURE_THRESHOLD {
                app.fire_later(Event::FailureThresholdReached, Duration::ZERO);
            } else {
                app.fire_later(Event::Try, RETRY_DELAY);
            }
        })
        .expect("closed entry");

    sm.configure(Breaker::Open)
        .permit(Event::TimeoutTimerExpired, Breaker::HalfOpen)
        .expect("open transitions")
        .on_entry_from(Event::FailureThresholdReached, |app: &mut App, _| {
            info!("entered open via FailureThresholdReached");
            app.fire_later(Event::TimeoutTimerExpired, OPEN_INTERVAL);
        })
        .expect("open entry")
        .on_entry_from(Event::OperationFailed, |app: &mut App, _| {
            info!("entered open via OperationFailed");
            app.fire_later(Event::TimeoutTimerExpired, OPEN_INTERVAL);
        })
        .expect("open entry")
        .on_exit(|_, trigger, dest| {
            info!(?trigger, ?dest, "leaving open");
        })
        .expect("open exit");

    sm.configure(Breaker::HalfOpen)
        .permit(Event::OperationFailed, Breaker::Open)
        .expect("half-open transitions")
        .permit(Event::SuccessThresholdReached, Breaker::Closed)
        .expect("half-open transitions")
        .permit_reentry(Event::Try)
        .expect("half-open reentry")
        .on_entry_from(Event::TimeoutTimerExpired, |app: &mut App, _| {
            info!("entered half-open via TimeoutTimerExpired");
            app.successes = 0;
            app.probe();
        })
        .expect("half-open entry")
        .on_entry_from(Event::Try, |app: &mut App, _| {
            info!("entered half-open via Try");
            app.probe();
        })
        .expect("half-open entry");

    sm
}

fn main() {
    tracing_subscriber::fmt().compact().init();

    info!("machine is starting");
    let mut sm = build_machine();
    let mut app = App::default();

    app.fire_later(Event::Try, Duration::ZERO);

    // Drive the breaker through a couple of full open/half-open/closed
    // cycles, then stop.
    let mut fires = 0;
    while let Some((event, delay)) = app.pending.pop_front() {
        thread::sleep(delay);
        if let Err(err) = sm.fire(event, &mut app, ()) {
            info!(%err, "fire rejected");
        }
        fires += 1;
        if fires >= 25 {
            break;
        }
    }

    info!(
        final_state = sm.current_state().name(),
        transitions = sm.history().len(),
        "machine stopped"
    );
}
