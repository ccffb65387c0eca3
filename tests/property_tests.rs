//! Property-based tests for the engine.
//!
//! These tests use proptest to verify invariants hold across many randomly
//! generated configurations and trigger sequences.

use proptest::prelude::*;
use trellis::{state_enum, trigger_enum, FireOutcome, StateMachine};

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

/// The breaker's transition table as a pure reference model.
fn model_step(state: &Breaker, trigger: &Event) -> Option<Breaker> {
    match (state, trigger) {
        (Breaker::Closed, Event::FailureThresholdReached) => Some(Breaker::Open),
        (Breaker::Closed, Event::Try) => Some(Breaker::Closed),
        (Breaker::Open, Event::TimeoutTimerExpired) => Some(Breaker::HalfOpen),
        (Breaker::HalfOpen, Event::OperationFailed) => Some(Breaker::Open),
        (Breaker::HalfOpen, Event::SuccessThresholdReached) => Some(Breaker::Closed),
        (Breaker::HalfOpen, Event::Try) => Some(Breaker::HalfOpen),
        _ => None,
    }
}

fn configure_breaker() -> StateMachine<Breaker, Event> {
    let mut sm = StateMachine::new(Breaker::Closed);
    sm.configure(Breaker::Closed)
        .permit(Event::FailureThresholdReached, Breaker::Open)
        .unwrap()
        .permit_reentry(Event::Try)
        .unwrap();
    sm.configure(Breaker::Open)
        .permit(Event::TimeoutTimerExpired, Breaker::HalfOpen)
        .unwrap();
    sm.configure(Breaker::HalfOpen)
        .permit(Event::OperationFailed, Breaker::Open)
        .unwrap()
        .permit(Event::SuccessThresholdReached, Breaker::Closed)
        .unwrap()
        .permit_reentry(Event::Try)
        .unwrap();
    sm
}

prop_compose! {
    fn arbitrary_event()(variant in 0..5u8) -> Event {
        match variant {
            0 => Event::SuccessThresholdReached,
            1 => Event::FailureThresholdReached,
            2 => Event::TimeoutTimerExpired,
            3 => Event::OperationFailed,
            _ => Event::Try,
        }
    }
}

proptest! {
    #[test]
    fn machine_agrees_with_reference_model(
        triggers in prop::collection::vec(arbitrary_event(), 0..50)
    ) {
        let mut sm = configure_breaker();
        let mut model = Breaker::Closed;

        for trigger in triggers {
            match model_step(&model, &trigger) {
                Some(next) => {
                    let outcome = sm.fire(trigger, &mut (), ()).unwrap();
                    prop_assert_eq!(outcome, FireOutcome::Transitioned);
                    model = next;
                }
                None => {
                    prop_assert!(sm.fire(trigger, &mut (), ()).is_err());
                }
            }
            prop_assert_eq!(sm.current_state(), &model);
        }
    }

    #[test]
    fn failed_fires_never_move_the_machine(
        triggers in prop::collection::vec(arbitrary_event(), 1..50)
    ) {
        let mut sm = configure_breaker();

        for trigger in triggers {
            let before = sm.current_state().clone();
            if sm.fire(trigger, &mut (), ()).is_err() {
                prop_assert_eq!(sm.current_state(), &before);
            }
        }
    }

    #[test]
    fn history_length_equals_successful_fires(
        triggers in prop::collection::vec(arbitrary_event(), 0..50)
    ) {
        let mut sm = configure_breaker();
        let mut executed = 0usize;

        for trigger in triggers {
            if sm.fire(trigger, &mut (), ()).is_ok() {
                executed += 1;
            }
        }

        prop_assert_eq!(sm.history().len(), executed);
    }

    #[test]
    fn history_path_is_contiguous(
        triggers in prop::collection::vec(arbitrary_event(), 0..50)
    ) {
        let mut sm = configure_breaker();
        for trigger in triggers {
            let _ = sm.fire(trigger, &mut (), ());
        }

        // Each record's `from` must equal the previous record's `to`.
        let records = sm.history().transitions();
        for pair in records.windows(2) {
            prop_assert_eq!(&pair[0].to, &pair[1].from);
        }
        if let Some(last) = sm.history().last() {
            prop_assert_eq!(&last.to, sm.current_state());
        }
    }

    #[test]
    fn linear_chain_advances_one_state_per_fire(
        length in 2..20usize,
        fires in 0..30usize,
    ) {
        let mut sm: StateMachine<String, String> = StateMachine::new("s0".to_string());
        for i in 0..length - 1 {
            sm.configure(format!("s{i}"))
                .permit("next".to_string(), format!("s{}", i + 1))
                .unwrap();
        }

        let mut advanced = 0usize;
        for _ in 0..fires {
            if sm.fire("next".to_string(), &mut (), ()).is_ok() {
                advanced += 1;
            }
        }

        let expected = advanced.min(length - 1);
        prop_assert_eq!(sm.current_state(), &format!("s{expected}"));
        // Past the end of the chain every fire must have failed.
        prop_assert_eq!(advanced, fires.min(length - 1));
    }

    #[test]
    fn deep_substate_resolves_trigger_at_root(depth in 1..15usize) {
        let mut sm: StateMachine<String, String> = StateMachine::new(format!("n{depth}"));
        sm.configure("n0".to_string())
            .permit("escape".to_string(), "out".to_string())
            .unwrap();
        for i in 1..=depth {
            sm.configure(format!("n{i}"))
                .substate_of(format!("n{}", i - 1))
                .unwrap();
        }

        // The leaf is current; only the root handles the trigger.
        sm.fire("escape".to_string(), &mut (), ()).unwrap();
        prop_assert_eq!(sm.current_state(), "out");
    }

    #[test]
    fn declined_guard_is_never_confused_with_no_match(allow in any::<bool>()) {
        let mut sm: StateMachine<String, String, bool> = StateMachine::new("src".to_string());
        sm.configure("src".to_string())
            .permit_if("t".to_string(), "dst".to_string(), |ctx, _| *ctx)
            .unwrap();

        let mut ctx = allow;
        let result = sm.fire("t".to_string(), &mut ctx, ());
        // A registered-but-declined transition is Ok(Declined), never Err.
        if allow {
            prop_assert_eq!(result.unwrap(), FireOutcome::Transitioned);
        } else {
            prop_assert_eq!(result.unwrap(), FireOutcome::Declined);
        }
    }
}
