//! The classic turnstile, showing guards, parameters, and hierarchy.
//!
//! Both turnstile states are substates of an `Operational` superstate that
//! alone handles the `PowerCut` trigger, so either of them falls back to it.
//!
//! Run with: `cargo run --example turnstile`

use tracing::info;
use trellis::{state_enum, trigger_enum, State, StateMachine};

state_enum! {
    enum Turnstile {
        Operational,
        Locked,
        Unlocked,
        OutOfService,
    }
}

trigger_enum! {
    enum Input {
        Coin,
        Push,
        PowerCut,
    }
}

/// Fare balance accumulated by the machine's owner.
#[derive(Default)]
struct Till {
    balance: u32,
}

fn main() {
    tracing_subscriber::fmt().compact().init();

    let mut sm: StateMachine<Turnstile, Input, Till, u32> = StateMachine::new(Turnstile::Locked);

    sm.configure(Turnstile::Operational)
        .permit(Input::PowerCut, Turnstile::OutOfService)
        .expect("operational transitions");

    sm.configure(Turnstile::Locked)
        .substate_of(Turnstile::Operational)
        .expect("locked hierarchy")
        // Only a full fare unlocks the turnstile.
        .permit_if(Input::Coin, Turnstile::Unlocked, |_, fare| *fare >= 50)
        .expect("locked transitions")
        .on_exit(|till: &mut Till, _, dest| {
            info!(balance = till.balance, dest = dest.name(), "leaving locked");
        })
        .expect("locked exit");

    sm.configure(Turnstile::Unlocked)
        .substate_of(Turnstile::Operational)
        .expect("unlocked hierarchy")
        .permit(Input::Push, Turnstile::Locked)
        .expect("unlocked transitions")
        .on_entry_from(Input::Coin, |till: &mut Till, fare| {
            till.balance += fare;
            info!(fare, balance = till.balance, "coin accepted");
        })
        .expect("unlocked entry");

    let mut till = Till::default();

    // An underpayment is declined by the guard, not an error.
    let outcome = sm.fire(Input::Coin, &mut till, 20).expect("coin fire");
    info!(
        outcome = ?outcome,
        state = sm.current_state().name(),
        "underpaid coin"
    );

    sm.fire(Input::Coin, &mut till, 50).expect("coin fire");
    sm.fire(Input::Push, &mut till, 0).expect("push fire");
    info!(state = sm.current_state().name(), "passenger through");

    // PowerCut is only configured on the superstate; the substate inherits it.
    sm.fire(Input::PowerCut, &mut till, 0).expect("power cut fire");
    info!(state = sm.current_state().name(), "power cut handled by superstate");
}
