//! Trellis: a hierarchical finite-state-machine engine.
//!
//! Trellis lets a caller declaratively register states, the triggers that
//! move between them, optional guard predicates, and entry/exit callbacks,
//! then drive the machine one trigger at a time. States may nest: a
//! substate that does not handle a trigger itself inherits its ancestors'
//! transitions by upward search, while the observable current state is
//! always the most specific configuration.
//!
//! # Core Concepts
//!
//! - **State / Trigger**: opaque, comparable identifiers via the [`core::State`]
//!   and [`core::Trigger`] traits (use [`state_enum!`] / [`trigger_enum!`],
//!   or plain `String`s)
//! - **Guards**: predicates over the caller's context and fire parameters
//!   that decide whether a matching transition executes
//! - **Hierarchy**: `substate_of` links states into a tree; triggers
//!   unhandled by a substate resolve upward
//! - **History**: ordered, serializable record of executed transitions
//!
//! The engine is synchronous and single-threaded by design: it schedules
//! no timers and spawns nothing. Applications that need deferred fires
//! (retry loops, timeouts) keep that machinery outside the machine and
//! call [`fire`](machine::StateMachine::fire) from their own event loop.
//!
//! # Example
//!
//! ```rust
//! use trellis::{state_enum, trigger_enum, StateMachine};
//!
//! state_enum! {
//!     enum Breaker {
//!         Closed,
//!         Open,
//!         HalfOpen,
//!     }
//! }
//!
//! trigger_enum! {
//!     enum Event {
//!         FailureThresholdReached,
//!         TimeoutTimerExpired,
//!         SuccessThresholdReached,
//!     }
//! }
//!
//! let mut sm: StateMachine<Breaker, Event> = StateMachine::new(Breaker::Closed);
//!
//! sm.configure(Breaker::Closed)
//!     .permit(Event::FailureThresholdReached, Breaker::Open)?;
//! sm.configure(Breaker::Open)
//!     .permit(Event::TimeoutTimerExpired, Breaker::HalfOpen)?;
//! sm.configure(Breaker::HalfOpen)
//!     .permit(Event::SuccessThresholdReached, Breaker::Closed)?;
//!
//! sm.fire(Event::FailureThresholdReached, &mut (), ())?;
//! assert_eq!(sm.current_state(), &Breaker::Open);
//! sm.fire(Event::TimeoutTimerExpired, &mut (), ())?;
//! assert_eq!(sm.current_state(), &Breaker::HalfOpen);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod machine;
pub mod macros;

// Re-export commonly used types
pub use core::{Guard, State, TransitionHistory, TransitionRecord, Trigger};
pub use machine::{ConfigError, FireError, FireOutcome, StateConfig, StateMachine};
