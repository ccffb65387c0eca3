//! Core building blocks: identifier traits, guards, and history.
//!
//! Everything here is value-like and side-effect free; the stateful engine
//! lives in [`crate::machine`].

pub mod guard;
pub mod history;
pub mod state;

pub use guard::Guard;
pub use history::{TransitionHistory, TransitionRecord};
pub use state::{State, Trigger};
