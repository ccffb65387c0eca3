//! Errors for configuration-time misuse and failed fires.
//!
//! Every error is a value returned to the immediate caller; nothing in the
//! engine panics or rolls back earlier registrations. Messages carry state
//! and trigger names so the error types stay non-generic.

use thiserror::Error;

/// Errors that can occur while registering transitions, handlers, or
/// hierarchy links on a state.
///
/// A failed registration leaves all prior configuration intact; the model
/// is additive and never rolled back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `permit`/`permit_if` named the owning state as its own destination.
    /// Self-transitions go through `permit_reentry` instead.
    #[error("state `{state}` cannot permit a transition to itself via `{trigger}`; use permit_reentry")]
    InvalidDestination { state: String, trigger: String },

    /// The state already holds a transition for this trigger.
    #[error("state `{state}` already has a transition for trigger `{trigger}` (to `{existing}`)")]
    DuplicateTrigger {
        state: String,
        trigger: String,
        existing: String,
    },

    /// The state already has an entry handler registered for this trigger.
    #[error("state `{state}` already has an entry handler for trigger `{trigger}`")]
    DuplicateEntryHandler { state: String, trigger: String },

    /// The state already has its single exit handler registered.
    #[error("state `{state}` already has an exit handler")]
    DuplicateExitHandler { state: String },

    /// The state already has a parent; a state has at most one.
    #[error("state `{state}` already has parent `{parent}`")]
    ParentAlreadySet { state: String, parent: String },

    /// A state cannot be a substate of itself.
    #[error("state `{state}` cannot be a substate of itself")]
    SelfParent { state: String },

    /// Linking the state under this parent would make the hierarchy cyclic.
    #[error("making `{state}` a substate of `{parent}` would create a hierarchy cycle")]
    HierarchyCycle { state: String, parent: String },
}

/// Errors that can occur when firing a trigger.
///
/// A failed fire never mutates the machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FireError {
    /// Neither the current state nor any of its superstates defines a
    /// transition for the fired trigger.
    #[error("no transition for trigger `{trigger}` from state `{state}` or any of its superstates")]
    NoMatchingTransition { state: String, trigger: String },
}
