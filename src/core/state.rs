//! Identifier traits for states and triggers.
//!
//! A machine is keyed by two identifier types: states (the positions the
//! machine can occupy) and triggers (the events that move it between them).
//! Both are opaque, comparable tokens; the engine never inspects them beyond
//! equality, hashing, and `name()` for diagnostics.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identifiers.
///
/// Exactly one state is current at any time; states are used as map keys
/// throughout the registry, so they must be cheap to clone and hash.
///
/// # Required Traits
///
/// - `Clone` + `Eq` + `Hash`: states key the registry and transition maps
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `DeserializeOwned`: states appear in serializable
///   transition history
///
/// Implemented for `String`, so stringly-keyed machines work out of the box.
/// For enum states, the [`state_enum!`](crate::state_enum) macro derives
/// everything.
///
/// # Example
///
/// ```rust
/// use trellis::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Breaker {
///     Closed,
///     Open,
///     HalfOpen,
/// }
///
/// impl State for Breaker {
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Open => "Open",
///             Self::HalfOpen => "HalfOpen",
///         }
///     }
/// }
/// ```
pub trait State: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Trait for trigger identifiers.
///
/// Triggers are scoped per state: a state holds at most one transition per
/// trigger, which keeps [`fire`](crate::machine::StateMachine::fire)
/// deterministic.
///
/// Implemented for `String`; for enums use
/// [`trigger_enum!`](crate::trigger_enum).
pub trait Trigger: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// Get the trigger's name for display/logging.
    fn name(&self) -> &str;
}

impl State for String {
    fn name(&self) -> &str {
        self
    }
}

impl Trigger for String {
    fn name(&self) -> &str {
        self
    }
}
