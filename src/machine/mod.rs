//! The stateful engine: registry, registration surface, fire, and errors.

pub mod config;
pub mod error;
#[allow(clippy::module_inception)]
pub mod machine;

pub use config::{EntryHandler, ExitHandler, StateConfig};
pub use error::{ConfigError, FireError};
pub use machine::{FireOutcome, StateMachine};
