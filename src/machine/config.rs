//! Per-state configuration: transition, handler, and hierarchy registration.
//!
//! [`StateMachine::configure`](crate::machine::StateMachine::configure)
//! returns a [`StateConfig`] handle borrowing the machine; registration
//! methods consume and return the handle so calls chain with `?`.

use crate::core::{Guard, State, Trigger};
use crate::machine::error::ConfigError;
use crate::machine::machine::StateMachine;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Entry handler: runs after the machine enters a state via a specific
/// trigger, receiving the caller's context and the fire parameters.
pub type EntryHandler<Ctx, P> = Box<dyn Fn(&mut Ctx, &P) + Send + Sync>;

/// Exit handler: runs before the machine leaves a state via any trigger,
/// receiving the context, the firing trigger, and the destination state.
pub type ExitHandler<Ctx, S, T> = Box<dyn Fn(&mut Ctx, &T, &S) + Send + Sync>;

/// A registered transition: destination node plus optional guard.
/// Immutable once created; a `None` guard means unconditional.
pub(crate) struct TransitionDef<Ctx, P> {
    pub(crate) dest: usize,
    pub(crate) guard: Option<Guard<Ctx, P>>,
}

/// Stored configuration record for one state.
///
/// Nodes live in the machine's arena for its whole lifetime and reference
/// each other by index.
pub(crate) struct StateNode<S, T, Ctx, P> {
    pub(crate) id: S,
    pub(crate) transitions: HashMap<T, TransitionDef<Ctx, P>>,
    pub(crate) parent: Option<usize>,
    pub(crate) substates: HashSet<usize>,
    pub(crate) entry: HashMap<T, EntryHandler<Ctx, P>>,
    pub(crate) exit: Option<ExitHandler<Ctx, S, T>>,
}

impl<S, T, Ctx, P> StateNode<S, T, Ctx, P> {
    pub(crate) fn new(id: S) -> Self {
        Self {
            id,
            transitions: HashMap::new(),
            parent: None,
            substates: HashSet::new(),
            entry: HashMap::new(),
            exit: None,
        }
    }
}

/// Registration handle for one state of a machine.
///
/// All methods are additive: a failed call returns an error and changes
/// nothing, while everything registered before it stays in place.
///
/// # Example
///
/// ```rust
/// use trellis::StateMachine;
///
/// let mut sm: StateMachine<String, String> = StateMachine::new("closed".to_string());
///
/// sm.configure("closed".to_string())
///     .permit("failureThresholdReached".to_string(), "open".to_string())?
///     .permit_reentry("try".to_string())?;
/// # Ok::<(), trellis::ConfigError>(())
/// ```
pub struct StateConfig<'m, S: State, T: Trigger, Ctx, P> {
    pub(crate) machine: &'m mut StateMachine<S, T, Ctx, P>,
    pub(crate) idx: usize,
}

impl<'m, S: State, T: Trigger, Ctx, P> fmt::Debug for StateConfig<'m, S, T, Ctx, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateConfig").field("state", self.id()).finish()
    }
}

impl<'m, S: State, T: Trigger, Ctx, P> StateConfig<'m, S, T, Ctx, P> {
    /// The state this handle configures.
    pub fn id(&self) -> &S {
        &self.machine.nodes[self.idx].id
    }

    /// Register an unconditional transition to `dest` via `trigger`.
    ///
    /// The destination is configured implicitly if it has not been seen
    /// yet, so transitions may name states forward of their own
    /// configuration. The destination must differ from this state (use
    /// [`permit_reentry`](Self::permit_reentry) for self-loops), and the
    /// trigger must not already be bound on this state.
    pub fn permit(self, trigger: T, dest: S) -> Result<Self, ConfigError> {
        self.permit_internal(trigger, dest, None)
    }

    /// Register a conditional transition to `dest` via `trigger`.
    ///
    /// The guard is evaluated at fire time; when it returns false the
    /// transition is declined without mutating the machine.
    pub fn permit_if<F>(self, trigger: T, dest: S, guard: F) -> Result<Self, ConfigError>
    where
        F: Fn(&Ctx, &P) -> bool + Send + Sync + 'static,
    {
        self.permit_internal(trigger, dest, Some(Guard::new(guard)))
    }

    /// Register an unconditional self-loop via `trigger`.
    ///
    /// Reentry re-runs the state's exit and entry handlers while leaving
    /// the current state where it was.
    pub fn permit_reentry(self, trigger: T) -> Result<Self, ConfigError> {
        self.permit_reentry_internal(trigger, None)
    }

    /// Register a conditional self-loop via `trigger`.
    pub fn permit_reentry_if<F>(self, trigger: T, guard: F) -> Result<Self, ConfigError>
    where
        F: Fn(&Ctx, &P) -> bool + Send + Sync + 'static,
    {
        self.permit_reentry_internal(trigger, Some(Guard::new(guard)))
    }

    /// Register the entry handler invoked when this state is entered via
    /// `trigger` specifically. At most one handler per (state, trigger).
    pub fn on_entry_from<F>(self, trigger: T, handler: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut Ctx, &P) + Send + Sync + 'static,
    {
        let node = &mut self.machine.nodes[self.idx];
        if node.entry.contains_key(&trigger) {
            return Err(ConfigError::DuplicateEntryHandler {
                state: node.id.name().to_string(),
                trigger: trigger.name().to_string(),
            });
        }
        node.entry.insert(trigger, Box::new(handler));
        Ok(self)
    }

    /// Register the single exit handler, invoked on every transition out
    /// of this state with the firing trigger and destination state.
    ///
    /// Leaving is uniform while arriving differs by cause, so exit is
    /// per-state where entry is per-(state, trigger).
    pub fn on_exit<F>(self, handler: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut Ctx, &T, &S) + Send + Sync + 'static,
    {
        let node = &mut self.machine.nodes[self.idx];
        if node.exit.is_some() {
            return Err(ConfigError::DuplicateExitHandler {
                state: node.id.name().to_string(),
            });
        }
        node.exit = Some(Box::new(handler));
        Ok(self)
    }

    /// Declare this state a substate of `parent`.
    ///
    /// The parent is configured implicitly if absent. A state has at most
    /// one parent, may not parent itself, and the link is rejected if it
    /// would make the hierarchy cyclic at any depth.
    pub fn substate_of(self, parent: S) -> Result<Self, ConfigError> {
        {
            let node = &self.machine.nodes[self.idx];
            if let Some(existing) = node.parent {
                return Err(ConfigError::ParentAlreadySet {
                    state: node.id.name().to_string(),
                    parent: self.machine.nodes[existing].id.name().to_string(),
                });
            }
            if node.id == parent {
                return Err(ConfigError::SelfParent {
                    state: node.id.name().to_string(),
                });
            }
        }

        let parent_idx = self.machine.intern(parent);

        // Two states may not be substates of each other.
        if self.machine.nodes[self.idx].substates.contains(&parent_idx) {
            return Err(self.cycle_error(parent_idx));
        }
        // Nor may the link close a longer loop through the ancestor chain.
        let mut cursor = self.machine.nodes[parent_idx].parent;
        while let Some(ancestor) = cursor {
            if ancestor == self.idx {
                return Err(self.cycle_error(parent_idx));
            }
            cursor = self.machine.nodes[ancestor].parent;
        }

        self.machine.nodes[self.idx].parent = Some(parent_idx);
        self.machine.nodes[parent_idx].substates.insert(self.idx);
        Ok(self)
    }

    fn cycle_error(&self, parent_idx: usize) -> ConfigError {
        ConfigError::HierarchyCycle {
            state: self.machine.nodes[self.idx].id.name().to_string(),
            parent: self.machine.nodes[parent_idx].id.name().to_string(),
        }
    }

    fn permit_internal(
        self,
        trigger: T,
        dest: S,
        guard: Option<Guard<Ctx, P>>,
    ) -> Result<Self, ConfigError> {
        {
            let node = &self.machine.nodes[self.idx];
            if node.id == dest {
                return Err(ConfigError::InvalidDestination {
                    state: node.id.name().to_string(),
                    trigger: trigger.name().to_string(),
                });
            }
            if let Some(existing) = node.transitions.get(&trigger) {
                return Err(ConfigError::DuplicateTrigger {
                    state: node.id.name().to_string(),
                    trigger: trigger.name().to_string(),
                    existing: self.machine.nodes[existing.dest].id.name().to_string(),
                });
            }
        }

        // The destination is interned only after validation, so a failed
        // call registers nothing.
        let dest_idx = self.machine.intern(dest);
        self.machine.nodes[self.idx]
            .transitions
            .insert(trigger, TransitionDef { dest: dest_idx, guard });
        Ok(self)
    }

    fn permit_reentry_internal(
        self,
        trigger: T,
        guard: Option<Guard<Ctx, P>>,
    ) -> Result<Self, ConfigError> {
        let node = &self.machine.nodes[self.idx];
        if let Some(existing) = node.transitions.get(&trigger) {
            return Err(ConfigError::DuplicateTrigger {
                state: node.id.name().to_string(),
                trigger: trigger.name().to_string(),
                existing: self.machine.nodes[existing.dest].id.name().to_string(),
            });
        }

        let dest = self.idx;
        self.machine.nodes[self.idx]
            .transitions
            .insert(trigger, TransitionDef { dest, guard });
        Ok(self)
    }
}
