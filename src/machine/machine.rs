//! The state machine: registry, current-state pointer, and `fire`.

use crate::core::{State, TransitionHistory, TransitionRecord, Trigger};
use crate::machine::config::{StateConfig, StateNode};
use crate::machine::error::FireError;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Outcome of a successful [`fire`](StateMachine::fire) call.
///
/// `Declined` is a normal outcome, not an error: a transition matched the
/// trigger but its guard said no, and the machine is untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    /// The transition executed and the current state moved.
    Transitioned,
    /// A guard declined the matching transition; nothing changed.
    Declined,
}

impl FireOutcome {
    /// True when the transition executed.
    pub fn transitioned(self) -> bool {
        matches!(self, FireOutcome::Transitioned)
    }
}

/// A hierarchical, trigger-driven state machine.
///
/// The machine owns every state configuration it creates and a single
/// mutable current-state pointer. Configuration is additive for the
/// machine's whole lifetime; there is no deletion API.
///
/// `Ctx` is a caller-owned context threaded into every guard and handler;
/// `P` is the per-fire parameter payload. Both default to `()`.
///
/// `fire` is synchronous call/return and not safe for concurrent use;
/// callers driving a machine from multiple threads must serialize access
/// themselves (a lock, or a single owning thread fed by a queue).
///
/// # Example
///
/// ```rust
/// use trellis::{FireOutcome, StateMachine};
///
/// let mut sm: StateMachine<String, String> = StateMachine::new("idle".to_string());
/// sm.configure("idle".to_string())
///     .permit("start".to_string(), "running".to_string())?;
///
/// let outcome = sm.fire("start".to_string(), &mut (), ())?;
/// assert_eq!(outcome, FireOutcome::Transitioned);
/// assert_eq!(sm.current_state(), "running");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct StateMachine<S: State, T: Trigger, Ctx = (), P = ()> {
    pub(crate) nodes: Vec<StateNode<S, T, Ctx, P>>,
    pub(crate) index: HashMap<S, usize>,
    current: usize,
    history: TransitionHistory<S, T>,
}

impl<S: State, T: Trigger, Ctx, P> StateMachine<S, T, Ctx, P> {
    /// Create a machine whose registry holds exactly one configuration,
    /// for `initial`, with the current state pointing at it.
    pub fn new(initial: S) -> Self {
        let mut machine = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            current: 0,
            history: TransitionHistory::new(),
        };
        machine.current = machine.intern(initial);
        machine
    }

    /// Get the registration handle for `id`, creating an empty
    /// configuration if the identifier has not been seen before.
    ///
    /// Idempotent: configuring the same identifier twice hands back a
    /// handle to the same underlying record, which is what lets
    /// transitions name destination states before those are configured.
    pub fn configure(&mut self, id: S) -> StateConfig<'_, S, T, Ctx, P> {
        let idx = self.intern(id);
        StateConfig { machine: self, idx }
    }

    /// The identifier of the presently active state.
    pub fn current_state(&self) -> &S {
        &self.nodes[self.current].id
    }

    /// Whether `id` has a configuration in the registry.
    pub fn contains(&self, id: &S) -> bool {
        self.index.contains_key(id)
    }

    /// The declared parent of `id`, if it has one.
    pub fn parent_of(&self, id: &S) -> Option<&S> {
        let idx = *self.index.get(id)?;
        let parent = self.nodes[idx].parent?;
        Some(&self.nodes[parent].id)
    }

    /// History of every executed transition, in order.
    pub fn history(&self) -> &TransitionHistory<S, T> {
        &self.history
    }

    /// Fire `trigger` against the current state.
    ///
    /// Resolution walks upward from the current state through its parent
    /// chain until a state defining the trigger is found; substates
    /// thereby inherit transitions they do not override. The sequence on
    /// a match is strictly: evaluate guard, run the current state's exit
    /// handler (with the trigger and destination), move the pointer, run
    /// the destination's entry handler for this trigger (with `params`),
    /// record history. Reentry runs exit then entry on the same state.
    ///
    /// Returns [`FireOutcome::Declined`] without touching anything when a
    /// guard says no, and [`FireError::NoMatchingTransition`] when no
    /// state in the chain defines the trigger.
    pub fn fire(&mut self, trigger: T, ctx: &mut Ctx, params: P) -> Result<FireOutcome, FireError> {
        let source = self.current;

        let owner = self.resolve(source, &trigger)?;
        let transition = &self.nodes[owner].transitions[&trigger];
        let dest = transition.dest;

        if let Some(guard) = &transition.guard {
            if !guard.check(ctx, &params) {
                debug!(
                    state = self.nodes[source].id.name(),
                    trigger = trigger.name(),
                    "guard declined transition"
                );
                return Ok(FireOutcome::Declined);
            }
        }

        let from = self.nodes[source].id.clone();
        let to = self.nodes[dest].id.clone();

        // Exit fires before the pointer flips, entry after.
        if let Some(exit) = &self.nodes[source].exit {
            exit(ctx, &trigger, &to);
        }
        self.current = dest;
        if let Some(entry) = self.nodes[dest].entry.get(&trigger) {
            entry(ctx, &params);
        }

        debug!(
            from = from.name(),
            to = to.name(),
            trigger = trigger.name(),
            "transition executed"
        );
        self.history = self.history.record(TransitionRecord {
            from,
            to,
            trigger,
            timestamp: Utc::now(),
        });

        Ok(FireOutcome::Transitioned)
    }

    /// Walk upward from `source` until a state defining `trigger` is
    /// found, returning its index.
    fn resolve(&self, source: usize, trigger: &T) -> Result<usize, FireError> {
        let mut cursor = source;
        loop {
            if self.nodes[cursor].transitions.contains_key(trigger) {
                return Ok(cursor);
            }
            match self.nodes[cursor].parent {
                Some(parent) => {
                    trace!(
                        state = self.nodes[cursor].id.name(),
                        superstate = self.nodes[parent].id.name(),
                        trigger = trigger.name(),
                        "trigger not handled locally, delegating to superstate"
                    );
                    cursor = parent;
                }
                None => {
                    debug!(
                        state = self.nodes[source].id.name(),
                        trigger = trigger.name(),
                        "no matching transition"
                    );
                    return Err(FireError::NoMatchingTransition {
                        state: self.nodes[source].id.name().to_string(),
                        trigger: trigger.name().to_string(),
                    });
                }
            }
        }
    }

    /// Look up or create the node for `id`, returning its index.
    pub(crate) fn intern(&mut self, id: S) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(StateNode::new(id.clone()));
        self.index.insert(id, idx);
        idx
    }
}
