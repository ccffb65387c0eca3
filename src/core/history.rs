//! Transition history tracking.
//!
//! Every successful `fire` appends one record to the machine's history,
//! giving callers an ordered, serializable account of where the machine has
//! been and which triggers moved it.

use super::state::{State, Trigger};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single executed transition.
///
/// Records are immutable values; declined transitions and failed fires are
/// never recorded.
///
/// # Example
///
/// ```rust
/// use trellis::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "closed".to_string(),
///     to: "open".to_string(),
///     trigger: "failureThresholdReached".to_string(),
///     timestamp: Utc::now(),
/// };
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State, T: Trigger> {
    /// The state the machine left
    pub from: S,
    /// The state the machine entered
    pub to: S,
    /// The trigger that caused the transition
    pub trigger: T,
    /// When the transition executed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of executed transitions.
///
/// History is immutable - [`record`](TransitionHistory::record) returns a
/// new history with the record appended rather than mutating in place.
///
/// # Example
///
/// ```rust
/// use trellis::core::{TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history: TransitionHistory<String, String> = TransitionHistory::new();
///
/// let history = history.record(TransitionRecord {
///     from: "closed".to_string(),
///     to: "open".to_string(),
///     trigger: "failureThresholdReached".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.transitions().len(), 1);
/// assert_eq!(history.path(), vec!["closed", "open"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionHistory<S: State, T: Trigger> {
    transitions: Vec<TransitionRecord<S, T>>,
}

impl<S: State, T: Trigger> Default for TransitionHistory<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, T: Trigger> TransitionHistory<S, T> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left unchanged.
    pub fn record(&self, record: TransitionRecord<S, T>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(record);
        Self { transitions }
    }

    /// Get all recorded transitions in execution order.
    pub fn transitions(&self) -> &[TransitionRecord<S, T>] {
        &self.transitions
    }

    /// Get the most recent transition, if any.
    pub fn last(&self) -> Option<&TransitionRecord<S, T>> {
        self.transitions.last()
    }

    /// Get the path of states traversed.
    ///
    /// Returns references in order: the starting state, then the `to` state
    /// of each transition. Empty when nothing has been recorded.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for record in &self.transitions {
            path.push(&record.to);
        }
        path
    }

    /// Total duration from first to last recorded transition.
    ///
    /// Returns `None` when the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: &str, to: &str, trigger: &str) -> TransitionRecord<String, String> {
        TransitionRecord {
            from: from.to_string(),
            to: to.to_string(),
            trigger: trigger.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: TransitionHistory<String, String> = TransitionHistory::new();
        assert!(history.is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_adds_transition() {
        let history = TransitionHistory::new();
        let history = history.record(record("closed", "open", "failureThresholdReached"));

        assert_eq!(history.len(), 1);
        assert_eq!(history.last().unwrap().trigger, "failureThresholdReached");
    }

    #[test]
    fn record_is_immutable() {
        let history = TransitionHistory::new();
        let new_history = history.record(record("a", "b", "go"));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn path_includes_starting_state() {
        let history = TransitionHistory::new()
            .record(record("closed", "open", "failureThresholdReached"))
            .record(record("open", "halfOpen", "timeoutTimerExpired"))
            .record(record("halfOpen", "closed", "successThresholdReached"));

        let path = history.path();
        assert_eq!(path, vec!["closed", "open", "halfOpen", "closed"]);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let later = start + chrono::Duration::seconds(3);

        let history = TransitionHistory::new()
            .record(TransitionRecord {
                from: "a".to_string(),
                to: "b".to_string(),
                trigger: "t".to_string(),
                timestamp: start,
            })
            .record(TransitionRecord {
                from: "b".to_string(),
                to: "c".to_string(),
                trigger: "t".to_string(),
                timestamp: later,
            });

        assert_eq!(history.duration(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn history_roundtrips_through_json() {
        let history = TransitionHistory::new()
            .record(record("a", "b", "t1"))
            .record(record("b", "a", "t2"));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: TransitionHistory<String, String> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), history.len());
        assert_eq!(deserialized.path(), history.path());
    }
}
