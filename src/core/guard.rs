//! Guard predicates for gating transitions.
//!
//! Guards are boolean functions evaluated at fire time, before any handler
//! runs or any state mutates. A transition without a guard is unconditional.

/// Predicate that decides whether a matching transition actually executes.
///
/// The predicate sees the caller's context and the parameters passed to the
/// [`fire`](crate::machine::StateMachine::fire) call, and must be free of
/// side effects: a declined transition leaves the machine exactly as it was.
///
/// # Example
///
/// ```rust
/// use trellis::core::Guard;
///
/// struct Ctx {
///     failures: u32,
/// }
///
/// // Only allow the transition while under the failure threshold.
/// let under_threshold = Guard::new(|ctx: &Ctx, _params: &()| ctx.failures < 3);
///
/// assert!(under_threshold.check(&Ctx { failures: 0 }, &()));
/// assert!(!under_threshold.check(&Ctx { failures: 3 }, &()));
/// ```
pub struct Guard<Ctx, P> {
    predicate: Box<dyn Fn(&Ctx, &P) -> bool + Send + Sync>,
}

impl<Ctx, P> Guard<Ctx, P> {
    /// Create a guard from a predicate function.
    ///
    /// The predicate must be deterministic for a given context and
    /// parameter value, and thread-safe (`Send + Sync`).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Ctx, &P) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard against the caller's context and fire parameters.
    pub fn check(&self, ctx: &Ctx, params: &P) -> bool {
        (self.predicate)(ctx, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counters {
        successes: u32,
        failures: u32,
    }

    #[test]
    fn guard_evaluates_context() {
        let guard = Guard::new(|ctx: &Counters, _: &()| ctx.failures < 2);

        let ok = Counters {
            successes: 0,
            failures: 1,
        };
        let tripped = Counters {
            successes: 0,
            failures: 2,
        };
        assert!(guard.check(&ok, &()));
        assert!(!guard.check(&tripped, &()));
    }

    #[test]
    fn guard_evaluates_params() {
        let guard = Guard::new(|_: &(), amount: &u64| *amount <= 100);

        assert!(guard.check(&(), &100));
        assert!(!guard.check(&(), &101));
    }

    #[test]
    fn guard_is_deterministic() {
        let ctx = Counters {
            successes: 3,
            failures: 0,
        };
        let guard = Guard::new(|ctx: &Counters, _: &()| ctx.successes >= 2);

        let result1 = guard.check(&ctx, &());
        let result2 = guard.check(&ctx, &());
        assert_eq!(result1, result2);
    }

    #[test]
    fn guard_can_combine_context_and_params() {
        let guard =
            Guard::new(|ctx: &Counters, boost: &u32| ctx.successes + boost >= 5);

        let ctx = Counters {
            successes: 3,
            failures: 0,
        };
        assert!(guard.check(&ctx, &2));
        assert!(!guard.check(&ctx, &1));
    }
}
