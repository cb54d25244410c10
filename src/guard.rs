//! # Guards
//!
//! A guard is a pure condition over the current inputs and in-scope state,
//! rebuilt and re-evaluated every tick. It carries no state of its own.
//! When it holds it yields a *cause*, so a scope guarded by a disjunction
//! can tell its caller which arm fired.

use crate::activity::Status;

/// A condition that may fire with a cause.
pub trait Guard {
    type Cause: Copy;

    /// `Some(cause)` if the condition holds this tick.
    fn evaluate(&self) -> Option<Self::Cause>;
}

impl Guard for bool {
    type Cause = ();

    #[inline]
    fn evaluate(&self) -> Option<()> {
        self.then_some(())
    }
}

impl<C: Copy> Guard for Option<C> {
    type Cause = C;

    #[inline]
    fn evaluate(&self) -> Option<C> {
        *self
    }
}

/// Disjunction of conditions, each tagged with the cause it reports.
/// Arms are tested in order; the first that holds wins.
#[derive(Debug, Clone, Copy)]
pub struct AnyOf<C, const N: usize>(pub [(bool, C); N]);

impl<C: Copy, const N: usize> Guard for AnyOf<C, N> {
    type Cause = C;

    fn evaluate(&self) -> Option<C> {
        self.0
            .iter()
            .find(|(holds, _)| *holds)
            .map(|(_, cause)| *cause)
    }
}

/// Await: completes in the tick `cond` holds, suspends otherwise.
///
/// ```ignore
/// wait_for!(until(env.input.button.was_released));
/// ```
#[inline]
pub fn until(cond: bool) -> Status {
    if cond {
        Status::Completed
    } else {
        Status::Suspended
    }
}
