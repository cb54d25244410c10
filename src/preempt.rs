//! # Preemptor
//!
//! `when_abort`: runs a child tick by tick while watching a guard. Once
//! the child has had its entry tick, the guard is evaluated at the start
//! of every tick *before* the child is advanced; if it holds, the child is
//! torn down on the spot (its frame discarded, not drained) and the scope
//! ends in that same tick, reporting the cause. If the guard never holds,
//! the scope completes with the child.
//!
//! [`WhenAbort::tick_immediate`] also checks the guard in the entry tick,
//! so a scope entered with its guard already true never runs its child.

use tracing::debug;

use crate::activity::{Activity, Env, Status};
use crate::frame::Frame;
use crate::guard::Guard;

/// Outcome of advancing a preemption scope by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preemption<C> {
    /// The child suspended; the scope continues next tick.
    Running,
    /// The child ran to its end.
    Completed,
    /// The guard fired with this cause; the child was discarded.
    Aborted(C),
}

impl<C> Preemption<C> {
    /// Whether the scope has ended this tick, by completion or abort.
    #[inline]
    pub fn is_finished(&self) -> bool {
        !matches!(self, Preemption::Running)
    }
}

/// A guarded scope around child activity `A`, recording aborts of cause `C`.
pub struct WhenAbort<A, C = ()> {
    child: Frame<A>,
    cause: Option<C>,
}

impl<A: Activity, C> Default for WhenAbort<A, C> {
    fn default() -> Self {
        Self {
            child: Frame::default(),
            cause: None,
        }
    }
}

impl<A: Activity, C: Copy> WhenAbort<A, C> {
    /// Advance the scope; the guard is ignored in the entry tick.
    pub fn tick<G>(&mut self, guard: G, env: &mut Env<'_>, args: A::Args<'_>) -> Preemption<C>
    where
        G: Guard<Cause = C>,
    {
        if self.child.is_running() {
            if let Some(cause) = guard.evaluate() {
                return self.abort(cause);
            }
        } else {
            self.enter();
        }
        self.advance(env, args)
    }

    /// Advance the scope; the guard is also checked before entering.
    pub fn tick_immediate<G>(
        &mut self,
        guard: G,
        env: &mut Env<'_>,
        args: A::Args<'_>,
    ) -> Preemption<C>
    where
        G: Guard<Cause = C>,
    {
        if let Some(cause) = guard.evaluate() {
            return self.abort(cause);
        }
        if !self.child.is_running() {
            self.enter();
        }
        self.advance(env, args)
    }

    /// Cause of the most recent abort, cleared when the scope is re-entered.
    #[inline]
    pub fn cause(&self) -> Option<C> {
        self.cause
    }

    /// The wrapped child's frame.
    #[inline]
    pub fn child(&self) -> &Frame<A> {
        &self.child
    }

    fn enter(&mut self) {
        self.cause = None;
        self.child.activate();
    }

    fn abort(&mut self, cause: C) -> Preemption<C> {
        debug!(activity = A::NAME, "preempted");
        self.child.discard();
        self.cause = Some(cause);
        Preemption::Aborted(cause)
    }

    fn advance(&mut self, env: &mut Env<'_>, args: A::Args<'_>) -> Preemption<C> {
        match self.child.resume(env, args) {
            Status::Suspended => Preemption::Running,
            Status::Completed => Preemption::Completed,
        }
    }
}
