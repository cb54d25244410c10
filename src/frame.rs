//! # Frame Store
//!
//! A [`Frame`] is the record holding one activity instance's persistent
//! state across ticks, together with its lifecycle. Frames are plain values
//! embedded in the frame of the activity that owns the call site, so the
//! whole program is a statically shaped tree of records: resetting a
//! subtree is a single assignment and nothing is ever allocated.
//!
//! Each frame has exactly one owner and is only mutated by its own body.
//! A frame a region abandons or a scope aborts is discarded back to
//! `Idle`, so whichever call site reaches it next starts it afresh.

use tracing::trace;

use crate::activity::{Activity, Env, Status};

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle of a frame.
///
/// ```text
///   ┌──────┐  activate()  ┌─────────┐  body ends  ┌───────────┐
///   │ Idle │ ───────────► │ Running │ ──────────► │ Completed │
///   └──────┘              └─────────┘             └───────────┘
///      ▲                     │   ▲                     │
///      │      discard()      │   │     activate()      │
///      └─────────────────────┘   └─────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Never activated, or discarded by an abort.
    #[default]
    Idle,
    /// Activated and suspended somewhere in its body.
    Running,
    /// Reached the end of its body; must be re-activated before reuse.
    Completed,
}

// ---------------------------------------------------------------------------
// Frame record
// ---------------------------------------------------------------------------

/// Persistent state of one activity instance.
pub struct Frame<A> {
    state: A,
    lifecycle: Lifecycle,
}

impl<A: Activity> Default for Frame<A> {
    fn default() -> Self {
        Self {
            state: A::default(),
            lifecycle: Lifecycle::Idle,
        }
    }
}

impl<A: Activity> Frame<A> {
    /// Zero the frame and mark it ready to run from the start of its body.
    pub fn activate(&mut self) {
        trace!(activity = A::NAME, "frame activated");
        self.state = A::default();
        self.lifecycle = Lifecycle::Running;
    }

    /// Advance an activated frame by one tick.
    ///
    /// Resuming an idle or completed frame is a contract violation; the
    /// caller must [`activate`](Frame::activate) first.
    pub fn resume(&mut self, env: &mut Env<'_>, args: A::Args<'_>) -> Status {
        debug_assert_eq!(
            self.lifecycle,
            Lifecycle::Running,
            "{} resumed without activation",
            A::NAME
        );
        let status = self.state.step(env, args);
        if status == Status::Completed {
            self.lifecycle = Lifecycle::Completed;
        }
        status
    }

    /// Drop the frame without running it to completion. The stale state
    /// stays in place but is never resumed; the next activation zeroes it.
    #[inline]
    pub fn discard(&mut self) {
        self.lifecycle = Lifecycle::Idle;
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Read-only view of the persisted state.
    #[inline]
    pub fn state(&self) -> &A {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBoard;

    /// Counts its own steps and completes after `limit` of them.
    #[derive(Default)]
    struct Counter {
        steps: u32,
    }

    impl Activity for Counter {
        const NAME: &'static str = "Counter";
        type Args<'a> = u32;

        fn step(&mut self, _env: &mut Env<'_>, limit: Self::Args<'_>) -> Status {
            self.steps += 1;
            if self.steps >= limit {
                Status::Completed
            } else {
                Status::Suspended
            }
        }
    }

    #[test]
    fn test_new_frame_is_idle() {
        let frame = Frame::<Counter>::default();
        assert_eq!(frame.lifecycle(), Lifecycle::Idle);
        assert_eq!(frame.state().steps, 0);
    }

    #[test]
    fn test_state_persists_across_suspensions() {
        let mut board = SimBoard::new();
        let mut frame = Frame::<Counter>::default();
        frame.activate();

        assert_eq!(frame.resume(&mut board.env(), 3), Status::Suspended);
        assert_eq!(frame.resume(&mut board.env(), 3), Status::Suspended);
        assert_eq!(frame.state().steps, 2);
        assert_eq!(frame.resume(&mut board.env(), 3), Status::Completed);
        assert_eq!(frame.lifecycle(), Lifecycle::Completed);
        // Terminal values are kept until the next activation.
        assert_eq!(frame.state().steps, 3);
    }

    #[test]
    fn test_activate_zeroes_state() {
        let mut board = SimBoard::new();
        let mut frame = Frame::<Counter>::default();
        frame.activate();
        frame.resume(&mut board.env(), 5);
        frame.resume(&mut board.env(), 5);

        frame.activate();
        assert_eq!(frame.state().steps, 0);
        assert!(frame.is_running());
    }

    #[test]
    fn test_discard_returns_to_idle() {
        let mut board = SimBoard::new();
        let mut frame = Frame::<Counter>::default();
        frame.activate();
        frame.resume(&mut board.env(), 5);

        frame.discard();
        assert_eq!(frame.lifecycle(), Lifecycle::Idle);
    }

    #[test]
    #[should_panic(expected = "resumed without activation")]
    fn test_resume_completed_frame_without_reset_panics() {
        let mut board = SimBoard::new();
        let mut frame = Frame::<Counter>::default();
        frame.activate();
        assert_eq!(frame.resume(&mut board.env(), 1), Status::Completed);
        frame.resume(&mut board.env(), 1);
    }

    #[test]
    #[should_panic(expected = "resumed without activation")]
    fn test_resume_idle_frame_panics() {
        let mut board = SimBoard::new();
        let mut frame = Frame::<Counter>::default();
        frame.resume(&mut board.env(), 1);
    }
}
