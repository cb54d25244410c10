//! # Activity Runtime
//!
//! An activity is a unit of control logic that runs to completion within a
//! tick or suspends at a declared point and continues there on the next
//! tick. Its persistent state (locals plus resume point) is the value of
//! the type implementing [`Activity`]; the type's `Default` is the zeroed
//! frame every activation starts from.
//!
//! ## Writing a body
//!
//! Bodies are explicit state machines over a private resume-point enum:
//!
//! ```text
//!   loop {
//!       match self.pc {
//!           Pc::A => { side effects; self.pc = Pc::B; return Suspended; }
//!           Pc::B => { wait_for!(child.run(..)); side effects; self.pc = Pc::C; }
//!           Pc::C => return Completed,
//!       }
//!   }
//! ```
//!
//! Every arm either advances `pc` before it suspends or starts with the
//! await it suspends on, so resuming never repeats a side effect that was
//! committed before the suspension. Every cyclic body must suspend at least
//! once per iteration; a body that spins without suspending is a defect.

use crate::hal::{Board, Inputs};

// ---------------------------------------------------------------------------
// Tick status
// ---------------------------------------------------------------------------

/// Result of advancing an activity by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Paused at a suspension point; resume on a later tick.
    Suspended,
    /// Reached the end of its body.
    Completed,
}

// ---------------------------------------------------------------------------
// Per-tick environment
// ---------------------------------------------------------------------------

/// What an activity can see and touch during one tick.
pub struct Env<'a> {
    /// Inputs sampled at the start of the tick.
    pub input: Inputs,
    /// Output and analog-input capabilities.
    pub board: &'a mut dyn Board,
}

impl<'a> Env<'a> {
    pub fn new(input: Inputs, board: &'a mut dyn Board) -> Self {
        Self { input, board }
    }
}

// ---------------------------------------------------------------------------
// Activity trait
// ---------------------------------------------------------------------------

/// A resumable body with persistent private state.
///
/// `Args` are the declared parameters, re-supplied by the caller on every
/// tick: plain values are passed by value, caller-owned state by
/// reference. An activity never sees another activity's frame.
pub trait Activity: Default {
    /// Name used in log records.
    const NAME: &'static str;

    type Args<'a>;

    /// Advance the body by one tick.
    fn step(&mut self, env: &mut Env<'_>, args: Self::Args<'_>) -> Status;
}

/// Call-and-wait: suspend the enclosing body for this tick unless the
/// expression reports [`Status::Completed`].
///
/// ```ignore
/// wait_for!(self.delay.run(env, 3));
/// // runs in the same tick the delay completes
/// ```
#[macro_export]
macro_rules! wait_for {
    ($status:expr) => {
        if let $crate::activity::Status::Suspended = $status {
            return $crate::activity::Status::Suspended;
        }
    };
}
