//! # Sequencer
//!
//! "Run and wait": a parent calls a child activity as if it were a plain
//! statement. The child is activated on first encounter and resumed on
//! every following tick until it completes; the parent continues in the
//! same tick the child completes, so a sequence of children costs exactly
//! the sum of their tick counts.

use crate::activity::{Activity, Env, Status};
use crate::frame::Frame;

impl<A: Activity> Frame<A> {
    /// Advance a sequentially called child.
    ///
    /// Activates the frame if it is idle or has completed, then resumes it.
    /// Use with [`wait_for!`](crate::wait_for) so the parent suspends while
    /// the child does.
    pub fn run(&mut self, env: &mut Env<'_>, args: A::Args<'_>) -> Status {
        if !self.is_running() {
            self.activate();
        }
        self.resume(env, args)
    }
}
