//! # Parallel Composer
//!
//! A `cobegin` region advances a fixed set of branches within the same
//! tick, always in declaration order. Each branch is either:
//!
//! - **Strong**: the region completes once every strong branch has.
//! - **Weak**: advanced alongside, but never holds the region open; when
//!   the strong branches finish, still-running weak branches are abandoned.
//!
//! A region with no strong branch is a race: it completes in the first
//! tick in which any branch completes. In either case every branch still
//! running is advanced in that tick before completion is decided, and the
//! region reports completion in that same tick.
//!
//! The region does not own its children; the parent keeps their frames
//! and advances them from a closure. On every entry the closure is told
//! the branch is fresh, so frames are activated before their first step.
//! When the region completes, every branch that has not completed is
//! handed to the closure once more marked `abandon`; [`Frame::branch`]
//! then discards the frame without stepping it.
//!
//! Two strong branches must not write the same output in one tick unless
//! one write set contains the other.

use crate::activity::{Activity, Env, Status};
use crate::frame::Frame;

/// Termination role of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Strong,
    Weak,
}

/// Handle passed to the branch closure for one advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    /// Position of the branch in the region, `0..N`.
    pub index: usize,
    /// First advance since the region was (re-)entered.
    pub fresh: bool,
    /// The region has completed without this branch: drop its frame.
    pub abandon: bool,
}

/// State of one `cobegin` region with `N` branches.
#[derive(Debug, Clone, Copy)]
pub struct Cobegin<const N: usize> {
    entered: bool,
    done: [bool; N],
}

impl<const N: usize> Default for Cobegin<N> {
    fn default() -> Self {
        Self {
            entered: false,
            done: [false; N],
        }
    }
}

impl<const N: usize> Cobegin<N> {
    /// Advance the region by one tick.
    ///
    /// `advance` is called once per branch that has not completed in this
    /// entry, in index order, and returns that branch's status. In the tick
    /// the region completes it is called again for each branch still
    /// running, with `abandon` set; the returned status is ignored.
    pub fn tick(
        &mut self,
        roles: [Strength; N],
        mut advance: impl FnMut(Branch) -> Status,
    ) -> Status {
        let fresh = !self.entered;
        if fresh {
            self.entered = true;
            self.done = [false; N];
        }

        for index in 0..N {
            if self.done[index] {
                continue;
            }
            let branch = Branch {
                index,
                fresh,
                abandon: false,
            };
            if advance(branch) == Status::Completed {
                self.done[index] = true;
            }
        }

        let has_strong = roles.iter().any(|role| *role == Strength::Strong);
        let finished = if has_strong {
            roles
                .iter()
                .zip(self.done.iter())
                .all(|(role, done)| *role == Strength::Weak || *done)
        } else {
            self.done.iter().any(|done| *done)
        };

        if finished {
            for index in (0..N).filter(|index| !self.done[*index]) {
                advance(Branch {
                    index,
                    fresh: false,
                    abandon: true,
                });
            }
            // The next tick re-enters the region from scratch.
            self.entered = false;
            Status::Completed
        } else {
            Status::Suspended
        }
    }

    /// Whether branch `index` has completed in the current entry.
    #[inline]
    pub fn is_done(&self, index: usize) -> bool {
        self.entered && self.done[index]
    }
}

impl<A: Activity> Frame<A> {
    /// Advance a child as a branch of a region, activating it on entry and
    /// discarding it when the region abandons it.
    pub fn branch(&mut self, branch: Branch, env: &mut Env<'_>, args: A::Args<'_>) -> Status {
        if branch.abandon {
            self.discard();
            return Status::Suspended;
        }
        if branch.fresh {
            self.activate();
        }
        self.resume(env, args)
    }
}
