//! # Tick Driver
//!
//! The outermost loop. Once per period it samples the inputs, advances the
//! root program by one tick, and sleeps until the next deadline.
//!
//! ## Drift-Free Schedule
//!
//! Deadlines are absolute: the k-th tick is due at `start + k · period`,
//! independent of how long earlier ticks took. A tick that finishes after
//! its deadline is counted as an overrun and the next one starts at once,
//! so the schedule catches up instead of sliding.
//!
//! ```text
//!   start        +P           +2P          +3P
//!   |──tick──|···|──tick────────|─tick─|···|
//!                               ^ late: no sleep, next deadline stays +3P
//! ```
//!
//! ## Nested Programs
//!
//! A [`Program`] is an independently clocked activity tree. Its frame must
//! be explicitly activated before the first tick and again whenever it is
//! switched back into use, so no stale suspension point survives from an
//! earlier activation. The caller decides the rate by choosing which of its
//! own ticks advance the program.

use tracing::{debug, trace, warn};

use crate::activity::{Activity, Env, Status};
use crate::config::DriverConfig;
use crate::error::Error;
use crate::frame::{Frame, Lifecycle};
use crate::hal::{Board, Inputs};

// ---------------------------------------------------------------------------
// Time source
// ---------------------------------------------------------------------------

/// Monotonic time base of the driver, in microseconds.
pub trait TickSource {
    fn now(&mut self) -> u64;

    /// Block until `now() >= deadline`. Returns at once if already past.
    fn wait_until(&mut self, deadline: u64);
}

// ---------------------------------------------------------------------------
// Nested program
// ---------------------------------------------------------------------------

/// An activity tree with its own clock and an explicit activation step.
pub struct Program<A> {
    frame: Frame<A>,
    ticks: u64,
}

impl<A: Activity> Default for Program<A> {
    fn default() -> Self {
        Self {
            frame: Frame::default(),
            ticks: 0,
        }
    }
}

impl<A: Activity> Program<A> {
    /// Zero the program's frame tree and restart its tick count.
    pub fn activate(&mut self) {
        debug!(program = A::NAME, "program activated");
        self.frame.activate();
        self.ticks = 0;
    }

    /// Advance the program by one of its own ticks.
    ///
    /// The program must have been activated and must not have completed.
    pub fn tick(&mut self, env: &mut Env<'_>, args: A::Args<'_>) -> Status {
        self.ticks += 1;
        self.frame.resume(env, args)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.frame.is_running()
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.frame.lifecycle()
    }

    /// Ticks since the last activation.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The program's root frame.
    #[inline]
    pub fn frame(&self) -> &Frame<A> {
        &self.frame
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Timing statistics of a running driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickStats {
    /// Ticks executed.
    pub ticks: u64,
    /// Ticks that finished after the following deadline.
    pub overruns: u32,
    /// Worst observed lateness in microseconds.
    pub max_late_us: u64,
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Runs a root activity at a fixed rate on a board.
pub struct Driver<A, B, T> {
    root: Program<A>,
    board: B,
    clock: T,
    period_us: u64,
    next_wake: u64,
    stats: TickStats,
}

impl<A, B, T> Driver<A, B, T>
where
    A: for<'a> Activity<Args<'a> = ()>,
    B: Board,
    T: TickSource,
{
    /// Validate the configuration, apply the initial brightness and
    /// activate the root program. The schedule starts at `clock.now()`.
    pub fn new(config: DriverConfig, mut board: B, mut clock: T) -> Result<Self, Error> {
        config.validate()?;
        board.set_brightness(config.initial_brightness);

        let mut root = Program::default();
        root.activate();

        let next_wake = clock.now();
        Ok(Self {
            root,
            board,
            clock,
            period_us: config.period_us(),
            next_wake,
            stats: TickStats::default(),
        })
    }

    /// Sample inputs and advance the root program by one tick.
    pub fn step(&mut self) -> Status {
        let input = Inputs {
            button: self.board.sample_button(),
        };
        let mut env = Env::new(input, &mut self.board);
        let status = self.root.tick(&mut env, ());
        self.stats.ticks += 1;
        trace!(tick = self.stats.ticks, "tick done");
        status
    }

    /// Sleep until the next absolute deadline.
    pub fn wait_next(&mut self) {
        self.next_wake += self.period_us;
        let now = self.clock.now();
        if now > self.next_wake {
            let late = now - self.next_wake;
            self.stats.overruns += 1;
            self.stats.max_late_us = self.stats.max_late_us.max(late);
            warn!(tick = self.stats.ticks, late_us = late, "tick overran its period");
        }
        self.clock.wait_until(self.next_wake);
    }

    /// Run `ticks` periods, stopping early if the root completes.
    pub fn run_for(&mut self, ticks: u64) -> Status {
        for _ in 0..ticks {
            if self.step() == Status::Completed {
                return Status::Completed;
            }
            self.wait_next();
        }
        Status::Suspended
    }

    /// Run forever. A root that completes is left idle and the driver
    /// keeps the schedule without ticking it.
    pub fn run(&mut self) -> ! {
        loop {
            if self.root.is_active() {
                self.step();
            }
            self.wait_next();
        }
    }

    #[inline]
    pub fn stats(&self) -> TickStats {
        self.stats
    }

    #[inline]
    pub fn root(&self) -> &Program<A> {
        &self.root
    }

    #[inline]
    pub fn board(&self) -> &B {
        &self.board
    }

    #[inline]
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    #[inline]
    pub fn clock_mut(&mut self) -> &mut T {
        &mut self.clock
    }
}
