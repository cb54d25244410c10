//! # Timing Primitives
//!
//! All time is counted in ticks of whichever program runs the activity.

use crate::activity::{Activity, Env, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DelayPc {
    #[default]
    Start,
    Check,
    Resumed,
}

/// Waits `n` ticks: completes in the `n`-th tick after the one it was
/// entered in. `Delay(0)` completes immediately.
#[derive(Debug, Default)]
pub struct Delay {
    pc: DelayPc,
    remaining: u32,
}

impl Delay {
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Activity for Delay {
    const NAME: &'static str = "Delay";
    type Args<'a> = u32;

    fn step(&mut self, _env: &mut Env<'_>, ticks: Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                DelayPc::Start => {
                    self.remaining = ticks;
                    self.pc = DelayPc::Check;
                }
                DelayPc::Check => {
                    if self.remaining == 0 {
                        return Status::Completed;
                    }
                    self.pc = DelayPc::Resumed;
                    return Status::Suspended;
                }
                DelayPc::Resumed => {
                    self.remaining -= 1;
                    self.pc = DelayPc::Check;
                }
            }
        }
    }
}

/// Yields for exactly one tick.
#[derive(Debug, Default)]
pub struct Pause {
    paused: bool,
}

impl Activity for Pause {
    const NAME: &'static str = "Pause";
    type Args<'a> = ();

    fn step(&mut self, _env: &mut Env<'_>, _: Self::Args<'_>) -> Status {
        if self.paused {
            return Status::Completed;
        }
        self.paused = true;
        Status::Suspended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::sim::SimBoard;

    fn ticks_until_done(ticks: u32) -> u32 {
        let mut board = SimBoard::new();
        let mut delay = Frame::<Delay>::default();
        delay.activate();
        let mut elapsed = 0;
        while delay.resume(&mut board.env(), ticks) == Status::Suspended {
            elapsed += 1;
            assert!(elapsed <= ticks, "delay overran");
        }
        elapsed
    }

    #[test]
    fn test_delay_zero_completes_on_entry() {
        assert_eq!(ticks_until_done(0), 0);
    }

    #[test]
    fn test_delay_counts_whole_ticks() {
        assert_eq!(ticks_until_done(1), 1);
        assert_eq!(ticks_until_done(3), 3);
        assert_eq!(ticks_until_done(30), 30);
    }

    #[test]
    fn test_delay_exposes_remaining() {
        let mut board = SimBoard::new();
        let mut delay = Frame::<Delay>::default();
        delay.activate();
        delay.resume(&mut board.env(), 3);
        assert_eq!(delay.state().remaining(), 3);
        delay.resume(&mut board.env(), 3);
        assert_eq!(delay.state().remaining(), 2);
    }

    #[test]
    fn test_pause_yields_once() {
        let mut board = SimBoard::new();
        let mut pause = Frame::<Pause>::default();
        pause.activate();
        assert_eq!(pause.resume(&mut board.env(), ()), Status::Suspended);
        assert_eq!(pause.resume(&mut board.env(), ()), Status::Completed);
    }
}
