//! Button press classification.
//!
//! After a press-start, a `PRESS_WINDOW_TICKS` timeout races a detector for
//! "released, then pressed again". Whatever finished first, the two flags
//! the detector left behind decide the class:
//!
//! | released | pressed again | class  |
//! |----------|---------------|--------|
//! | yes      | yes           | DOUBLE |
//! | yes      | no            | SHORT  |
//! | no       | any           | LONG   |
//!
//! The class is emitted for exactly one tick, then reset to NO.

use tracing::debug;

use crate::activity::{Activity, Env, Status};
use crate::config::PRESS_WINDOW_TICKS;
use crate::frame::Frame;
use crate::guard::until;
use crate::parallel::{Cobegin, Strength};
use crate::timing::{Delay, Pause};
use crate::wait_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Press {
    #[default]
    No,
    Short,
    Double,
    Long,
}

impl Press {
    fn classify(was_released: bool, was_pressed: bool) -> Press {
        if was_pressed {
            Press::Double
        } else if was_released {
            Press::Short
        } else {
            Press::Long
        }
    }
}

// ---------------------------------------------------------------------------
// Release-then-press detector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DetectPc {
    #[default]
    AwaitRelease,
    AwaitPress,
}

/// Sets the first flag on a release and the second on the next press.
#[derive(Debug, Default)]
pub struct DetectReleasePress {
    pc: DetectPc,
}

impl Activity for DetectReleasePress {
    const NAME: &'static str = "DetectReleasePress";
    type Args<'a> = (&'a mut bool, &'a mut bool);

    fn step(&mut self, env: &mut Env<'_>, (was_released, was_pressed): Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                DetectPc::AwaitRelease => {
                    wait_for!(until(env.input.button.was_released));
                    *was_released = true;
                    self.pc = DetectPc::AwaitPress;
                }
                DetectPc::AwaitPress => {
                    wait_for!(until(env.input.button.was_pressed));
                    *was_pressed = true;
                    return Status::Completed;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Recognizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RecognizerPc {
    #[default]
    Idle,
    AwaitPress,
    Race,
    Emitted,
}

/// Classifies presses into `Press` values, forever.
#[derive(Default)]
pub struct PressRecognizer {
    pc: RecognizerPc,
    was_released: bool,
    was_pressed: bool,
    race: Cobegin<2>,
    window: Frame<Delay>,
    detect: Frame<DetectReleasePress>,
    hold: Frame<Pause>,
}

impl Activity for PressRecognizer {
    const NAME: &'static str = "PressRecognizer";
    type Args<'a> = &'a mut Press;

    fn step(&mut self, env: &mut Env<'_>, press: Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                RecognizerPc::Idle => {
                    *press = Press::No;
                    self.pc = RecognizerPc::AwaitPress;
                }
                RecognizerPc::AwaitPress => {
                    wait_for!(until(env.input.button.was_pressed));
                    self.was_released = false;
                    self.was_pressed = false;
                    self.pc = RecognizerPc::Race;
                }
                RecognizerPc::Race => {
                    wait_for!(self.race.tick([Strength::Weak, Strength::Weak], |b| {
                        match b.index {
                            0 => self.window.branch(b, env, PRESS_WINDOW_TICKS),
                            _ => self.detect.branch(
                                b,
                                env,
                                (&mut self.was_released, &mut self.was_pressed),
                            ),
                        }
                    }));
                    *press = Press::classify(self.was_released, self.was_pressed);
                    debug!(press = ?*press, "press classified");
                    self.pc = RecognizerPc::Emitted;
                }
                RecognizerPc::Emitted => {
                    wait_for!(self.hold.run(env, ()));
                    self.pc = RecognizerPc::Idle;
                }
            }
        }
    }
}
