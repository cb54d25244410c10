//! # Mode Dispatch
//!
//! The root of the traffic-light program. A press recognizer and the mode
//! dispatcher run side by side; the dispatcher keeps exactly one mode
//! running inside a preemption scope and lets the classified press that
//! ended it pick the next one.
//!
//! ```text
//!            SHORT / NO                 DOUBLE
//!   ┌──────────────────────┐      ┌──────────────┐
//!   │         Day          │─────►│    Night     │
//!   │ ends on LONG, DOUBLE │      │ ends on any  │
//!   └──────────────────────┘◄─────│    press     │
//!        │        ▲     SHORT     └──────────────┘
//!   LONG │        │ SHORT              ▲   │
//!        ▼        │             DOUBLE │   │ LONG
//!   ┌──────────────────────┐           │   │
//!   │         Off          │───────────┘   │
//!   │ ends on any press    │◄──────────────┘
//!   └──────────────────────┘
//! ```
//!
//! Every mode starts from a zeroed frame when it is entered, so nothing a
//! mode was doing when it was preempted survives into its next visit.

use tracing::info;

use crate::activity::{Activity, Env, Status};
use crate::frame::Frame;
use crate::guard::AnyOf;
use crate::parallel::{Cobegin, Strength};
use crate::preempt::{Preemption, WhenAbort};

use super::day::DayLight;
use super::lights::clear_indicator;
use super::night::NightLight;
use super::off::OffLight;
use super::press::{Press, PressRecognizer};

/// Top-level operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Day,
    Night,
    Off,
}

impl Mode {
    /// Mode selected by a classified press.
    pub const fn for_press(press: Press) -> Mode {
        match press {
            Press::No | Press::Short => Mode::Day,
            Press::Double => Mode::Night,
            Press::Long => Mode::Off,
        }
    }
}

/// Runs one mode at a time and switches on presses.
#[derive(Default)]
pub struct Dispatcher {
    mode: Option<Mode>,
    day: WhenAbort<DayLight, Press>,
    night: WhenAbort<NightLight, Press>,
    off: WhenAbort<OffLight, Press>,
}

impl Dispatcher {
    /// The mode currently running, if one has been selected.
    #[inline]
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    #[inline]
    pub fn day(&self) -> &WhenAbort<DayLight, Press> {
        &self.day
    }

    fn advance(&mut self, mode: Mode, env: &mut Env<'_>, press: Press) -> Preemption<Press> {
        // Night and off end on any new press; the press names the next mode.
        let any_press = (press != Press::No).then_some(press);
        match mode {
            Mode::Day => self.day.tick(
                AnyOf([
                    (press == Press::Long, Press::Long),
                    (press == Press::Double, Press::Double),
                ]),
                env,
                press == Press::Short,
            ),
            Mode::Night => self.night.tick(any_press, env, ()),
            Mode::Off => self.off.tick(any_press, env, ()),
        }
    }
}

impl Activity for Dispatcher {
    const NAME: &'static str = "Dispatcher";
    type Args<'a> = Press;

    fn step(&mut self, env: &mut Env<'_>, press: Self::Args<'_>) -> Status {
        loop {
            let Some(mode) = self.mode else {
                let mode = Mode::for_press(press);
                info!(?mode, ?press, "mode switch");
                self.mode = Some(mode);
                continue;
            };

            if !self.advance(mode, env, press).is_finished() {
                return Status::Suspended;
            }
            if mode == Mode::Day {
                clear_indicator(env.board);
            }
            self.mode = None;
        }
    }
}

/// The whole controller: classify presses and dispatch modes, forever.
#[derive(Default)]
pub struct TrafficLight {
    press: Press,
    region: Cobegin<2>,
    recognizer: Frame<PressRecognizer>,
    dispatcher: Frame<Dispatcher>,
}

impl TrafficLight {
    /// Press classified in the last tick.
    #[inline]
    pub fn press(&self) -> Press {
        self.press
    }

    #[inline]
    pub fn mode(&self) -> Option<Mode> {
        self.dispatcher.state().mode()
    }

    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher {
        self.dispatcher.state()
    }
}

impl Activity for TrafficLight {
    const NAME: &'static str = "TrafficLight";
    type Args<'a> = ();

    fn step(&mut self, env: &mut Env<'_>, _: Self::Args<'_>) -> Status {
        self.region
            .tick([Strength::Strong, Strength::Strong], |b| match b.index {
                0 => self.recognizer.branch(b, env, &mut self.press),
                _ => self.dispatcher.branch(b, env, self.press),
            })
    }
}
