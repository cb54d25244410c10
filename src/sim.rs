//! # Host Simulation
//!
//! A [`Board`] and a [`TickSource`] that run on the host, for tests and
//! desktop simulations of the controller. The button is driven by a
//! scripted level from which edges are derived exactly like a polled
//! hardware button; every output is recorded for inspection.

use crate::activity::Env;
use crate::config::LED_COUNT;
use crate::driver::TickSource;
use crate::hal::{Board, Button, Inputs, Rgb};

/// Simulated board with a scripted button and potentiometer.
#[derive(Debug, Clone)]
pub struct SimBoard {
    held: bool,
    was_held: bool,
    /// Value returned by every potentiometer read.
    pub pot: u16,
    /// Output buffer as last written.
    pub leds: [Rgb; LED_COUNT],
    /// Strip contents as of the last `show`.
    pub strip: [Rgb; LED_COUNT],
    pub indicator: Rgb,
    pub brightness: u8,
    /// Number of `show` calls.
    pub shows: u32,
    /// Number of potentiometer reads.
    pub pot_reads: u32,
}

impl SimBoard {
    pub const fn new() -> Self {
        Self {
            held: false,
            was_held: false,
            pot: 0,
            leds: [Rgb::BLACK; LED_COUNT],
            strip: [Rgb::BLACK; LED_COUNT],
            indicator: Rgb::BLACK,
            brightness: 0,
            shows: 0,
            pot_reads: 0,
        }
    }

    /// Set the button level seen by the next sample.
    #[inline]
    pub fn set_held(&mut self, held: bool) {
        self.held = held;
    }

    /// Sample the button and build the environment for one tick.
    pub fn env(&mut self) -> Env<'_> {
        let input = Inputs {
            button: self.sample_button(),
        };
        Env::new(input, self)
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for SimBoard {
    fn sample_button(&mut self) -> Button {
        let button = Button {
            is_pressed: self.held,
            was_pressed: self.held && !self.was_held,
            was_released: !self.held && self.was_held,
        };
        self.was_held = self.held;
        button
    }

    fn read_pot(&mut self) -> u16 {
        self.pot_reads += 1;
        self.pot
    }

    fn set_led(&mut self, index: usize, color: Rgb) {
        self.leds[index] = color;
    }

    fn set_indicator(&mut self, color: Rgb) {
        self.indicator = color;
    }

    fn show(&mut self) {
        self.strip = self.leds;
        self.shows += 1;
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }
}

/// A clock that only moves when told to; `wait_until` jumps forward.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now_us: u64,
}

impl ManualClock {
    pub const fn new() -> Self {
        Self { now_us: 0 }
    }

    /// Simulate processing time.
    #[inline]
    pub fn advance(&mut self, us: u64) {
        self.now_us += us;
    }
}

impl TickSource for ManualClock {
    fn now(&mut self) -> u64 {
        self.now_us
    }

    fn wait_until(&mut self, deadline: u64) {
        self.now_us = self.now_us.max(deadline);
    }
}
