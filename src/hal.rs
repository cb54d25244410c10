//! # Hardware Capabilities
//!
//! Narrow, synchronous interfaces the activities use to reach the outside
//! world. Drivers for a concrete strip, button or ADC implement [`Board`];
//! the scheduler core never touches hardware directly.
//!
//! Inputs are sampled once per tick by the driver and handed to every
//! activity as an immutable [`Inputs`] snapshot, so all branches of a tick
//! observe the same button edges.

/// An RGB color value as written to a strip LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(0xFF, 0, 0);
    pub const YELLOW: Rgb = Rgb::new(0xFF, 0xFF, 0);
    pub const GREEN: Rgb = Rgb::new(0, 0x80, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Button state for one tick.
///
/// `was_pressed` and `was_released` are edges: true only in the tick in
/// which the level changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Button {
    pub is_pressed: bool,
    pub was_pressed: bool,
    pub was_released: bool,
}

/// Snapshot of everything sampled at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inputs {
    pub button: Button,
}

/// Capabilities a board must provide.
///
/// Every call is expected to be cheap and non-blocking: activities invoke
/// them from inside a tick.
pub trait Board {
    /// Read the button level and the edges since the previous sample.
    fn sample_button(&mut self) -> Button;

    /// Read one raw sample from the potentiometer channel.
    fn read_pot(&mut self) -> u16;

    /// Set a strip LED in the output buffer. Takes effect on [`Board::show`].
    fn set_led(&mut self, index: usize, color: Rgb);

    /// Set the separate request indicator LED.
    fn set_indicator(&mut self, color: Rgb);

    /// Commit the output buffer to the strip.
    fn show(&mut self);

    /// Set global output brightness, `0..=MAX_BRIGHTNESS`.
    fn set_brightness(&mut self, level: u8);
}
