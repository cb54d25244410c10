//! Signal state and its rendering on the strip.
//!
//! Each light occupies three consecutive strip LEDs mounted upside down:
//! green at `start`, yellow at `start + 1`, red at `start + 2`.

use core::fmt;

use crate::config::{CAR_LIGHT_START, LED_COUNT, PED_LIGHT_START};
use crate::hal::{Board, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Red,
    RedYellow,
    Yellow,
    Green,
}

impl Color {
    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::RedYellow => "RED-YELLOW",
            Color::Yellow => "YELLOW",
            Color::Green => "GREEN",
        }
    }

    /// LED colors for the (red, yellow, green) lamps.
    const fn lamps(self) -> [Rgb; 3] {
        match self {
            Color::Red => [Rgb::RED, Rgb::BLACK, Rgb::BLACK],
            Color::RedYellow => [Rgb::RED, Rgb::YELLOW, Rgb::BLACK],
            Color::Yellow => [Rgb::BLACK, Rgb::YELLOW, Rgb::BLACK],
            Color::Green => [Rgb::BLACK, Rgb::BLACK, Rgb::GREEN],
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Light {
    pub color: Color,
}

/// The light pair shared by the day-light controller and its presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lights {
    /// Pedestrian light, K1.
    pub ped: Light,
    /// Car light, K2.
    pub car: Light,
}

/// Strip indices of the (red, yellow, green) lamps of the light at `start`.
const fn lamp_indices(start: usize) -> [usize; 3] {
    [start + 2, start + 1, start]
}

/// Write one light into the output buffer.
pub fn render_light(board: &mut dyn Board, start: usize, light: Light) {
    let lamps = light.color.lamps();
    for (index, color) in lamp_indices(start).into_iter().zip(lamps) {
        board.set_led(index, color);
    }
}

/// Write both lights into the output buffer.
pub fn render_lights(board: &mut dyn Board, lights: &Lights) {
    render_light(board, PED_LIGHT_START, lights.ped);
    render_light(board, CAR_LIGHT_START, lights.car);
}

/// Light every lamp of the light at `start`.
pub fn render_all_lamps(board: &mut dyn Board, start: usize) {
    let [red, yellow, green] = lamp_indices(start);
    board.set_led(red, Rgb::RED);
    board.set_led(yellow, Rgb::YELLOW);
    board.set_led(green, Rgb::GREEN);
}

/// Turn the whole strip off in the output buffer.
pub fn blank(board: &mut dyn Board) {
    for index in 0..LED_COUNT {
        board.set_led(index, Rgb::BLACK);
    }
}

/// Clear the pedestrian request indicator and commit.
pub fn clear_indicator(board: &mut dyn Board) {
    board.set_indicator(Rgb::BLACK);
    board.show();
}
