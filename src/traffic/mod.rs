//! # Traffic-Light Program
//!
//! A pedestrian crossing with two three-lamp lights on one LED strip, a
//! single push button and a potentiometer, written entirely in terms of
//! the activity primitives. [`TrafficLight`] is the root activity handed
//! to the driver.

pub mod day;
pub mod dispatch;
pub mod lights;
pub mod night;
pub mod off;
pub mod press;

pub use dispatch::{Dispatcher, Mode, TrafficLight};
pub use lights::{Color, Light, Lights};
pub use press::Press;
