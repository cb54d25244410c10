//! # TTL Configuration
//!
//! Compile-time constants governing the tick driver and the traffic-light
//! program. All limits are fixed at compile time.
//! The few parameters a board port may want to choose at start-up are
//! carried by [`DriverConfig`] and validated before the driver runs.

use crate::error::Error;

// ---------------------------------------------------------------------------
// Driver timing
// ---------------------------------------------------------------------------

/// Outer tick frequency in Hz. Every delay in the outer program is counted
/// in ticks of this rate.
pub const TICK_HZ: u32 = 10;

/// The day-light program runs as a nested program advanced once every
/// `DAY_PROGRAM_DIVISOR` outer ticks (1 Hz at the default tick rate).
pub const DAY_PROGRAM_DIVISOR: u32 = 10;

/// System clock frequency in Hz feeding the SysTick counter.
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;

/// Largest reload value the 24-bit SysTick counter accepts.
pub const SYSTICK_MAX_RELOAD: u32 = 0x00FF_FFFF;

/// Fastest tick rate the microsecond timebase can express.
pub const MAX_TICK_HZ: u32 = 1_000_000;

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// Ticks after a press-start during which a release and a second press
/// are recognised. A press still held when the window closes is LONG.
pub const PRESS_WINDOW_TICKS: u32 = 3;

// ---------------------------------------------------------------------------
// Day-light phases (in slow ticks)
// ---------------------------------------------------------------------------

/// Maximum time the car light stays green when nobody requests a crossing.
pub const HOLD_TICKS: u32 = 10;

/// Minimum green time before a crossing request may end the hold phase.
pub const MIN_GREEN_TICKS: u32 = 4;

/// Time the pedestrian light stays green before the next cycle starts.
pub const REST_TICKS: u32 = 10;

/// Half period of the night-mode yellow blink, in outer ticks.
pub const NIGHT_BLINK_TICKS: u32 = 10;

// ---------------------------------------------------------------------------
// Potentiometer and dimming
// ---------------------------------------------------------------------------

/// Number of previous sensor values kept by the trailing filter window.
pub const POT_WINDOW: usize = 5;

/// Consecutive moving ticks required before the control counts as turned.
pub const POT_MOVE_RUN: u32 = 5;

/// A dimming session ends after this many ticks without a detected turn.
pub const DIMMER_QUIET_TICKS: u32 = 30;

/// Raw potentiometer steps per brightness level.
pub const POT_STEPS_PER_LEVEL: u16 = 200;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Number of LEDs on the strip: two lights of three LEDs each.
pub const LED_COUNT: usize = 6;

/// First strip index of the pedestrian light (K1).
pub const PED_LIGHT_START: usize = 0;

/// First strip index of the car light (K2).
pub const CAR_LIGHT_START: usize = 3;

/// Upper bound of the global output brightness.
pub const MAX_BRIGHTNESS: u8 = 20;

/// Brightness applied when the driver starts.
pub const INITIAL_BRIGHTNESS: u8 = 10;

// ---------------------------------------------------------------------------
// Runtime driver configuration
// ---------------------------------------------------------------------------

/// Start-up parameters of the tick driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Outer tick frequency in Hz.
    pub tick_hz: u32,
    /// Brightness applied before the first tick. Range: 0–`MAX_BRIGHTNESS`.
    pub initial_brightness: u8,
}

impl DriverConfig {
    /// The board defaults: 10 Hz ticks, brightness 10.
    pub const fn new() -> Self {
        Self {
            tick_hz: TICK_HZ,
            initial_brightness: INITIAL_BRIGHTNESS,
        }
    }

    /// Tick period in microseconds. Zero when `tick_hz` is zero; call
    /// [`validate`](Self::validate) first.
    #[inline]
    pub const fn period_us(&self) -> u64 {
        match 1_000_000u64.checked_div(self.tick_hz as u64) {
            Some(us) => us,
            None => 0,
        }
    }

    /// Reject configurations the driver cannot honour.
    pub fn validate(&self) -> Result<(), Error> {
        if self.tick_hz == 0 || self.tick_hz > MAX_TICK_HZ {
            return Err(Error::InvalidTickRate { hz: self.tick_hz });
        }
        if self.initial_brightness > MAX_BRIGHTNESS {
            return Err(Error::BrightnessOutOfRange {
                level: self.initial_brightness,
                max: MAX_BRIGHTNESS,
            });
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DriverConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.period_us(), 100_000);
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let config = DriverConfig {
            tick_hz: 0,
            ..DriverConfig::new()
        };
        assert_eq!(config.validate(), Err(Error::InvalidTickRate { hz: 0 }));
    }

    #[test]
    fn test_period_of_zero_rate_does_not_divide() {
        let config = DriverConfig {
            tick_hz: 0,
            ..DriverConfig::new()
        };
        assert_eq!(config.period_us(), 0);
    }

    #[test]
    fn test_rate_finer_than_a_microsecond_rejected() {
        let config = DriverConfig {
            tick_hz: MAX_TICK_HZ + 1,
            ..DriverConfig::new()
        };
        assert_eq!(
            config.validate(),
            Err(Error::InvalidTickRate { hz: MAX_TICK_HZ + 1 })
        );
        let fastest = DriverConfig {
            tick_hz: MAX_TICK_HZ,
            ..DriverConfig::new()
        };
        assert_eq!(fastest.validate(), Ok(()));
        assert_eq!(fastest.period_us(), 1);
    }

    #[test]
    fn test_brightness_above_range_rejected() {
        let config = DriverConfig {
            initial_brightness: MAX_BRIGHTNESS + 1,
            ..DriverConfig::new()
        };
        assert_eq!(
            config.validate(),
            Err(Error::BrightnessOutOfRange {
                level: MAX_BRIGHTNESS + 1,
                max: MAX_BRIGHTNESS,
            })
        );
    }

    #[test]
    fn test_layout_fits_strip() {
        assert!(PED_LIGHT_START + 3 <= LED_COUNT);
        assert!(CAR_LIGHT_START + 3 <= LED_COUNT);
        assert!(MIN_GREEN_TICKS <= HOLD_TICKS);
    }
}
