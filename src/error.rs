//! # Errors
//!
//! Activity bodies are total and never fail. The only fallible boundary is
//! bringing the runtime up: validating the driver configuration and
//! programming the tick hardware.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Tick rate is zero, finer than the microsecond timebase, or too fast
    /// for the core clock to count.
    #[error("tick rate {hz} Hz is outside 1..=1000000 or faster than the core clock allows")]
    InvalidTickRate { hz: u32 },

    #[error("brightness {level} exceeds the maximum of {max}")]
    BrightnessOutOfRange { level: u8, max: u8 },

    /// The requested period does not fit the 24-bit SysTick counter.
    #[error("SysTick reload {reload:#x} does not fit in 24 bits")]
    ReloadOutOfRange { reload: u32 },
}
