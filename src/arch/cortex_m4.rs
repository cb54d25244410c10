//! # Cortex-M4 Port Layer
//!
//! A drift-free [`TickSource`] built on the SysTick peripheral.
//!
//! SysTick counts down from its reload value at the core clock and reloads
//! itself in hardware, so its wrap period is exact regardless of how long
//! the tick body runs. Every wrap raises the SysTick exception, whose
//! handler bumps a wrap counter; time is reported as
//! `wraps · (reload + 1) + cycles into the current period`, converted to
//! microseconds.
//!
//! ```text
//!   reload ─┐      ┌─┐      ┌─┐      ┌─
//!            \     │  \     │  \     │
//!             \    │   \    │   \    │
//!              \   │    \   │    \   │
//!   0 ──────────\──┘─────\──┘─────\──┘──
//!                ▲        ▲        ▲
//!             SysTick  SysTick  SysTick   (WRAPS += 1)
//! ```
//!
//! Because wraps are counted by the exception, a tick body that runs for
//! several periods loses none of them. A wrap that has happened but whose
//! exception is still pending (the counter is read with interrupts masked)
//! is recovered from the PENDSTSET bit.
//!
//! The crate provides the `SysTick` handler symbol on bare-metal ARM
//! targets; the board must not define its own.

use core::cell::Cell;

use cortex_m::interrupt::{self, Mutex};
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{SCB, SYST};

use crate::config::{MAX_TICK_HZ, SYSTEM_CLOCK_HZ, SYSTICK_MAX_RELOAD};
use crate::driver::TickSource;
use crate::error::Error;

/// SysTick wraps since the source was started.
static WRAPS: Mutex<Cell<u64>> = Mutex::new(Cell::new(0));

// ---------------------------------------------------------------------------
// Reload and time conversion
// ---------------------------------------------------------------------------

/// SysTick reload value for `tick_hz` wraps per second at `clock_hz`.
///
/// # Errors
/// - `InvalidTickRate` if `tick_hz` is zero, above [`MAX_TICK_HZ`], or so
///   fast that a period is shorter than two core cycles (a zero reload
///   stops the counter).
/// - `ReloadOutOfRange` if the period does not fit the 24-bit counter.
pub const fn reload_for(clock_hz: u32, tick_hz: u32) -> Result<u32, Error> {
    if tick_hz == 0 || tick_hz > MAX_TICK_HZ {
        return Err(Error::InvalidTickRate { hz: tick_hz });
    }
    let cycles = clock_hz / tick_hz;
    if cycles < 2 {
        return Err(Error::InvalidTickRate { hz: tick_hz });
    }
    let reload = cycles - 1;
    if reload > SYSTICK_MAX_RELOAD {
        return Err(Error::ReloadOutOfRange { reload });
    }
    Ok(reload)
}

/// Core cycles to whole microseconds. Does not overflow for any `u64` cycle
/// count at clocks of 1 MHz and above.
pub const fn cycles_to_us(cycles: u64, clock_hz: u32) -> u64 {
    let clock = clock_hz as u64;
    if clock == 0 {
        return 0;
    }
    (cycles / clock) * 1_000_000 + (cycles % clock) * 1_000_000 / clock
}

// ---------------------------------------------------------------------------
// SysTick source
// ---------------------------------------------------------------------------

/// SysTick-backed time base.
pub struct SysTickSource {
    syst: SYST,
    reload: u32,
}

impl SysTickSource {
    /// Program SysTick to wrap `tick_hz` times per second and start it.
    ///
    /// # Errors
    /// See [`reload_for`].
    pub fn new(mut syst: SYST, tick_hz: u32) -> Result<Self, Error> {
        let reload = reload_for(SYSTEM_CLOCK_HZ, tick_hz)?;

        syst.disable_counter();
        interrupt::free(|cs| WRAPS.borrow(cs).set(0));
        syst.set_reload(reload);
        syst.clear_current();
        syst.set_clock_source(SystClkSource::Core);
        syst.enable_interrupt();
        syst.enable_counter();

        Ok(Self { syst, reload })
    }

    /// Release the peripheral.
    pub fn free(mut self) -> SYST {
        self.syst.disable_interrupt();
        self.syst.disable_counter();
        self.syst
    }

    /// Total core cycles since start.
    fn cycles(&self) -> u64 {
        let period = self.reload as u64 + 1;
        interrupt::free(|cs| {
            let mut wraps = WRAPS.borrow(cs).get();
            let mut current = SYST::get_current();
            if SCB::is_pendst_pending() {
                // Wrapped with the exception masked: count it and re-read,
                // since `current` may predate the wrap.
                wraps += 1;
                current = SYST::get_current();
            }
            let into_period = (self.reload - current.min(self.reload)) as u64;
            wraps * period + into_period
        })
    }
}

impl TickSource for SysTickSource {
    fn now(&mut self) -> u64 {
        cycles_to_us(self.cycles(), SYSTEM_CLOCK_HZ)
    }

    fn wait_until(&mut self, deadline: u64) {
        while self.now() < deadline {
            cortex_m::asm::nop();
        }
    }
}

// ---------------------------------------------------------------------------
// SysTick handler
// ---------------------------------------------------------------------------

/// SysTick exception handler: one call per counter wrap.
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[no_mangle]
pub extern "C" fn SysTick() {
    interrupt::free(|cs| {
        let wraps = WRAPS.borrow(cs);
        wraps.set(wraps.get() + 1);
    });
}
