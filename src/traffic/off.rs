//! Off mode: a dark strip whose brightness the operator adjusts by hand.
//!
//! The mode waits until the potentiometer is being turned, lights every
//! lamp and then follows the filtered potentiometer value with the strip
//! brightness until the control has been left alone for a while.
//!
//! ```text
//!   sensor ──► filter ──► pot ──┬──► movement detector (start)
//!                               ├──► dimmer
//!                               └──► stop detector (end)
//! ```

use crate::activity::{Activity, Env, Status};
use crate::config::{
    CAR_LIGHT_START, DIMMER_QUIET_TICKS, MAX_BRIGHTNESS, PED_LIGHT_START, POT_MOVE_RUN,
    POT_STEPS_PER_LEVEL, POT_WINDOW,
};
use crate::frame::Frame;
use crate::parallel::{Cobegin, Strength};
use crate::timing::Delay;
use crate::wait_for;

use super::lights::{blank, render_all_lamps};

use Strength::{Strong, Weak};

// ---------------------------------------------------------------------------
// Potentiometer pipeline
// ---------------------------------------------------------------------------

/// Samples the potentiometer once per tick.
#[derive(Default)]
pub struct PotSensor;

impl Activity for PotSensor {
    const NAME: &'static str = "PotSensor";
    type Args<'a> = &'a mut u16;

    fn step(&mut self, env: &mut Env<'_>, value: Self::Args<'_>) -> Status {
        *value = env.board.read_pot();
        Status::Suspended
    }
}

/// Trimmed mean of `value` and the trailing window: the minimum and
/// maximum of the six samples are dropped and the other four averaged.
pub fn trimmed_mean(value: u16, window: &[u16; POT_WINDOW]) -> u16 {
    let (sum, min, max) = window.iter().fold(
        (u32::from(value), value, value),
        |(sum, min, max), &sample| (sum + u32::from(sample), min.min(sample), max.max(sample)),
    );
    // Four samples remain after trimming.
    ((sum - u32::from(min) - u32::from(max)) >> 2) as u16
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FilterPc {
    #[default]
    Prime,
    Filter,
}

/// Noise filter over a trailing window of `POT_WINDOW` previous values.
#[derive(Default)]
pub struct PotFilter {
    pc: FilterPc,
    window: [u16; POT_WINDOW],
}

impl Activity for PotFilter {
    const NAME: &'static str = "PotFilter";
    type Args<'a> = (u16, &'a mut u16);

    fn step(&mut self, _env: &mut Env<'_>, (value, filtered): Self::Args<'_>) -> Status {
        match self.pc {
            FilterPc::Prime => {
                self.window = [value; POT_WINDOW];
                *filtered = value;
                self.pc = FilterPc::Filter;
            }
            FilterPc::Filter => {
                *filtered = trimmed_mean(value, &self.window);
                self.window.rotate_left(1);
                self.window[POT_WINDOW - 1] = value;
            }
        }
        Status::Suspended
    }
}

/// Sensor followed by filter; writes the filtered value every tick.
#[derive(Default)]
pub struct PotProvider {
    sensor_value: u16,
    region: Cobegin<2>,
    sensor: Frame<PotSensor>,
    filter: Frame<PotFilter>,
}

impl Activity for PotProvider {
    const NAME: &'static str = "PotProvider";
    type Args<'a> = &'a mut u16;

    fn step(&mut self, env: &mut Env<'_>, pot: Self::Args<'_>) -> Status {
        self.region.tick([Strong, Strong], |b| match b.index {
            0 => self.sensor.branch(b, env, &mut self.sensor_value),
            _ => self.filter.branch(b, env, (self.sensor_value, &mut *pot)),
        })
    }
}

// ---------------------------------------------------------------------------
// Movement detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DetectorPc {
    #[default]
    Start,
    Sample,
    Check,
}

/// Completes, setting `did_detect`, once the value has changed in
/// `POT_MOVE_RUN` consecutive ticks. A tick without change restarts the
/// count.
#[derive(Default)]
pub struct PotDetector {
    pc: DetectorPc,
    count: u32,
    prev: u16,
}

impl Activity for PotDetector {
    const NAME: &'static str = "PotDetector";
    type Args<'a> = (u16, &'a mut bool);

    fn step(&mut self, _env: &mut Env<'_>, (value, did_detect): Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                DetectorPc::Start => {
                    self.prev = value;
                    self.pc = DetectorPc::Sample;
                }
                DetectorPc::Sample => {
                    self.count = if value != self.prev { self.count + 1 } else { 0 };
                    self.prev = value;
                    self.pc = DetectorPc::Check;
                    return Status::Suspended;
                }
                DetectorPc::Check => {
                    if self.count >= POT_MOVE_RUN {
                        *did_detect = true;
                        return Status::Completed;
                    }
                    self.pc = DetectorPc::Sample;
                }
            }
        }
    }
}

/// Brightness level for a filtered potentiometer value.
pub fn brightness_for(value: u16) -> u8 {
    let level = (value / POT_STEPS_PER_LEVEL).min(u16::from(MAX_BRIGHTNESS)) as u8;
    MAX_BRIGHTNESS - level
}

/// Follows the value with the strip brightness and commits every tick.
#[derive(Default)]
pub struct Dimmer;

impl Activity for Dimmer {
    const NAME: &'static str = "Dimmer";
    type Args<'a> = u16;

    fn step(&mut self, env: &mut Env<'_>, value: Self::Args<'_>) -> Status {
        env.board.set_brightness(brightness_for(value));
        env.board.show();
        Status::Suspended
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum StopPc {
    #[default]
    Open,
    Race,
}

/// Completes once a whole `DIMMER_QUIET_TICKS` window passes without the
/// movement detector firing; a detected turn restarts the window.
#[derive(Default)]
pub struct DimmerStopDetector {
    pc: StopPc,
    active: bool,
    region: Cobegin<2>,
    quiet: Frame<Delay>,
    detector: Frame<PotDetector>,
}

impl Activity for DimmerStopDetector {
    const NAME: &'static str = "DimmerStopDetector";
    type Args<'a> = u16;

    fn step(&mut self, env: &mut Env<'_>, value: Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                StopPc::Open => {
                    self.active = false;
                    self.pc = StopPc::Race;
                }
                StopPc::Race => {
                    wait_for!(self.region.tick([Weak, Weak], |b| match b.index {
                        0 => self.quiet.branch(b, env, DIMMER_QUIET_TICKS),
                        _ => self.detector.branch(b, env, (value, &mut self.active)),
                    }));
                    if !self.active {
                        return Status::Completed;
                    }
                    self.pc = StopPc::Open;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Off mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum OffPc {
    #[default]
    Blank,
    AwaitTurn,
    LightAll,
    Dim,
}

#[derive(Default)]
pub struct OffLight {
    pc: OffPc,
    pot: u16,
    await_turn: Cobegin<2>,
    dimming: Cobegin<3>,
    provider: Frame<PotProvider>,
    detector: Frame<PotDetector>,
    dimmer: Frame<Dimmer>,
    stop: Frame<DimmerStopDetector>,
}

impl OffLight {
    /// Latest filtered potentiometer value.
    #[inline]
    pub fn pot(&self) -> u16 {
        self.pot
    }
}

impl Activity for OffLight {
    const NAME: &'static str = "OffLight";
    type Args<'a> = ();

    fn step(&mut self, env: &mut Env<'_>, _: Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                OffPc::Blank => {
                    blank(env.board);
                    env.board.show();
                    self.pc = OffPc::AwaitTurn;
                }
                OffPc::AwaitTurn => {
                    // The detector completing is the signal; its flag is not needed.
                    let mut turned = false;
                    wait_for!(self.await_turn.tick([Weak, Strong], |b| match b.index {
                        0 => self.provider.branch(b, env, &mut self.pot),
                        _ => self.detector.branch(b, env, (self.pot, &mut turned)),
                    }));
                    self.pc = OffPc::LightAll;
                }
                OffPc::LightAll => {
                    render_all_lamps(env.board, PED_LIGHT_START);
                    render_all_lamps(env.board, CAR_LIGHT_START);
                    env.board.show();
                    self.pc = OffPc::Dim;
                }
                OffPc::Dim => {
                    wait_for!(self.dimming.tick([Weak, Weak, Strong], |b| match b.index {
                        0 => self.provider.branch(b, env, &mut self.pot),
                        1 => self.dimmer.branch(b, env, self.pot),
                        _ => self.stop.branch(b, env, self.pot),
                    }));
                    self.pc = OffPc::Blank;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::Rgb;
    use crate::sim::SimBoard;

    #[test]
    fn test_trimmed_mean_drops_extremes() {
        // 6 samples: 100, 0, 10, 20, 30, 1000 -> drop 0 and 1000.
        assert_eq!(trimmed_mean(100, &[0, 10, 20, 30, 1000]), 40);
        assert_eq!(trimmed_mean(7, &[7; POT_WINDOW]), 7);
    }

    #[test]
    fn test_trimmed_mean_does_not_overflow() {
        assert_eq!(trimmed_mean(u16::MAX, &[u16::MAX; POT_WINDOW]), u16::MAX);
    }

    #[test]
    fn test_filter_suppresses_single_spike() {
        let mut board = SimBoard::new();
        let mut filter = Frame::<PotFilter>::default();
        let mut filtered = 0;
        filter.activate();

        filter.resume(&mut board.env(), (400, &mut filtered));
        assert_eq!(filtered, 400);
        filter.resume(&mut board.env(), (4000, &mut filtered));
        assert_eq!(filtered, 400);
        filter.resume(&mut board.env(), (400, &mut filtered));
        assert_eq!(filtered, 400);
    }

    #[test]
    fn test_filter_follows_a_step() {
        let mut board = SimBoard::new();
        let mut filter = Frame::<PotFilter>::default();
        let mut filtered = 0;
        filter.activate();

        filter.resume(&mut board.env(), (0, &mut filtered));
        let outputs: Vec<u16> = (0..6)
            .map(|_| {
                filter.resume(&mut board.env(), (800, &mut filtered));
                filtered
            })
            .collect();
        assert_eq!(outputs, [0, 200, 400, 600, 800, 800]);
    }

    #[test]
    fn test_provider_filters_sensor_reads() {
        let mut board = SimBoard::new();
        let mut provider = Frame::<PotProvider>::default();
        let mut pot = 0;
        provider.activate();

        board.pot = 1200;
        provider.resume(&mut board.env(), &mut pot);
        provider.resume(&mut board.env(), &mut pot);
        assert_eq!(pot, 1200);
        assert_eq!(board.pot_reads, 2);
    }

    fn detect(values: &[u16]) -> Option<usize> {
        let mut board = SimBoard::new();
        let mut detector = Frame::<PotDetector>::default();
        let mut did = false;
        detector.activate();
        let done = values.iter().position(|value| {
            detector.resume(&mut board.env(), (*value, &mut did)) == Status::Completed
        });
        assert_eq!(done.is_some(), did);
        done
    }

    #[test]
    fn test_detector_needs_consecutive_moves() {
        // Moves in ticks 1..=5, completes in the tick after the fifth.
        assert_eq!(detect(&[0, 1, 2, 3, 4, 5, 5, 5]), Some(6));
    }

    #[test]
    fn test_detector_resets_on_still_tick() {
        assert_eq!(detect(&[0, 1, 2, 3, 4, 4, 5, 6, 7, 8, 9, 9, 9]), Some(11));
        assert_eq!(detect(&[0, 1, 2, 3, 3, 4, 5, 6, 6, 6]), None);
    }

    #[test]
    fn test_brightness_mapping() {
        assert_eq!(brightness_for(0), MAX_BRIGHTNESS);
        assert_eq!(brightness_for(199), MAX_BRIGHTNESS);
        assert_eq!(brightness_for(2000), 10);
        assert_eq!(brightness_for(4095), 0);
    }

    #[test]
    fn test_stop_detector_completes_after_quiet_window() {
        let mut board = SimBoard::new();
        let mut stop = Frame::<DimmerStopDetector>::default();
        stop.activate();

        let mut tick = 0;
        while stop.resume(&mut board.env(), 500) == Status::Suspended {
            tick += 1;
        }
        assert_eq!(tick, DIMMER_QUIET_TICKS);
    }

    #[test]
    fn test_stop_detector_restarts_while_turned() {
        let mut board = SimBoard::new();
        let mut stop = Frame::<DimmerStopDetector>::default();
        stop.activate();

        // Turn for 20 ticks: the detector fires in tick 6 and tick 12 ...
        let mut value = 0;
        for tick in 0..20 {
            value += 10;
            assert_eq!(stop.resume(&mut board.env(), value), Status::Suspended, "tick {tick}");
        }
        // ... so the control is still considered in use well past 30 ticks.
        let mut tick = 20;
        while stop.resume(&mut board.env(), value) == Status::Suspended {
            tick += 1;
            assert!(tick < 100);
        }
        assert!(tick > DIMMER_QUIET_TICKS);
    }

    #[test]
    fn test_off_light_cycle() {
        let mut board = SimBoard::new();
        board.leds = [Rgb::GREEN; 6];
        let mut off = Frame::<OffLight>::default();
        off.activate();

        board.pot = 1000;
        off.resume(&mut board.env(), ());
        assert!(board.strip.iter().all(|led| *led == Rgb::BLACK));

        // Still control: nothing lights up.
        for _ in 0..20 {
            off.resume(&mut board.env(), ());
        }
        assert!(board.strip.iter().all(|led| *led == Rgb::BLACK));

        // Turning lights every lamp, then brightness follows the control.
        let mut lit_at = None;
        for tick in 0..40 {
            board.pot += 200;
            off.resume(&mut board.env(), ());
            if board.strip.iter().all(|led| *led != Rgb::BLACK) {
                lit_at = Some(tick);
                break;
            }
        }
        assert!(lit_at.is_some());
        for _ in 0..4 {
            board.pot += 200;
            off.resume(&mut board.env(), ());
        }
        assert_eq!(board.brightness, brightness_for(off.state().pot()));

        // Left alone, the session ends and the strip goes dark again.
        for _ in 0..60 {
            off.resume(&mut board.env(), ());
        }
        assert!(board.strip.iter().all(|led| *led == Rgb::BLACK));
    }
}
