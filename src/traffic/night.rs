//! Night mode: both yellow lamps blink together, everything else dark.

use crate::activity::{Activity, Env, Status};
use crate::config::{CAR_LIGHT_START, NIGHT_BLINK_TICKS, PED_LIGHT_START};
use crate::frame::Frame;
use crate::hal::{Board, Rgb};
use crate::timing::Delay;
use crate::wait_for;

use super::lights::blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum NightPc {
    #[default]
    Blank,
    On,
    HoldOn,
    Off,
    HoldOff,
}

fn set_yellow_lamps(board: &mut dyn Board, color: Rgb) {
    board.set_led(PED_LIGHT_START + 1, color);
    board.set_led(CAR_LIGHT_START + 1, color);
    board.show();
}

/// Blinks the yellow lamps with a `NIGHT_BLINK_TICKS` half period.
#[derive(Default)]
pub struct NightLight {
    pc: NightPc,
    delay: Frame<Delay>,
}

impl Activity for NightLight {
    const NAME: &'static str = "NightLight";
    type Args<'a> = ();

    fn step(&mut self, env: &mut Env<'_>, _: Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                NightPc::Blank => {
                    blank(env.board);
                    env.board.show();
                    self.pc = NightPc::On;
                }
                NightPc::On => {
                    set_yellow_lamps(env.board, Rgb::YELLOW);
                    self.pc = NightPc::HoldOn;
                }
                NightPc::HoldOn => {
                    wait_for!(self.delay.run(env, NIGHT_BLINK_TICKS));
                    self.pc = NightPc::Off;
                }
                NightPc::Off => {
                    set_yellow_lamps(env.board, Rgb::BLACK);
                    self.pc = NightPc::HoldOff;
                }
                NightPc::HoldOff => {
                    wait_for!(self.delay.run(env, NIGHT_BLINK_TICKS));
                    self.pc = NightPc::On;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBoard;

    #[test]
    fn test_blinks_both_yellow_lamps() {
        let mut board = SimBoard::new();
        board.leds = [Rgb::GREEN; 6];
        let mut night = Frame::<NightLight>::default();
        night.activate();

        night.resume(&mut board.env(), ());
        assert_eq!(
            board.strip,
            [Rgb::BLACK, Rgb::YELLOW, Rgb::BLACK, Rgb::BLACK, Rgb::YELLOW, Rgb::BLACK]
        );

        for _ in 1..10 {
            night.resume(&mut board.env(), ());
            assert_eq!(board.strip[1], Rgb::YELLOW);
        }
        night.resume(&mut board.env(), ());
        assert_eq!(board.strip[1], Rgb::BLACK);
        assert_eq!(board.strip[4], Rgb::BLACK);

        for _ in 11..20 {
            night.resume(&mut board.env(), ());
        }
        assert_eq!(board.strip[1], Rgb::BLACK);
        night.resume(&mut board.env(), ());
        assert_eq!(board.strip[1], Rgb::YELLOW);
        assert_eq!(board.strip[4], Rgb::YELLOW);
    }

    #[test]
    fn test_reactivation_starts_lit() {
        let mut board = SimBoard::new();
        let mut night = Frame::<NightLight>::default();
        night.activate();
        for _ in 0..12 {
            night.resume(&mut board.env(), ());
        }
        assert_eq!(board.strip[1], Rgb::BLACK);

        night.activate();
        night.resume(&mut board.env(), ());
        assert_eq!(board.strip[1], Rgb::YELLOW);
    }
}
