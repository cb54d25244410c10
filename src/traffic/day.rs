//! Day-light mode: the pedestrian-crossing cycle.
//!
//! The cycle itself ([`DayLightProg`]) is a nested program running on a
//! slow clock, one of its ticks per `DAY_PROGRAM_DIVISOR` outer ticks, so
//! every phase duration below is counted in slow ticks. [`DayLight`] is
//! the outer-rate wrapper: it latches button presses as they arrive and
//! advances the slow program.
//!
//! ```text
//!   DayLight ─┬─ DetectRequest        (strong, every outer tick)
//!             └─ RunDayLightProg      (strong)
//!                  └─ DayLightProg    (nested, slow clock)
//!                       ├─ Controller    (strong)
//!                       ├─ Presenter     (weak)
//!                       └─ PedPresenter  (weak)
//! ```

use crate::activity::{Activity, Env, Status};
use crate::config::{DAY_PROGRAM_DIVISOR, HOLD_TICKS, MIN_GREEN_TICKS, REST_TICKS};
use crate::driver::Program;
use crate::frame::Frame;
use crate::guard::until;
use crate::hal::Rgb;
use crate::parallel::{Cobegin, Strength};
use crate::preempt::WhenAbort;
use crate::timing::{Delay, Pause};
use crate::wait_for;

use super::lights::{clear_indicator, render_lights, Color, Light, Lights};

use Strength::{Strong, Weak};

// ---------------------------------------------------------------------------
// Phase transitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum StagePc {
    #[default]
    First,
    Second,
}

/// Car light: RED → RED-YELLOW → GREEN, one tick apart.
#[derive(Default)]
pub struct RedToGreenCar {
    pc: StagePc,
    delay: Frame<Delay>,
}

impl Activity for RedToGreenCar {
    const NAME: &'static str = "RedToGreenCar";
    type Args<'a> = &'a mut Light;

    fn step(&mut self, env: &mut Env<'_>, light: Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                StagePc::First => {
                    wait_for!(self.delay.run(env, 1));
                    light.color = Color::RedYellow;
                    self.pc = StagePc::Second;
                }
                StagePc::Second => {
                    wait_for!(self.delay.run(env, 1));
                    light.color = Color::Green;
                    return Status::Completed;
                }
            }
        }
    }
}

/// Car light: GREEN → YELLOW → RED, one tick apart.
#[derive(Default)]
pub struct GreenToRedCar {
    pc: StagePc,
    delay: Frame<Delay>,
}

impl Activity for GreenToRedCar {
    const NAME: &'static str = "GreenToRedCar";
    type Args<'a> = &'a mut Light;

    fn step(&mut self, env: &mut Env<'_>, light: Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                StagePc::First => {
                    wait_for!(self.delay.run(env, 1));
                    light.color = Color::Yellow;
                    self.pc = StagePc::Second;
                }
                StagePc::Second => {
                    wait_for!(self.delay.run(env, 1));
                    light.color = Color::Red;
                    return Status::Completed;
                }
            }
        }
    }
}

/// Pedestrian light: GREEN after three ticks, once the cars have stopped.
#[derive(Default)]
pub struct RedToGreenPed {
    delay: Frame<Delay>,
}

impl Activity for RedToGreenPed {
    const NAME: &'static str = "RedToGreenPed";
    type Args<'a> = &'a mut Light;

    fn step(&mut self, env: &mut Env<'_>, light: Self::Args<'_>) -> Status {
        wait_for!(self.delay.run(env, 3));
        light.color = Color::Green;
        Status::Completed
    }
}

/// Pedestrian light: RED at once, held for one tick.
#[derive(Default)]
pub struct GreenToRedPed {
    pc: StagePc,
    pause: Frame<Pause>,
}

impl Activity for GreenToRedPed {
    const NAME: &'static str = "GreenToRedPed";
    type Args<'a> = &'a mut Light;

    fn step(&mut self, env: &mut Env<'_>, light: Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                StagePc::First => {
                    light.color = Color::Red;
                    self.pc = StagePc::Second;
                }
                StagePc::Second => {
                    wait_for!(self.pause.run(env, ()));
                    return Status::Completed;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum WaitPc {
    #[default]
    MinGreen,
    AwaitRequest,
}

/// Completes once the minimum green time is over and a request is latched.
#[derive(Default)]
pub struct WaitForButtonPressed {
    pc: WaitPc,
    delay: Frame<Delay>,
}

impl Activity for WaitForButtonPressed {
    const NAME: &'static str = "WaitForButtonPressed";
    type Args<'a> = bool;

    fn step(&mut self, env: &mut Env<'_>, button_pressed: Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                WaitPc::MinGreen => {
                    wait_for!(self.delay.run(env, MIN_GREEN_TICKS));
                    self.pc = WaitPc::AwaitRequest;
                }
                WaitPc::AwaitRequest => return until(button_pressed),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ControllerPc {
    #[default]
    Start,
    CarsGo,
    Hold,
    PedsGo,
    Rest,
}

/// Runs the crossing cycle forever on the shared light pair.
///
/// 1. Cars to green while pedestrians go to red.
/// 2. Hold green for `HOLD_TICKS`, or less once a request is latched.
/// 3. Cars to red, then pedestrians to green.
/// 4. Clear the request latch and let pedestrians cross for `REST_TICKS`.
#[derive(Default)]
pub struct Controller {
    pc: ControllerPc,
    region: Cobegin<2>,
    car_to_green: Frame<RedToGreenCar>,
    ped_to_red: Frame<GreenToRedPed>,
    hold: Frame<Delay>,
    wait_button: Frame<WaitForButtonPressed>,
    car_to_red: Frame<GreenToRedCar>,
    ped_to_green: Frame<RedToGreenPed>,
    rest: Frame<Delay>,
}

impl Activity for Controller {
    const NAME: &'static str = "Controller";
    type Args<'a> = (&'a mut Lights, &'a mut bool);

    fn step(&mut self, env: &mut Env<'_>, (lights, button_pressed): Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                ControllerPc::Start => {
                    lights.ped.color = Color::Red;
                    lights.car.color = Color::Red;
                    self.pc = ControllerPc::CarsGo;
                }
                ControllerPc::CarsGo => {
                    wait_for!(self.region.tick([Strong, Strong], |b| match b.index {
                        0 => self.car_to_green.branch(b, env, &mut lights.car),
                        _ => self.ped_to_red.branch(b, env, &mut lights.ped),
                    }));
                    self.pc = ControllerPc::Hold;
                }
                ControllerPc::Hold => {
                    let pressed = *button_pressed;
                    wait_for!(self.region.tick([Weak, Weak], |b| match b.index {
                        0 => self.hold.branch(b, env, HOLD_TICKS),
                        _ => self.wait_button.branch(b, env, pressed),
                    }));
                    self.pc = ControllerPc::PedsGo;
                }
                ControllerPc::PedsGo => {
                    wait_for!(self.region.tick([Strong, Strong], |b| match b.index {
                        0 => self.car_to_red.branch(b, env, &mut lights.car),
                        _ => self.ped_to_green.branch(b, env, &mut lights.ped),
                    }));
                    *button_pressed = false;
                    self.pc = ControllerPc::Rest;
                }
                ControllerPc::Rest => {
                    wait_for!(self.rest.run(env, REST_TICKS));
                    self.pc = ControllerPc::CarsGo;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Presenters
// ---------------------------------------------------------------------------

/// Renders the light pair and commits the strip every tick.
#[derive(Default)]
pub struct Presenter;

impl Activity for Presenter {
    const NAME: &'static str = "Presenter";
    type Args<'a> = &'a Lights;

    fn step(&mut self, env: &mut Env<'_>, lights: Self::Args<'_>) -> Status {
        render_lights(env.board, lights);
        env.board.show();
        Status::Suspended
    }
}

/// Blinks the request indicator: red, off, red, ...
#[derive(Default)]
pub struct BlinkIndicator {
    lit: bool,
}

impl Activity for BlinkIndicator {
    const NAME: &'static str = "BlinkIndicator";
    type Args<'a> = ();

    fn step(&mut self, env: &mut Env<'_>, _: Self::Args<'_>) -> Status {
        self.lit = !self.lit;
        env.board
            .set_indicator(if self.lit { Rgb::RED } else { Rgb::BLACK });
        Status::Suspended
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PedPresenterPc {
    #[default]
    Check,
    Blink,
    Clear,
    AwaitRequest,
}

/// Blinks the indicator while a crossing request is pending.
#[derive(Default)]
pub struct PedPresenter {
    pc: PedPresenterPc,
    blink: WhenAbort<BlinkIndicator>,
}

impl Activity for PedPresenter {
    const NAME: &'static str = "PedPresenter";
    type Args<'a> = bool;

    fn step(&mut self, env: &mut Env<'_>, button_pressed: Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                PedPresenterPc::Check => {
                    self.pc = if button_pressed {
                        PedPresenterPc::Blink
                    } else {
                        PedPresenterPc::Clear
                    };
                }
                PedPresenterPc::Blink => {
                    if !self.blink.tick(!button_pressed, env, ()).is_finished() {
                        return Status::Suspended;
                    }
                    self.pc = PedPresenterPc::Clear;
                }
                PedPresenterPc::Clear => {
                    clear_indicator(env.board);
                    self.pc = PedPresenterPc::AwaitRequest;
                }
                PedPresenterPc::AwaitRequest => {
                    wait_for!(until(button_pressed));
                    self.pc = PedPresenterPc::Check;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Day-light program (slow clock)
// ---------------------------------------------------------------------------

/// The crossing cycle together with its presentation.
#[derive(Default)]
pub struct DayLightProg {
    lights: Lights,
    region: Cobegin<3>,
    controller: Frame<Controller>,
    presenter: Frame<Presenter>,
    ped_presenter: Frame<PedPresenter>,
}

impl DayLightProg {
    #[inline]
    pub fn lights(&self) -> &Lights {
        &self.lights
    }
}

impl Activity for DayLightProg {
    const NAME: &'static str = "DayLightProg";
    type Args<'a> = &'a mut bool;

    fn step(&mut self, env: &mut Env<'_>, press_request: Self::Args<'_>) -> Status {
        self.region.tick([Strong, Weak, Weak], |b| match b.index {
            0 => self
                .controller
                .branch(b, env, (&mut self.lights, &mut *press_request)),
            1 => self.presenter.branch(b, env, &self.lights),
            _ => self.ped_presenter.branch(b, env, *press_request),
        })
    }
}

// ---------------------------------------------------------------------------
// Outer-rate wrapper
// ---------------------------------------------------------------------------

/// ORs the button input into the request latch every tick.
#[derive(Default)]
pub struct DetectRequest;

impl Activity for DetectRequest {
    const NAME: &'static str = "DetectRequest";
    type Args<'a> = (bool, &'a mut bool);

    fn step(&mut self, _env: &mut Env<'_>, (pressed, request): Self::Args<'_>) -> Status {
        *request |= pressed;
        Status::Suspended
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RunProgPc {
    #[default]
    Activate,
    Tick,
    Wait,
}

/// Activates the day-light program and advances it once every
/// `DAY_PROGRAM_DIVISOR` outer ticks.
#[derive(Default)]
pub struct RunDayLightProg {
    pc: RunProgPc,
    program: Program<DayLightProg>,
    period: Frame<Delay>,
}

impl RunDayLightProg {
    #[inline]
    pub fn program(&self) -> &Program<DayLightProg> {
        &self.program
    }
}

impl Activity for RunDayLightProg {
    const NAME: &'static str = "RunDayLightProg";
    type Args<'a> = &'a mut bool;

    fn step(&mut self, env: &mut Env<'_>, press_request: Self::Args<'_>) -> Status {
        loop {
            match self.pc {
                RunProgPc::Activate => {
                    self.program.activate();
                    self.pc = RunProgPc::Tick;
                }
                RunProgPc::Tick => {
                    self.program.tick(env, &mut *press_request);
                    self.pc = RunProgPc::Wait;
                }
                RunProgPc::Wait => {
                    wait_for!(self.period.run(env, DAY_PROGRAM_DIVISOR));
                    self.pc = RunProgPc::Tick;
                }
            }
        }
    }
}

/// Day-light mode at the outer rate. `button_pressed` is true in the tick
/// a SHORT press is recognised.
#[derive(Default)]
pub struct DayLight {
    press_request: bool,
    region: Cobegin<2>,
    detect: Frame<DetectRequest>,
    run: Frame<RunDayLightProg>,
}

impl DayLight {
    #[inline]
    pub fn press_request(&self) -> bool {
        self.press_request
    }

    #[inline]
    pub fn program(&self) -> &Program<DayLightProg> {
        self.run.state().program()
    }
}

impl Activity for DayLight {
    const NAME: &'static str = "DayLight";
    type Args<'a> = bool;

    fn step(&mut self, env: &mut Env<'_>, button_pressed: Self::Args<'_>) -> Status {
        self.region.tick([Strong, Strong], |b| match b.index {
            0 => self
                .detect
                .branch(b, env, (button_pressed, &mut self.press_request)),
            _ => self.run.branch(b, env, &mut self.press_request),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBoard;

    /// Tick the controller `ticks` times, raising the request latch in
    /// tick `latch_at`; return (car, ped, latch) after each tick.
    fn cycle(ticks: usize, latch_at: Option<usize>) -> Vec<(Color, Color, bool)> {
        let mut board = SimBoard::new();
        let mut controller = Frame::<Controller>::default();
        let mut lights = Lights::default();
        let mut latch = false;
        controller.activate();

        (0..ticks)
            .map(|tick| {
                if latch_at == Some(tick) {
                    latch = true;
                }
                controller.resume(&mut board.env(), (&mut lights, &mut latch));
                (lights.car.color, lights.ped.color, latch)
            })
            .collect()
    }

    #[test]
    fn test_ped_to_red_holds_red_for_one_tick() {
        let mut board = SimBoard::new();
        let mut phase = Frame::<GreenToRedPed>::default();
        let mut light = Light { color: Color::Green };
        phase.activate();

        assert_eq!(phase.resume(&mut board.env(), &mut light), Status::Suspended);
        assert_eq!(light.color, Color::Red);
        assert_eq!(phase.resume(&mut board.env(), &mut light), Status::Completed);
        assert_eq!(light.color, Color::Red);
    }

    #[test]
    fn test_first_transition_ends_car_green_ped_red() {
        let out = cycle(4, None);
        assert_eq!(out[0], (Color::Red, Color::Red, false));
        assert_eq!(out[1], (Color::RedYellow, Color::Red, false));
        assert_eq!(out[2], (Color::Green, Color::Red, false));
        assert_eq!(out[3], (Color::Green, Color::Red, false));
    }

    #[test]
    fn test_hold_runs_full_duration_without_request() {
        let out = cycle(30, None);
        // Hold entered in tick 2, ends in tick 12.
        assert_eq!(out[12].0, Color::Green);
        assert_eq!(out[13].0, Color::Yellow);
        assert_eq!(out[14].0, Color::Red);
        assert_eq!(out[14].1, Color::Red);
        assert_eq!(out[15].1, Color::Green);
        // Rest, then the next cycle turns pedestrians red again.
        assert_eq!(out[24], (Color::Red, Color::Green, false));
        assert_eq!(out[25], (Color::Red, Color::Red, false));
        assert_eq!(out[26].0, Color::RedYellow);
    }

    #[test]
    fn test_request_shortens_hold_after_min_green() {
        let out = cycle(12, Some(0));
        // Minimum green from tick 2 ends in tick 6; cars stop right after.
        assert_eq!(out[6].0, Color::Green);
        assert_eq!(out[7].0, Color::Yellow);
        assert_eq!(out[8].0, Color::Red);
        assert_eq!(out[9], (Color::Red, Color::Green, false));
    }

    #[test]
    fn test_late_request_ends_hold_in_its_tick() {
        let out = cycle(12, Some(8));
        assert_eq!(out[8].0, Color::Green);
        assert_eq!(out[9].0, Color::Yellow);
        assert!(out[10].2);
        // Latch cleared at cycle end.
        assert!(!out[11].2);
    }

    #[test]
    fn test_presenter_renders_every_tick() {
        let mut board = SimBoard::new();
        let mut presenter = Frame::<Presenter>::default();
        let lights = Lights {
            ped: Light { color: Color::Green },
            car: Light { color: Color::Red },
        };
        presenter.activate();
        presenter.resume(&mut board.env(), &lights);
        presenter.resume(&mut board.env(), &lights);

        assert_eq!(board.shows, 2);
        assert_eq!(board.strip[0], Rgb::GREEN);
        assert_eq!(board.strip[5], Rgb::RED);
    }

    #[test]
    fn test_ped_presenter_blinks_while_requested() {
        let mut board = SimBoard::new();
        let mut ped = Frame::<PedPresenter>::default();
        ped.activate();

        ped.resume(&mut board.env(), false);
        assert_eq!(board.indicator, Rgb::BLACK);

        ped.resume(&mut board.env(), true);
        assert_eq!(board.indicator, Rgb::RED);
        ped.resume(&mut board.env(), true);
        assert_eq!(board.indicator, Rgb::BLACK);
        ped.resume(&mut board.env(), true);
        assert_eq!(board.indicator, Rgb::RED);

        // Request cleared: blinking is aborted and the indicator cleared.
        ped.resume(&mut board.env(), false);
        assert_eq!(board.indicator, Rgb::BLACK);
        ped.resume(&mut board.env(), false);
        assert_eq!(board.indicator, Rgb::BLACK);

        // A new request blinks from the start again.
        ped.resume(&mut board.env(), true);
        assert_eq!(board.indicator, Rgb::RED);
    }

    #[test]
    fn test_detect_request_latches() {
        let mut board = SimBoard::new();
        let mut detect = Frame::<DetectRequest>::default();
        let mut request = false;
        detect.activate();

        detect.resume(&mut board.env(), (false, &mut request));
        assert!(!request);
        detect.resume(&mut board.env(), (true, &mut request));
        detect.resume(&mut board.env(), (false, &mut request));
        assert!(request);
    }

    #[test]
    fn test_day_program_runs_at_sub_rate() {
        let mut board = SimBoard::new();
        let mut day = Frame::<DayLight>::default();
        day.activate();

        day.resume(&mut board.env(), false);
        assert_eq!(day.state().program().ticks(), 1);
        for _ in 1..10 {
            day.resume(&mut board.env(), false);
        }
        assert_eq!(day.state().program().ticks(), 1);
        day.resume(&mut board.env(), false);
        assert_eq!(day.state().program().ticks(), 2);
        for _ in 11..25 {
            day.resume(&mut board.env(), false);
        }
        assert_eq!(day.state().program().ticks(), 3);
    }

    #[test]
    fn test_day_light_latches_press_between_slow_ticks() {
        let mut board = SimBoard::new();
        let mut day = Frame::<DayLight>::default();
        day.activate();

        day.resume(&mut board.env(), false);
        day.resume(&mut board.env(), true);
        assert!(day.state().press_request());

        // The latch survives until the slow program consumes it.
        for _ in 2..10 {
            day.resume(&mut board.env(), false);
        }
        assert!(day.state().press_request());
        day.resume(&mut board.env(), false);
        // The second slow tick sees the request: the indicator blinks.
        assert_eq!(board.indicator, Rgb::RED);
    }

    #[test]
    fn test_day_light_first_slow_tick_shows_both_red() {
        let mut board = SimBoard::new();
        let mut day = Frame::<DayLight>::default();
        day.activate();
        day.resume(&mut board.env(), false);

        let lights = day.state().program().frame().state().lights();
        assert_eq!(lights.car.color, Color::Red);
        assert_eq!(lights.ped.color, Color::Red);
        assert_eq!(board.strip[2], Rgb::RED);
        assert_eq!(board.strip[5], Rgb::RED);
    }
}
