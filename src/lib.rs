//! # TTL: Tick-driven Traffic Light
//!
//! A synchronous, cooperative activity scheduler for microcontrollers and
//! a pedestrian-crossing controller built on it.
//!
//! ## Overview
//!
//! Control logic is written as *activities*: bodies that run to the next
//! declared suspension point within one tick and continue there on the
//! next. Activities compose the way structured code does:
//!
//! - **Sequence**: a parent runs a child to completion as if it were one
//!   statement, continuing in the same tick the child completes.
//! - **Parallel**: a `cobegin` region advances several children in a fixed
//!   order every tick; *strong* children hold the region open, *weak* ones
//!   are abandoned when the strong ones are done.
//! - **Preemption**: a `when_abort` scope tears its child down the moment a
//!   guard holds.
//!
//! A driver ticks the root activity at a fixed rate on an absolute
//! schedule, so time inside the program is just the tick count.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │             Traffic-Light Program (traffic/)            │
//! │   press · day · night · off · dispatch · lights         │
//! ├────────────────────────────────────────────────────────┤
//! │              Tick Driver (driver.rs)                    │
//! │   Driver · Program · TickSource · TickStats             │
//! ├──────────────┬────────────────────┬───────────────────┤
//! │  Sequencer   │  Parallel Composer │  Preemptor        │
//! │  sequence.rs │  parallel.rs       │  preempt.rs       │
//! │  ─ run()     │  ─ Cobegin::tick() │  ─ WhenAbort      │
//! ├──────────────┴────────────────────┴───────────────────┤
//! │  Activity Runtime · Frame Store · Guards · Timing       │
//! │  activity.rs · frame.rs · guard.rs · timing.rs          │
//! ├────────────────────────────────────────────────────────┤
//! │  Board capabilities (hal.rs) · SysTick (arch/) · sim.rs │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Memory Model
//!
//! - **No heap**: every frame is a plain value nested in its parent's
//! - **No `alloc`**: pure `core` only
//! - **Reset by assignment**: activating a frame overwrites it with the
//!   activity's `Default`
//!
//! ## Example
//!
//! ```
//! use ttl::config::DriverConfig;
//! use ttl::driver::Driver;
//! use ttl::sim::{ManualClock, SimBoard};
//! use ttl::traffic::{Mode, TrafficLight};
//!
//! let mut driver: Driver<TrafficLight, _, _> =
//!     Driver::new(DriverConfig::default(), SimBoard::new(), ManualClock::new()).unwrap();
//! driver.run_for(5);
//! assert_eq!(driver.root().frame().state().mode(), Some(Mode::Day));
//! ```

#![cfg_attr(not(test), no_std)]

pub mod activity;
pub mod arch;
pub mod config;
pub mod driver;
pub mod error;
pub mod frame;
pub mod guard;
pub mod hal;
pub mod parallel;
pub mod preempt;
pub mod sequence;
pub mod sim;
pub mod timing;
pub mod traffic;

pub use activity::{Activity, Env, Status};
pub use error::Error;
pub use frame::Frame;
