//! # Architecture Abstraction Layer
//!
//! Hardware time bases for the tick driver. Currently implements the
//! Cortex-M4 SysTick port; other cores add sibling modules.

pub mod cortex_m4;
