//! Hardware Abstraction Layer (HAL) for the serial audio (I2S) block
//!
//! This crate provides the trait-based seams the `i2s` driver is written
//! against, enabling development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (audio pipeline, codec glue)
//!         ↓
//! Driver Layer (i2s crate: clock solver, FIFO engine)
//!         ↓
//! Platform HAL (this crate - traits, register layout, IRQ dispatch)
//!         ↓
//! Chip support crate (PAC + interrupt handlers)
//! ```
//!
//! # Contents
//!
//! - [`i2s_types`] - closed enums and range-checked newtypes
//! - [`registers`] - bit layout of CONTROL / MODE / RATE / BITRATE / IRQ / STATE
//! - [`peripheral`] - [`I2sRegisters`] and [`InterruptLine`]
//! - [`gpio`] - [`PinMux`] alternate-function routing
//! - [`irq`] - [`IrqDispatch`], the per-block callback table
//! - [`mocks`] - host implementations (`std` feature or tests)
//!
//! # Features
//!
//! - `std`: Enable the host mocks
//! - `defmt`: Enable defmt::Format derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // accessors; callers decide
#![allow(clippy::match_same_arms)] // intentional for readability in register tables
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod gpio;
pub mod i2s_types;
pub mod irq;
pub mod mocks;
pub mod peripheral;
pub mod registers;

// Re-export domain types
pub use i2s_types::{
    ChannelMode, ClockBase, Direction, FifoLevel, MuteState, OutOfRangeError, Role, RunState,
    WireMode, WordWidth,
};

// Re-export collaborator traits
pub use gpio::{PinError, PinMux, PinRole};
pub use irq::{IrqCallback, IrqDispatch};
pub use peripheral::{I2sRegisters, InterruptLine};
