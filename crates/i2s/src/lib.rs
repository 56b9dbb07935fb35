//! I2S peripheral driver
//!
//! Drives one half (transmit or receive) of a serial audio block through the
//! [`platform`] traits:
//!
//! - [`rational`] - bounded `num / den` approximation
//! - [`clock`] - base clock and divider selection for MCLK / BCLK / FS
//! - [`config`] - stored configuration and power-on defaults
//! - [`fifo`] - slot packing for the 8-word FIFO
//! - [`pins`] - pin set and wire-mode rules
//! - [`driver`] - the [`I2s`] driver itself
//!
//! # Example
//!
//! ```no_run
//! use i2s::{ClockPresets, I2s, I2sPins};
//! use platform::mocks::{MockI2sBus, MockPinMux};
//! use platform::{Direction, IrqDispatch, WordWidth, Role};
//!
//! static I2S0_IRQ: IrqDispatch = IrqDispatch::new();
//!
//! let mut tx = I2s::new(
//!     MockI2sBus::new(),
//!     MockPinMux::new(),
//!     I2sPins::new(10, 11, 12),
//!     Direction::Transmit,
//!     ClockPresets::default(),
//!     &I2S0_IRQ,
//! );
//! tx.format(Role::Master, 12_288_000, 48_000, WordWidth::Bits16);
//! tx.start();
//! tx.write(&[0, 0, 1000, -1000]);
//! ```
//!
//! # Features
//!
//! - `std`: host builds (enables `platform/std`)
//! - `defmt`: log through defmt, derive `defmt::Format`
//! - `tracing`: log through tracing

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)] // register names in doc comments

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod fifo;
pub mod pins;
pub mod rational;

pub use clock::{solve, ClockPresets, ClockRequest, DividerSolution};
pub use config::PeripheralConfig;
pub use driver::{FifoHandler, I2s};
pub use error::I2sError;
pub use pins::I2sPins;
