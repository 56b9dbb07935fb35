//! Peripheral abstraction layer
//!
//! Raw access to the serial audio block and its interrupt lines. The driver
//! in the `i2s` crate is written only against these traits; a concrete chip
//! support crate implements them on top of its PAC, tests use
//! [`crate::mocks`].
//!
//! Register values are plain `u32` words laid out as described in
//! [`crate::registers`].

use crate::i2s_types::Direction;
use crate::irq::IrqDispatch;

/// Register-level access to one serial audio block.
///
/// Every method is a single bus access; no method blocks.
pub trait I2sRegisters {
    /// Error type
    type Error: core::fmt::Debug;

    /// Gate the peripheral clock / power domain.
    fn set_power(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Write the CONTROL register of one half.
    fn write_control(&mut self, direction: Direction, value: u32) -> Result<(), Self::Error>;

    /// Read back the CONTROL register of one half.
    fn read_control(&mut self, direction: Direction) -> Result<u32, Self::Error>;

    /// Write the MODE register of one half.
    fn write_mode(&mut self, direction: Direction, value: u32) -> Result<(), Self::Error>;

    /// Write the fractional RATE register of one half.
    fn write_rate(&mut self, direction: Direction, value: u32) -> Result<(), Self::Error>;

    /// Write the BITRATE register of one half.
    fn write_bitrate(&mut self, direction: Direction, value: u32) -> Result<(), Self::Error>;

    /// Read the shared IRQ register.
    fn read_irq(&mut self) -> Result<u32, Self::Error>;

    /// Write the shared IRQ register.
    fn write_irq(&mut self, value: u32) -> Result<(), Self::Error>;

    /// Read the shared STATE register (FIFO levels, pending flag).
    fn read_state(&mut self) -> Result<u32, Self::Error>;

    /// Push one word into the transmit FIFO.
    fn write_fifo(&mut self, word: u32) -> Result<(), Self::Error>;

    /// Pop one word from the receive FIFO.
    fn read_fifo(&mut self) -> Result<u32, Self::Error>;
}

/// Interrupt controller view of the two FIFO interrupts of one block.
///
/// The vector of each half is pointed at an [`IrqDispatch`] table; the
/// interrupt handler installed by the chip support crate calls
/// [`IrqDispatch::on_interrupt`] for the half that fired.
pub trait InterruptLine {
    /// Route the interrupt of `direction` to `dispatch`.
    fn set_vector(&mut self, direction: Direction, dispatch: &'static IrqDispatch);

    /// Unmask the interrupt of `direction` at the interrupt controller.
    fn enable(&mut self, direction: Direction);

    /// Mask the interrupt of `direction` at the interrupt controller.
    fn disable(&mut self, direction: Direction);
}
