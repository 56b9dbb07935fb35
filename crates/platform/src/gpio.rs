//! Pin multiplexing abstraction
//!
//! The I2S driver never touches GPIO registers. It asks a [`PinMux`] to route
//! a pin to one of the serial audio signals and only records whether the
//! request succeeded.

use crate::i2s_types::Direction;

/// Serial audio signal a pin can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// Serial data (SD / SDA / DIN / DOUT).
    SerialData,
    /// Word select (WS / LRCLK / WCLK).
    WordSelect,
    /// Bit clock (BCLK / SCK).
    BitClock,
    /// Master clock output (MCLK).
    MasterClock,
}

/// Why a pin could not be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// The pin has no alternate function for this signal and direction.
    #[error("pin cannot carry this I2S signal")]
    Unsupported,
    /// The pin is already routed to another function.
    #[error("pin already in use")]
    InUse,
}

/// Pin capability check and alternate-function routing.
pub trait PinMux {
    /// Board-level pin identifier.
    type Pin: Copy + core::fmt::Debug + PartialEq;

    /// Route `pin` to `role` of the `direction` half.
    ///
    /// # Errors
    ///
    /// [`PinError`] when the pin cannot carry the signal.
    fn bind(&mut self, pin: Self::Pin, role: PinRole, direction: Direction) -> Result<(), PinError>;
}
