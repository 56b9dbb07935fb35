//! Driver error type.
//!
//! The public API never returns these: failures are counted and surfaced
//! through [`I2s::setup_ok`](crate::I2s::setup_ok), with the most recent one
//! kept for [`I2s::last_error`](crate::I2s::last_error).

use platform::{PinError, PinRole};

/// Something the driver could not do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2sError {
    /// The pin mux refused a pin.
    #[error("pin rejected by the pin mux: {reason}")]
    PinRejected {
        /// Signal the pin was meant to carry.
        role: PinRole,
        /// Why the mux refused.
        reason: PinError,
    },

    /// Only one of word select and bit clock was given.
    #[error("word select and bit clock pins must be given together")]
    ClockPinsMismatched,

    /// A register access returned an error.
    #[error("register access failed")]
    RegisterAccess,

    /// CONTROL did not read back what was written.
    #[error("control register read back {read:#x}, wrote {wrote:#x}")]
    ReadBackMismatch {
        /// Value written.
        wrote: u32,
        /// Value read back.
        read: u32,
    },
}

impl I2sError {
    /// Counted against the pin setup (as opposed to register writes).
    #[must_use]
    pub const fn is_pin_error(&self) -> bool {
        matches!(self, Self::PinRejected { .. } | Self::ClockPinsMismatched)
    }
}
