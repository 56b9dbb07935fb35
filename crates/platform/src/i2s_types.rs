//! I2S domain types.
//!
//! Closed enums for every configuration axis of the peripheral plus two
//! range-checked newtypes:
//! - `WordWidth`: only 8, 16 or 32 bits per slot exist
//! - `FifoLevel`: FIFO interrupt threshold, 0–7 FIFO words
//!
//! Register encodings for these types live in [`crate::registers`]; this
//! module knows nothing about bit positions.

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

// ── Direction ────────────────────────────────────────────────────────────────

/// Transfer direction of a peripheral instance (the "function").
///
/// The physical block has one transmit and one receive half; each half has
/// its own control, clock and FIFO registers and its own interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Samples flow from memory to the bus.
    #[default]
    Transmit,
    /// Samples flow from the bus to memory.
    Receive,
}

impl Direction {
    /// The other half of the peripheral.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Transmit => Self::Receive,
            Self::Receive => Self::Transmit,
        }
    }
}

// ── Role ─────────────────────────────────────────────────────────────────────

/// Clock role on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Peripheral generates BCLK and WS (and optionally MCLK).
    #[default]
    Master,
    /// BCLK and WS are driven by another device.
    Slave,
}

// ── ChannelMode ──────────────────────────────────────────────────────────────

/// Stereo or mono framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelMode {
    /// Independent left and right slots.
    #[default]
    Stereo,
    /// One logical sample sent in both channel slots.
    Mono,
}

impl ChannelMode {
    /// Number of channels used for the bit-clock / sample-rate ratio.
    #[must_use]
    pub const fn channels(self) -> u32 {
        match self {
            Self::Stereo => 2,
            Self::Mono => 1,
        }
    }
}

// ── MuteState ────────────────────────────────────────────────────────────────

/// Output mute state. A muted transmitter sends zero slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MuteState {
    /// Output forced to silence.
    Muted,
    /// Normal output.
    #[default]
    Unmuted,
}

// ── WireMode ─────────────────────────────────────────────────────────────────

/// Pin sharing between the transmit and receive halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireMode {
    /// Each half has its own SD, WS and BCLK.
    #[default]
    ThreeWire,
    /// WS and BCLK are borrowed from the other half; only SD is private.
    FourWire,
}

// ── RunState ─────────────────────────────────────────────────────────────────

/// Whether the bit clock of a half is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// Clocks and FIFO active.
    Run,
    /// Clocks halted.
    #[default]
    Stop,
}

// ── ClockBase ────────────────────────────────────────────────────────────────

/// The two base-clock presets the fractional divider can be fed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockBase {
    /// 12.288 MHz family (8/16/32/48/96 kHz).
    Audio48k,
    /// 11.2896 MHz family (11.025/22.05/44.1/88.2 kHz).
    Audio44k1,
}

impl ClockBase {
    /// Both presets in solver preference order.
    pub const ALL: [Self; 2] = [Self::Audio48k, Self::Audio44k1];

    /// Nominal frequency of the preset in Hz.
    #[must_use]
    pub const fn nominal_hz(self) -> u32 {
        match self {
            Self::Audio48k => 12_288_000,
            Self::Audio44k1 => 11_289_600,
        }
    }
}

// ── WordWidth ────────────────────────────────────────────────────────────────

/// Bits per channel slot.
///
/// Construct from a raw bit count with [`WordWidth::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WordWidth {
    /// 8-bit slots, four per FIFO word.
    Bits8,
    /// 16-bit slots, two per FIFO word.
    #[default]
    Bits16,
    /// 32-bit slots, one per FIFO word.
    Bits32,
}

impl WordWidth {
    /// Width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits8 => 8,
            Self::Bits16 => 16,
            Self::Bits32 => 32,
        }
    }

    /// How many slots of this width fit in one 32-bit FIFO word.
    #[must_use]
    pub const fn slots_per_word(self) -> usize {
        match self {
            Self::Bits8 => 4,
            Self::Bits16 => 2,
            Self::Bits32 => 1,
        }
    }

    /// Mask selecting the low `bits()` bits of a word.
    #[must_use]
    pub const fn mask(self) -> u32 {
        match self {
            Self::Bits8 => 0xFF,
            Self::Bits16 => 0xFFFF,
            Self::Bits32 => 0xFFFF_FFFF,
        }
    }
}

impl TryFrom<u32> for WordWidth {
    type Error = OutOfRangeError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::Bits8),
            16 => Ok(Self::Bits16),
            32 => Ok(Self::Bits32),
            other => Err(OutOfRangeError {
                value: other,
                min: 8,
                max: 32,
            }),
        }
    }
}

// ── FifoLevel ────────────────────────────────────────────────────────────────

/// FIFO interrupt threshold in FIFO words, 0–7.
///
/// Wraps a `u8` with the invariant `value <= 7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct FifoLevel(u8);

impl FifoLevel {
    /// Highest threshold the depth field can hold.
    pub const MAX: u8 = 7;

    /// Create a `FifoLevel`, clamping values above 7 to 7.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    /// Create a `FifoLevel`, returning an error if `value > 7`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 7`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > Self::MAX {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: u32::from(Self::MAX),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Return the threshold (0–7).
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for FifoLevel {
    fn default() -> Self {
        Self(4)
    }
}
