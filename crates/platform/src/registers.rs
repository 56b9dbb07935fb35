//! I2S register map
//!
//! Bit layout of the serial audio block as seen through
//! [`I2sRegisters`](crate::peripheral::I2sRegisters). Each half (transmit,
//! receive) has its own CONTROL, MODE, RATE and BITRATE register; IRQ and
//! STATE are shared and carry one field per half.
//!
//! # Divider encoding
//!
//! RATE and BITRATE store `value - 1`, so an 8-bit field covers 1..=256 and a
//! 6-bit field covers 1..=64:
//!
//! ```text
//! MCLK = base × (X + 1) / (Y + 1)        RATE    = X << 8 | Y
//! BCLK = MCLK / (BITRATE + 1)
//! ```
//!
//! # FIFO
//!
//! Each half has an 8-word FIFO of 32-bit words. STATE reports the fill
//! level of both halves; IRQ holds the threshold and enable bit per half.

use crate::i2s_types::{
    ChannelMode, ClockBase, Direction, FifoLevel, MuteState, Role, RunState, WireMode, WordWidth,
};

// ---------------------------------------------------------------------------
// CONTROL (one per half)
// ---------------------------------------------------------------------------

/// Word width code, bits \[1:0\]: 0b00 = 8, 0b01 = 16, 0b11 = 32.
pub const CTRL_WORDWIDTH_MASK: u32 = 0b11;
/// Mono framing.
pub const CTRL_MONO: u32 = 1 << 2;
/// Halt the bit clock of this half.
pub const CTRL_STOP: u32 = 1 << 3;
/// Asynchronous reset of the FIFO and state machine (self-clearing).
pub const CTRL_RESET: u32 = 1 << 4;
/// Word-select source: 0 = generated (master), 1 = external (slave).
pub const CTRL_WS_SEL: u32 = 1 << 5;
/// WS half period in bit clocks minus one, bits \[14:6\].
pub const CTRL_WS_HALFPERIOD_SHIFT: u32 = 6;
/// Field mask for the WS half period.
pub const CTRL_WS_HALFPERIOD_MASK: u32 = 0x1FF << CTRL_WS_HALFPERIOD_SHIFT;
/// Force zero slots on the serial data line.
pub const CTRL_MUTE: u32 = 1 << 15;

// ---------------------------------------------------------------------------
// MODE (one per half)
// ---------------------------------------------------------------------------

/// Clock base select, bits \[1:0\].
pub const MODE_CLKSEL_MASK: u32 = 0b11;
/// Borrow WS and BCLK from the other half.
pub const MODE_FOUR_PIN: u32 = 1 << 2;
/// Drive MCLK on the master clock pin.
pub const MODE_MCLK_ENABLE: u32 = 1 << 3;

// ---------------------------------------------------------------------------
// RATE / BITRATE (one per half)
// ---------------------------------------------------------------------------

/// Y divider (denominator − 1), bits \[7:0\].
pub const RATE_Y_MASK: u32 = 0xFF;
/// X divider (numerator − 1), bits \[15:8\].
pub const RATE_X_SHIFT: u32 = 8;
/// Bit-rate divider − 1, bits \[5:0\].
pub const BITRATE_MASK: u32 = 0x3F;

/// Largest numerator or denominator the RATE register can hold.
pub const MAX_RATE_TERM: u32 = 256;
/// Largest bit-rate divider the BITRATE register can hold.
pub const MAX_BITRATE_DIV: u32 = 64;

// ---------------------------------------------------------------------------
// IRQ (shared)
// ---------------------------------------------------------------------------

/// Receive FIFO interrupt enable.
pub const IRQ_RX_ENABLE: u32 = 1 << 0;
/// Transmit FIFO interrupt enable.
pub const IRQ_TX_ENABLE: u32 = 1 << 1;
/// Receive depth threshold, bits \[11:8\].
pub const IRQ_RX_DEPTH_SHIFT: u32 = 8;
/// Transmit depth threshold, bits \[19:16\].
pub const IRQ_TX_DEPTH_SHIFT: u32 = 16;
/// Width mask of a depth field.
pub const IRQ_DEPTH_MASK: u32 = 0xF;

// ---------------------------------------------------------------------------
// STATE (shared, read-only)
// ---------------------------------------------------------------------------

/// An interrupt is pending.
pub const STATE_IRQ: u32 = 1 << 0;
/// Receive FIFO level, bits \[11:8\].
pub const STATE_RX_LEVEL_SHIFT: u32 = 8;
/// Transmit FIFO level, bits \[19:16\].
pub const STATE_TX_LEVEL_SHIFT: u32 = 16;
/// Width mask of a level field.
pub const STATE_LEVEL_MASK: u32 = 0xF;

/// FIFO depth of each half, in 32-bit words.
pub const FIFO_DEPTH_WORDS: usize = 8;

// ---------------------------------------------------------------------------
// Enum → bit pattern tables
// ---------------------------------------------------------------------------

/// CONTROL word-width code.
#[must_use]
pub const fn word_width_code(width: WordWidth) -> u32 {
    match width {
        WordWidth::Bits8 => 0b00,
        WordWidth::Bits16 => 0b01,
        WordWidth::Bits32 => 0b11,
    }
}

/// Inverse of [`word_width_code`]. Code 0b10 is reserved.
#[must_use]
pub const fn word_width_from_code(code: u32) -> Option<WordWidth> {
    match code & CTRL_WORDWIDTH_MASK {
        0b00 => Some(WordWidth::Bits8),
        0b01 => Some(WordWidth::Bits16),
        0b11 => Some(WordWidth::Bits32),
        _ => None,
    }
}

/// CONTROL bits contributed by the role.
#[must_use]
pub const fn role_bits(role: Role) -> u32 {
    match role {
        Role::Master => 0,
        Role::Slave => CTRL_WS_SEL,
    }
}

/// CONTROL bits contributed by the channel mode.
#[must_use]
pub const fn channel_bits(mode: ChannelMode) -> u32 {
    match mode {
        ChannelMode::Stereo => 0,
        ChannelMode::Mono => CTRL_MONO,
    }
}

/// CONTROL bits contributed by the mute state.
#[must_use]
pub const fn mute_bits(mute: MuteState) -> u32 {
    match mute {
        MuteState::Muted => CTRL_MUTE,
        MuteState::Unmuted => 0,
    }
}

/// CONTROL bits contributed by the run state.
#[must_use]
pub const fn run_bits(run: RunState) -> u32 {
    match run {
        RunState::Run => 0,
        RunState::Stop => CTRL_STOP,
    }
}

/// MODE clock-select code.
#[must_use]
pub const fn clock_base_code(base: ClockBase) -> u32 {
    match base {
        ClockBase::Audio48k => 0b00,
        ClockBase::Audio44k1 => 0b01,
    }
}

/// MODE bits contributed by the wire mode.
#[must_use]
pub const fn wire_bits(wire: WireMode) -> u32 {
    match wire {
        WireMode::ThreeWire => 0,
        WireMode::FourWire => MODE_FOUR_PIN,
    }
}

// ---------------------------------------------------------------------------
// Whole-register encoders
// ---------------------------------------------------------------------------

/// Field values that make up one CONTROL register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlFields {
    /// Bits per slot.
    pub word_width: WordWidth,
    /// Stereo or mono framing.
    pub channel: ChannelMode,
    /// Clock running or halted.
    pub run: RunState,
    /// Master or slave word select.
    pub role: Role,
    /// Mute state.
    pub mute: MuteState,
}

impl ControlFields {
    /// Encode into a CONTROL register value.
    ///
    /// The WS half period is one slot: `bits - 1` bit clocks.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // Safety: bits() is 8, 16 or 32
    pub const fn encode(self) -> u32 {
        let half_period = self.word_width.bits() - 1;
        word_width_code(self.word_width)
            | channel_bits(self.channel)
            | run_bits(self.run)
            | role_bits(self.role)
            | (half_period << CTRL_WS_HALFPERIOD_SHIFT)
            | mute_bits(self.mute)
    }
}

/// Encode a MODE register value.
#[must_use]
pub const fn encode_mode(base: ClockBase, wire: WireMode, mclk_out: bool) -> u32 {
    let mclk = if mclk_out { MODE_MCLK_ENABLE } else { 0 };
    clock_base_code(base) | wire_bits(wire) | mclk
}

/// Encode a RATE register value from a `num / den` pair, each in 1..=256.
///
/// Out-of-range terms are clamped into the field.
#[must_use]
#[allow(clippy::arithmetic_side_effects)] // Safety: both terms clamped to >= 1
pub fn encode_rate(numerator: u32, denominator: u32) -> u32 {
    let x = numerator.clamp(1, MAX_RATE_TERM) - 1;
    let y = denominator.clamp(1, MAX_RATE_TERM) - 1;
    (x << RATE_X_SHIFT) | y
}

/// Decode a RATE register value into `(num, den)`.
#[must_use]
#[allow(clippy::arithmetic_side_effects)] // Safety: 8-bit fields, +1 cannot overflow
pub const fn decode_rate(value: u32) -> (u32, u32) {
    let x = (value >> RATE_X_SHIFT) & 0xFF;
    let y = value & RATE_Y_MASK;
    (x + 1, y + 1)
}

/// Encode a BITRATE register value from a divider in 1..=64 (clamped).
#[must_use]
#[allow(clippy::arithmetic_side_effects)] // Safety: divider clamped to >= 1
pub fn encode_bitrate(divider: u32) -> u32 {
    divider.clamp(1, MAX_BITRATE_DIV) - 1
}

/// Decode a BITRATE register value into the divider.
#[must_use]
#[allow(clippy::arithmetic_side_effects)] // Safety: 6-bit field, +1 cannot overflow
pub const fn decode_bitrate(value: u32) -> u32 {
    (value & BITRATE_MASK) + 1
}

/// IRQ enable bit of a half.
#[must_use]
pub const fn irq_enable_bit(direction: Direction) -> u32 {
    match direction {
        Direction::Transmit => IRQ_TX_ENABLE,
        Direction::Receive => IRQ_RX_ENABLE,
    }
}

/// Shift of the IRQ depth field of a half.
#[must_use]
pub const fn irq_depth_shift(direction: Direction) -> u32 {
    match direction {
        Direction::Transmit => IRQ_TX_DEPTH_SHIFT,
        Direction::Receive => IRQ_RX_DEPTH_SHIFT,
    }
}

/// Rewrite one half's fields of an IRQ register, leaving the other half intact.
#[must_use]
pub const fn with_irq(irq: u32, direction: Direction, enabled: bool, level: FifoLevel) -> u32 {
    let shift = irq_depth_shift(direction);
    let enable = irq_enable_bit(direction);
    let cleared = irq & !(IRQ_DEPTH_MASK << shift) & !enable;
    let depth = (level.get() as u32 & IRQ_DEPTH_MASK) << shift;
    if enabled {
        cleared | depth | enable
    } else {
        cleared | depth
    }
}

/// Threshold of one half stored in an IRQ register.
#[must_use]
pub const fn irq_depth(irq: u32, direction: Direction) -> u8 {
    ((irq >> irq_depth_shift(direction)) & IRQ_DEPTH_MASK) as u8
}

/// Whether one half's interrupt is enabled in an IRQ register.
#[must_use]
pub const fn irq_enabled(irq: u32, direction: Direction) -> bool {
    irq & irq_enable_bit(direction) != 0
}

/// FIFO fill level of one half from a STATE register value, in words.
#[must_use]
pub const fn state_level(state: u32, direction: Direction) -> u8 {
    let shift = match direction {
        Direction::Transmit => STATE_TX_LEVEL_SHIFT,
        Direction::Receive => STATE_RX_LEVEL_SHIFT,
    };
    ((state >> shift) & STATE_LEVEL_MASK) as u8
}

/// Build a STATE register value. Used by register-file models.
#[must_use]
pub const fn encode_state(tx_level: u8, rx_level: u8, irq_pending: bool) -> u32 {
    let pending = if irq_pending { STATE_IRQ } else { 0 };
    ((tx_level as u32 & STATE_LEVEL_MASK) << STATE_TX_LEVEL_SHIFT)
        | ((rx_level as u32 & STATE_LEVEL_MASK) << STATE_RX_LEVEL_SHIFT)
        | pending
}
