//! Peripheral configuration.
//!
//! [`PeripheralConfig`] is the driver's copy of every user-settable field.
//! Setters on [`crate::I2s`] edit it, then [`PeripheralConfig`] turns it
//! into register values via [`platform::registers`].

use platform::registers::{encode_mode, ControlFields};
use platform::{
    ChannelMode, ClockBase, Direction, FifoLevel, MuteState, Role, RunState, WireMode, WordWidth,
};

use crate::clock::ClockRequest;

/// Power-on configuration of a freshly constructed driver.
pub mod defaults {
    use platform::registers::{MAX_BITRATE_DIV as BITRATE_LIMIT, MAX_RATE_TERM};
    use platform::{ChannelMode, MuteState, Role, WordWidth};

    /// Bits per slot.
    pub const WORD_WIDTH: WordWidth = WordWidth::Bits16;
    /// Frame rate (Hz).
    pub const SAMPLE_RATE_HZ: u32 = 32_000;
    /// Master clock (Hz).
    pub const MASTER_CLOCK_HZ: u32 = 12_288_000;
    /// Clock role.
    pub const ROLE: Role = Role::Master;
    /// Channel mode.
    pub const CHANNELS: ChannelMode = ChannelMode::Stereo;
    /// Mute state.
    pub const MUTE: MuteState = MuteState::Unmuted;
    /// FIFO interrupt threshold (words).
    pub const INTERRUPT_FIFO_LEVEL: u8 = 4;
    /// Drive MCLK out when master.
    pub const MCLK_OUTPUT: bool = true;

    /// Largest fractional-divider denominator.
    pub const MAX_DENOMINATOR: u32 = MAX_RATE_TERM;
    /// Largest fractional-divider numerator.
    pub const MAX_NUMERATOR: u32 = MAX_RATE_TERM;
    /// Largest bit-rate divider.
    pub const MAX_BITRATE_DIV: u32 = BITRATE_LIMIT;
}

/// Everything the driver programs into one half of the peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeripheralConfig {
    /// Transmit or receive half.
    pub function: Direction,
    /// Master or slave clocks.
    pub role: Role,
    /// Stereo or mono framing.
    pub channels: ChannelMode,
    /// Output mute.
    pub mute: MuteState,
    /// Own clock pins or borrowed ones.
    pub wire: WireMode,
    /// Bits per slot.
    pub word_width: WordWidth,
    /// Requested master clock (Hz), never zero.
    pub master_clock_hz: u32,
    /// Requested frame rate (Hz), never zero.
    pub sample_rate_hz: u32,
    /// FIFO interrupt threshold.
    pub interrupt_level: FifoLevel,
    /// Peripheral clock gate.
    pub powered: bool,
    /// Bit clock running or halted.
    pub run: RunState,
    /// Drive MCLK on its pin while master.
    pub mclk_output: bool,
}

impl PeripheralConfig {
    /// Defaults for `function`: unpowered, stopped, three-wire.
    #[must_use]
    pub fn new(function: Direction) -> Self {
        Self {
            function,
            role: defaults::ROLE,
            channels: defaults::CHANNELS,
            mute: defaults::MUTE,
            wire: WireMode::ThreeWire,
            word_width: defaults::WORD_WIDTH,
            master_clock_hz: defaults::MASTER_CLOCK_HZ,
            sample_rate_hz: defaults::SAMPLE_RATE_HZ,
            interrupt_level: FifoLevel::new(defaults::INTERRUPT_FIFO_LEVEL),
            powered: false,
            run: RunState::Stop,
            mclk_output: defaults::MCLK_OUTPUT,
        }
    }

    /// Input of the clock solver.
    #[must_use]
    pub fn clock_request(&self) -> ClockRequest {
        ClockRequest {
            master_clock_hz: self.master_clock_hz,
            sample_rate_hz: self.sample_rate_hz,
            word_width: self.word_width,
            channels: self.channels,
        }
    }

    /// CONTROL register value.
    #[must_use]
    pub fn control_register(&self) -> u32 {
        ControlFields {
            word_width: self.word_width,
            channel: self.channels,
            run: self.run,
            role: self.role,
            mute: self.mute,
        }
        .encode()
    }

    /// Whether MCLK should appear on its pin.
    #[must_use]
    pub fn drives_master_clock(&self) -> bool {
        self.mclk_output && self.role == Role::Master
    }

    /// MODE register value for the chosen base.
    #[must_use]
    pub fn mode_register(&self, base: ClockBase) -> u32 {
        encode_mode(base, self.wire, self.drives_master_clock())
    }
}
