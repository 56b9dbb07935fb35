//! Clock divider solver.
//!
//! # Clock Tree
//!
//! ```text
//!   ClockBase preset (12.288 MHz or 11.2896 MHz)
//!     -> fractional divider  MCLK = base × num / den     num <= den, 1..=256
//!     -> bit-rate divider    BCLK = MCLK / bitrate        1..=64
//!     -> framing             FS   = BCLK / (bits × channels)
//! ```
//!
//! # Worked example (power-on defaults)
//!
//! ```text
//!   MCLK request 12 288 000 Hz, 32 kHz, 16-bit stereo
//!   Audio48k: 12 288 000 % 12 288 000 == 0  -> num/den = 1/1, error 0 Hz
//!   BCLK = 32 000 × 16 × 2 = 1 024 000 Hz
//!   bitrate = 12 288 000 / 1 024 000 = 12 (exact)
//!   FS   = 12 288 000 / 12 / 32 = 32 000 Hz
//! ```
//!
//! The solver never fails: frequencies the tree cannot reproduce come out
//! as the closest achievable setting, and [`DividerSolution`] can re-derive
//! what the hardware will actually produce.

use platform::registers::{encode_bitrate, encode_rate, MAX_BITRATE_DIV, MAX_RATE_TERM};
use platform::{ChannelMode, ClockBase, WordWidth};

use crate::rational::{approximate, split_ratio};

/// What the caller wants on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockRequest {
    /// Requested master clock (Hz).
    pub master_clock_hz: u32,
    /// Requested frame rate (Hz).
    pub sample_rate_hz: u32,
    /// Bits per slot.
    pub word_width: WordWidth,
    /// Slots per frame used for the bit-clock ratio.
    pub channels: ChannelMode,
}

impl ClockRequest {
    /// Bit clock needed for the requested frame rate (Hz).
    #[must_use]
    pub fn bit_clock_hz(&self) -> u64 {
        u64::from(self.sample_rate_hz)
            .saturating_mul(u64::from(self.word_width.bits()))
            .saturating_mul(u64::from(self.channels.channels()))
    }
}

/// Board frequencies of the two base clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockPresets {
    /// Frequency feeding [`ClockBase::Audio48k`] (Hz).
    pub audio_48k_hz: u32,
    /// Frequency feeding [`ClockBase::Audio44k1`] (Hz).
    pub audio_44k1_hz: u32,
}

impl ClockPresets {
    /// Frequency of one preset.
    #[must_use]
    pub const fn hz(&self, base: ClockBase) -> u32 {
        match base {
            ClockBase::Audio48k => self.audio_48k_hz,
            ClockBase::Audio44k1 => self.audio_44k1_hz,
        }
    }
}

impl Default for ClockPresets {
    fn default() -> Self {
        Self {
            audio_48k_hz: ClockBase::Audio48k.nominal_hz(),
            audio_44k1_hz: ClockBase::Audio44k1.nominal_hz(),
        }
    }
}

/// Divider settings chosen by [`solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DividerSolution {
    /// Selected base clock.
    pub base: ClockBase,
    /// Frequency of the selected base (Hz).
    pub base_hz: u32,
    /// Fractional divider numerator, 1..=256.
    pub numerator: u32,
    /// Fractional divider denominator, 1..=256, never below `numerator`.
    pub denominator: u32,
    /// Bit-rate divider, 1..=64.
    pub bitrate: u32,
}

impl DividerSolution {
    /// MCLK the fractional divider produces (Hz, truncated).
    #[must_use]
    pub fn master_clock_hz(&self) -> u32 {
        let hz = u64::from(self.base_hz)
            .saturating_mul(u64::from(self.numerator))
            .checked_div(u64::from(self.denominator))
            .unwrap_or(0);
        u32::try_from(hz).unwrap_or(u32::MAX)
    }

    /// BCLK after the bit-rate divider (Hz, truncated).
    #[must_use]
    pub fn bit_clock_hz(&self) -> u32 {
        self.master_clock_hz()
            .checked_div(self.bitrate)
            .unwrap_or(0)
    }

    /// Frame rate produced for a given framing (Hz, truncated).
    #[must_use]
    pub fn sample_rate_hz(&self, word_width: WordWidth, channels: ChannelMode) -> u32 {
        self.bit_clock_hz()
            .checked_div(word_width.bits().saturating_mul(channels.channels()))
            .unwrap_or(0)
    }

    /// RATE register value.
    #[must_use]
    pub fn rate_register(&self) -> u32 {
        encode_rate(self.numerator, self.denominator)
    }

    /// BITRATE register value.
    #[must_use]
    pub fn bitrate_register(&self) -> u32 {
        encode_bitrate(self.bitrate)
    }
}

/// Fractional divider for one base: exact sub-multiple first, otherwise the
/// closest fraction not above 1.
fn fractional_divider(base_hz: u32, master_clock_hz: u32) -> (u32, u32) {
    if base_hz.checked_rem(master_clock_hz) == Some(0) {
        if let Some(quotient) = base_hz.checked_div(master_clock_hz) {
            if (1..=MAX_RATE_TERM).contains(&quotient) {
                return (1, quotient);
            }
        }
    }

    let ratio = f64::from(master_clock_hz) / f64::from(base_hz);
    // The fractional stage only divides.
    if ratio >= 1.0 {
        return (1, 1);
    }
    approximate(ratio, MAX_RATE_TERM, MAX_RATE_TERM)
}

fn achieved_hz(base_hz: u32, numerator: u32, denominator: u32) -> u64 {
    u64::from(base_hz)
        .saturating_mul(u64::from(numerator))
        .checked_div(u64::from(denominator))
        .unwrap_or(0)
}

/// Bit-rate divider from MCLK to the requested BCLK, rounded, 1..=64.
fn bitrate_divider(master_clock_hz: u64, bit_clock_hz: u64) -> u32 {
    if bit_clock_hz == 0 {
        return MAX_BITRATE_DIV;
    }
    #[allow(clippy::cast_precision_loss)] // audio clocks are far below 2^52
    let ratio = master_clock_hz as f64 / bit_clock_hz as f64;
    let (whole, frac) = split_ratio(ratio);
    let rounded = if frac >= 0.5 {
        whole.saturating_add(1)
    } else {
        whole
    };
    rounded.clamp(1, MAX_BITRATE_DIV)
}

/// Pick base clock and divider settings for `request`.
///
/// Lower MCLK error wins; equal error goes to the smaller denominator, then
/// to the earlier preset in [`ClockBase::ALL`].
#[must_use]
pub fn solve(request: &ClockRequest, presets: &ClockPresets) -> DividerSolution {
    let target = u64::from(request.master_clock_hz);
    let mut best: Option<(u64, DividerSolution)> = None;

    for base in ClockBase::ALL {
        let base_hz = presets.hz(base);
        let (numerator, denominator) = fractional_divider(base_hz, request.master_clock_hz);
        let achieved = achieved_hz(base_hz, numerator, denominator);
        let error = achieved.abs_diff(target);

        let candidate = DividerSolution {
            base,
            base_hz,
            numerator,
            denominator,
            bitrate: bitrate_divider(achieved, request.bit_clock_hz()),
        };

        let better = match &best {
            None => true,
            Some((best_error, best_solution)) => {
                error < *best_error
                    || (error == *best_error && denominator < best_solution.denominator)
            }
        };
        if better {
            best = Some((error, candidate));
        }
    }

    let solution = match best {
        Some((_, solution)) => solution,
        None => DividerSolution {
            base: ClockBase::Audio48k,
            base_hz: presets.audio_48k_hz,
            numerator: 1,
            denominator: 1,
            bitrate: 1,
        },
    };

    debug!(
        "i2s clock: base {} Hz x {}/{} / {} -> mclk {} Hz, bclk {} Hz",
        solution.base_hz,
        solution.numerator,
        solution.denominator,
        solution.bitrate,
        solution.master_clock_hz(),
        solution.bit_clock_hz()
    );

    solution
}
