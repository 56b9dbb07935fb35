//! FIFO word packing.
//!
//! Each half of the peripheral has an 8-word FIFO of 32-bit words. Samples
//! travel as word-width slots packed into those words, first slot in the
//! low bits:
//!
//! ```text
//!   8-bit   | s3 | s2 | s1 | s0 |    four slots per word
//!   16-bit  |   s1    |   s0    |    two slots per word
//!   32-bit  |        s0         |    one slot per word
//! ```
//!
//! Raw byte transfers ignore the word width and stuff four bytes into every
//! word, little-endian.

use platform::registers::FIFO_DEPTH_WORDS;
use platform::WordWidth;

/// FIFO depth of one half, in 32-bit words.
pub const FIFO_DEPTH: usize = FIFO_DEPTH_WORDS;

/// Bytes carried by one FIFO word in raw mode.
pub const BYTES_PER_WORD: usize = 4;

/// Pack up to `slots_per_word` values into one word; missing slots are zero.
#[must_use]
#[allow(clippy::cast_sign_loss)] // two's complement bits are kept on purpose
#[allow(clippy::cast_possible_truncation)] // index < 4
#[allow(clippy::arithmetic_side_effects)] // Safety: bits * index < 32
pub fn pack_word<I>(width: WordWidth, slots: I) -> u32
where
    I: IntoIterator<Item = i32>,
{
    let bits = width.bits();
    slots
        .into_iter()
        .take(width.slots_per_word())
        .enumerate()
        .fold(0, |word, (index, value)| {
            word | ((value as u32 & width.mask()) << (bits * index as u32))
        })
}

/// Slot `index` of `word`, sign-extended from the word width.
///
/// Out-of-range indices read as zero.
#[must_use]
#[allow(clippy::cast_possible_wrap)] // reinterpreting the slot bits
#[allow(clippy::arithmetic_side_effects)] // Safety: shifts stay below 32
pub fn unpack_slot(word: u32, width: WordWidth, index: usize) -> i32 {
    if index >= width.slots_per_word() {
        return 0;
    }
    let bits = width.bits();
    let shift = bits.saturating_mul(u32::try_from(index).unwrap_or(0));
    let raw = word.checked_shr(shift).unwrap_or(0) & width.mask();
    let unused = u32::BITS.saturating_sub(bits);
    ((raw << unused) as i32) >> unused
}

/// FIFO words needed for `slots` slots.
#[must_use]
pub fn words_for_slots(slots: usize, width: WordWidth) -> usize {
    slots.div_ceil(width.slots_per_word())
}

/// Stuff up to four bytes into a word, little-endian, zero-padded.
#[must_use]
pub fn pack_bytes(chunk: &[u8]) -> u32 {
    let mut bytes = [0u8; BYTES_PER_WORD];
    for (dst, src) in bytes.iter_mut().zip(chunk) {
        *dst = *src;
    }
    u32::from_le_bytes(bytes)
}

/// Spill a word into up to four bytes, little-endian.
pub fn unpack_bytes(word: u32, out: &mut [u8]) {
    for (dst, src) in out.iter_mut().zip(word.to_le_bytes()) {
        *dst = src;
    }
}

/// Samples represented by a FIFO fill level. Monotone in `level`.
#[must_use]
pub fn points(level: u8, width: WordWidth) -> usize {
    usize::from(level).saturating_mul(width.slots_per_word())
}
