//! Mock implementations for testing
//!
//! Host-side stand-ins for the collaborator traits:
//!
//! - [`MockI2sBus`]: register file of one serial audio block with a loopback
//!   FIFO. Whatever the transmit half pushes, the receive half pops. Also
//!   models the NVIC side ([`InterruptLine`]) and raises FIFO interrupts
//!   through the bound [`IrqDispatch`].
//! - [`MockPinMux`]: accepts every pin except the ones it was told to reject
//!   and records each binding.
//!
//! `MockI2sBus` is a cheap handle (`Clone` shares state) so a transmit and a
//! receive driver can sit on the same block while the test keeps a third
//! handle for inspection. Handles are `Send`, so an interrupt callback can
//! own one and refill the FIFO the way firmware would.
//!
//! # FIFO interrupts
//!
//! The IRQ depth of each half is in FIFO words. A half whose interrupt is
//! enabled and unmasked fires when the occupancy lands on its depth:
//!
//! - receive: on the way up, as words arrive
//! - transmit: on the way up, and on the way down as the bus shifts words
//!   out (the "empty enough" edge a refill callback waits for)

#![cfg(any(test, feature = "std"))]
#![allow(clippy::indexing_slicing)] // Safety: every index is half() of a Direction, always 0 or 1

extern crate alloc;

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;

use critical_section::Mutex;

use crate::gpio::{PinError, PinMux, PinRole};
use crate::i2s_types::Direction;
use crate::irq::IrqDispatch;
use crate::peripheral::{I2sRegisters, InterruptLine};
use crate::registers::{
    encode_state, irq_depth, irq_enabled, CTRL_MUTE, CTRL_RESET, FIFO_DEPTH_WORDS,
};

/// Error injected by [`MockI2sBus::fail_writes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[error("mock bus write rejected")]
pub struct MockBusError;

const fn half(direction: Direction) -> usize {
    match direction {
        Direction::Transmit => 0,
        Direction::Receive => 1,
    }
}

/// Interrupts to deliver once the bus state is released.
type Fired = Vec<(Direction, &'static IrqDispatch)>;

#[derive(Default)]
struct BusState {
    powered: bool,
    control: [u32; 2],
    mode: [u32; 2],
    rate: [u32; 2],
    bitrate: [u32; 2],
    irq: u32,

    fifo: VecDeque<u32>,
    source: VecDeque<u32>,
    sink: Vec<u32>,
    drain_when_full: bool,

    fail_writes: bool,
    reject_control_bits: u32,

    vectors: [Option<&'static IrqDispatch>; 2],
    unmasked: [bool; 2],
    interrupts_raised: [usize; 2],
    register_writes: usize,
    writes_while_unpowered: usize,
}

impl BusState {
    fn note_write(&mut self) -> Result<(), MockBusError> {
        if self.fail_writes {
            return Err(MockBusError);
        }
        self.register_writes = self.register_writes.wrapping_add(1);
        if !self.powered {
            self.writes_while_unpowered = self.writes_while_unpowered.wrapping_add(1);
        }
        Ok(())
    }

    /// Raise `direction` if its enabled, unmasked depth equals the occupancy.
    fn raise_at_depth(&mut self, direction: Direction, fired: &mut Fired) {
        let i = half(direction);
        if irq_enabled(self.irq, direction)
            && usize::from(irq_depth(self.irq, direction)) == self.fifo.len()
            && self.unmasked[i]
        {
            self.interrupts_raised[i] = self.interrupts_raised[i].wrapping_add(1);
            if let Some(dispatch) = self.vectors[i] {
                fired.push((direction, dispatch));
            }
        }
    }

    /// Push a word; both halves watch the rising edge.
    fn push(&mut self, word: u32) -> Fired {
        self.fifo.push_back(word);
        let mut fired = Vec::new();
        self.raise_at_depth(Direction::Transmit, &mut fired);
        self.raise_at_depth(Direction::Receive, &mut fired);
        fired
    }

    /// Shift the oldest word out to the sink; only transmit watches the
    /// falling edge.
    fn shift(&mut self) -> Option<Fired> {
        let word = self.fifo.pop_front()?;
        self.sink.push(word);
        let mut fired = Vec::new();
        self.raise_at_depth(Direction::Transmit, &mut fired);
        Some(fired)
    }
}

fn deliver(fired: Fired) {
    for (direction, dispatch) in fired {
        dispatch.on_interrupt(direction);
    }
}

/// Loopback register file of one serial audio block.
#[derive(Clone)]
pub struct MockI2sBus {
    state: Arc<Mutex<RefCell<BusState>>>,
}

impl Default for MockI2sBus {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(RefCell::new(BusState::default()))),
        }
    }
}

impl MockI2sBus {
    /// Fresh, unpowered block with empty FIFO.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` on the shared state. Never deliver interrupts from inside.
    fn with<R>(&self, f: impl FnOnce(&mut BusState) -> R) -> R {
        critical_section::with(|cs| f(&mut self.state.borrow_ref_mut(cs)))
    }

    /// Make every register write (and FIFO push) fail.
    pub fn fail_writes(&self, fail: bool) {
        self.with(|s| s.fail_writes = fail);
    }

    /// Drop these CONTROL bits on write so the read-back differs.
    pub fn reject_control_bits(&self, mask: u32) {
        self.with(|s| s.reject_control_bits = mask);
    }

    /// Model the bus shifting words out: when the FIFO is full, each STATE
    /// poll moves the oldest word to [`sink`](Self::sink).
    pub fn drain_when_full(&self, drain: bool) {
        self.with(|s| s.drain_when_full = drain);
    }

    /// Shift up to `count` words out to [`sink`](Self::sink), one at a
    /// time, running transmit callbacks as the occupancy falls past the
    /// depth. Returns the words shifted.
    pub fn shift_out(&self, count: usize) -> usize {
        let mut shifted = 0usize;
        while shifted < count {
            let Some(fired) = self.with(BusState::shift) else {
                break;
            };
            shifted = shifted.saturating_add(1);
            deliver(fired);
        }
        shifted
    }

    /// Queue words the bus will deliver into the FIFO as the receiver polls.
    pub fn feed(&self, words: &[u32]) {
        self.with(|s| s.source.extend(words.iter().copied()));
    }

    /// Words currently in the FIFO, oldest first.
    pub fn fifo_words(&self) -> Vec<u32> {
        self.with(|s| s.fifo.iter().copied().collect())
    }

    /// Words shifted out by the bus.
    pub fn sink(&self) -> Vec<u32> {
        self.with(|s| s.sink.clone())
    }

    /// Whether the block is powered.
    pub fn is_powered(&self) -> bool {
        self.with(|s| s.powered)
    }

    /// Last CONTROL value of a half.
    pub fn control(&self, direction: Direction) -> u32 {
        self.with(|s| s.control[half(direction)])
    }

    /// Last MODE value of a half.
    pub fn mode(&self, direction: Direction) -> u32 {
        self.with(|s| s.mode[half(direction)])
    }

    /// Last RATE value of a half.
    pub fn rate(&self, direction: Direction) -> u32 {
        self.with(|s| s.rate[half(direction)])
    }

    /// Last BITRATE value of a half.
    pub fn bitrate(&self, direction: Direction) -> u32 {
        self.with(|s| s.bitrate[half(direction)])
    }

    /// Last IRQ value.
    pub fn irq(&self) -> u32 {
        self.with(|s| s.irq)
    }

    /// Whether the interrupt of a half is unmasked at the controller.
    pub fn is_unmasked(&self, direction: Direction) -> bool {
        self.with(|s| s.unmasked[half(direction)])
    }

    /// Threshold crossings signalled for a half, handled or not.
    pub fn interrupts_raised(&self, direction: Direction) -> usize {
        self.with(|s| s.interrupts_raised[half(direction)])
    }

    /// Successful register writes so far.
    pub fn register_writes(&self) -> usize {
        self.with(|s| s.register_writes)
    }

    /// Register writes that arrived while the block was unpowered.
    pub fn writes_while_unpowered(&self) -> usize {
        self.with(|s| s.writes_while_unpowered)
    }

    fn push_and_raise(&self, word: u32) {
        deliver(self.with(|s| s.push(word)));
    }
}

impl I2sRegisters for MockI2sBus {
    type Error = MockBusError;

    fn set_power(&mut self, on: bool) -> Result<(), Self::Error> {
        self.with(|s| s.powered = on);
        Ok(())
    }

    fn write_control(&mut self, direction: Direction, value: u32) -> Result<(), Self::Error> {
        self.with(|s| {
            s.note_write()?;
            if value & CTRL_RESET != 0 {
                s.fifo.clear();
            }
            s.control[half(direction)] = value & !CTRL_RESET & !s.reject_control_bits;
            Ok(())
        })
    }

    fn read_control(&mut self, direction: Direction) -> Result<u32, Self::Error> {
        Ok(self.with(|s| s.control[half(direction)]))
    }

    fn write_mode(&mut self, direction: Direction, value: u32) -> Result<(), Self::Error> {
        self.with(|s| {
            s.note_write()?;
            s.mode[half(direction)] = value;
            Ok(())
        })
    }

    fn write_rate(&mut self, direction: Direction, value: u32) -> Result<(), Self::Error> {
        self.with(|s| {
            s.note_write()?;
            s.rate[half(direction)] = value;
            Ok(())
        })
    }

    fn write_bitrate(&mut self, direction: Direction, value: u32) -> Result<(), Self::Error> {
        self.with(|s| {
            s.note_write()?;
            s.bitrate[half(direction)] = value;
            Ok(())
        })
    }

    fn read_irq(&mut self) -> Result<u32, Self::Error> {
        Ok(self.with(|s| s.irq))
    }

    fn write_irq(&mut self, value: u32) -> Result<(), Self::Error> {
        self.with(|s| {
            s.note_write()?;
            s.irq = value;
            Ok(())
        })
    }

    fn read_state(&mut self) -> Result<u32, Self::Error> {
        let drained = self.with(|s| {
            if s.drain_when_full && s.fifo.len() >= FIFO_DEPTH_WORDS {
                s.shift()
            } else {
                None
            }
        });
        if let Some(fired) = drained {
            deliver(fired);
        }

        let pending: Vec<u32> = self.with(|s| {
            if s.fifo.is_empty() {
                let take = s.source.len().min(FIFO_DEPTH_WORDS);
                s.source.drain(..take).collect()
            } else {
                Vec::new()
            }
        });
        for word in pending {
            self.push_and_raise(word);
        }

        let level = self.with(|s| u8::try_from(s.fifo.len()).unwrap_or(u8::MAX));
        Ok(encode_state(level, level, false))
    }

    fn write_fifo(&mut self, word: u32) -> Result<(), Self::Error> {
        let word = self.with(|s| {
            if s.fail_writes {
                return Err(MockBusError);
            }
            if s.fifo.len() >= FIFO_DEPTH_WORDS {
                // Overrun: the hardware drops the word.
                return Ok(None);
            }
            // A muted transmitter shifts out zero slots.
            if s.control[half(Direction::Transmit)] & CTRL_MUTE != 0 {
                Ok(Some(0))
            } else {
                Ok(Some(word))
            }
        })?;
        if let Some(word) = word {
            self.push_and_raise(word);
        }
        Ok(())
    }

    fn read_fifo(&mut self) -> Result<u32, Self::Error> {
        Ok(self.with(|s| s.fifo.pop_front().unwrap_or(0)))
    }
}

impl InterruptLine for MockI2sBus {
    fn set_vector(&mut self, direction: Direction, dispatch: &'static IrqDispatch) {
        self.with(|s| s.vectors[half(direction)] = Some(dispatch));
    }

    fn enable(&mut self, direction: Direction) {
        self.with(|s| s.unmasked[half(direction)] = true);
    }

    fn disable(&mut self, direction: Direction) {
        self.with(|s| s.unmasked[half(direction)] = false);
    }
}

/// Pin mux that accepts everything not explicitly rejected.
#[derive(Debug, Default)]
pub struct MockPinMux {
    rejected: Vec<u8>,
    bound: Vec<(u8, PinRole, Direction)>,
}

impl MockPinMux {
    /// Mux accepting every pin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mux that refuses the listed pins with [`PinError::Unsupported`].
    pub fn rejecting(pins: &[u8]) -> Self {
        Self {
            rejected: pins.to_vec(),
            bound: Vec::new(),
        }
    }

    /// Successful bindings in call order.
    pub fn bindings(&self) -> &[(u8, PinRole, Direction)] {
        &self.bound
    }
}

impl PinMux for MockPinMux {
    type Pin = u8;

    fn bind(&mut self, pin: u8, role: PinRole, direction: Direction) -> Result<(), PinError> {
        if self.rejected.contains(&pin) {
            return Err(PinError::Unsupported);
        }
        if self.bound.iter().any(|(p, _, _)| *p == pin) {
            return Err(PinError::InUse);
        }
        self.bound.push((pin, role, direction));
        Ok(())
    }
}
