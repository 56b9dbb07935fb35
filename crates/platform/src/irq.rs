//! FIFO interrupt dispatch table.
//!
//! One [`IrqDispatch`] exists per physical serial audio block, normally as a
//! `static` next to the interrupt handlers of the chip support crate:
//!
//! ```rust,ignore
//! static I2S0_IRQ: IrqDispatch = IrqDispatch::new();
//!
//! #[interrupt]
//! fn I2S0_TX() {
//!     I2S0_IRQ.on_interrupt(Direction::Transmit);
//! }
//! ```
//!
//! Both driver instances (transmit and receive) of the block share the same
//! table. Each half holds at most one callback; attaching replaces.
//!
//! The callback is taken out of the table while it runs, so it may attach or
//! detach without deadlocking. A generation counter keeps a detach/attach
//! made from inside the callback from being overwritten when the callback
//! is put back.

extern crate alloc;

use alloc::boxed::Box;
use core::cell::RefCell;

use critical_section::Mutex;

use crate::i2s_types::Direction;

/// A bound FIFO-threshold callback.
pub type IrqCallback = Box<dyn FnMut() + Send>;

#[derive(Default)]
struct Slot {
    callback: Option<IrqCallback>,
    generation: u32,
}

impl Slot {
    const fn empty() -> Self {
        Self {
            callback: None,
            generation: 0,
        }
    }

    fn replace(&mut self, callback: Option<IrqCallback>) -> bool {
        self.generation = self.generation.wrapping_add(1);
        core::mem::replace(&mut self.callback, callback).is_some()
    }
}

struct Slots {
    tx: Slot,
    rx: Slot,
}

impl Slots {
    fn get_mut(&mut self, direction: Direction) -> &mut Slot {
        match direction {
            Direction::Transmit => &mut self.tx,
            Direction::Receive => &mut self.rx,
        }
    }
}

/// Per-block table of FIFO interrupt callbacks.
pub struct IrqDispatch {
    slots: Mutex<RefCell<Slots>>,
}

impl IrqDispatch {
    /// Empty table; `const` so it can initialise a `static`.
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(RefCell::new(Slots {
                tx: Slot::empty(),
                rx: Slot::empty(),
            })),
        }
    }

    /// Bind `callback` to `direction`. Returns `true` if it replaced one.
    pub fn attach(&self, direction: Direction, callback: IrqCallback) -> bool {
        critical_section::with(|cs| {
            self.slots
                .borrow_ref_mut(cs)
                .get_mut(direction)
                .replace(Some(callback))
        })
    }

    /// Remove the callback of `direction`. Returns `true` if one was bound.
    pub fn detach(&self, direction: Direction) -> bool {
        critical_section::with(|cs| self.slots.borrow_ref_mut(cs).get_mut(direction).replace(None))
    }

    /// Whether a callback is bound to `direction`.
    pub fn is_attached(&self, direction: Direction) -> bool {
        critical_section::with(|cs| {
            self.slots
                .borrow_ref_mut(cs)
                .get_mut(direction)
                .callback
                .is_some()
        })
    }

    /// Interrupt entry point: run the callback of `direction`, if any.
    pub fn on_interrupt(&self, direction: Direction) {
        let taken = critical_section::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            let slot = slots.get_mut(direction);
            slot.callback.take().map(|cb| (cb, slot.generation))
        });

        let Some((mut callback, generation)) = taken else {
            return;
        };

        callback();

        critical_section::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            let slot = slots.get_mut(direction);
            // Attached or detached from inside the callback: keep that.
            if slot.generation == generation {
                slot.callback = Some(callback);
            }
        });
    }
}

impl Default for IrqDispatch {
    fn default() -> Self {
        Self::new()
    }
}
