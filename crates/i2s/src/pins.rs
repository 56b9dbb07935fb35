//! Pin set of one driver instance.
//!
//! Serial data is always required. Word select and bit clock are either
//! both given (three-wire: this half owns its clocks) or both left out
//! (four-wire: clocks are borrowed from the other half). Master clock is
//! optional either way.

use heapless::Vec;
use platform::{Direction, PinMux, PinRole, WireMode};

use crate::error::I2sError;

/// Pins handed to [`I2s::new`](crate::I2s::new). Fixed after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sPins<P> {
    /// SD.
    pub serial_data: P,
    /// WS, `None` when shared.
    pub word_select: Option<P>,
    /// BCLK, `None` when shared.
    pub bit_clock: Option<P>,
    /// MCLK output, optional.
    pub master_clock: Option<P>,
}

impl<P: Copy> I2sPins<P> {
    /// Three-wire pin set: this half drives or samples its own clocks.
    pub fn new(serial_data: P, word_select: P, bit_clock: P) -> Self {
        Self {
            serial_data,
            word_select: Some(word_select),
            bit_clock: Some(bit_clock),
            master_clock: None,
        }
    }

    /// Four-wire pin set: only serial data, clocks shared with the other half.
    pub fn shared_clocks(serial_data: P) -> Self {
        Self {
            serial_data,
            word_select: None,
            bit_clock: None,
            master_clock: None,
        }
    }

    /// Add the MCLK output pin.
    #[must_use]
    pub fn with_master_clock(mut self, master_clock: P) -> Self {
        self.master_clock = Some(master_clock);
        self
    }

    /// Wire mode implied by the clock pins, `None` if only one is given.
    pub fn wire_mode(&self) -> Option<WireMode> {
        match (self.word_select.is_some(), self.bit_clock.is_some()) {
            (true, true) => Some(WireMode::ThreeWire),
            (false, false) => Some(WireMode::FourWire),
            _ => None,
        }
    }
}

/// Outcome of routing a pin set.
#[derive(Debug, Default)]
pub(crate) struct PinReport {
    /// Wire mode to program.
    pub wire: WireMode,
    /// Every failure, in binding order.
    pub errors: Vec<I2sError, 4>,
}

/// Route every pin of `pins` through `mux`, collecting failures.
///
/// A lone word-select or bit-clock pin is not bound; the half is left in
/// three-wire mode so it does not take over the other half's clocks.
pub(crate) fn bind<M: PinMux>(
    mux: &mut M,
    pins: &I2sPins<M::Pin>,
    direction: Direction,
) -> PinReport {
    let mut report = PinReport::default();

    let mut route = |pin: M::Pin, role: PinRole, errors: &mut Vec<I2sError, 4>| {
        if let Err(reason) = mux.bind(pin, role, direction) {
            warn!("i2s: pin rejected ({})", role_name(role));
            // Capacity covers every pin of the set.
            let _ = errors.push(I2sError::PinRejected { role, reason });
        }
    };

    route(pins.serial_data, PinRole::SerialData, &mut report.errors);

    match (pins.word_select, pins.bit_clock) {
        (Some(ws), Some(bclk)) => {
            route(ws, PinRole::WordSelect, &mut report.errors);
            route(bclk, PinRole::BitClock, &mut report.errors);
            report.wire = WireMode::ThreeWire;
        }
        (None, None) => report.wire = WireMode::FourWire,
        _ => {
            warn!("i2s: word select and bit clock must be given together");
            let _ = report.errors.push(I2sError::ClockPinsMismatched);
            report.wire = WireMode::ThreeWire;
        }
    }

    if let Some(mclk) = pins.master_clock {
        route(mclk, PinRole::MasterClock, &mut report.errors);
    }

    report
}

pub(crate) const fn role_name(role: PinRole) -> &'static str {
    match role {
        PinRole::SerialData => "SD",
        PinRole::WordSelect => "WS",
        PinRole::BitClock => "BCLK",
        PinRole::MasterClock => "MCLK",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::MockPinMux;

    #[test]
    fn three_wire_binds_all_pins() {
        let mut mux = MockPinMux::new();
        let pins = I2sPins::new(1u8, 2, 3).with_master_clock(4);
        let report = bind(&mut mux, &pins, Direction::Transmit);
        assert!(report.errors.is_empty());
        assert_eq!(report.wire, WireMode::ThreeWire);
        assert_eq!(mux.bindings().len(), 4);
    }

    #[test]
    fn shared_clocks_bind_only_serial_data() {
        let mut mux = MockPinMux::new();
        let report = bind(&mut mux, &I2sPins::shared_clocks(7u8), Direction::Receive);
        assert!(report.errors.is_empty());
        assert_eq!(report.wire, WireMode::FourWire);
        assert_eq!(mux.bindings(), &[(7, PinRole::SerialData, Direction::Receive)]);
    }

    #[test]
    fn lone_clock_pin_is_an_error() {
        let mut mux = MockPinMux::new();
        let pins = I2sPins {
            serial_data: 1u8,
            word_select: Some(2),
            bit_clock: None,
            master_clock: None,
        };
        assert_eq!(pins.wire_mode(), None);
        let report = bind(&mut mux, &pins, Direction::Transmit);
        assert_eq!(report.errors.as_slice(), &[I2sError::ClockPinsMismatched]);
        assert_eq!(report.wire, WireMode::ThreeWire);
    }

    #[test]
    fn every_rejected_pin_is_counted() {
        let mut mux = MockPinMux::rejecting(&[1, 2, 3, 4]);
        let pins = I2sPins::new(1u8, 2, 3).with_master_clock(4);
        let report = bind(&mut mux, &pins, Direction::Transmit);
        assert_eq!(report.errors.len(), 4);
        assert!(report.errors.iter().all(I2sError::is_pin_error));
    }
}
