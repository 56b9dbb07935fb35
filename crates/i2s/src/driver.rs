//! I2S driver: configuration, FIFO transfers, FIFO interrupts.
//!
//! One [`I2s`] drives one half (transmit or receive) of a serial audio
//! block. A full-duplex link is two instances on the same block, sharing
//! its [`IrqDispatch`].
//!
//! # State machine
//!
//! ```text
//!             power(true)                    start()
//!   Unpowered ───────────▶ Powered/Stopped ─────────▶ Powered/Running
//!       ▲                       │    ▲                     │
//!       └───── power(false) ────┘    └─────── stop() ──────┘
//! ```
//!
//! Setters always update the stored configuration. While unpowered the
//! register writes are skipped and replayed by `power(true)`.
//!
//! # Errors
//!
//! No method returns an error. Pin failures and register failures (including
//! a CONTROL read-back that differs from what was written) are counted;
//! [`I2s::setup_ok`] is true only while both counts are zero.

extern crate alloc;

use alloc::boxed::Box;
use core::hint::spin_loop;

use heapless::Vec;
use platform::registers::{state_level, with_irq};
use platform::{
    ChannelMode, Direction, FifoLevel, I2sRegisters, InterruptLine, IrqDispatch, MuteState, PinMux,
    Role, RunState, WordWidth,
};

use crate::clock::{solve, ClockPresets, DividerSolution};
use crate::config::PeripheralConfig;
use crate::error::I2sError;
use crate::fifo::{
    pack_bytes, pack_word, points, unpack_bytes, unpack_slot, words_for_slots, BYTES_PER_WORD,
    FIFO_DEPTH,
};
use crate::pins::{self, I2sPins};

/// Receiver of FIFO-threshold notifications.
///
/// Runs in interrupt context: keep it short and do not call back into the
/// driver that raised it.
pub trait FifoHandler {
    /// The FIFO crossed the configured level.
    fn on_fifo_threshold(&mut self);
}

const fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Transmit => "tx",
        Direction::Receive => "rx",
    }
}

/// Driver for one half of a serial audio block.
pub struct I2s<H, M>
where
    H: I2sRegisters + InterruptLine,
    M: PinMux,
{
    hw: H,
    _pin_mux: M,
    pins: I2sPins<M::Pin>,
    presets: ClockPresets,
    irq: &'static IrqDispatch,
    config: PeripheralConfig,
    solution: DividerSolution,
    interrupt_enabled: bool,
    pin_setup_err: u32,
    reg_write_err: u32,
    last_error: Option<I2sError>,
}

impl<H, M> I2s<H, M>
where
    H: I2sRegisters + InterruptLine,
    M: PinMux,
{
    /// Bind `pins`, apply the power-on defaults, power up and program the
    /// peripheral. The half starts stopped.
    ///
    /// Pin failures do not abort construction; check [`setup_ok`](Self::setup_ok).
    pub fn new(
        hw: H,
        mut pin_mux: M,
        pins: I2sPins<M::Pin>,
        function: Direction,
        presets: ClockPresets,
        irq: &'static IrqDispatch,
    ) -> Self {
        let report = pins::bind(&mut pin_mux, &pins, function);

        let mut config = PeripheralConfig::new(function);
        config.wire = report.wire;

        let mut this = Self {
            hw,
            _pin_mux: pin_mux,
            pins,
            presets,
            irq,
            solution: solve(&config.clock_request(), &presets),
            config,
            interrupt_enabled: false,
            pin_setup_err: 0,
            reg_write_err: 0,
            last_error: None,
        };

        for error in report.errors {
            this.record(error);
        }

        this.hw.set_vector(function, irq);
        this.power(true);

        info!(
            "i2s {}: ready, {} pin errors, {} register errors",
            direction_name(function),
            this.pin_setup_err,
            this.reg_write_err
        );
        this
    }

    // ── Status ──────────────────────────────────────────────────────────────

    /// No pin or register failure so far.
    pub fn setup_ok(&self) -> bool {
        self.pin_setup_err == 0 && self.reg_write_err == 0
    }

    /// Pins the mux refused (plus a lone WS/BCLK pin).
    pub fn pin_setup_errors(&self) -> u32 {
        self.pin_setup_err
    }

    /// Register accesses that failed or did not read back.
    pub fn reg_write_errors(&self) -> u32 {
        self.reg_write_err
    }

    /// Most recent failure.
    pub fn last_error(&self) -> Option<I2sError> {
        self.last_error
    }

    /// Current configuration.
    pub fn config(&self) -> &PeripheralConfig {
        &self.config
    }

    /// Divider settings for the current configuration.
    pub fn clock_solution(&self) -> &DividerSolution {
        &self.solution
    }

    /// Pins this instance was built with.
    pub fn pins(&self) -> &I2sPins<M::Pin> {
        &self.pins
    }

    /// Whether the bit clock is running.
    pub fn is_running(&self) -> bool {
        self.config.powered && self.config.run == RunState::Run
    }

    fn record(&mut self, error: I2sError) {
        if error.is_pin_error() {
            self.pin_setup_err = self.pin_setup_err.saturating_add(1);
        } else {
            self.reg_write_err = self.reg_write_err.saturating_add(1);
        }
        self.last_error = Some(error);
    }

    fn check<T, E>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("i2s {}: register access failed", direction_name(self.config.function));
                self.record(I2sError::RegisterAccess);
                None
            }
        }
    }

    // ── Register commit ─────────────────────────────────────────────────────

    fn write_control(&mut self) {
        if !self.config.powered {
            return;
        }
        let function = self.config.function;
        let wrote = self.config.control_register();
        let result = self.hw.write_control(function, wrote);
        if self.check(result).is_none() {
            return;
        }
        let result = self.hw.read_control(function);
        if let Some(read) = self.check(result) {
            if read != wrote {
                warn!("i2s {}: control read-back mismatch", direction_name(function));
                self.record(I2sError::ReadBackMismatch { wrote, read });
            }
        }
    }

    fn write_mode(&mut self) {
        if !self.config.powered {
            return;
        }
        let value = self.config.mode_register(self.solution.base);
        let result = self.hw.write_mode(self.config.function, value);
        self.check(result);
    }

    fn write_dividers(&mut self) {
        if !self.config.powered {
            return;
        }
        let function = self.config.function;
        let result = self.hw.write_rate(function, self.solution.rate_register());
        self.check(result);
        let result = self.hw.write_bitrate(function, self.solution.bitrate_register());
        self.check(result);
    }

    fn write_irq(&mut self) {
        if !self.config.powered {
            return;
        }
        let result = self.hw.read_irq();
        let Some(current) = self.check(result) else {
            return;
        };
        let value = with_irq(
            current,
            self.config.function,
            self.interrupt_enabled,
            self.interrupt_depth(),
        );
        let result = self.hw.write_irq(value);
        self.check(result);
    }

    /// Interrupt level in FIFO words: the sample level rounded up to whole
    /// words of the current width.
    fn interrupt_depth(&self) -> FifoLevel {
        let samples = usize::from(self.config.interrupt_level.get());
        let words = words_for_slots(samples, self.config.word_width);
        FifoLevel::new(u8::try_from(words).unwrap_or(FifoLevel::MAX))
    }

    /// Re-run the solver and program everything that depends on the clock
    /// or the word width.
    fn reclock(&mut self) {
        self.solution = solve(&self.config.clock_request(), &self.presets);
        self.write_mode();
        self.write_dividers();
        self.write_control();
        self.write_irq();
    }

    // ── Configuration manager ───────────────────────────────────────────────

    /// Gate the peripheral. Powering up replays the whole configuration.
    pub fn power(&mut self, on: bool) {
        if on == self.config.powered {
            return;
        }
        let result = self.hw.set_power(on);
        self.check(result);
        self.config.powered = on;
        if on {
            self.reclock();
        }
        debug!(
            "i2s {}: power {}",
            direction_name(self.config.function),
            if on { "on" } else { "off" }
        );
    }

    /// Start the bit clock. Ignored while unpowered.
    pub fn start(&mut self) {
        if !self.config.powered {
            warn!(
                "i2s {}: start ignored, not powered",
                direction_name(self.config.function)
            );
            return;
        }
        self.config.run = RunState::Run;
        self.reclock();
    }

    /// Halt the bit clock; transfers become no-ops.
    pub fn stop(&mut self) {
        self.config.run = RunState::Stop;
        self.write_control();
    }

    /// Set role, master clock, sample rate and word width in one go.
    ///
    /// Zero frequencies keep the previous value.
    pub fn format(
        &mut self,
        role: Role,
        master_clock_hz: u32,
        sample_rate_hz: u32,
        word_width: WordWidth,
    ) {
        self.config.role = role;
        self.config.word_width = word_width;
        self.store_master_clock(master_clock_hz);
        self.store_sample_rate(sample_rate_hz);
        self.reclock();
    }

    /// Master or slave clocks.
    pub fn role(&mut self, role: Role) {
        self.config.role = role;
        self.write_mode();
        self.write_control();
    }

    /// Bits per slot.
    pub fn wordsize(&mut self, word_width: WordWidth) {
        self.config.word_width = word_width;
        self.reclock();
    }

    /// Requested master clock (Hz). Zero is ignored.
    pub fn mclk_freq(&mut self, master_clock_hz: u32) {
        if self.store_master_clock(master_clock_hz) {
            self.reclock();
        }
    }

    /// Requested sample rate (Hz). Zero is ignored.
    pub fn frequency(&mut self, sample_rate_hz: u32) {
        if self.store_sample_rate(sample_rate_hz) {
            self.reclock();
        }
    }

    /// Stereo or mono framing.
    pub fn stereomono(&mut self, channels: ChannelMode) {
        self.config.channels = channels;
        self.reclock();
    }

    /// Mute the output.
    pub fn mute(&mut self) {
        self.set_mute(MuteState::Muted);
    }

    /// Set the mute state.
    pub fn set_mute(&mut self, mute: MuteState) {
        self.config.mute = mute;
        self.write_control();
    }

    /// FIFO level, in samples of the configured word width, at which the
    /// interrupt fires. Same unit as [`fifo_points`](Self::fifo_points);
    /// the hardware sees it rounded up to whole FIFO words.
    pub fn set_interrupt_fifo_level(&mut self, level: FifoLevel) {
        self.config.interrupt_level = level;
        self.write_irq();
    }

    /// Drive MCLK on its pin while master.
    pub fn enable_master_clock(&mut self, enable: bool) {
        self.config.mclk_output = enable;
        self.write_mode();
    }

    fn store_master_clock(&mut self, hz: u32) -> bool {
        if hz == 0 {
            warn!("i2s {}: zero master clock ignored", direction_name(self.config.function));
            return false;
        }
        self.config.master_clock_hz = hz;
        true
    }

    fn store_sample_rate(&mut self, hz: u32) -> bool {
        if hz == 0 {
            warn!("i2s {}: zero sample rate ignored", direction_name(self.config.function));
            return false;
        }
        self.config.sample_rate_hz = hz;
        true
    }

    // ── FIFO queries ────────────────────────────────────────────────────────

    /// FIFO depth in words.
    pub fn get_fifo_limit(&self) -> usize {
        FIFO_DEPTH
    }

    /// Current FIFO fill in words, 0..=7.
    pub fn fifo_level(&mut self) -> u8 {
        let result = self.hw.read_state();
        self.check(result)
            .map_or(0, |state| state_level(state, self.config.function).min(FifoLevel::MAX))
    }

    /// Current FIFO fill in samples of the configured word width.
    pub fn fifo_points(&mut self) -> usize {
        points(self.fifo_level(), self.config.word_width)
    }

    // ── Transfer engine ─────────────────────────────────────────────────────

    fn can_transfer(&self, direction: Direction) -> bool {
        if self.config.function != direction {
            warn!(
                "i2s {}: {} transfer ignored",
                direction_name(self.config.function),
                direction_name(direction)
            );
            return false;
        }
        if !self.is_running() {
            warn!("i2s {}: transfer ignored, stopped", direction_name(direction));
            return false;
        }
        true
    }

    /// Raw fill level, or `None` on a register error.
    fn raw_level(&mut self) -> Option<usize> {
        let result = self.hw.read_state();
        self.check(result)
            .map(|state| usize::from(state_level(state, self.config.function)))
    }

    fn push_word(&mut self, word: u32) -> bool {
        loop {
            match self.raw_level() {
                None => return false,
                Some(level) if level < FIFO_DEPTH => break,
                Some(_) => spin_loop(),
            }
        }
        let result = self.hw.write_fifo(word);
        self.check(result).is_some()
    }

    fn pop_word(&mut self) -> Option<u32> {
        loop {
            match self.raw_level() {
                None => return None,
                Some(0) => spin_loop(),
                Some(_) => break,
            }
        }
        let result = self.hw.read_fifo();
        self.check(result)
    }

    /// Pack `slots` into words and push them. Returns slots sent.
    fn write_slots<I>(&mut self, slots: I) -> usize
    where
        I: IntoIterator<Item = i32>,
    {
        let width = self.config.word_width;
        let mut slots = slots.into_iter().peekable();
        let mut sent = 0usize;

        while slots.peek().is_some() {
            let chunk: Vec<i32, 4> = slots.by_ref().take(width.slots_per_word()).collect();
            if !self.push_word(pack_word(width, chunk.iter().copied())) {
                break;
            }
            sent = sent.saturating_add(chunk.len());
        }
        sent
    }

    /// Pop words and hand `count` slots to `sink`. Returns slots received.
    fn read_slots<F>(&mut self, count: usize, mut sink: F) -> usize
    where
        F: FnMut(usize, i32),
    {
        let width = self.config.word_width;
        let per_word = width.slots_per_word();
        let mut received = 0usize;

        for _ in 0..words_for_slots(count, width) {
            let Some(word) = self.pop_word() else {
                break;
            };
            for index in 0..per_word {
                if received >= count {
                    break;
                }
                sink(received, unpack_slot(word, width, index));
                received = received.saturating_add(1);
            }
        }
        received
    }

    /// Send raw bytes, four per FIFO word. Blocks until every word is queued.
    ///
    /// Returns the bytes sent; 0 when stopped or on a receive instance.
    pub fn write_raw(&mut self, bytes: &[u8]) -> usize {
        if !self.can_transfer(Direction::Transmit) {
            return 0;
        }
        let mut sent = 0usize;
        for chunk in bytes.chunks(BYTES_PER_WORD) {
            if !self.push_word(pack_bytes(chunk)) {
                break;
            }
            sent = sent.saturating_add(chunk.len());
        }
        sent
    }

    /// Fill `buf` with raw bytes, four per FIFO word. Blocks until full.
    ///
    /// Returns the bytes received; 0 when stopped or on a transmit instance.
    pub fn read_raw(&mut self, buf: &mut [u8]) -> usize {
        if !self.can_transfer(Direction::Receive) {
            return 0;
        }
        let mut received = 0usize;
        for chunk in buf.chunks_mut(BYTES_PER_WORD) {
            let Some(word) = self.pop_word() else {
                break;
            };
            unpack_bytes(word, chunk);
            received = received.saturating_add(chunk.len());
        }
        received
    }

    /// Send samples of the configured word width.
    ///
    /// Stereo takes interleaved `L, R` values. Mono sends every value in
    /// both channel slots. Returns the values sent.
    pub fn write(&mut self, values: &[i32]) -> usize {
        if !self.can_transfer(Direction::Transmit) {
            return 0;
        }
        match self.config.channels {
            ChannelMode::Stereo => self.write_slots(values.iter().copied()),
            ChannelMode::Mono => self.write_slots(values.iter().flat_map(|&v| [v, v])) / 2,
        }
    }

    /// Send separate left and right buffers as `L, R` frames.
    ///
    /// Stops at the shorter buffer. Returns the frames sent.
    pub fn write_channels(&mut self, left: &[i32], right: &[i32]) -> usize {
        if !self.can_transfer(Direction::Transmit) {
            return 0;
        }
        self.write_slots(left.iter().zip(right).flat_map(|(&l, &r)| [l, r])) / 2
    }

    /// Receive samples into `out`, sign-extended from the word width.
    ///
    /// Stereo fills interleaved `L, R`. Mono keeps the left slot of each
    /// pair. Returns the values received.
    pub fn read_into(&mut self, out: &mut [i32]) -> usize {
        if !self.can_transfer(Direction::Receive) {
            return 0;
        }
        match self.config.channels {
            ChannelMode::Stereo => self.read_slots(out.len(), |i, v| {
                if let Some(slot) = out.get_mut(i) {
                    *slot = v;
                }
            }),
            ChannelMode::Mono => {
                let slots = out.len().saturating_mul(2);
                self.read_slots(slots, |i, v| {
                    if i % 2 == 0 {
                        if let Some(slot) = out.get_mut(i / 2) {
                            *slot = v;
                        }
                    }
                }) / 2
            }
        }
    }

    /// Receive `L, R` frames into separate buffers.
    ///
    /// Stops at the shorter buffer. Returns the frames received.
    pub fn read_channels(&mut self, left: &mut [i32], right: &mut [i32]) -> usize {
        if !self.can_transfer(Direction::Receive) {
            return 0;
        }
        let slots = left.len().min(right.len()).saturating_mul(2);
        self.read_slots(slots, |i, v| {
            let side = if i % 2 == 0 { &mut *left } else { &mut *right };
            if let Some(slot) = side.get_mut(i / 2) {
                *slot = v;
            }
        }) / 2
    }

    /// Pop one raw FIFO word. 0 when stopped or on a transmit instance.
    pub fn read(&mut self) -> i32 {
        if !self.can_transfer(Direction::Receive) {
            return 0;
        }
        self.pop_word()
            .map_or(0, |word| i32::from_ne_bytes(word.to_ne_bytes()))
    }

    // ── Interrupts ──────────────────────────────────────────────────────────

    /// Call `callback` whenever the FIFO reaches the interrupt level.
    ///
    /// Replaces any callback attached earlier to this half.
    pub fn attach(&mut self, callback: fn()) {
        self.attach_closure(move || callback());
    }

    /// Route FIFO interrupts to `handler`.
    pub fn attach_handler<T>(&mut self, mut handler: T)
    where
        T: FifoHandler + Send + 'static,
    {
        self.attach_closure(move || handler.on_fifo_threshold());
    }

    /// Route FIFO interrupts to a closure.
    pub fn attach_closure<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        let function = self.config.function;
        if self.irq.attach(function, Box::new(callback)) {
            debug!("i2s {}: replaced fifo callback", direction_name(function));
        }
        self.hw.set_vector(function, self.irq);
        self.interrupt_enabled = true;
        self.write_irq();
        self.hw.enable(function);
    }

    /// Remove the callback and mask the interrupt of this half.
    pub fn detach(&mut self) {
        let function = self.config.function;
        self.hw.disable(function);
        self.interrupt_enabled = false;
        self.write_irq();
        self.irq.detach(function);
    }
}

impl<H, M> Drop for I2s<H, M>
where
    H: I2sRegisters + InterruptLine,
    M: PinMux,
{
    fn drop(&mut self) {
        self.stop();
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::{MockI2sBus, MockPinMux};
    use platform::registers::{
        decode_bitrate, decode_rate, irq_depth, irq_enabled, CTRL_MUTE, CTRL_STOP,
        CTRL_WORDWIDTH_MASK, MODE_MCLK_ENABLE,
    };

    fn tx(bus: &MockI2sBus, irq: &'static IrqDispatch) -> I2s<MockI2sBus, MockPinMux> {
        I2s::new(
            bus.clone(),
            MockPinMux::new(),
            I2sPins::new(1, 2, 3).with_master_clock(4),
            Direction::Transmit,
            ClockPresets::default(),
            irq,
        )
    }

    #[test]
    fn construction_powers_up_and_programs_defaults() {
        static IRQ: IrqDispatch = IrqDispatch::new();
        let bus = MockI2sBus::new();
        let i2s = tx(&bus, &IRQ);

        assert!(i2s.setup_ok());
        assert!(bus.is_powered());
        assert!(!i2s.is_running());
        let ctrl = bus.control(Direction::Transmit);
        assert_eq!(ctrl & CTRL_STOP, CTRL_STOP);
        assert_eq!(ctrl & CTRL_WORDWIDTH_MASK, 0b01, "16-bit");
        assert_eq!(decode_rate(bus.rate(Direction::Transmit)), (1, 1));
        assert_eq!(decode_bitrate(bus.bitrate(Direction::Transmit)), 12);
        assert_ne!(bus.mode(Direction::Transmit) & MODE_MCLK_ENABLE, 0);
        assert_eq!(i2s.config().interrupt_level.get(), 4);
        assert_eq!(irq_depth(bus.irq(), Direction::Transmit), 2, "4 samples, 2 per word");
        assert!(!irq_enabled(bus.irq(), Direction::Transmit));
    }

    #[test]
    fn writes_while_unpowered_are_deferred_then_replayed() {
        static IRQ: IrqDispatch = IrqDispatch::new();
        let bus = MockI2sBus::new();
        let mut i2s = tx(&bus, &IRQ);

        i2s.power(false);
        i2s.wordsize(WordWidth::Bits32);
        i2s.mute();
        assert_eq!(bus.writes_while_unpowered(), 0);
        assert_eq!(bus.control(Direction::Transmit) & CTRL_WORDWIDTH_MASK, 0b01);

        i2s.power(true);
        let ctrl = bus.control(Direction::Transmit);
        assert_eq!(ctrl & CTRL_WORDWIDTH_MASK, 0b11);
        assert_eq!(ctrl & CTRL_MUTE, CTRL_MUTE);
        assert_eq!(decode_bitrate(bus.bitrate(Direction::Transmit)), 6);
    }

    #[test]
    fn start_is_ignored_while_unpowered() {
        static IRQ: IrqDispatch = IrqDispatch::new();
        let bus = MockI2sBus::new();
        let mut i2s = tx(&bus, &IRQ);
        i2s.power(false);
        i2s.start();
        assert!(!i2s.is_running());
        assert_eq!(i2s.config().run, RunState::Stop);
    }

    #[test]
    fn zero_frequencies_are_ignored() {
        static IRQ: IrqDispatch = IrqDispatch::new();
        let bus = MockI2sBus::new();
        let mut i2s = tx(&bus, &IRQ);
        i2s.frequency(0);
        i2s.mclk_freq(0);
        i2s.format(Role::Master, 0, 0, WordWidth::Bits16);
        assert_eq!(i2s.config().sample_rate_hz, 32_000);
        assert_eq!(i2s.config().master_clock_hz, 12_288_000);
        assert!(i2s.setup_ok());
    }

    #[test]
    fn register_failure_is_counted_not_returned() {
        static IRQ: IrqDispatch = IrqDispatch::new();
        let bus = MockI2sBus::new();
        let mut i2s = tx(&bus, &IRQ);
        bus.fail_writes(true);
        i2s.set_mute(MuteState::Muted);
        assert!(!i2s.setup_ok());
        assert_eq!(i2s.reg_write_errors(), 1);
        assert_eq!(i2s.last_error(), Some(I2sError::RegisterAccess));
    }

    #[test]
    fn transfer_on_wrong_direction_or_stopped_is_a_no_op() {
        static IRQ: IrqDispatch = IrqDispatch::new();
        let bus = MockI2sBus::new();
        let mut i2s = tx(&bus, &IRQ);

        assert_eq!(i2s.write(&[1, 2]), 0, "stopped");
        i2s.start();
        let mut buf = [0i32; 2];
        assert_eq!(i2s.read_into(&mut buf), 0, "transmit instance");
        assert_eq!(i2s.read(), 0);
        assert!(bus.fifo_words().is_empty());
    }

    #[test]
    fn mono_write_duplicates_into_both_slots() {
        static IRQ: IrqDispatch = IrqDispatch::new();
        let bus = MockI2sBus::new();
        let mut i2s = tx(&bus, &IRQ);
        i2s.stereomono(ChannelMode::Mono);
        i2s.start();

        assert_eq!(i2s.write(&[0x1234, -1]), 2);
        assert_eq!(bus.fifo_words(), vec![0x1234_1234, 0xFFFF_FFFF]);
    }

    #[test]
    fn fifo_points_follow_word_width() {
        static IRQ: IrqDispatch = IrqDispatch::new();
        let bus = MockI2sBus::new();
        let mut i2s = tx(&bus, &IRQ);
        i2s.wordsize(WordWidth::Bits8);
        i2s.start();
        i2s.write_raw(&[0; 12]);

        assert_eq!(i2s.get_fifo_limit(), 8);
        assert_eq!(i2s.fifo_level(), 3);
        assert_eq!(i2s.fifo_points(), 12);
    }

    #[test]
    fn drop_stops_and_detaches() {
        static IRQ: IrqDispatch = IrqDispatch::new();
        let bus = MockI2sBus::new();
        {
            let mut i2s = tx(&bus, &IRQ);
            i2s.attach(|| {});
            i2s.start();
            assert!(IRQ.is_attached(Direction::Transmit));
            assert!(bus.is_unmasked(Direction::Transmit));
        }
        assert!(!IRQ.is_attached(Direction::Transmit));
        assert!(!bus.is_unmasked(Direction::Transmit));
        assert!(!irq_enabled(bus.irq(), Direction::Transmit));
        assert_eq!(bus.control(Direction::Transmit) & CTRL_STOP, CTRL_STOP);
    }
}
