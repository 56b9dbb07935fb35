//! Two driver instances on one loopback block: whatever the transmit half
//! queues, the receive half reads back.

#![allow(clippy::indexing_slicing)]
#![allow(clippy::arithmetic_side_effects)]

use i2s::{ClockPresets, I2s, I2sPins};
use platform::mocks::{MockI2sBus, MockPinMux};
use platform::registers::{CTRL_MUTE, CTRL_WORDWIDTH_MASK, MODE_FOUR_PIN};
use platform::{ChannelMode, Direction, IrqDispatch, MuteState, Role, WordWidth};

type Driver = I2s<MockI2sBus, MockPinMux>;

/// Driver logs show up with `--features tracing` and `RUST_LOG=i2s=debug`.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn pair(bus: &MockI2sBus, irq: &'static IrqDispatch) -> (Driver, Driver) {
    init_logging();
    let tx = I2s::new(
        bus.clone(),
        MockPinMux::new(),
        I2sPins::new(1, 2, 3).with_master_clock(4),
        Direction::Transmit,
        ClockPresets::default(),
        irq,
    );
    let rx = I2s::new(
        bus.clone(),
        MockPinMux::new(),
        I2sPins::shared_clocks(5),
        Direction::Receive,
        ClockPresets::default(),
        irq,
    );
    (tx, rx)
}

fn configure(tx: &mut Driver, rx: &mut Driver, width: WordWidth, channels: ChannelMode) {
    for d in [&mut *tx, &mut *rx] {
        d.wordsize(width);
        d.stereomono(channels);
        d.start();
    }
}

/// Values that exercise sign and range of `width`.
fn samples(width: WordWidth) -> [i32; 8] {
    match width {
        WordWidth::Bits8 => [0, 1, -1, 127, -128, 42, -42, 7],
        WordWidth::Bits16 => [0, 1, -1, 32_767, -32_768, 1234, -1234, 7],
        WordWidth::Bits32 => [0, 1, -1, i32::MAX, i32::MIN, 0x1234_5678, -0x1234_5678, 7],
    }
}

// ── Value transfers ─────────────────────────────────────────────────────────

#[test]
fn stereo_round_trip_every_width() {
    for width in [WordWidth::Bits8, WordWidth::Bits16, WordWidth::Bits32] {
        static IRQ: IrqDispatch = IrqDispatch::new();
        let bus = MockI2sBus::new();
        let (mut tx, mut rx) = pair(&bus, &IRQ);
        configure(&mut tx, &mut rx, width, ChannelMode::Stereo);

        let sent = samples(width);
        assert_eq!(tx.write(&sent), sent.len());

        let mut got = [0i32; 8];
        assert_eq!(rx.read_into(&mut got), got.len());
        assert_eq!(got, sent, "stereo {}-bit", width.bits());
    }
}

#[test]
fn mono_round_trip_every_width() {
    for width in [WordWidth::Bits8, WordWidth::Bits16, WordWidth::Bits32] {
        static IRQ: IrqDispatch = IrqDispatch::new();
        let bus = MockI2sBus::new();
        let (mut tx, mut rx) = pair(&bus, &IRQ);
        configure(&mut tx, &mut rx, width, ChannelMode::Mono);

        // 32-bit mono takes two words per value; stay inside the FIFO.
        let sent = &samples(width)[..4];
        assert_eq!(tx.write(sent), sent.len());

        let mut got = [0i32; 4];
        assert_eq!(rx.read_into(&mut got), got.len());
        assert_eq!(&got[..], sent, "mono {}-bit", width.bits());
    }
}

#[test]
fn separate_channel_buffers_round_trip() {
    static IRQ: IrqDispatch = IrqDispatch::new();
    let bus = MockI2sBus::new();
    let (mut tx, mut rx) = pair(&bus, &IRQ);
    configure(&mut tx, &mut rx, WordWidth::Bits16, ChannelMode::Stereo);

    let left = [100, 200, 300, 400];
    let right = [-100, -200, -300];
    assert_eq!(tx.write_channels(&left, &right), 3, "stops at shorter buffer");

    let mut l = [0i32; 3];
    let mut r = [0i32; 3];
    assert_eq!(rx.read_channels(&mut l, &mut r), 3);
    assert_eq!(l, [100, 200, 300]);
    assert_eq!(r, [-100, -200, -300]);
}

#[test]
fn channel_buffers_interleave_left_first() {
    static IRQ: IrqDispatch = IrqDispatch::new();
    let bus = MockI2sBus::new();
    let (mut tx, mut rx) = pair(&bus, &IRQ);
    configure(&mut tx, &mut rx, WordWidth::Bits16, ChannelMode::Stereo);

    tx.write_channels(&[1, 3], &[2, 4]);
    let mut got = [0i32; 4];
    rx.read_into(&mut got);
    assert_eq!(got, [1, 2, 3, 4]);
}

// ── Raw transfers ───────────────────────────────────────────────────────────

#[test]
fn raw_bytes_pack_four_per_word_regardless_of_width() {
    static IRQ: IrqDispatch = IrqDispatch::new();
    let bus = MockI2sBus::new();
    let (mut tx, mut rx) = pair(&bus, &IRQ);
    configure(&mut tx, &mut rx, WordWidth::Bits32, ChannelMode::Stereo);

    let bytes = [1u8, 2, 3, 4, 5, 6];
    assert_eq!(tx.write_raw(&bytes), 6);
    assert_eq!(bus.fifo_words(), vec![0x0403_0201, 0x0000_0605]);

    let mut got = [0u8; 6];
    assert_eq!(rx.read_raw(&mut got), 6);
    assert_eq!(got, bytes);
}

#[test]
fn read_returns_one_raw_word() {
    static IRQ: IrqDispatch = IrqDispatch::new();
    let bus = MockI2sBus::new();
    let (mut tx, mut rx) = pair(&bus, &IRQ);
    configure(&mut tx, &mut rx, WordWidth::Bits16, ChannelMode::Stereo);

    tx.write(&[-1, 0x1234]);
    assert_eq!(rx.read(), 0x1234_FFFF);
}

// ── Blocking behaviour ──────────────────────────────────────────────────────

#[test]
fn long_write_blocks_until_bus_drains() {
    static IRQ: IrqDispatch = IrqDispatch::new();
    let bus = MockI2sBus::new();
    bus.drain_when_full(true);
    let (mut tx, _rx) = pair(&bus, &IRQ);
    tx.wordsize(WordWidth::Bits32);
    tx.start();

    let sent: Vec<i32> = (0..40).collect();
    assert_eq!(tx.write(&sent), 40);

    let mut on_wire: Vec<u32> = bus.sink();
    on_wire.extend(bus.fifo_words());
    let expected: Vec<u32> = (0..40).collect();
    assert_eq!(on_wire, expected, "order is preserved across FIFO refills");
}

#[test]
fn long_read_blocks_until_bus_delivers() {
    static IRQ: IrqDispatch = IrqDispatch::new();
    let bus = MockI2sBus::new();
    let (_tx, mut rx) = pair(&bus, &IRQ);
    rx.wordsize(WordWidth::Bits32);
    rx.start();

    let words: Vec<u32> = (100..130).collect();
    bus.feed(&words);

    let mut got = [0i32; 30];
    assert_eq!(rx.read_into(&mut got), 30);
    let expected: Vec<i32> = (100..130).collect();
    assert_eq!(got.to_vec(), expected);
}

// ── Mute and wiring ─────────────────────────────────────────────────────────

#[test]
fn muted_transmitter_sends_silence() {
    static IRQ: IrqDispatch = IrqDispatch::new();
    let bus = MockI2sBus::new();
    let (mut tx, mut rx) = pair(&bus, &IRQ);
    configure(&mut tx, &mut rx, WordWidth::Bits16, ChannelMode::Stereo);

    tx.mute();
    tx.write(&[1000, -1000]);
    tx.set_mute(MuteState::Unmuted);
    tx.write(&[1000, -1000]);

    let mut got = [0i32; 4];
    rx.read_into(&mut got);
    assert_eq!(got, [0, 0, 1000, -1000]);
    assert!(tx.setup_ok());
}

#[test]
fn unmuting_restores_output_without_touching_framing_or_clocks() {
    static IRQ: IrqDispatch = IrqDispatch::new();
    let bus = MockI2sBus::new();
    let (mut tx, mut rx) = pair(&bus, &IRQ);
    tx.format(Role::Master, 11_289_600, 44_100, WordWidth::Bits32);
    rx.format(Role::Master, 11_289_600, 44_100, WordWidth::Bits32);
    tx.start();
    rx.start();

    let control = bus.control(Direction::Transmit);
    let rate = bus.rate(Direction::Transmit);
    let bitrate = bus.bitrate(Direction::Transmit);
    assert_eq!(control & CTRL_MUTE, 0);

    tx.mute();
    let muted = bus.control(Direction::Transmit);
    assert_eq!(muted, control | CTRL_MUTE);
    tx.set_mute(MuteState::Unmuted);
    tx.set_mute(MuteState::Muted);
    assert_eq!(bus.control(Direction::Transmit), muted, "mute() is set_mute(Muted)");
    tx.write(&[7]);

    tx.set_mute(MuteState::Unmuted);
    assert_eq!(bus.control(Direction::Transmit), control);
    assert_eq!(
        bus.control(Direction::Transmit) & CTRL_WORDWIDTH_MASK,
        control & CTRL_WORDWIDTH_MASK
    );
    assert_eq!(bus.rate(Direction::Transmit), rate);
    assert_eq!(bus.bitrate(Direction::Transmit), bitrate);
    assert_eq!(tx.config().word_width, WordWidth::Bits32);
    tx.write(&[-7]);

    let mut got = [0i32; 2];
    assert_eq!(rx.read_into(&mut got), 2);
    assert_eq!(got, [0, -7]);
    assert!(tx.setup_ok());
}

#[test]
fn shared_clock_receiver_programs_four_wire_mode() {
    static IRQ: IrqDispatch = IrqDispatch::new();
    let bus = MockI2sBus::new();
    let (_tx, rx) = pair(&bus, &IRQ);
    assert!(rx.setup_ok());
    assert_eq!(bus.mode(Direction::Receive) & MODE_FOUR_PIN, MODE_FOUR_PIN);
    assert_eq!(bus.mode(Direction::Transmit) & MODE_FOUR_PIN, 0);
}

#[test]
fn stopping_one_half_leaves_the_other_running() {
    static IRQ: IrqDispatch = IrqDispatch::new();
    let bus = MockI2sBus::new();
    let (mut tx, mut rx) = pair(&bus, &IRQ);
    configure(&mut tx, &mut rx, WordWidth::Bits16, ChannelMode::Stereo);

    rx.stop();
    assert!(!rx.is_running());
    assert!(tx.is_running());
    assert_eq!(tx.write(&[1, 2]), 2);
    let mut got = [0i32; 2];
    assert_eq!(rx.read_into(&mut got), 0, "stopped receiver reads nothing");
}
