use crate::emu_tests::setup;
use tdmi_core::emulator::debug::DebugEmulator;

const DMA_0_SRC: u32 = 0x0400_00B0;
const DMA_0_DEST: u32 = 0x0400_00B4;
const DMA_0_WORD_COUNT: u32 = 0x0400_00B8;
const DMA_0_CONTROL: u32 = 0x0400_00BA;

/// Bit 15 = enable, bit 10 = 32-bit transfer, start timing = immediate (bits 12-13 = 00),
/// increment both source and dest (the default 00 for bits 5-6 and 7-8), no repeat, no IRQ.
const CONTROL_IMMEDIATE_32BIT: u16 = (1 << 15) | (1 << 10);

/// An immediate, 32-bit, single-word DMA0 transfer copies its one word from source to dest and
/// then goes back to disabled (one-shot, no repeat bit set).
#[test]
fn dma_immediate_transfer_copies_one_word() {
    let mut emu = setup::emu_with_arm_words(&[]);
    let mut debug = DebugEmulator(&mut emu);
    let (bus, cpu) = debug.bus_and_cpu();

    let source = 0x0200_0000;
    let dest = 0x0200_0100;
    bus.write_32(source, 0xDEAD_BEEF);

    bus.write_32(DMA_0_SRC, source);
    bus.write_32(DMA_0_DEST, dest);
    bus.write_16(DMA_0_WORD_COUNT, 1);
    bus.write_16(DMA_0_CONTROL, CONTROL_IMMEDIATE_32BIT);

    assert!(bus.dma_active(), "enabling an immediate-timing channel should arm it right away");

    // One DMA unit is produced per `step_dma` call; a single 32-bit word transfer completes in one.
    bus.step_dma(cpu);

    assert_eq!(bus.read_32(dest, cpu), 0xDEAD_BEEF);
    assert!(!bus.dma_active(), "a one-shot transfer should disable itself once exhausted");
}

/// `GBAEmulator::step_instruction` itself drives DMA to completion when a channel is active,
/// fully pausing the CPU for the duration.
#[test]
fn step_instruction_drains_active_dma() {
    let mut emu = setup::emu_with_arm_words(&[]);
    let mut debug = DebugEmulator(&mut emu);
    let (bus, _cpu) = debug.bus_and_cpu();

    let source = 0x0200_0010;
    let dest = 0x0200_0200;
    bus.write_32(source, 0x1234_5678);

    bus.write_32(DMA_0_SRC, source);
    bus.write_32(DMA_0_DEST, dest);
    bus.write_16(DMA_0_WORD_COUNT, 1);
    bus.write_16(DMA_0_CONTROL, CONTROL_IMMEDIATE_32BIT);

    emu.step_instruction();

    let mut debug = DebugEmulator(&mut emu);
    let (bus, cpu) = debug.bus_and_cpu();
    assert_eq!(bus.read_32(dest, cpu), 0x1234_5678);
}

/// A channel configured for HBlank timing stays armed but inactive until notified, even once
/// its enable bit is set.
#[test]
fn hblank_timed_channel_waits_for_trigger() {
    let mut emu = setup::emu_with_arm_words(&[]);
    let mut debug = DebugEmulator(&mut emu);
    let (bus, _cpu) = debug.bus_and_cpu();

    bus.write_32(DMA_0_SRC, 0x0200_0000);
    bus.write_32(DMA_0_DEST, 0x0200_0300);
    bus.write_16(DMA_0_WORD_COUNT, 1);
    // Start timing = HBlank (bits 12-13 = 01), enable set, 32-bit transfer.
    let control_hblank: u16 = (1 << 15) | (1 << 10) | (1 << 12);
    bus.write_16(DMA_0_CONTROL, control_hblank);

    assert!(!bus.dma_active(), "HBlank-timed channels don't start until the HBlank notification fires");

    bus.dma.notify_hblank();

    assert!(bus.dma_active());
}
