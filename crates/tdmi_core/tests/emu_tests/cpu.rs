use crate::emu_tests::setup;
use tdmi_core::emulator::debug::DebugEmulator;

/// `MOV R0, #5` then `ADD R1, R0, #3`, stepped one instruction at a time.
#[test]
fn arm_data_processing_sequence() {
    let mut emu = setup::emu_with_arm_words(&[
        0xE3A0_0005, // MOV R0, #5
        0xE280_1003, // ADD R1, R0, #3
    ]);

    emu.step_instruction();
    emu.step_instruction();

    let mut debug = DebugEmulator(&mut emu);
    assert_eq!(debug.cpu().registers.general_purpose[0], 5);
    assert_eq!(debug.cpu().registers.general_purpose[1], 8);
}

/// `LSR #0` is encoded as amount zero, which the immediate form of the barrel shifter must treat
/// as amount 32 (result zero, carry out equal to the shifted-out bit 31) rather than as identity.
#[test]
fn arm_immediate_lsr_zero_means_shift_by_32() {
    let mut emu = setup::emu_with_arm_words(&[
        0xE3A0_1480, // MOV R1, #0x80, ROR #8 (loads 0x80000000)
        0xE1B0_2021, // MOVS R2, R1, LSR #0
    ]);

    emu.step_instruction();
    emu.step_instruction();

    let mut debug = DebugEmulator(&mut emu);
    assert_eq!(debug.cpu().registers.general_purpose[2], 0);
    assert!(debug.cpu().registers.cpsr.carry());
}

/// `LDRSH` must read a full halfword and sign-extend it, not widen a single byte.
#[test]
fn arm_ldrsh_reads_halfword_and_sign_extends() {
    let mut emu = setup::emu_with_arm_words(&[
        0xE3A0_0402, // MOV R0, #0x02000000
        0xE3A0_1CF0, // MOV R1, #0xF000
        0xE1C0_10B0, // STRH R1, [R0]
        0xE1D0_20F0, // LDRSH R2, [R0]
    ]);

    for _ in 0..4 {
        emu.step_instruction();
    }

    let mut debug = DebugEmulator(&mut emu);
    assert_eq!(debug.cpu().registers.general_purpose[2], 0xFFFF_F000);
}

/// A conditional `ADDEQ` only executes once the preceding `CMP` makes the comparison equal.
#[test]
fn arm_conditional_execution_respects_flags() {
    let mut emu = setup::emu_with_arm_words(&[
        0xE3A0_0003, // MOV R0, #3
        0xE350_0003, // CMP R0, #3 (sets Z)
        0x0280_1001, // ADDEQ R1, R0, #1
        0xE3A0_2009, // MOV R2, #9 (always executes, used as a sentinel)
    ]);

    for _ in 0..4 {
        emu.step_instruction();
    }

    let mut debug = DebugEmulator(&mut emu);
    assert_eq!(debug.cpu().registers.general_purpose[1], 4);
    assert_eq!(debug.cpu().registers.general_purpose[2], 9);
}
