use tdmi_core::emulator::cartridge::{Cartridge, CARTRIDGE_RAM_SIZE};
use tdmi_core::emulator::{EmuOptions, GBAEmulator};

/// Build an emulator whose cartridge ROM is exactly the given words, with the BIOS skipped so
/// execution starts straight at `0x0800_0000` (the first ROM byte).
///
/// `words` are laid down little-endian in the order given; mixing 16 and 32 bit encodings is the
/// caller's responsibility (pass pre-assembled `u32`s for ARM, `u16`s widened to `u32` with only
/// the low half meaningful for Thumb, one instruction each).
pub fn emu_with_arm_words(words: &[u32]) -> GBAEmulator {
    let mut rom = Vec::with_capacity(words.len() * 4);
    for word in words {
        rom.extend_from_slice(&word.to_le_bytes());
    }

    build_emu(rom)
}

pub fn emu_with_thumb_halfwords(halfwords: &[u16]) -> GBAEmulator {
    let mut rom = Vec::with_capacity(halfwords.len() * 2);
    for hw in halfwords {
        rom.extend_from_slice(&hw.to_le_bytes());
    }

    build_emu(rom)
}

fn build_emu(mut rom: Vec<u8>) -> GBAEmulator {
    // The cartridge header lives at 0xA0..0xBE; pad short test ROMs out so parsing it doesn't
    // index out of bounds before `Cartridge::new`'s own out-of-bounds fill kicks in.
    const MIN_ROM_LEN: usize = 0x100;
    if rom.len() < MIN_ROM_LEN {
        rom.resize(MIN_ROM_LEN, 0);
    }

    let ram = Box::new(vec![0u8; CARTRIDGE_RAM_SIZE].into_boxed_slice())
        as Box<dyn std::ops::DerefMut<Target = [u8]> + Send>;
    let cartridge = Cartridge::new(rom, ram);

    GBAEmulator::new(cartridge, EmuOptions::default())
}
