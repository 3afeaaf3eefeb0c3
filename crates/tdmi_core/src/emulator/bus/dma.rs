use crate::emulator::bus::interrupts::{InterruptManager, Interrupts};
use crate::emulator::{AlignedAddress, MemoryAddress};
use crate::scheduler::Scheduler;
use crate::utils::BitOps;
use modular_bitfield::prelude::B5;
use modular_bitfield::{bitfield, BitfieldSpecifier};

pub const DMA_CHANNEL_SIZE: usize = 12;
pub const DMA_DEST_ADDR_OFFSET: usize = 4;
pub const DMA_WORD_CNT_OFFSET: usize = 8;
pub const DMA_CONTROL_OFFSET: usize = 10;

pub const DMA_0_ADDR_START: MemoryAddress = 0x0400_00B0;
pub const DMA_0_ADDR_END: MemoryAddress = 0x0400_00BB;
pub const DMA_1_ADDR_START: MemoryAddress = 0x0400_00BC;
pub const DMA_1_ADDR_END: MemoryAddress = 0x0400_00C7;
pub const DMA_2_ADDR_START: MemoryAddress = 0x0400_00C8;
pub const DMA_2_ADDR_END: MemoryAddress = 0x0400_00D3;
pub const DMA_3_ADDR_START: MemoryAddress = 0x0400_00D4;
pub const DMA_3_ADDR_END: MemoryAddress = 0x0400_00DF;

pub const DMA_0_CONTROL_START: MemoryAddress = 0x0400_00BA;
pub const DMA_0_CONTROL_END: MemoryAddress = DMA_0_ADDR_END;
pub const DMA_1_CONTROL_START: MemoryAddress = 0x0400_00C6;
pub const DMA_1_CONTROL_END: MemoryAddress = DMA_1_ADDR_END;
pub const DMA_2_CONTROL_START: MemoryAddress = 0x0400_00D2;
pub const DMA_2_CONTROL_END: MemoryAddress = DMA_2_ADDR_END;
pub const DMA_3_CONTROL_START: MemoryAddress = 0x0400_00DE;
pub const DMA_3_CONTROL_END: MemoryAddress = DMA_3_ADDR_END;

/// Source/destination address masks, per channel. DMA0 can only reach internal memory,
/// DMA1-3 can reach the cartridge as a source, and DMA3 alone can write out to it.
const SRC_MASKS: [u32; 4] = [0x07FF_FFFF, 0x0FFF_FFFF, 0x0FFF_FFFF, 0x0FFF_FFFF];
const DEST_MASKS: [u32; 4] = [0x07FF_FFFF, 0x07FF_FFFF, 0x07FF_FFFF, 0x0FFF_FFFF];
/// Word count is 14 bits wide for DMA0-2 (0 means 0x4000), 16 bits for DMA3 (0 means 0x10000).
const COUNT_MASKS: [u32; 4] = [0x3FFF, 0x3FFF, 0x3FFF, 0xFFFF];
const COUNT_RELOADS: [u32; 4] = [0x4000, 0x4000, 0x4000, 0x10000];

const IRQS: [Interrupts; 4] = [Interrupts::DMA0, Interrupts::DMA1, Interrupts::DMA2, Interrupts::DMA3];

/// A single DMA word or halfword transfer, to be carried out by the bus.
#[derive(Debug, Clone, Copy)]
pub struct DmaUnit {
    pub channel: usize,
    pub source: MemoryAddress,
    pub dest: MemoryAddress,
    pub transfer_32: bool,
}

pub struct DmaChannels {
    /// DMA0 - highest priority, best for timing critical transfers (eg. HBlank DMA).
    /// DMA1 and DMA2 - can be used to feed digital sample data to the Sound FIFOs.
    /// DMA3 - can be used to write to Game Pak ROM/FlashROM (but not GamePak SRAM).
    /// Beside for that, each DMA 0-3 may be used for whatever general purposes.
    channels: [DmaChannel; 4],
}

impl DmaChannels {
    pub fn new() -> Self {
        Self {
            channels: [
                DmaChannel::new(0),
                DmaChannel::new(1),
                DmaChannel::new(2),
                DmaChannel::new(3),
            ],
        }
    }

    pub fn channel(&self, channel: usize) -> &DmaChannel {
        &self.channels[channel]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut DmaChannel {
        &mut self.channels[channel]
    }

    #[inline]
    pub fn write_channel(&mut self, address: AlignedAddress, value: u8, scheduler: &mut Scheduler) {
        match address {
            DMA_0_ADDR_START..=DMA_0_ADDR_END => self.channels[0].write((address - DMA_0_ADDR_START) as usize, value),
            DMA_1_ADDR_START..=DMA_1_ADDR_END => self.channels[1].write((address - DMA_1_ADDR_START) as usize, value),
            DMA_2_ADDR_START..=DMA_2_ADDR_END => self.channels[2].write((address - DMA_2_ADDR_START) as usize, value),
            DMA_3_ADDR_START..=DMA_3_ADDR_END => self.channels[3].write((address - DMA_3_ADDR_START) as usize, value),
            _ => unreachable!(),
        }

        // A channel that just had its enable bit set to 1 latches its shadow registers and,
        // if it's set to Immediate timing, is ready to run starting from the very next tick.
        let idx = Self::addr_to_channel_idx(address);
        if self.channels[idx].control.dma_enable() && !self.channels[idx].armed {
            self.channels[idx].arm();
        } else if !self.channels[idx].control.dma_enable() {
            self.channels[idx].armed = false;
            self.channels[idx].active = false;
        }

        let _ = scheduler;
    }

    /// Read the register values ignoring write-only properties
    pub fn read_debug(&self, address: AlignedAddress) -> u8 {
        match address {
            DMA_0_ADDR_START..=DMA_0_ADDR_END => self.channels[0].read_debug((address - DMA_0_ADDR_START) as usize),
            DMA_1_ADDR_START..=DMA_1_ADDR_END => self.channels[1].read_debug((address - DMA_1_ADDR_START) as usize),
            DMA_2_ADDR_START..=DMA_2_ADDR_END => self.channels[2].read_debug((address - DMA_2_ADDR_START) as usize),
            DMA_3_ADDR_START..=DMA_3_ADDR_END => self.channels[3].read_debug((address - DMA_3_ADDR_START) as usize),
            _ => unreachable!(),
        }
    }

    fn addr_to_channel_idx(address: AlignedAddress) -> usize {
        match address {
            DMA_0_ADDR_START..=DMA_0_ADDR_END => 0,
            DMA_1_ADDR_START..=DMA_1_ADDR_END => 1,
            DMA_2_ADDR_START..=DMA_2_ADDR_END => 2,
            DMA_3_ADDR_START..=DMA_3_ADDR_END => 3,
            _ => unreachable!(),
        }
    }

    /// Notify all armed HBlank-timed channels that HBlank has started.
    pub fn notify_hblank(&mut self) {
        for channel in self.channels.iter_mut() {
            if channel.armed && !channel.active && channel.control.dma_start_timing() == DmaStartTiming::HBlank {
                channel.active = true;
            }
        }
    }

    /// Notify all armed VBlank-timed channels that VBlank has started.
    pub fn notify_vblank(&mut self) {
        for channel in self.channels.iter_mut() {
            if channel.armed && !channel.active && channel.control.dma_start_timing() == DmaStartTiming::VBlank {
                channel.active = true;
            }
        }
    }

    /// Returns the index of the highest priority (lowest numbered) active channel, if any.
    #[inline]
    pub fn active_channel(&self) -> Option<usize> {
        self.channels.iter().position(|channel| channel.active)
    }

    /// `true` if any channel currently has a transfer in progress. While this is the case the
    /// CPU is paused entirely.
    #[inline]
    pub fn any_active(&self) -> bool {
        self.channels.iter().any(|channel| channel.active)
    }

    /// Produce the next transfer unit for the given channel, advancing its internal cursors.
    pub fn consume_unit(&mut self, idx: usize) -> Option<DmaUnit> {
        self.channels[idx].consume_unit()
    }

    /// `true` once a channel's shadow word count has been fully consumed, i.e. after the unit
    /// which made [`Self::consume_unit`] return the last real transfer.
    #[inline]
    pub fn exhausted(&self, idx: usize) -> bool {
        self.channels[idx].internal_count == 0
    }

    /// Finish up a just-completed channel: handles repeat rearming, disables one-shot channels,
    /// and requests the completion interrupt if configured. Must be called once
    /// [`Self::exhausted`] reports `true` for the channel.
    pub fn complete_channel(&mut self, idx: usize, interrupts: &mut InterruptManager, scheduler: &mut Scheduler) {
        let channel = &mut self.channels[idx];
        let request_irq = channel.control.irq_on_end_of_word_count();

        if channel.control.dma_repeat() && channel.control.dma_start_timing() != DmaStartTiming::Immediately {
            // Repeatable transfers reload their word count (and destination, if requested) and
            // go back to waiting for their trigger condition.
            channel.internal_count = COUNT_MASKS[idx] & channel.word_count as u32;
            if channel.internal_count == 0 {
                channel.internal_count = COUNT_RELOADS[idx];
            }
            if channel.control.dest_addr_control() == DmaAddrControlDest::IncrReload {
                channel.internal_dest = channel.dest_address & DEST_MASKS[idx];
            }
            channel.active = false;
        } else {
            channel.armed = false;
            channel.active = false;
            channel.control.set_dma_enable(false);
        }

        if request_irq {
            interrupts.request_interrupt(IRQS[idx], scheduler);
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DmaChannel {
    id: usize,
    source_address: MemoryAddress,
    dest_address: MemoryAddress,
    word_count: u16,
    control: DmaControl,

    /// Shadow registers, latched from the above when the channel is armed. The real hardware
    /// steps these independently of the visible registers so that writes mid-transfer don't
    /// perturb it.
    internal_source: MemoryAddress,
    internal_dest: MemoryAddress,
    internal_count: u32,
    /// Set once the enable bit transitions 0 -> 1; cleared on disable or one-shot completion.
    armed: bool,
    /// Set once the channel's start condition has been satisfied; a transfer unit is produced
    /// for every tick in which this is `true`.
    active: bool,
}

impl DmaChannel {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            source_address: 0,
            dest_address: 0,
            word_count: 0,
            control: DmaControl::new(),
            internal_source: 0,
            internal_dest: 0,
            internal_count: 0,
            armed: false,
            active: false,
        }
    }

    #[inline]
    pub fn write(&mut self, offset: usize, value: u8) {
        match offset {
            0..=3 => self.source_address.set_byte_le(offset, value),
            DMA_DEST_ADDR_OFFSET..=7 => self.dest_address.set_byte_le(offset - DMA_DEST_ADDR_OFFSET, value),
            DMA_WORD_CNT_OFFSET..=9 => self.word_count.set_byte_le(offset - DMA_WORD_CNT_OFFSET, value),
            DMA_CONTROL_OFFSET..=11 => self.control.update_byte_le(offset - DMA_CONTROL_OFFSET, value),
            _ => unreachable!(),
        }
    }

    #[inline]
    pub fn control(&self) -> DmaControl {
        self.control
    }

    pub fn read_debug(&self, offset: usize) -> u8 {
        match offset {
            0..=3 => self.source_address.to_le_bytes()[offset],
            DMA_DEST_ADDR_OFFSET..=7 => self.dest_address.to_le_bytes()[offset - DMA_DEST_ADDR_OFFSET],
            DMA_WORD_CNT_OFFSET..=9 => self.word_count.to_le_bytes()[offset - DMA_WORD_CNT_OFFSET],
            DMA_CONTROL_OFFSET..=11 => self.control.to_le_bytes()[offset - DMA_CONTROL_OFFSET],
            _ => unreachable!(),
        }
    }

    /// Latch the shadow source/dest/count registers and, if this channel starts immediately,
    /// mark it active right away.
    fn arm(&mut self) {
        self.armed = true;
        self.internal_source = self.source_address & SRC_MASKS[self.id];
        self.internal_dest = self.dest_address & DEST_MASKS[self.id];

        self.internal_count = self.word_count as u32 & COUNT_MASKS[self.id];
        if self.internal_count == 0 {
            self.internal_count = COUNT_RELOADS[self.id];
        }

        self.active = self.control.dma_start_timing() == DmaStartTiming::Immediately;
    }

    /// Produce the next transfer unit, advancing the internal source/dest cursors. Returns
    /// `None` once the transfer has run its full word count.
    fn consume_unit(&mut self) -> Option<DmaUnit> {
        if self.internal_count == 0 {
            return None;
        }

        let transfer_32 = self.control.dma_transfer_type() == DmaTransferType::Bit32;
        let step = if transfer_32 { 4 } else { 2 };

        let unit = DmaUnit {
            channel: self.id,
            source: self.internal_source,
            dest: self.internal_dest,
            transfer_32,
        };

        self.internal_source = match self.control.src_addr_control() {
            DmaAddrControlSrc::Increment | DmaAddrControlSrc::Prohibited => self.internal_source.wrapping_add(step),
            DmaAddrControlSrc::Decrement => self.internal_source.wrapping_sub(step),
            DmaAddrControlSrc::Fixed => self.internal_source,
        };

        self.internal_dest = match self.control.dest_addr_control() {
            DmaAddrControlDest::Increment | DmaAddrControlDest::IncrReload => self.internal_dest.wrapping_add(step),
            DmaAddrControlDest::Decrement => self.internal_dest.wrapping_sub(step),
            DmaAddrControlDest::Fixed => self.internal_dest,
        };

        self.internal_count -= 1;

        Some(unit)
    }
}

#[bitfield(bits = 16)]
#[repr(u16)]
#[derive(Debug, Copy, Clone)]
pub struct DmaControl {
    #[skip]
    unused: B5,
    pub dest_addr_control: DmaAddrControlDest,
    pub src_addr_control: DmaAddrControlSrc,
    /// (Must be zero if Bit 11 set)
    pub dma_repeat: bool,
    pub dma_transfer_type: DmaTransferType,
    /// DMA3 only
    /// 0 = Normal, 1 = DRQ <from> Game Pak, DMA3
    pub game_pak_drq: bool,
    /// The 'Special' setting (Start Timing=3) depends on the DMA channel:
    /// DMA0=Prohibited, DMA1/DMA2=Sound FIFO, DMA3=Video Capture
    pub dma_start_timing: DmaStartTiming,
    pub irq_on_end_of_word_count: bool,
    /// After enabling the DMA is delayed by 2 cycles. (Technically, probably won't implement that :) ).
    /// TODO: Implement when we have accurate timings.
    pub dma_enable: bool,
}

#[derive(Debug, BitfieldSpecifier, PartialEq, Clone, Copy)]
#[bits = 2]
pub enum DmaAddrControlDest {
    Increment = 0b00,
    Decrement = 0b01,
    Fixed = 0b10,
    IncrReload = 0b11,
}

#[derive(Debug, BitfieldSpecifier, PartialEq, Clone, Copy)]
#[bits = 2]
pub enum DmaAddrControlSrc {
    Increment = 0b00,
    Decrement = 0b01,
    Fixed = 0b10,
    Prohibited = 0b11,
}

#[derive(Debug, BitfieldSpecifier, PartialEq, Clone, Copy)]
#[bits = 1]
pub enum DmaTransferType {
    Bit16 = 0b0,
    Bit32 = 0b1,
}

#[derive(Debug, BitfieldSpecifier, PartialEq, Clone, Copy)]
#[bits = 2]
pub enum DmaStartTiming {
    Immediately = 0b00,
    VBlank = 0b01,
    HBlank = 0b10,
    Special = 0b11,
}

crate::impl_register_bit_ops16!(DmaControl);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_dma_arms_and_runs() {
        let mut channels = DmaChannels::new();
        let mut scheduler = Scheduler::new();

        channels.write_channel(DMA_0_ADDR_START, 0x00, &mut scheduler);
        channels.write_channel(DMA_0_ADDR_START + 1, 0x00, &mut scheduler);
        channels.write_channel(DMA_0_ADDR_START + 2, 0x00, &mut scheduler);
        channels.write_channel(DMA_0_ADDR_START + 3, 0x02, &mut scheduler); // source = 0x02000000

        channels.write_channel(DMA_0_ADDR_START + 4, 0x00, &mut scheduler);
        channels.write_channel(DMA_0_ADDR_START + 5, 0x00, &mut scheduler);
        channels.write_channel(DMA_0_ADDR_START + 6, 0x00, &mut scheduler);
        channels.write_channel(DMA_0_ADDR_START + 7, 0x03, &mut scheduler); // dest = 0x03000000

        channels.write_channel(DMA_0_ADDR_START + 8, 0x04, &mut scheduler); // count = 4
        channels.write_channel(DMA_0_ADDR_START + 9, 0x00, &mut scheduler);

        // Control: transfer type 32-bit, enable.
        channels.write_channel(DMA_0_ADDR_START + 10, 0b0010_0000, &mut scheduler);
        channels.write_channel(DMA_0_ADDR_START + 11, 0b1000_0000, &mut scheduler);

        assert!(channels.any_active());
        assert_eq!(channels.active_channel(), Some(0));

        for _ in 0..4 {
            let unit = channels.consume_unit(0).expect("unit available");
            assert!(unit.transfer_32);
        }

        assert!(channels.consume_unit(0).is_none());
    }

    #[test]
    fn hblank_dma_waits_for_trigger() {
        let mut channels = DmaChannels::new();
        let mut scheduler = Scheduler::new();

        channels.write_channel(DMA_1_ADDR_START + 8, 0x01, &mut scheduler);
        channels.write_channel(DMA_1_ADDR_START + 9, 0x00, &mut scheduler);
        // HBlank start timing, enable.
        channels.write_channel(DMA_1_ADDR_START + 10, 0b0100_0000, &mut scheduler);
        channels.write_channel(DMA_1_ADDR_START + 11, 0b1000_0000, &mut scheduler);

        assert!(!channels.any_active());

        channels.notify_hblank();

        assert!(channels.any_active());
    }
}
