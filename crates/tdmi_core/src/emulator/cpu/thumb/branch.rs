use crate::emulator::bus::Bus;
use crate::emulator::cpu::common::common_behaviour;
use crate::emulator::cpu::registers::{LINK_REG, PC_REG};
use crate::emulator::cpu::thumb::{ThumbInstruction, ThumbV4};
use crate::emulator::cpu::{Exception, CPU};
use crate::utils::{sign_extend32, BitOps};

impl ThumbV4 {
    pub fn hi_reg_op_branch_exchange(cpu: &mut CPU, instruction: ThumbInstruction, bus: &mut Bus) {
        enum Opcode {
            Add = 0b00,
            Cmp = 0b01,
            Mov = 0b10,
            Bx = 0b11,
        }

        let opcode = instruction.get_bits(8, 9);
        // Note that !h1 && !h2 for any opcode is undefined behaviour, still needs to be figured out, we'll assume normal operation!
        let h1 = instruction.check_bit(7);
        let h2 = instruction.check_bit(6);
        // We do a branchless add here for getting the high (8-15) registers if the flags are set.
        let r_d = instruction.get_bits(0, 2) as usize + (h1 as usize * 8);
        let r_s = instruction.get_bits(3, 5) as usize + (h2 as usize * 8);

        let op1 = cpu.read_reg(r_d);
        let op2 = cpu.read_reg(r_s);

        match opcode {
            0b00 => {
                // Flags are never set
                let result = common_behaviour::add(cpu, op1, op2, false);

                cpu.write_reg(r_d, result, bus);
            }
            0b01 => {
                let _ = common_behaviour::sub(cpu, op1, op2, true);
            }
            0b10 => {
                cpu.write_reg(r_d, op2, bus);
            }
            0b11 => {
                common_behaviour::branch_and_exchange(cpu, op2, bus);
            }
            _ => unreachable!(),
        }
    }

    /// Format 16: conditional branch, 8-bit signed offset.
    pub fn conditional_branch(cpu: &mut CPU, instruction: ThumbInstruction, bus: &mut Bus) {
        let condition = instruction.get_bits(8, 11) as u8;

        if !common_behaviour::check_condition(&cpu.registers.cpsr, condition) {
            return;
        }

        let offset = sign_extend32(instruction.get_bits(0, 7) as u32, 8) << 1;
        let pc = cpu.read_reg(PC_REG);

        cpu.write_reg(PC_REG, pc.wrapping_add(offset as u32), bus);
    }

    /// Format 17: `SWI`, shares the conditional branch's LUT range (condition field `1111`).
    pub fn software_interrupt(cpu: &mut CPU, _instruction: ThumbInstruction, bus: &mut Bus) {
        cpu.raise_exception(bus, Exception::SoftwareInterrupt);
    }

    /// Format 18: unconditional branch, 11-bit signed offset.
    pub fn unconditional_branch(cpu: &mut CPU, instruction: ThumbInstruction, bus: &mut Bus) {
        let offset = sign_extend32(instruction.get_bits(0, 10) as u32, 11) << 1;
        let pc = cpu.read_reg(PC_REG);

        cpu.write_reg(PC_REG, pc.wrapping_add(offset as u32), bus);
    }

    /// Format 19, first half (`H` = 0): stash `PC + (offset_high << 12)` into `LR`.
    pub fn long_branch_link_high(cpu: &mut CPU, instruction: ThumbInstruction, bus: &mut Bus) {
        let offset_high = sign_extend32(instruction.get_bits(0, 10) as u32, 11);
        let pc = cpu.read_reg(PC_REG);

        cpu.write_reg(LINK_REG, pc.wrapping_add((offset_high << 12) as u32), bus);
    }

    /// Format 19, second half (`H` = 1): complete the branch using `LR` from the first half.
    pub fn long_branch_link_low(cpu: &mut CPU, instruction: ThumbInstruction, bus: &mut Bus) {
        let offset_low = instruction.get_bits(0, 10) as u32;
        // `PC` is 2 instructions ahead of the one currently executing; the return address is the
        // halfword right after this one.
        let return_address = cpu.read_reg(PC_REG).wrapping_sub(2) | 1;
        let lr = cpu.read_reg(LINK_REG);

        cpu.write_reg(PC_REG, lr.wrapping_add(offset_low << 1), bus);
        cpu.write_reg(LINK_REG, return_address, bus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::cartridge::Cartridge;
    use crate::emulator::cpu::registers::State;

    fn test_env() -> (CPU, Bus) {
        let mut bus = Bus::new(Cartridge::default(), Box::new([0u8; 16 * 1024]));
        let mut cpu = CPU::new(false, &mut bus);
        // Point PC into work RAM so the pipeline-flush reads triggered by `write_reg(PC_REG, ..)`
        // land on always-present, zero-initialised memory.
        cpu.registers.general_purpose[PC_REG] = 0x0200_0000;
        cpu.registers.cpsr.set_state(State::Thumb);
        (cpu, bus)
    }

    #[test]
    fn unconditional_branch_jumps_forward() {
        let (mut cpu, mut bus) = test_env();
        let start_pc = cpu.read_reg(PC_REG);

        // B #4 (offset field = 2, since the encoded offset is pre-shifted left by 1)
        let instr: ThumbInstruction = 0b1110_0000_0000_0010;
        ThumbV4::unconditional_branch(&mut cpu, instr, &mut bus);

        assert_eq!(cpu.read_reg(PC_REG), start_pc.wrapping_add(4));
    }

    #[test]
    fn unconditional_branch_negative_offset() {
        let (mut cpu, mut bus) = test_env();
        cpu.registers.general_purpose[PC_REG] = 0x0200_0100;

        // B with offset11 = -2 (0x7FE), jumps back 4 bytes.
        let instr: ThumbInstruction = 0b1110_0111_1111_1110;
        ThumbV4::unconditional_branch(&mut cpu, instr, &mut bus);

        assert_eq!(cpu.read_reg(PC_REG), 0x0200_00FC);
    }

    #[test]
    fn conditional_branch_untaken_leaves_pc() {
        let (mut cpu, mut bus) = test_env();
        let start_pc = cpu.read_reg(PC_REG);
        cpu.registers.cpsr.set_zero(false);

        // BEQ #4 (condition EQ = 0000, requires Z set)
        let instr: ThumbInstruction = 0b1101_0000_0000_0010;
        ThumbV4::conditional_branch(&mut cpu, instr, &mut bus);

        assert_eq!(cpu.read_reg(PC_REG), start_pc);
    }

    #[test]
    fn conditional_branch_taken() {
        let (mut cpu, mut bus) = test_env();
        let start_pc = cpu.read_reg(PC_REG);
        cpu.registers.cpsr.set_zero(true);

        // BEQ #4
        let instr: ThumbInstruction = 0b1101_0000_0000_0010;
        ThumbV4::conditional_branch(&mut cpu, instr, &mut bus);

        assert_eq!(cpu.read_reg(PC_REG), start_pc.wrapping_add(4));
    }

    #[test]
    fn long_branch_link_round_trip() {
        let (mut cpu, mut bus) = test_env();
        cpu.registers.general_purpose[PC_REG] = 0x0200_1000;

        // BL target = PC + 0x100 from the first-half instruction's perspective.
        // High half: offset_high = 0 (no upper bits contribute here).
        let high_instr: ThumbInstruction = 0b1111_0000_0000_0000;
        ThumbV4::long_branch_link_high(&mut cpu, high_instr, &mut bus);

        let expected_return = cpu.read_reg(PC_REG).wrapping_sub(2) | 1;

        // Low half: offset_low = 0x80 (encodes +0x100 once shifted left by 1).
        let low_instr: ThumbInstruction = 0b1111_1000_0000_0000 | 0x80;
        ThumbV4::long_branch_link_low(&mut cpu, low_instr, &mut bus);

        assert_eq!(cpu.read_reg(LINK_REG), expected_return);
    }
}
