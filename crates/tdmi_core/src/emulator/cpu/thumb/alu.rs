use crate::emulator::bus::Bus;
use crate::emulator::cpu::common::{common_behaviour, ShiftContext, ShiftType};
use crate::emulator::cpu::thumb::{ThumbInstruction, ThumbV4};
use crate::emulator::cpu::CPU;
use crate::utils::BitOps;

#[derive(num_derive::FromPrimitive, Debug)]
enum Opcode {
    Lsl = 0x0,
    Lsr = 0x1,
    Asr = 0x2,
}

impl From<u16> for Opcode {
    fn from(val: u16) -> Self {
        match val {
            0x0 => Opcode::Lsl,
            0x1 => Opcode::Lsr,
            0x2 => Opcode::Asr,
            _ => panic!("Invalid opcode"),
        }
    }
}

impl From<Opcode> for ShiftType {
    fn from(op: Opcode) -> Self {
        match op {
            Opcode::Lsl => ShiftType::LogicalLeft,
            Opcode::Lsr => ShiftType::LogicalRight,
            Opcode::Asr => ShiftType::ArithRight,
        }
    }
}

impl ThumbV4 {
    pub fn move_shifted_reg(cpu: &mut CPU, instruction: ThumbInstruction, bus: &mut Bus) {
        let opcode: Opcode = instruction.get_bits(11, 12).into();
        let offset = instruction.get_bits(6, 10) as u8;
        let r_d = instruction.get_bits(0, 2) as usize;
        let r_s = instruction.get_bits(3, 5) as usize;

        let shift_type = ShiftType::from(opcode);

        let (value, carry) =
            shift_type.perform_shift(cpu.read_reg(r_s), offset, cpu.registers.cpsr.carry(), ShiftContext::Immediate);

        cpu.write_reg(r_d, value, bus);
        cpu.set_logical_flags(value, carry);
    }

    /// Format 2: `ADD`/`SUB`, either register or 3-bit immediate.
    pub fn add_subtract(cpu: &mut CPU, instruction: ThumbInstruction, bus: &mut Bus) {
        let is_subtract = instruction.check_bit(9);
        let use_immediate = instruction.check_bit(10);
        let r_n_or_imm = instruction.get_bits(6, 8) as u32;
        let r_s = instruction.get_bits(3, 5) as usize;
        let r_d = instruction.get_bits(0, 2) as usize;

        let op1 = cpu.read_reg(r_s);
        let op2 = if use_immediate { r_n_or_imm } else { cpu.read_reg(r_n_or_imm as usize) };

        let result = if is_subtract {
            common_behaviour::sub(cpu, op1, op2, true)
        } else {
            common_behaviour::add(cpu, op1, op2, true)
        };

        cpu.write_reg(r_d, result, bus);
    }

    /// Format 3: `MOV`/`CMP`/`ADD`/`SUB` against an 8-bit immediate.
    pub fn move_compare_add_subtract(cpu: &mut CPU, instruction: ThumbInstruction, bus: &mut Bus) {
        let opcode = instruction.get_bits(11, 12);
        let r_d = instruction.get_bits(8, 10) as usize;
        let immediate = instruction.get_bits(0, 7) as u32;
        let op1 = cpu.read_reg(r_d);

        match opcode {
            0b00 => {
                cpu.write_reg(r_d, immediate, bus);
                cpu.set_zero_and_sign(immediate);
            }
            0b01 => {
                common_behaviour::sub(cpu, op1, immediate, true);
            }
            0b10 => {
                let result = common_behaviour::add(cpu, op1, immediate, true);
                cpu.write_reg(r_d, result, bus);
            }
            0b11 => {
                let result = common_behaviour::sub(cpu, op1, immediate, true);
                cpu.write_reg(r_d, result, bus);
            }
            _ => unreachable!(),
        }
    }

    /// Format 4: two-register ALU operations, opcode in bits 6-9.
    pub fn alu_operations(cpu: &mut CPU, instruction: ThumbInstruction, bus: &mut Bus) {
        let opcode = instruction.get_bits(6, 9);
        let r_s = instruction.get_bits(3, 5) as usize;
        let r_d = instruction.get_bits(0, 2) as usize;

        let op1 = cpu.read_reg(r_d);
        let op2 = cpu.read_reg(r_s);

        match opcode {
            0x0 => {
                let result = op1 & op2;
                cpu.write_reg(r_d, result, bus);
                cpu.set_zero_and_sign(result);
            }
            0x1 => {
                let result = op1 ^ op2;
                cpu.write_reg(r_d, result, bus);
                cpu.set_zero_and_sign(result);
            }
            0x2 => {
                let (result, carry) =
                    ShiftType::LogicalLeft.perform_shift(op1, op2 as u8, cpu.registers.cpsr.carry(), ShiftContext::Register);
                cpu.write_reg(r_d, result, bus);
                cpu.set_logical_flags(result, carry);
            }
            0x3 => {
                let (result, carry) =
                    ShiftType::LogicalRight.perform_shift(op1, op2 as u8, cpu.registers.cpsr.carry(), ShiftContext::Register);
                cpu.write_reg(r_d, result, bus);
                cpu.set_logical_flags(result, carry);
            }
            0x4 => {
                let (result, carry) =
                    ShiftType::ArithRight.perform_shift(op1, op2 as u8, cpu.registers.cpsr.carry(), ShiftContext::Register);
                cpu.write_reg(r_d, result, bus);
                cpu.set_logical_flags(result, carry);
            }
            0x5 => {
                let result = common_behaviour::adc(cpu, op1, op2, true);
                cpu.write_reg(r_d, result, bus);
            }
            0x6 => {
                let result = common_behaviour::sbc(cpu, op1, op2, true);
                cpu.write_reg(r_d, result, bus);
            }
            0x7 => {
                let (result, carry) =
                    ShiftType::RotateRight.perform_shift(op1, op2 as u8, cpu.registers.cpsr.carry(), ShiftContext::Register);
                cpu.write_reg(r_d, result, bus);
                cpu.set_logical_flags(result, carry);
            }
            0x8 => {
                let result = op1 & op2;
                cpu.set_zero_and_sign(result);
            }
            0x9 => {
                let result = common_behaviour::sub(cpu, 0, op2, true);
                cpu.write_reg(r_d, result, bus);
            }
            0xA => {
                common_behaviour::sub(cpu, op1, op2, true);
            }
            0xB => {
                common_behaviour::add(cpu, op1, op2, true);
            }
            0xC => {
                let result = op1 | op2;
                cpu.write_reg(r_d, result, bus);
                cpu.set_zero_and_sign(result);
            }
            0xD => {
                // Carry/overflow left unmodified, matching the ARMv4T-documented MUL behaviour.
                let result = op1.wrapping_mul(op2);
                cpu.write_reg(r_d, result, bus);
                cpu.set_zero_and_sign(result);
            }
            0xE => {
                let result = op1 & !op2;
                cpu.write_reg(r_d, result, bus);
                cpu.set_zero_and_sign(result);
            }
            0xF => {
                let result = !op2;
                cpu.write_reg(r_d, result, bus);
                cpu.set_zero_and_sign(result);
            }
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::cartridge::Cartridge;

    fn test_env() -> (CPU, Bus) {
        let mut bus = Bus::new(Cartridge::default(), Box::new([0u8; 16 * 1024]));
        let cpu = CPU::new(false, &mut bus);
        (cpu, bus)
    }

    #[test]
    fn add_subtract_immediate() {
        let (mut cpu, mut bus) = test_env();
        cpu.registers.general_purpose[2] = 10;

        // SUB R0, R2, #3 (Format 2, immediate, subtract)
        let instr: ThumbInstruction = 0x1ED0;
        ThumbV4::add_subtract(&mut cpu, instr, &mut bus);

        assert_eq!(cpu.registers.general_purpose[0], 7);
    }

    #[test]
    fn add_subtract_register() {
        let (mut cpu, mut bus) = test_env();
        cpu.registers.general_purpose[1] = 4;
        cpu.registers.general_purpose[2] = 6;

        // ADD R0, R1, R2 (Format 2, register, add)
        let instr: ThumbInstruction = 0x1888;
        ThumbV4::add_subtract(&mut cpu, instr, &mut bus);

        assert_eq!(cpu.registers.general_purpose[0], 10);
    }

    #[test]
    fn move_immediate_sets_zero_flag() {
        let (mut cpu, mut bus) = test_env();

        // MOV R3, #0
        let instr: ThumbInstruction = 0b0010_0011_0000_0000;
        ThumbV4::move_compare_add_subtract(&mut cpu, instr, &mut bus);

        assert_eq!(cpu.registers.general_purpose[3], 0);
        assert!(cpu.registers.cpsr.zero());
    }

    #[test]
    fn alu_and_operation() {
        let (mut cpu, mut bus) = test_env();
        cpu.registers.general_purpose[0] = 0b1100;
        cpu.registers.general_purpose[1] = 0b1010;

        // AND R0, R1 (opcode 0x0)
        let instr: ThumbInstruction = 0b0100_0000_00_001_000;
        ThumbV4::alu_operations(&mut cpu, instr, &mut bus);

        assert_eq!(cpu.registers.general_purpose[0], 0b1000);
    }

    #[test]
    fn alu_mul_operation() {
        let (mut cpu, mut bus) = test_env();
        cpu.registers.general_purpose[0] = 6;
        cpu.registers.general_purpose[1] = 7;

        // MUL R0, R1 (opcode 0xD)
        let instr: ThumbInstruction = 0b0100_0011_01_001_000;
        ThumbV4::alu_operations(&mut cpu, instr, &mut bus);

        assert_eq!(cpu.registers.general_purpose[0], 42);
    }
}
