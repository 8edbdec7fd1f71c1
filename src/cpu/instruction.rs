use crate::cpu::{AddressingMode, Halt, StatusFlag, CPU};
use std::fmt;
use AddressingMode::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /* load/store opcodes */
    LDA, /* loads fixed value into A; can set zero flag */
    LDX, /* loads value at address into X; can set zero flag */
    LDY, /* loads fixed value into Y; can set zero flag */
    STA, /* store value from A into address */
    STX, /* stores value from X into address */
    STY, /* stores value from Y into address */

    /* transfer opcodes */
    TAX, /* transfer value from A into X; can set zero flag */
    TAY, /* transfer value from A into Y; can set zero flag */
    TSX, /* transfer value from Stack Pointer to X; can set zero flag */
    TXS, /* Transfer X to Stack Pointer */
    TXA, /* transfer value from X into A; can set zero flag */
    TYA, /* transfer value from Y into A; can set zero flag */

    /* comparisons */
    CMP, /* Compare A */
    CPX, /* Compare X */
    CPY, /* Compare Y */

    /* branch codes */
    BCC, /* Branch if Carry Clear */
    BCS, /* Branch if Carry Set */
    BEQ, /* Branch if Equal */
    BMI, /* Branch if Minus */
    BNE, /* Branch if Not Equal */
    BPL, /* Branch if Plus */
    BVC, /* Branch if Overflow Clear */
    BVS, /* Branch if Overflow Set */

    /* increment/decrement locations */
    DEC, /* Decrement Memory */
    DEX, /* Decrement X */
    DEY, /* Decrement Y */
    INC, /* Increment Memory */
    INX, /* Increment X */
    INY, /* Increment Y */

    /* bitwise operators */
    AND, /* Bitwise AND */
    ASL, /* Arithmetic Shift Left */
    BIT, /* Bit Test */
    EOR, /* Bitwise XOR */
    LSR, /* Logical Shift Right */
    ORA, /* Bitwise OR */

    /* arithmetic */
    ADC, /* Add With Carry */
    SBC, /* Subtract With Carry */

    /* rotates */
    ROL, /* Rotate Left */
    ROR, /* Rotate Right */

    /* clear & set flags */
    CLC, /* Clear Carry */
    CLD, /* Clear Decimal */
    CLI, /* Clear Interrupt Disable */
    CLV, /* Clear Overflow */
    SEC, /* Set Carry Flag */
    SED, /* Set Decimal Flag */
    SEI, /* Set Interrupt Disable */

    /* stack operations */
    PHA, /* Push A */
    PHP, /* Push Processor Status */
    PLA, /* Pull A */
    PLP, /* Pull Processor Status */

    /* jumps */
    JMP, /* Jump */
    JSR, /* Jump to Subroutine */
    RTS, /* Return from Subroutine */
    RTI, /* Return from Interrupt */

    /* others */
    BRK, /* Break; stops the emulator, there is no interrupt vector */
    NOP, /* No-op */

    /* any byte that isn't a documented opcode */
    Invalid,
}

/* what the fetch loop should do with the program counter once an instruction has run */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Advance,
    Jump,
    Halt(Halt),
    Undefined,
}

impl Instruction {
    pub fn apply(&self, cpu: &mut CPU, addr_mode: &AddressingMode, b1: u8, b2: u8) -> Flow {
        match self {
            Instruction::ADC => {
                let val = addr_mode.deref(cpu, b1, b2);
                add_with_carry_and_update(cpu, val);
            }
            Instruction::AND => {
                cpu.accumulator &= addr_mode.deref(cpu, b1, b2);
                cpu.update_zero_neg_flags(cpu.accumulator);
            }
            Instruction::ASL => {
                let old_val = addr_mode.deref(cpu, b1, b2);
                let result = old_val << 1;
                addr_mode.write(cpu, b1, b2, result);
                cpu.update_flag(StatusFlag::Carry, old_val & 0x80 != 0);
                cpu.update_zero_neg_flags(result);
            }
            Instruction::BCC => return Self::branch_instr(cpu, StatusFlag::Carry, false, b1),
            Instruction::BCS => return Self::branch_instr(cpu, StatusFlag::Carry, true, b1),
            Instruction::BEQ => return Self::branch_instr(cpu, StatusFlag::Zero, true, b1),
            Instruction::BIT => {
                let mem = addr_mode.deref(cpu, b1, b2);
                cpu.update_flag(StatusFlag::Zero, cpu.accumulator & mem == 0);
                cpu.update_flag(StatusFlag::Overflow, mem & 0x40 != 0);
                cpu.update_flag(StatusFlag::Negative, mem & 0x80 != 0);
            }
            Instruction::BMI => return Self::branch_instr(cpu, StatusFlag::Negative, true, b1),
            Instruction::BNE => return Self::branch_instr(cpu, StatusFlag::Zero, false, b1),
            Instruction::BPL => return Self::branch_instr(cpu, StatusFlag::Negative, false, b1),
            Instruction::BRK => {
                return Flow::Halt(Halt::Break {
                    pc: cpu.program_counter,
                })
            }
            Instruction::BVC => return Self::branch_instr(cpu, StatusFlag::Overflow, false, b1),
            Instruction::BVS => return Self::branch_instr(cpu, StatusFlag::Overflow, true, b1),
            Instruction::CLC => cpu.update_flag(StatusFlag::Carry, false),
            Instruction::CLD => cpu.update_flag(StatusFlag::Decimal, false),
            Instruction::CLI => cpu.update_flag(StatusFlag::InterruptDisable, false),
            Instruction::CLV => cpu.update_flag(StatusFlag::Overflow, false),
            Instruction::CMP => {
                let register = cpu.accumulator;
                Self::compare(cpu, addr_mode, b1, b2, register);
            }
            Instruction::CPX => {
                let register = cpu.index_x;
                Self::compare(cpu, addr_mode, b1, b2, register);
            }
            Instruction::CPY => {
                let register = cpu.index_y;
                Self::compare(cpu, addr_mode, b1, b2, register);
            }
            Instruction::DEC => {
                let new_val = addr_mode.deref(cpu, b1, b2).wrapping_sub(1);
                addr_mode.write(cpu, b1, b2, new_val);
                cpu.update_zero_neg_flags(new_val);
            }
            Instruction::DEX => {
                cpu.index_x = cpu.index_x.wrapping_sub(1);
                cpu.update_zero_neg_flags(cpu.index_x);
            }
            Instruction::DEY => {
                cpu.index_y = cpu.index_y.wrapping_sub(1);
                cpu.update_zero_neg_flags(cpu.index_y);
            }
            Instruction::EOR => {
                cpu.accumulator ^= addr_mode.deref(cpu, b1, b2);
                cpu.update_zero_neg_flags(cpu.accumulator);
            }
            Instruction::INC => {
                let new_val = addr_mode.deref(cpu, b1, b2).wrapping_add(1);
                addr_mode.write(cpu, b1, b2, new_val);
                cpu.update_zero_neg_flags(new_val);
            }
            Instruction::INX => {
                cpu.index_x = cpu.index_x.wrapping_add(1);
                cpu.update_zero_neg_flags(cpu.index_x);
            }
            Instruction::INY => {
                cpu.index_y = cpu.index_y.wrapping_add(1);
                cpu.update_zero_neg_flags(cpu.index_y);
            }
            Instruction::JMP => {
                cpu.program_counter = addr_mode.resolve_address(cpu, b1, b2);
                return Flow::Jump;
            }
            Instruction::JSR => {
                /* the address pushed is the last byte of the JSR itself; RTS adds one */
                cpu.push_memory_loc(cpu.program_counter.wrapping_add(2));
                cpu.program_counter = addr_mode.resolve_address(cpu, b1, b2);
                return Flow::Jump;
            }
            Instruction::LDA => {
                cpu.accumulator = addr_mode.deref(cpu, b1, b2);
                cpu.update_zero_neg_flags(cpu.accumulator);
            }
            Instruction::LDX => {
                cpu.index_x = addr_mode.deref(cpu, b1, b2);
                cpu.update_zero_neg_flags(cpu.index_x);
            }
            Instruction::LDY => {
                cpu.index_y = addr_mode.deref(cpu, b1, b2);
                cpu.update_zero_neg_flags(cpu.index_y);
            }
            Instruction::LSR => {
                let val = addr_mode.deref(cpu, b1, b2);
                let new_val = val >> 1;
                addr_mode.write(cpu, b1, b2, new_val);
                cpu.update_flag(StatusFlag::Carry, val & 0x1 != 0);
                cpu.update_zero_neg_flags(new_val);
            }
            Instruction::NOP => {
                log::debug!(
                    "NOP at 0x{:04x}: AC={} ({}), SR={} (NV_BDIZC)",
                    cpu.program_counter,
                    cpu.accumulator,
                    cpu.accumulator as i8,
                    cpu.status
                );
            }
            Instruction::ORA => {
                cpu.accumulator |= addr_mode.deref(cpu, b1, b2);
                cpu.update_zero_neg_flags(cpu.accumulator);
            }
            Instruction::PHA => cpu.push(cpu.accumulator),
            Instruction::PHP => cpu.push(cpu.status.to_pushed_byte()),
            Instruction::PLA => {
                cpu.accumulator = cpu.pop();
                cpu.update_zero_neg_flags(cpu.accumulator);
            }
            Instruction::PLP => {
                let val = cpu.pop();
                cpu.status.pull_from(val);
            }
            Instruction::ROL => {
                let val = addr_mode.deref(cpu, b1, b2);
                let result = (val << 1) | cpu.status.as_num(StatusFlag::Carry);
                addr_mode.write(cpu, b1, b2, result);
                cpu.update_flag(StatusFlag::Carry, val & 0x80 != 0);
                cpu.update_zero_neg_flags(result);
            }
            Instruction::ROR => {
                let val = addr_mode.deref(cpu, b1, b2);
                let result = (cpu.status.as_num(StatusFlag::Carry) << 7) | (val >> 1);
                addr_mode.write(cpu, b1, b2, result);
                cpu.update_flag(StatusFlag::Carry, val & 0x1 != 0);
                cpu.update_zero_neg_flags(result);
            }
            Instruction::RTI => {
                let val = cpu.pop();
                cpu.status.pull_from(val);
                cpu.program_counter = cpu.pop_memory_loc();
                return Flow::Jump;
            }
            Instruction::RTS => {
                /* returning with nothing on the stack is how a program finishes */
                if cpu.s_register == 0xff {
                    return Flow::Halt(Halt::Returned(cpu.accumulator));
                }
                cpu.program_counter = cpu.pop_memory_loc().wrapping_add(1);
                return Flow::Jump;
            }
            Instruction::SBC => {
                let val = addr_mode.deref(cpu, b1, b2);
                add_with_carry_and_update(cpu, !val);
            }
            Instruction::SEC => cpu.update_flag(StatusFlag::Carry, true),
            Instruction::SED => cpu.update_flag(StatusFlag::Decimal, true),
            Instruction::SEI => cpu.update_flag(StatusFlag::InterruptDisable, true),
            Instruction::STA => {
                let val = cpu.accumulator;
                addr_mode.write(cpu, b1, b2, val);
            }
            Instruction::STX => {
                let val = cpu.index_x;
                addr_mode.write(cpu, b1, b2, val);
            }
            Instruction::STY => {
                let val = cpu.index_y;
                addr_mode.write(cpu, b1, b2, val);
            }
            Instruction::TAX => {
                cpu.index_x = cpu.accumulator;
                cpu.update_zero_neg_flags(cpu.index_x);
            }
            Instruction::TAY => {
                cpu.index_y = cpu.accumulator;
                cpu.update_zero_neg_flags(cpu.index_y);
            }
            Instruction::TSX => {
                cpu.index_x = cpu.s_register;
                cpu.update_zero_neg_flags(cpu.index_x);
            }
            Instruction::TXA => {
                cpu.accumulator = cpu.index_x;
                cpu.update_zero_neg_flags(cpu.accumulator);
            }
            Instruction::TXS => {
                /* doesn't update flags! */
                cpu.s_register = cpu.index_x;
            }
            Instruction::TYA => {
                cpu.accumulator = cpu.index_y;
                cpu.update_zero_neg_flags(cpu.accumulator);
            }
            Instruction::Invalid => return Flow::Undefined,
        }

        Flow::Advance
    }

    fn branch_instr(cpu: &mut CPU, flag: StatusFlag, is_positive: bool, offset: u8) -> Flow {
        if is_positive == cpu.status.is_set(flag) {
            cpu.program_counter = Relative.resolve_address(cpu, offset, 0);
            Flow::Jump
        } else {
            Flow::Advance
        }
    }

    fn compare(cpu: &mut CPU, addr_mode: &AddressingMode, b1: u8, b2: u8, compare_val: u8) {
        let mem_val = addr_mode.deref(cpu, b1, b2);

        cpu.update_flag(StatusFlag::Carry, compare_val >= mem_val);
        cpu.update_zero_neg_flags(compare_val.wrapping_sub(mem_val));
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Invalid => write!(f, "???"),
            _ => write!(f, "{self:?}"),
        }
    }
}

/**
 * Everything known about an opcode byte before executing it: which operation, which
 * addressing mode, and (derived from the mode) how many bytes it occupies.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub instruction: Instruction,
    pub addr_mode: AddressingMode,
}

impl Descriptor {
    pub const INVALID: Descriptor = Descriptor {
        instruction: Instruction::Invalid,
        addr_mode: Implicit,
    };

    pub const fn length(&self) -> u8 {
        self.addr_mode.get_bytes()
    }

    #[cfg(test)]
    pub fn is_valid(&self) -> bool {
        self.instruction != Instruction::Invalid
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} {}b",
            self.instruction,
            self.addr_mode,
            self.length()
        )
    }
}

/* every possible opcode byte, worked out at compile time */
pub static OPCODE_TABLE: [Descriptor; 256] = build_opcode_table();

pub fn decode(opcode: u8) -> Descriptor {
    OPCODE_TABLE[opcode as usize]
}

const fn build_opcode_table() -> [Descriptor; 256] {
    let mut table = [Descriptor::INVALID; 256];
    let mut opcode = 0;
    while opcode < table.len() {
        table[opcode] = from_opcode(opcode as u8);
        opcode += 1;
    }
    table
}

const fn from_opcode(opcode: u8) -> Descriptor {
    let (instruction, addr_mode) = match opcode {
        0x00 => (Instruction::BRK, Implicit),
        0x01 => (Instruction::ORA, IndirectX),
        0x05 => (Instruction::ORA, ZeroPage),
        0x06 => (Instruction::ASL, ZeroPage),
        0x08 => (Instruction::PHP, Implicit),
        0x09 => (Instruction::ORA, Immediate),
        0x0a => (Instruction::ASL, Accumulator),
        0x0d => (Instruction::ORA, Absolute),
        0x0e => (Instruction::ASL, Absolute),
        0x10 => (Instruction::BPL, Relative),
        0x11 => (Instruction::ORA, IndirectY),
        0x15 => (Instruction::ORA, ZeroPageX),
        0x16 => (Instruction::ASL, ZeroPageX),
        0x18 => (Instruction::CLC, Implicit),
        0x19 => (Instruction::ORA, AbsoluteY),
        0x1d => (Instruction::ORA, AbsoluteX),
        0x1e => (Instruction::ASL, AbsoluteX),
        0x20 => (Instruction::JSR, Absolute),
        0x21 => (Instruction::AND, IndirectX),
        0x24 => (Instruction::BIT, ZeroPage),
        0x25 => (Instruction::AND, ZeroPage),
        0x26 => (Instruction::ROL, ZeroPage),
        0x28 => (Instruction::PLP, Implicit),
        0x29 => (Instruction::AND, Immediate),
        0x2a => (Instruction::ROL, Accumulator),
        0x2c => (Instruction::BIT, Absolute),
        0x2d => (Instruction::AND, Absolute),
        0x2e => (Instruction::ROL, Absolute),
        0x30 => (Instruction::BMI, Relative),
        0x31 => (Instruction::AND, IndirectY),
        0x35 => (Instruction::AND, ZeroPageX),
        0x36 => (Instruction::ROL, ZeroPageX),
        0x38 => (Instruction::SEC, Implicit),
        0x39 => (Instruction::AND, AbsoluteY),
        0x3d => (Instruction::AND, AbsoluteX),
        0x3e => (Instruction::ROL, AbsoluteX),
        0x40 => (Instruction::RTI, Implicit),
        0x41 => (Instruction::EOR, IndirectX),
        0x45 => (Instruction::EOR, ZeroPage),
        0x46 => (Instruction::LSR, ZeroPage),
        0x48 => (Instruction::PHA, Implicit),
        0x49 => (Instruction::EOR, Immediate),
        0x4a => (Instruction::LSR, Accumulator),
        0x4c => (Instruction::JMP, Absolute),
        0x4d => (Instruction::EOR, Absolute),
        0x4e => (Instruction::LSR, Absolute),
        0x50 => (Instruction::BVC, Relative),
        0x51 => (Instruction::EOR, IndirectY),
        0x55 => (Instruction::EOR, ZeroPageX),
        0x56 => (Instruction::LSR, ZeroPageX),
        0x58 => (Instruction::CLI, Implicit),
        0x59 => (Instruction::EOR, AbsoluteY),
        0x5d => (Instruction::EOR, AbsoluteX),
        0x5e => (Instruction::LSR, AbsoluteX),
        0x60 => (Instruction::RTS, Implicit),
        0x61 => (Instruction::ADC, IndirectX),
        0x65 => (Instruction::ADC, ZeroPage),
        0x66 => (Instruction::ROR, ZeroPage),
        0x68 => (Instruction::PLA, Implicit),
        0x69 => (Instruction::ADC, Immediate),
        0x6a => (Instruction::ROR, Accumulator),
        0x6c => (Instruction::JMP, Indirect),
        0x6d => (Instruction::ADC, Absolute),
        0x6e => (Instruction::ROR, Absolute),
        0x70 => (Instruction::BVS, Relative),
        0x71 => (Instruction::ADC, IndirectY),
        0x75 => (Instruction::ADC, ZeroPageX),
        0x76 => (Instruction::ROR, ZeroPageX),
        0x78 => (Instruction::SEI, Implicit),
        0x79 => (Instruction::ADC, AbsoluteY),
        0x7d => (Instruction::ADC, AbsoluteX),
        0x7e => (Instruction::ROR, AbsoluteX),
        0x81 => (Instruction::STA, IndirectX),
        0x84 => (Instruction::STY, ZeroPage),
        0x85 => (Instruction::STA, ZeroPage),
        0x86 => (Instruction::STX, ZeroPage),
        0x88 => (Instruction::DEY, Implicit),
        0x8a => (Instruction::TXA, Implicit),
        0x8c => (Instruction::STY, Absolute),
        0x8d => (Instruction::STA, Absolute),
        0x8e => (Instruction::STX, Absolute),
        0x90 => (Instruction::BCC, Relative),
        0x91 => (Instruction::STA, IndirectY),
        0x94 => (Instruction::STY, ZeroPageX),
        0x95 => (Instruction::STA, ZeroPageX),
        0x96 => (Instruction::STX, ZeroPageY),
        0x98 => (Instruction::TYA, Implicit),
        0x99 => (Instruction::STA, AbsoluteY),
        0x9a => (Instruction::TXS, Implicit),
        0x9d => (Instruction::STA, AbsoluteX),
        0xa0 => (Instruction::LDY, Immediate),
        0xa1 => (Instruction::LDA, IndirectX),
        0xa2 => (Instruction::LDX, Immediate),
        0xa4 => (Instruction::LDY, ZeroPage),
        0xa5 => (Instruction::LDA, ZeroPage),
        0xa6 => (Instruction::LDX, ZeroPage),
        0xa8 => (Instruction::TAY, Implicit),
        0xa9 => (Instruction::LDA, Immediate),
        0xaa => (Instruction::TAX, Implicit),
        0xac => (Instruction::LDY, Absolute),
        0xad => (Instruction::LDA, Absolute),
        0xae => (Instruction::LDX, Absolute),
        0xb0 => (Instruction::BCS, Relative),
        0xb1 => (Instruction::LDA, IndirectY),
        0xb4 => (Instruction::LDY, ZeroPageX),
        0xb5 => (Instruction::LDA, ZeroPageX),
        0xb6 => (Instruction::LDX, ZeroPageY),
        0xb8 => (Instruction::CLV, Implicit),
        0xb9 => (Instruction::LDA, AbsoluteY),
        0xba => (Instruction::TSX, Implicit),
        0xbc => (Instruction::LDY, AbsoluteX),
        0xbd => (Instruction::LDA, AbsoluteX),
        0xbe => (Instruction::LDX, AbsoluteY),
        0xc0 => (Instruction::CPY, Immediate),
        0xc1 => (Instruction::CMP, IndirectX),
        0xc4 => (Instruction::CPY, ZeroPage),
        0xc5 => (Instruction::CMP, ZeroPage),
        0xc6 => (Instruction::DEC, ZeroPage),
        0xc8 => (Instruction::INY, Implicit),
        0xc9 => (Instruction::CMP, Immediate),
        0xca => (Instruction::DEX, Implicit),
        0xcc => (Instruction::CPY, Absolute),
        0xcd => (Instruction::CMP, Absolute),
        0xce => (Instruction::DEC, Absolute),
        0xd0 => (Instruction::BNE, Relative),
        0xd1 => (Instruction::CMP, IndirectY),
        0xd5 => (Instruction::CMP, ZeroPageX),
        0xd6 => (Instruction::DEC, ZeroPageX),
        0xd8 => (Instruction::CLD, Implicit),
        0xd9 => (Instruction::CMP, AbsoluteY),
        0xdd => (Instruction::CMP, AbsoluteX),
        0xde => (Instruction::DEC, AbsoluteX),
        0xe0 => (Instruction::CPX, Immediate),
        0xe1 => (Instruction::SBC, IndirectX),
        0xe4 => (Instruction::CPX, ZeroPage),
        0xe5 => (Instruction::SBC, ZeroPage),
        0xe6 => (Instruction::INC, ZeroPage),
        0xe8 => (Instruction::INX, Implicit),
        0xe9 => (Instruction::SBC, Immediate),
        0xea => (Instruction::NOP, Implicit),
        0xec => (Instruction::CPX, Absolute),
        0xed => (Instruction::SBC, Absolute),
        0xee => (Instruction::INC, Absolute),
        0xf0 => (Instruction::BEQ, Relative),
        0xf1 => (Instruction::SBC, IndirectY),
        0xf5 => (Instruction::SBC, ZeroPageX),
        0xf6 => (Instruction::INC, ZeroPageX),
        0xf8 => (Instruction::SED, Implicit),
        0xf9 => (Instruction::SBC, AbsoluteY),
        0xfd => (Instruction::SBC, AbsoluteX),
        0xfe => (Instruction::INC, AbsoluteX),
        _ => return Descriptor::INVALID,
    };

    Descriptor {
        instruction,
        addr_mode,
    }
}

/* ADC, and SBC with the operand inverted; decimal mode is not emulated */
fn add_with_carry_and_update(cpu: &mut CPU, mem_val: u8) {
    let old_a = cpu.accumulator;

    let (result, carry) = add_with_carry_impl(old_a, mem_val, cpu.status.as_num(StatusFlag::Carry));

    cpu.accumulator = result;
    cpu.update_zero_neg_flags(result);
    cpu.update_flag(StatusFlag::Carry, carry);
    cpu.update_flag(
        StatusFlag::Overflow,
        (result ^ old_a) & (result ^ mem_val) & 0x80 != 0,
    );
}

fn add_with_carry_impl(a: u8, b: u8, carry: u8) -> (u8, bool) {
    let first_add_result = a.overflowing_add(b);
    let second_add_result = first_add_result.0.overflowing_add(carry);

    (
        second_add_result.0,
        first_add_result.1 || second_add_result.1,
    )
}
