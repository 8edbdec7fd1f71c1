use crate::cpu::{addr, zero_page_addr, CPU};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implicit,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
}

impl AddressingMode {
    /* behavior based on: https://www.nesdev.org/obelisk-6502-guide/addressing.html */
    pub fn resolve_address(&self, cpu: &CPU, byte1: u8, byte2: u8) -> u16 {
        match self {
            AddressingMode::Implicit => {
                panic!("Implicit mode should never be directly referenced")
            }
            AddressingMode::Accumulator => {
                panic!("Accumulator mode should never be directly referenced")
            }
            AddressingMode::Immediate => panic!("Immediate mode shouldn't look up in memory"),
            AddressingMode::ZeroPage => zero_page_addr(byte1),
            /* the index never carries out of the zero page */
            AddressingMode::ZeroPageX => zero_page_addr(byte1.wrapping_add(cpu.index_x)),
            AddressingMode::ZeroPageY => zero_page_addr(byte1.wrapping_add(cpu.index_y)),
            /* relative to the instruction after the branch */
            AddressingMode::Relative => cpu
                .program_counter
                .wrapping_add(self.get_bytes() as u16)
                .wrapping_add_signed(byte1 as i8 as i16),
            AddressingMode::Absolute => addr(byte1, byte2),
            AddressingMode::AbsoluteX => addr(byte1, byte2).wrapping_add(cpu.index_x as u16),
            AddressingMode::AbsoluteY => addr(byte1, byte2).wrapping_add(cpu.index_y as u16),
            /* only used for JMP; the pointer itself may straddle 0xffff/0x0000 */
            AddressingMode::Indirect => cpu.read_mem16(addr(byte1, byte2)),
            AddressingMode::IndirectX => cpu.read_mem16_zero_page(byte1.wrapping_add(cpu.index_x)),
            AddressingMode::IndirectY => cpu
                .read_mem16_zero_page(byte1)
                .wrapping_add(cpu.index_y as u16),
        }
    }

    pub fn deref(&self, cpu: &CPU, byte1: u8, byte2: u8) -> u8 {
        match self {
            AddressingMode::Immediate => byte1,
            AddressingMode::Accumulator => cpu.accumulator,
            _ => {
                let address = self.resolve_address(cpu, byte1, byte2);
                cpu.read_mem(address)
            }
        }
    }

    pub fn write(&self, cpu: &mut CPU, byte1: u8, byte2: u8, new_val: u8) {
        match self {
            AddressingMode::Accumulator => cpu.accumulator = new_val,
            _ => {
                let address = self.resolve_address(cpu, byte1, byte2);
                cpu.write_mem(address, new_val)
            }
        }
    }

    /* total encoded length of an instruction using this mode, opcode included */
    pub const fn get_bytes(&self) -> u8 {
        match self {
            AddressingMode::Implicit | AddressingMode::Accumulator => 1,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY => 2,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 3,
        }
    }
}
