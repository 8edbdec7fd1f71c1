use crate::cpu::instruction::Flow;
use crate::cpu::{decode, CpuError, Descriptor, Halt, CPU};

/* one fetched instruction: the opcode, its operand bytes, and where it was found */
#[derive(Debug, Clone, Copy)]
pub struct Operation {
    pub pc: u16,
    pub opcode: u8,
    pub byte1: u8,
    pub byte2: u8,
    pub descriptor: Descriptor,
}

impl Operation {
    /* operand bytes past 0xffff come from the bottom of memory */
    pub fn fetch(cpu: &CPU) -> Operation {
        let pc = cpu.program_counter;
        let opcode = cpu.read_mem(pc);
        Operation {
            pc,
            opcode,
            byte1: cpu.read_mem(pc.wrapping_add(1)),
            byte2: cpu.read_mem(pc.wrapping_add(2)),
            descriptor: decode(opcode),
        }
    }

    /**
     * Runs the instruction against the CPU. Anything that doesn't transfer control moves the
     * program counter past the instruction; jumps, calls, returns and taken branches have
     * already set it themselves.
     */
    pub fn apply(&self, cpu: &mut CPU) -> Result<Option<Halt>, CpuError> {
        let Descriptor {
            instruction,
            addr_mode,
        } = self.descriptor;

        match instruction.apply(cpu, &addr_mode, self.byte1, self.byte2) {
            Flow::Advance => {
                cpu.program_counter = cpu
                    .program_counter
                    .wrapping_add(self.descriptor.length() as u16);
                Ok(None)
            }
            Flow::Jump => Ok(None),
            Flow::Halt(halt) => Ok(Some(halt)),
            Flow::Undefined => Err(CpuError::UndefinedOpcode {
                pc: self.pc,
                opcode: self.opcode,
            }),
        }
    }
}
