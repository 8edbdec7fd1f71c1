use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("undefined opcode 0x{opcode:02x} at PC 0x{pc:04x}")]
    UndefinedOpcode { pc: u16, opcode: u8 },
}
