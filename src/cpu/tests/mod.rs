use crate::cpu::{CoreMemory, PROGRAM_START, CPU};
use crate::image::MemoryImage;

mod cpu_tests;

fn memory_for_testing() -> CoreMemory {
    CoreMemory::new(&MemoryImage::zeroed())
}

fn cpu_for_testing() -> CPU {
    CPU::new(&MemoryImage::zeroed())
}

/* a zeroed image with the program placed where execution begins */
fn cpu_with_program(program: &[u8]) -> CPU {
    CPU::new(&MemoryImage::with_program(PROGRAM_START, program))
}

/* runs until the program stops, failing the test if it takes too long */
fn run_to_halt(cpu: &mut CPU, max_instructions: usize) -> crate::cpu::Halt {
    for _ in 0..max_instructions {
        if let Some(halt) = cpu.transition().unwrap() {
            return halt;
        }
    }
    panic!("program did not halt within {max_instructions} instructions");
}
