use crate::cpu::tests::{cpu_for_testing, cpu_with_program, run_to_halt};
use crate::cpu::{
    decode, CpuError, Halt, InputLatch, Operation, StatusFlag, POINTER_X_ADDRESS,
    POINTER_Y_ADDRESS, PROGRAM_START, CPU,
};
use crate::image::MemoryImage;
use std::sync::Arc;

#[test]
fn test_power_on_state() {
    let cpu = cpu_for_testing();
    assert_eq!(cpu.program_counter, 0x0500);
    assert_eq!(cpu.program_counter, PROGRAM_START);
    assert_eq!(cpu.s_register, 0xff);
    assert_eq!(cpu.accumulator, 0x00);
    assert_eq!(cpu.index_x, 0x00);
    assert_eq!(cpu.index_y, 0x00);
    assert_eq!(cpu.status.bits(), 0x00);
    assert_eq!(cpu.executed(), 0);
}

#[test]
fn test_transition() {
    let cpu = &mut cpu_for_testing();

    /* can we update via ADC, and a memory read? */
    cpu.accumulator = 0x05;
    cpu.write_mem(0x1234, 0x04); // value we will add
    cpu.index_x = 0x20;
    cpu.write_mem(0x1f, 0x34); // the address stored in zero page memory, lo
    cpu.write_mem(0x20, 0x12); // that address, hi
    cpu.program_counter = 0x8000;
    cpu.write_mem(0x8000, 0x61); // ADC, IndirectX
    cpu.write_mem(0x8001, 0xff); // wrapping add 0xff == subtract 1 from x
    assert_eq!(cpu.transition(), Ok(None));
    assert_eq!(cpu.accumulator, 0x09); // added four to a
    assert_eq!(cpu.program_counter, 0x8002);
    assert_eq!(cpu.executed(), 1);

    /* three byte instruction */
    cpu.write_mem(0x8002, 0x8d); // STA Absolute
    cpu.write_mem(0x8003, 0x00);
    cpu.write_mem(0x8004, 0x07);
    assert_eq!(cpu.transition(), Ok(None));
    assert_eq!(cpu.read_mem(0x0700), 0x09);
    assert_eq!(cpu.program_counter, 0x8005);
}

#[test]
fn test_operation_fetch() {
    let cpu = &mut cpu_for_testing();

    /* operand bytes wrap around the top of memory */
    cpu.program_counter = 0xfffe;
    cpu.write_mem(0xfffe, 0xad); // LDA Absolute
    cpu.write_mem(0xffff, 0x34);
    cpu.write_mem(0x0000, 0x12);

    let operation = Operation::fetch(cpu);
    assert_eq!(operation.pc, 0xfffe);
    assert_eq!(operation.opcode, 0xad);
    assert_eq!(operation.byte1, 0x34);
    assert_eq!(operation.byte2, 0x12);
    assert_eq!(operation.descriptor, decode(0xad));

    cpu.write_mem(0x1234, 0x77);
    assert_eq!(operation.apply(cpu), Ok(None));
    assert_eq!(cpu.accumulator, 0x77);
    /* and the program counter wraps with them */
    assert_eq!(cpu.program_counter, 0x0001);
}

#[test]
fn test_sample_program() {
    /* LDA #$05; STA $0500; LDA #$00; RTS */
    let cpu = &mut cpu_with_program(&[0xa9, 0x05, 0x8d, 0x00, 0x05, 0xa9, 0x00, 0x60]);

    assert_eq!(run_to_halt(cpu, 10), Halt::Returned(0x00));
    assert_eq!(cpu.accumulator, 0x00);
    /* it overwrote its own first byte */
    assert_eq!(cpu.read_mem(0x0500), 0x05);
    assert_eq!(cpu.executed(), 4);
}

#[test]
fn test_subroutine_and_loop() {
    /*
     * 0500  LDX #$03
     * 0502  JSR $0510
     * 0505  DEX
     * 0506  BNE $0502
     * 0508  RTS
     * 0510  INC $10
     * 0512  RTS
     */
    let mut image = MemoryImage::with_program(
        PROGRAM_START,
        &[0xa2, 0x03, 0x20, 0x10, 0x05, 0xca, 0xd0, 0xfa, 0x60],
    );
    for (i, &byte) in [0xe6, 0x10, 0x60].iter().enumerate() {
        image.set(0x0510 + i as u16, byte);
    }
    let cpu = &mut CPU::new(&image);

    assert_eq!(run_to_halt(cpu, 100), Halt::Returned(0x00));
    assert_eq!(cpu.read_mem(0x0010), 0x03);
    assert_eq!(cpu.index_x, 0x00);
    assert_eq!(cpu.s_register, 0xff);
}

#[test]
fn test_call_then_immediate_return() {
    /* JSR $0600; LDA #$01; RTS, with RTS at $0600 */
    let mut image = MemoryImage::with_program(PROGRAM_START, &[0x20, 0x00, 0x06, 0xa9, 0x01, 0x60]);
    image.set(0x0600, 0x60);
    let cpu = &mut CPU::new(&image);

    cpu.transition().unwrap();
    assert_eq!(cpu.program_counter, 0x0600);
    cpu.transition().unwrap();
    /* straight back to the instruction after the call */
    assert_eq!(cpu.program_counter, PROGRAM_START + 3);
    assert_eq!(cpu.s_register, 0xff);
    assert_eq!(run_to_halt(cpu, 10), Halt::Returned(0x01));
}

#[test]
fn test_branch_to_itself_spins() {
    /* BNE -2 with Z clear never gets anywhere */
    let cpu = &mut cpu_with_program(&[0xd0, 0xfe]);
    for _ in 0..10 {
        assert_eq!(cpu.transition(), Ok(None));
        assert_eq!(cpu.program_counter, PROGRAM_START);
    }

    /* offset zero falls through to the next instruction */
    let cpu = &mut cpu_with_program(&[0xd0, 0x00, 0xea]);
    assert_eq!(cpu.transition(), Ok(None));
    assert_eq!(cpu.program_counter, PROGRAM_START + 2);
}

#[test]
fn test_brk_halts() {
    let cpu = &mut cpu_with_program(&[0xea, 0xea, 0x00]);
    assert_eq!(
        run_to_halt(cpu, 10),
        Halt::Break {
            pc: PROGRAM_START + 2
        }
    );
}

#[test]
fn test_undefined_opcode() {
    let cpu = &mut cpu_with_program(&[0xea, 0xff]);
    assert_eq!(cpu.transition(), Ok(None));
    let error = cpu.transition().unwrap_err();
    assert_eq!(
        error,
        CpuError::UndefinedOpcode {
            pc: PROGRAM_START + 1,
            opcode: 0xff
        }
    );
    assert_eq!(error.to_string(), "undefined opcode 0xff at PC 0x0501");
    /* nothing moved */
    assert_eq!(cpu.program_counter, PROGRAM_START + 1);
}

#[test]
fn test_stack() {
    let cpu = &mut cpu_for_testing();

    cpu.push(0x11);
    cpu.push(0x22);
    assert_eq!(cpu.s_register, 0xfd);
    assert_eq!(cpu.read_mem(0x01ff), 0x11);
    assert_eq!(cpu.read_mem(0x01fe), 0x22);
    assert_eq!(cpu.pop(), 0x22);
    assert_eq!(cpu.pop(), 0x11);
    assert_eq!(cpu.s_register, 0xff);

    /* high byte goes in first */
    cpu.push_memory_loc(0xabcd);
    assert_eq!(cpu.read_mem(0x01ff), 0xab);
    assert_eq!(cpu.read_mem(0x01fe), 0xcd);
    assert_eq!(cpu.pop_memory_loc(), 0xabcd);

    /* the stack pointer wraps within page one */
    cpu.s_register = 0x00;
    cpu.push(0x33);
    assert_eq!(cpu.read_mem(0x0100), 0x33);
    assert_eq!(cpu.s_register, 0xff);
    assert_eq!(cpu.pop(), 0x33);
    assert_eq!(cpu.s_register, 0x00);
}

#[test]
fn test_reset() {
    let cpu = &mut cpu_with_program(&[0xa9, 0x80, 0xaa, 0x48, 0x38]);
    for _ in 0..4 {
        cpu.transition().unwrap();
    }
    assert_eq!(cpu.index_x, 0x80);
    assert_eq!(cpu.s_register, 0xfe);
    assert!(cpu.status.is_set(StatusFlag::Carry));

    let mut replacement = MemoryImage::zeroed();
    replacement.set(0x1234, 0x56);
    cpu.reset(&replacement);

    assert_eq!(cpu.program_counter, PROGRAM_START);
    assert_eq!(cpu.accumulator, 0x00);
    assert_eq!(cpu.index_x, 0x00);
    assert_eq!(cpu.index_y, 0x00);
    assert_eq!(cpu.s_register, 0xff);
    assert_eq!(cpu.status.bits(), 0x00);
    assert_eq!(cpu.executed(), 0);

    /* all of memory comes from the new image, including what the old program wrote */
    assert_eq!(cpu.snapshot(), replacement);
    assert_eq!(cpu.read_mem(0x01ff), 0x00);
    assert_eq!(cpu.read_mem(0x1234), 0x56);
}

#[test]
fn test_pointer_input_registers() {
    /* LDA $0200; LDX $0201; RTS */
    let cpu = &mut cpu_with_program(&[0xad, 0x00, 0x02, 0xae, 0x01, 0x02, 0x60]);

    /* without an input source those addresses are plain memory */
    cpu.write_mem(POINTER_X_ADDRESS, 0x99);
    cpu.transition().unwrap();
    assert_eq!(cpu.accumulator, 0x99);

    let latch = Arc::new(InputLatch::new());
    cpu.set_input_source(latch.clone());
    latch.set_pointer(12, 63);

    assert_eq!(run_to_halt(cpu, 10), Halt::Returned(0x99));
    assert_eq!(cpu.index_x, 63);
    assert_eq!(cpu.read_mem(POINTER_X_ADDRESS), 12);
    assert_eq!(cpu.read_mem(POINTER_Y_ADDRESS), 63);
    assert_eq!(latch.pointer(), (12, 63));
}

#[test]
fn test_memory_view_sees_writes() {
    let cpu = &mut cpu_with_program(&[0xa9, 0xff, 0x8d, 0x00, 0x03, 0x60]);
    let view = cpu.memory_view();
    assert_eq!(view.read(0x0300), 0x00);

    run_to_halt(cpu, 10);
    assert_eq!(view.read(0x0300), 0xff);
    assert_eq!(view.snapshot(), cpu.snapshot());
}
