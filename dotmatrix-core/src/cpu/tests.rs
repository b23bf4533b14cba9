use crate::apu::Apu;
use crate::bus::{port, Bus};
use crate::cpu::{Cpu, CpuError};
use crate::rom::{tests::build_rom, RomImage};

fn bus_with_program(program: &[u8]) -> Bus {
    let mut data = build_rom(0x00, 0x00);
    data[0x0100..0x0100 + program.len()].copy_from_slice(program);
    Bus::new(RomImage::new(data).unwrap(), Apu::new(48000)).unwrap()
}

fn tobcd(x: u8) -> u8 {
    ((x / 10) % 10) << 4 | (x % 10)
}

//
// End-to-end scenarios
//

#[test]
fn load_then_halt() {
    let mut bus = bus_with_program(&[0x3E, 0x42, 0x76]);
    let mut cpu = Cpu::new();

    assert_eq!(2, cpu.step(&mut bus).unwrap());
    assert_eq!(0x42, cpu.a);
    assert_eq!(0x0102, cpu.pc);

    assert_eq!(1, cpu.step(&mut bus).unwrap());
    assert!(cpu.halted);
    assert_eq!(0x0103, cpu.pc);

    // Halted with nothing pending: one machine cycle per step
    assert_eq!(1, cpu.step(&mut bus).unwrap());
    assert!(cpu.halted);
    assert_eq!(0x0103, cpu.pc);
}

#[test]
fn interrupt_dispatch() {
    let mut bus = bus_with_program(&[0x00]);
    let mut cpu = Cpu::new();

    bus.write8(0xFFFF, 0x01);
    bus.write_port(port::IF, 0x01);

    assert_eq!(8, cpu.step(&mut bus).unwrap());
    assert_eq!(0x0040, cpu.pc);
    assert_eq!(0xFFFC, cpu.sp);
    assert_eq!(0x0100, bus.read16(0xFFFC));
    assert!(!cpu.ime);
    assert_eq!(0x00, bus.read_port(port::IF) & 0x01);
}

#[test]
fn interrupt_priority_lowest_bit_wins() {
    let mut bus = bus_with_program(&[0x00]);
    let mut cpu = Cpu::new();

    bus.write8(0xFFFF, 0x1F);
    bus.write_port(port::IF, 0x14); // timer + joypad pending

    cpu.step(&mut bus).unwrap();
    assert_eq!(0x0050, cpu.pc);
    assert_eq!(0x10, bus.read_port(port::IF));
}

#[test]
fn halt_wakes_without_dispatch_when_ime_clear() {
    let mut bus = bus_with_program(&[0x3E, 0x42]);
    let mut cpu = Cpu::new();
    cpu.ime = false;
    cpu.halted = true;

    bus.write8(0xFFFF, 0x01);
    bus.write_port(port::IF, 0x01);

    assert_eq!(2, cpu.step(&mut bus).unwrap());
    assert!(!cpu.halted);
    assert_eq!(0x42, cpu.a);
    // IF stays set: no dispatch happened
    assert_eq!(0x01, bus.read_port(port::IF) & 0x01);
}

#[test]
fn bcd_add_then_daa() {
    // LD A,45h; LD B,38h; ADD A,B; DAA
    let mut bus = bus_with_program(&[0x3E, 0x45, 0x06, 0x38, 0x80, 0x27]);
    let mut cpu = Cpu::new();
    for _ in 0..4 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(0x83, cpu.a);
    assert!(!cpu.cf);
    assert!(!cpu.hf);

    let mut bus = bus_with_program(&[0x3E, 0x75, 0x06, 0x38, 0x80, 0x27]);
    let mut cpu = Cpu::new();
    for _ in 0..4 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(0x13, cpu.a);
    assert!(cpu.cf);
}

#[test]
fn mbc1_banked_read_program() {
    // LD A,02h; LD (2000h),A; LD A,(4000h)
    let mut data = build_rom(0x01, 0x00);
    data[0x0148] = 0x01; // 4 banks
    data[0x0100..0x0108].copy_from_slice(&[0x3E, 0x02, 0xEA, 0x00, 0x20, 0xFA, 0x00, 0x40]);
    data.resize(0x10000, 0);
    for bank in 0..4 {
        data[bank * 0x4000] = 0xB0 | bank as u8;
    }

    let mut bus = Bus::new(RomImage::new(data).unwrap(), Apu::new(48000)).unwrap();
    let mut cpu = Cpu::new();
    for _ in 0..3 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(0xB2, cpu.a);
}

//
// Quantified flag laws
//

#[test]
fn daa_matches_bcd_addition() {
    for a in 0..100u32 {
        for b in 0..100u32 {
            let mut cpu = Cpu::new();
            cpu.a = tobcd(a as u8);
            cpu.add(tobcd(b as u8));
            cpu.daa();

            assert_eq!(
                tobcd(((a + b) % 100) as u8),
                cpu.a,
                "DAA failed for {a} + {b}"
            );
            assert_eq!(a + b >= 100, cpu.cf, "DAA carry failed for {a} + {b}");
        }
    }
}

#[test]
fn das_matches_bcd_subtraction() {
    for a in 0..100i32 {
        for b in 0..100i32 {
            let mut cpu = Cpu::new();
            cpu.a = tobcd(a as u8);
            cpu.sub(tobcd(b as u8));
            cpu.das();

            assert_eq!(
                tobcd((a - b).rem_euclid(100) as u8),
                cpu.a,
                "DAS failed for {a} - {b}"
            );
            assert_eq!(a < b, cpu.cf, "DAS borrow failed for {a} - {b}");
        }
    }
}

#[test]
fn inc_dec_flag_laws() {
    for x in 0..=255u8 {
        for initial_carry in [false, true] {
            let mut cpu = Cpu::new();
            cpu.cf = initial_carry;

            let y = cpu.inc(x);
            assert_eq!(x.wrapping_add(1), y);
            assert_eq!(y == 0, cpu.zf);
            assert!(!cpu.nf);
            assert_eq!(x & 0x0F == 0x0F, cpu.hf);
            assert_eq!(initial_carry, cpu.cf, "INC must not touch carry");

            let mut cpu = Cpu::new();
            cpu.cf = initial_carry;

            let y = cpu.dec(x);
            assert_eq!(x.wrapping_sub(1), y);
            assert_eq!(y == 0, cpu.zf);
            assert!(cpu.nf);
            assert_eq!(x & 0x0F == 0x00, cpu.hf);
            assert_eq!(initial_carry, cpu.cf, "DEC must not touch carry");
        }
    }
}

#[test]
fn add_sub_flag_laws() {
    for a in 0..=255u32 {
        for x in [0u32, 1, 0x0F, 0x10, 0x7F, 0x80, 0xFF] {
            let mut cpu = Cpu::new();
            cpu.a = a as u8;
            cpu.add(x as u8);
            assert_eq!((a + x) as u8, cpu.a);
            assert_eq!((a + x) as u8 == 0, cpu.zf);
            assert!(!cpu.nf);
            assert_eq!((a & 0x0F) + (x & 0x0F) > 0x0F, cpu.hf);
            assert_eq!(a + x > 0xFF, cpu.cf);

            let mut cpu = Cpu::new();
            cpu.a = a as u8;
            cpu.sub(x as u8);
            assert_eq!((a as u8).wrapping_sub(x as u8), cpu.a);
            assert!(cpu.nf);
            assert_eq!(a & 0x0F < x & 0x0F, cpu.hf);
            assert_eq!(a < x, cpu.cf);
        }
    }
}

#[test]
fn adc_sbc_include_carry_in_half_carry() {
    for a in 0..=255u32 {
        for x in [0u32, 0x0F, 0x10, 0xFF] {
            for carry in [false, true] {
                let c = u32::from(carry);

                let mut cpu = Cpu::new();
                cpu.a = a as u8;
                cpu.cf = carry;
                cpu.adc(x as u8);
                assert_eq!((a + x + c) as u8, cpu.a);
                assert_eq!((a & 0x0F) + (x & 0x0F) + c > 0x0F, cpu.hf);
                assert_eq!(a + x + c > 0xFF, cpu.cf);

                let mut cpu = Cpu::new();
                cpu.a = a as u8;
                cpu.cf = carry;
                cpu.sbc(x as u8);
                assert_eq!((a as u8).wrapping_sub(x as u8).wrapping_sub(c as u8), cpu.a);
                assert_eq!(a & 0x0F < (x & 0x0F) + c, cpu.hf);
                assert_eq!(a < x + c, cpu.cf);
            }
        }
    }
}

#[test]
fn rotate_and_shift_laws() {
    for x in 0..=255u8 {
        let mut cpu = Cpu::new();
        assert_eq!(x.rotate_left(1), cpu.rlc(x));
        assert_eq!(x & 0x80 != 0, cpu.cf);

        assert_eq!(x.rotate_right(1), cpu.rrc(x));
        assert_eq!(x & 0x01 != 0, cpu.cf);

        cpu.cf = true;
        assert_eq!((x << 1) | 1, cpu.rl(x));
        assert_eq!(x & 0x80 != 0, cpu.cf);

        cpu.cf = true;
        assert_eq!((x >> 1) | 0x80, cpu.rr(x));
        assert_eq!(x & 0x01 != 0, cpu.cf);

        assert_eq!(x << 1, cpu.sla(x));
        assert_eq!(((x as i8) >> 1) as u8, cpu.sra(x));
        assert_eq!(x >> 1, cpu.srl(x));
        assert_eq!(x.rotate_left(4), cpu.swap(x));
        assert!(!cpu.cf, "SWAP clears carry");
    }
}

#[test]
fn rotates_of_a_force_z_clear() {
    // RLCA on zero would set Z if it were the CB form
    let mut bus = bus_with_program(&[0x07]);
    let mut cpu = Cpu::new();
    cpu.a = 0;
    cpu.step(&mut bus).unwrap();
    assert!(!cpu.zf);

    // CB RLC A computes Z from the result
    let mut bus = bus_with_program(&[0xCB, 0x07]);
    let mut cpu = Cpu::new();
    cpu.a = 0;
    cpu.step(&mut bus).unwrap();
    assert!(cpu.zf);
}

#[test]
fn bit_sets_z_from_tested_bit() {
    for n in 0..8u8 {
        for x in [0x00u8, 0xFF, 0xA5, 0x5A] {
            let mut cpu = Cpu::new();
            cpu.cf = true;
            cpu.bit(n, x);
            assert_eq!(x & (1 << n) == 0, cpu.zf);
            assert!(!cpu.nf);
            assert!(cpu.hf);
            assert!(cpu.cf, "BIT must not touch carry");
        }
    }
}

#[test]
fn add_hl_flags() {
    let mut cpu = Cpu::new();
    cpu.zf = true;
    let sum = cpu.add16(0x0FFF, 0x0001);
    assert_eq!(0x1000, sum);
    assert!(cpu.hf);
    assert!(!cpu.cf);
    assert!(cpu.zf, "ADD HL leaves Z unchanged");

    let sum = cpu.add16(0xFFFF, 0x0001);
    assert_eq!(0x0000, sum);
    assert!(cpu.hf);
    assert!(cpu.cf);
}

#[test]
fn add_sp_offset_flags_use_low_byte() {
    let mut cpu = Cpu::new();
    cpu.sp = 0x00FF;
    let sp = cpu.add_sp_offset(0x01);
    assert_eq!(0x0100, sp);
    assert!(cpu.hf);
    assert!(cpu.cf);
    assert!(!cpu.zf);

    let mut cpu = Cpu::new();
    cpu.sp = 0x0100;
    let sp = cpu.add_sp_offset(0xFF); // -1
    assert_eq!(0x00FF, sp);
    assert!(!cpu.hf);
    assert!(!cpu.cf);
}

//
// Opcode sweep: every defined opcode executes with its documented cost; the
// 11 undefined ones fail. -1 marks undefined entries.
//

#[rustfmt::skip]
static CYCLES_FLAGS_CLEAR: [i32; 256] = [
    // 0x00: conditionals on NZ/NC take the jump with flags clear
    1, 3, 2, 2, 1, 1, 2, 1, 5, 2, 2, 2, 1, 1, 2, 1,
    1, 3, 2, 2, 1, 1, 2, 1, 3, 2, 2, 2, 1, 1, 2, 1,
    3, 3, 2, 2, 1, 1, 2, 1, 2, 2, 2, 2, 1, 1, 2, 1,
    3, 3, 2, 2, 3, 3, 3, 1, 2, 2, 2, 2, 1, 1, 2, 1,
    // 0x40: loads
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1,
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1,
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1,
    2, 2, 2, 2, 2, 2, 1, 2, 1, 1, 1, 1, 1, 1, 2, 1,
    // 0x80: arithmetic
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1,
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1,
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1,
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1,
    // 0xC0: control flow and immediates (CB covered separately)
    5, 3, 4, 4, 6, 4, 2, 8, 2, 4, 3, 2, 3, 6, 2, 8,
    5, 3, 4, -1, 6, 4, 2, 8, 2, 4, 3, -1, 3, -1, 2, 8,
    3, 3, 2, -1, -1, 4, 2, 8, 4, 1, 4, -1, -1, -1, 2, 8,
    3, 3, 2, 1, -1, 4, 2, 8, 3, 2, 4, 1, -1, -1, 2, 8,
];

fn step_opcode(opcode: u8, set_flags: bool) -> Result<(u32, u16), CpuError> {
    let mut bus = bus_with_program(&[opcode]);
    let mut cpu = Cpu::new();
    cpu.set_flags(if set_flags { 0xF0 } else { 0x00 });
    let cycles = cpu.step(&mut bus)?;
    Ok((cycles, cpu.pc))
}

#[test]
fn opcode_cycle_costs_flags_clear() {
    for opcode in 0..=255u8 {
        let expected = CYCLES_FLAGS_CLEAR[usize::from(opcode)];
        if opcode == 0xCB {
            continue;
        }
        match step_opcode(opcode, false) {
            Ok((cycles, _)) => {
                assert_eq!(expected as u32, cycles, "opcode {opcode:02X}");
            }
            Err(CpuError::InvalidOpcode { opcode: bad, addr }) => {
                assert_eq!(-1, expected, "opcode {opcode:02X} should be defined");
                assert_eq!(opcode, bad);
                assert_eq!(0x0100, addr);
            }
        }
    }
}

#[test]
fn conditional_cycle_costs_flags_set() {
    for (opcode, expected) in [
        (0x20u8, 2u32), (0x28, 3), (0x30, 2), (0x38, 3),
        (0xC0, 2), (0xC8, 5), (0xC2, 3), (0xCA, 4), (0xC4, 3), (0xCC, 6),
        (0xD0, 2), (0xD8, 5), (0xD2, 3), (0xDA, 4), (0xD4, 3), (0xDC, 6),
    ] {
        let (cycles, _) = step_opcode(opcode, true).unwrap();
        assert_eq!(expected, cycles, "opcode {opcode:02X}");
    }
}

#[test]
fn cb_opcode_cycle_costs() {
    for cb in 0..=255u8 {
        let mut bus = bus_with_program(&[0xCB, cb]);
        let mut cpu = Cpu::new();
        let cycles = cpu.step(&mut bus).unwrap();
        let expected = if cb & 7 == 6 { 4 } else { 2 };
        assert_eq!(expected, cycles, "CB {cb:02X}");
        assert_eq!(0x0102, cpu.pc);
    }
}

#[test]
fn instruction_lengths_advance_pc() {
    // Register-to-register block is one byte
    for opcode in 0x40..=0xBFu8 {
        if opcode == 0x76 {
            continue;
        }
        let (_, pc) = step_opcode(opcode, false).unwrap();
        assert_eq!(0x0101, pc, "opcode {opcode:02X}");
    }

    // d8 operands
    for opcode in [0x06u8, 0x0E, 0x16, 0x1E, 0x26, 0x2E, 0x36, 0x3E,
                   0xC6, 0xCE, 0xD6, 0xDE, 0xE6, 0xEE, 0xF6, 0xFE, 0xE0, 0xF0] {
        let (_, pc) = step_opcode(opcode, false).unwrap();
        assert_eq!(0x0102, pc, "opcode {opcode:02X}");
    }

    // d16 operands
    for opcode in [0x01u8, 0x11, 0x21, 0x31, 0x08, 0xEA, 0xFA] {
        let (_, pc) = step_opcode(opcode, false).unwrap();
        assert_eq!(0x0103, pc, "opcode {opcode:02X}");
    }
}

#[test]
fn invalid_opcodes_error() {
    for opcode in [0xD3u8, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD] {
        let err = step_opcode(opcode, false).unwrap_err();
        assert_eq!(
            CpuError::InvalidOpcode {
                opcode,
                addr: 0x0100
            },
            err
        );
    }
}

#[test]
fn stack_round_trip() {
    // LD SP,FFF0h; LD BC,1234h; PUSH BC; POP DE
    let mut bus = bus_with_program(&[0x31, 0xF0, 0xFF, 0x01, 0x34, 0x12, 0xC5, 0xD1]);
    let mut cpu = Cpu::new();
    for _ in 0..4 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(0x1234, cpu.de());
    assert_eq!(0xFFF0, cpu.sp);
    assert_eq!(0xFFF0, cpu.stack_base);
}

#[test]
fn pop_af_keeps_flag_low_nibble_zero() {
    // LD SP,FFF0h; LD BC,12FFh; PUSH BC; POP AF
    let mut bus = bus_with_program(&[0x31, 0xF0, 0xFF, 0x01, 0xFF, 0x12, 0xC5, 0xF1]);
    let mut cpu = Cpu::new();
    for _ in 0..4 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(0x12F0, cpu.af());
}

#[test]
fn relative_jump_backwards() {
    // JR +2 over two NOPs, then JR -4 back onto them
    let mut bus = bus_with_program(&[0x18, 0x02, 0x00, 0x00, 0x18, 0xFA]);
    let mut cpu = Cpu::new();
    cpu.step(&mut bus).unwrap();
    assert_eq!(0x0104, cpu.pc);
    cpu.step(&mut bus).unwrap();
    assert_eq!(0x0102, cpu.pc);
}

#[test]
fn call_and_ret() {
    // CALL 0150h ... at 0150h: RET
    let mut program = vec![0x00; 0x60];
    program[0..3].copy_from_slice(&[0xCD, 0x50, 0x01]);
    program[0x50] = 0xC9;
    let mut bus = bus_with_program(&program);
    let mut cpu = Cpu::new();

    assert_eq!(6, cpu.step(&mut bus).unwrap());
    assert_eq!(0x0150, cpu.pc);
    assert_eq!(0xFFFC, cpu.sp);

    assert_eq!(4, cpu.step(&mut bus).unwrap());
    assert_eq!(0x0103, cpu.pc);
    assert_eq!(0xFFFE, cpu.sp);
}

#[test]
fn frame_of_emulation_raises_vblank() {
    // JR -2: spin in place while the peripherals run
    let mut bus = bus_with_program(&[0x18, 0xFE]);
    let mut cpu = Cpu::new();

    let mut total = 0u32;
    while !bus.ppu.take_frame() {
        let mut cycles = 0;
        while cycles < 10 {
            cycles += cpu.step(&mut bus).unwrap();
        }
        bus.update_timers(cycles);
        bus.step_peripherals(cycles);
        total += cycles;
        assert!(total < 2 * crate::ppu::FRAME_CYCLES, "no frame published");
    }

    assert_ne!(0, bus.read_port(port::IF) & 0x01);
    assert!(bus.read_port(port::LY) >= 144);
    // DIV has been ticking at one increment per 64 machine cycles
    assert_ne!(0, bus.read_port(port::DIV));
}

#[test]
fn ei_reenables_interrupt_dispatch() {
    // DI; EI; NOP with an interrupt pending
    let mut bus = bus_with_program(&[0xF3, 0xFB, 0x00]);
    let mut cpu = Cpu::new();
    bus.write8(0xFFFF, 0x04);
    bus.write_port(port::IF, 0x04);
    cpu.ime = false;

    cpu.step(&mut bus).unwrap(); // DI
    cpu.step(&mut bus).unwrap(); // EI
    assert!(cpu.ime);

    assert_eq!(8, cpu.step(&mut bus).unwrap());
    assert_eq!(0x0050, cpu.pc);
}
