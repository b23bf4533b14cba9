//! The diagnostic dump written when the CPU hits a fatal condition: last
//! instruction, register snapshot, a walk of the stack, and an annotated
//! memory dump.

use crate::bus::Bus;
use crate::cpu::{disasm, Cpu};
use std::io::{self, Write};

pub fn dump<W: Write>(w: &mut W, cpu: &Cpu, bus: &Bus) -> io::Result<()> {
    writeln!(
        w,
        "LAST INSTRUCTION\n{:04X}\t{}\n",
        cpu.last_addr,
        disasm::disassemble(bus, cpu.last_addr)
    )?;
    writeln!(w, "CPU STATE\n{cpu}\n")?;
    dump_stack(w, cpu, bus)?;
    dump_memory(w, bus)
}

/// Walk the stack from the recorded base down to SP, flagging the entry SP
/// points at.
fn dump_stack<W: Write>(w: &mut W, cpu: &Cpu, bus: &Bus) -> io::Result<()> {
    writeln!(w, "STACK ┬  {:04X}", cpu.stack_base)?;
    if cpu.stack_base == cpu.sp {
        writeln!(w, "      ┴  (empty)")?;
    }

    let mut addr = cpu.stack_base.wrapping_sub(2);
    while addr >= cpu.sp && addr < cpu.stack_base {
        if addr == cpu.sp {
            write!(w, "   SP ╰→ ")?;
        } else {
            write!(w, "      │  ")?;
        }
        writeln!(w, "{addr:04X} {:04X}h", bus.read16(addr))?;
        addr = addr.wrapping_sub(2);
    }
    writeln!(w)
}

fn dump_memory<W: Write>(w: &mut W, bus: &Bus) -> io::Result<()> {
    writeln!(
        w,
        "MEMORY DUMP ---- ROM BANK: {} -- ERAM BANK: {}",
        bus.rom_bank(),
        bus.eram_bank()
    )?;

    for row in 0..0x1000u32 {
        let base = (row * 16) as u16;
        write!(w, "{base:04x}  ")?;
        for offset in 0..16 {
            write!(w, "{:02x} ", bus.read8(base + offset))?;
            if offset == 7 {
                write!(w, " ")?;
            }
        }
        write!(w, " |")?;
        for offset in 0..16 {
            let byte = bus.read8(base + offset);
            if (0x20..0x7F).contains(&byte) {
                write!(w, "{}", byte as char)?;
            } else {
                write!(w, ".")?;
            }
        }
        writeln!(w, "|")?;
    }
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apu::Apu;
    use crate::rom::{tests::build_rom, RomImage};

    #[test]
    fn dump_covers_all_sections() {
        let rom = RomImage::new(build_rom(0x00, 0x00)).unwrap();
        let mut bus = Bus::new(rom, Apu::new(48000)).unwrap();
        let mut cpu = Cpu::new();
        cpu.push16(&mut bus, 0x1234);

        let mut out = Vec::new();
        dump(&mut out, &cpu, &bus).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("LAST INSTRUCTION"));
        assert!(text.contains("CPU STATE"));
        assert!(text.contains("STACK"));
        assert!(text.contains("1234h"));
        assert!(text.contains("MEMORY DUMP ---- ROM BANK: 1"));
    }

    #[test]
    fn disassembles_immediates() {
        let mut data = build_rom(0x00, 0x00);
        data[0x0100] = 0x3E; // LD A,d8
        data[0x0101] = 0x42;
        data[0x0102] = 0xC3; // JP a16
        data[0x0103] = 0x50;
        data[0x0104] = 0x01;
        data[0x0105] = 0xCB;
        data[0x0106] = 0x7E; // BIT 7,(HL)
        let rom = RomImage::new(data).unwrap();
        let bus = Bus::new(rom, Apu::new(48000)).unwrap();

        assert_eq!("LD A,42h", disasm::disassemble(&bus, 0x0100));
        assert_eq!("JP 0150h", disasm::disassemble(&bus, 0x0102));
        assert_eq!("BIT 7,(HL)", disasm::disassemble(&bus, 0x0105));
    }
}
