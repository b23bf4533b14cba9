//! Mnemonic decoding for the diagnostic dump. Templates carry `%b`, `%w`
//! and `%r` markers for 8-bit, 16-bit and signed-relative operands.

use crate::bus::Bus;

static MNEMONICS: [&str; 256] = [
    // 0x00
    "NOP", "LD BC,%w", "LD (BC),A", "INC BC", "INC B", "DEC B", "LD B,%b", "RLCA",
    "LD (%w),SP", "ADD HL,BC", "LD A,(BC)", "DEC BC", "INC C", "DEC C", "LD C,%b", "RRCA",
    // 0x10
    "STOP", "LD DE,%w", "LD (DE),A", "INC DE", "INC D", "DEC D", "LD D,%b", "RLA",
    "JR %r", "ADD HL,DE", "LD A,(DE)", "DEC DE", "INC E", "DEC E", "LD E,%b", "RRA",
    // 0x20
    "JR NZ,%r", "LD HL,%w", "LD (HL+),A", "INC HL", "INC H", "DEC H", "LD H,%b", "DAA",
    "JR Z,%r", "ADD HL,HL", "LD A,(HL+)", "DEC HL", "INC L", "DEC L", "LD L,%b", "CPL",
    // 0x30
    "JR NC,%r", "LD SP,%w", "LD (HL-),A", "INC SP", "INC (HL)", "DEC (HL)", "LD (HL),%b",
    "SCF", "JR C,%r", "ADD HL,SP", "LD A,(HL-)", "DEC SP", "INC A", "DEC A", "LD A,%b", "CCF",
    // 0x40
    "LD B,B", "LD B,C", "LD B,D", "LD B,E", "LD B,H", "LD B,L", "LD B,(HL)", "LD B,A",
    "LD C,B", "LD C,C", "LD C,D", "LD C,E", "LD C,H", "LD C,L", "LD C,(HL)", "LD C,A",
    // 0x50
    "LD D,B", "LD D,C", "LD D,D", "LD D,E", "LD D,H", "LD D,L", "LD D,(HL)", "LD D,A",
    "LD E,B", "LD E,C", "LD E,D", "LD E,E", "LD E,H", "LD E,L", "LD E,(HL)", "LD E,A",
    // 0x60
    "LD H,B", "LD H,C", "LD H,D", "LD H,E", "LD H,H", "LD H,L", "LD H,(HL)", "LD H,A",
    "LD L,B", "LD L,C", "LD L,D", "LD L,E", "LD L,H", "LD L,L", "LD L,(HL)", "LD L,A",
    // 0x70
    "LD (HL),B", "LD (HL),C", "LD (HL),D", "LD (HL),E", "LD (HL),H", "LD (HL),L", "HALT",
    "LD (HL),A", "LD A,B", "LD A,C", "LD A,D", "LD A,E", "LD A,H", "LD A,L", "LD A,(HL)",
    "LD A,A",
    // 0x80
    "ADD A,B", "ADD A,C", "ADD A,D", "ADD A,E", "ADD A,H", "ADD A,L", "ADD A,(HL)", "ADD A,A",
    "ADC A,B", "ADC A,C", "ADC A,D", "ADC A,E", "ADC A,H", "ADC A,L", "ADC A,(HL)", "ADC A,A",
    // 0x90
    "SUB B", "SUB C", "SUB D", "SUB E", "SUB H", "SUB L", "SUB (HL)", "SUB A",
    "SBC B", "SBC C", "SBC D", "SBC E", "SBC H", "SBC L", "SBC (HL)", "SBC A",
    // 0xA0
    "AND B", "AND C", "AND D", "AND E", "AND H", "AND L", "AND (HL)", "AND A",
    "XOR B", "XOR C", "XOR D", "XOR E", "XOR H", "XOR L", "XOR (HL)", "XOR A",
    // 0xB0
    "OR B", "OR C", "OR D", "OR E", "OR H", "OR L", "OR (HL)", "OR A",
    "CP B", "CP C", "CP D", "CP E", "CP H", "CP L", "CP (HL)", "CP A",
    // 0xC0
    "RET NZ", "POP BC", "JP NZ,%w", "JP %w", "CALL NZ,%w", "PUSH BC", "ADD A,%b", "RST 00h",
    "RET Z", "RET", "JP Z,%w", "", "CALL Z,%w", "CALL %w", "ADC A,%b", "RST 08h",
    // 0xD0
    "RET NC", "POP DE", "JP NC,%w", "", "CALL NC,%w", "PUSH DE", "SUB %b", "RST 10h",
    "RET C", "RETI", "JP C,%w", "", "CALL C,%w", "", "SBC %b", "RST 18h",
    // 0xE0
    "LDH (%b),A", "POP HL", "LD (C),A", "", "", "PUSH HL", "AND %b", "RST 20h",
    "ADD SP,%r", "JP (HL)", "LD (%w),A", "", "", "", "XOR %b", "RST 28h",
    // 0xF0
    "LDH A,(%b)", "POP AF", "LD A,(C)", "DI", "", "PUSH AF", "OR %b", "RST 30h",
    "LD HL,SP%r", "LD SP,HL", "LD A,(%w)", "EI", "", "", "CP %b", "RST 38h",
];

static CB_REGS: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
static CB_SHIFTS: [&str; 8] = ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SWAP", "SRL"];

/// Decode the instruction at `addr` into its mnemonic.
pub fn disassemble(bus: &Bus, addr: u16) -> String {
    let opcode = bus.read8(addr);

    if opcode == 0xCB {
        return disassemble_cb(bus.read8(addr.wrapping_add(1)));
    }

    let template = MNEMONICS[usize::from(opcode)];
    if template.is_empty() {
        return format!("{opcode:02X}h");
    }

    let imm8 = bus.read8(addr.wrapping_add(1));
    if let Some(idx) = template.find("%w") {
        let imm16 = bus.read16(addr.wrapping_add(1));
        return format!("{}{imm16:04X}h{}", &template[..idx], &template[idx + 2..]);
    }
    if let Some(idx) = template.find("%b") {
        return format!("{}{imm8:02X}h{}", &template[..idx], &template[idx + 2..]);
    }
    if let Some(idx) = template.find("%r") {
        let rel = imm8 as i8;
        return format!("{}{rel:+}{}", &template[..idx], &template[idx + 2..]);
    }

    template.into()
}

fn disassemble_cb(opcode: u8) -> String {
    let reg = CB_REGS[usize::from(opcode & 7)];
    let n = (opcode >> 3) & 7;
    match opcode >> 6 {
        0 => format!("{} {reg}", CB_SHIFTS[usize::from(n)]),
        1 => format!("BIT {n},{reg}"),
        2 => format!("RES {n},{reg}"),
        _ => format!("SET {n},{reg}"),
    }
}
