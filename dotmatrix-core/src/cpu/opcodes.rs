//! The two 256-entry dispatch tables. Entries are named handler functions
//! returning their cost in machine cycles; the base table holds `None` for
//! the 11 undefined opcodes. The repetitive register matrices are stamped
//! out with macros.

use crate::bus::Bus;
use crate::cpu::Cpu;

pub(super) type OpFn = fn(&mut Cpu, &mut Bus) -> u32;

//
// 8-bit loads
//

macro_rules! ld_r_r {
    ($($name:ident: $dst:ident, $src:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
            cpu.$dst = cpu.$src;
            1
        }
    )*};
}

macro_rules! ld_r_mhl {
    ($($name:ident: $dst:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
            cpu.$dst = bus.read8(cpu.hl());
            2
        }
    )*};
}

macro_rules! ld_mhl_r {
    ($($name:ident: $src:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
            bus.write8(cpu.hl(), cpu.$src);
            2
        }
    )*};
}

macro_rules! ld_r_d8 {
    ($($name:ident: $dst:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
            cpu.$dst = cpu.fetch8(bus);
            2
        }
    )*};
}

ld_r_r! {
    ld_b_c: b, c; ld_b_d: b, d; ld_b_e: b, e; ld_b_h: b, h; ld_b_l: b, l; ld_b_a: b, a;
    ld_c_b: c, b; ld_c_d: c, d; ld_c_e: c, e; ld_c_h: c, h; ld_c_l: c, l; ld_c_a: c, a;
    ld_d_b: d, b; ld_d_c: d, c; ld_d_e: d, e; ld_d_h: d, h; ld_d_l: d, l; ld_d_a: d, a;
    ld_e_b: e, b; ld_e_c: e, c; ld_e_d: e, d; ld_e_h: e, h; ld_e_l: e, l; ld_e_a: e, a;
    ld_h_b: h, b; ld_h_c: h, c; ld_h_d: h, d; ld_h_e: h, e; ld_h_l: h, l; ld_h_a: h, a;
    ld_l_b: l, b; ld_l_c: l, c; ld_l_d: l, d; ld_l_e: l, e; ld_l_h: l, h; ld_l_a: l, a;
    ld_a_b: a, b; ld_a_c: a, c; ld_a_d: a, d; ld_a_e: a, e; ld_a_h: a, h; ld_a_l: a, l;
}

// LD r,r with identical source and destination is a register-file no-op
fn ld_same(_cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    1
}

ld_r_mhl! {
    ld_b_mhl: b; ld_c_mhl: c; ld_d_mhl: d; ld_e_mhl: e;
    ld_h_mhl: h; ld_l_mhl: l; ld_a_mhl: a;
}

ld_mhl_r! {
    ld_mhl_b: b; ld_mhl_c: c; ld_mhl_d: d; ld_mhl_e: e;
    ld_mhl_h: h; ld_mhl_l: l; ld_mhl_a: a;
}

ld_r_d8! {
    ld_b_d8: b; ld_c_d8: c; ld_d_d8: d; ld_e_d8: e;
    ld_h_d8: h; ld_l_d8: l; ld_a_d8: a;
}

fn ld_mhl_d8(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let value = cpu.fetch8(bus);
    bus.write8(cpu.hl(), value);
    3
}

fn ld_mbc_a(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    bus.write8(cpu.bc(), cpu.a);
    2
}

fn ld_mde_a(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    bus.write8(cpu.de(), cpu.a);
    2
}

fn ld_a_mbc(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.a = bus.read8(cpu.bc());
    2
}

fn ld_a_mde(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.a = bus.read8(cpu.de());
    2
}

fn ld_mhli_a(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let hl = cpu.hl();
    bus.write8(hl, cpu.a);
    cpu.set_hl(hl.wrapping_add(1));
    2
}

fn ld_mhld_a(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let hl = cpu.hl();
    bus.write8(hl, cpu.a);
    cpu.set_hl(hl.wrapping_sub(1));
    2
}

fn ld_a_mhli(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let hl = cpu.hl();
    cpu.a = bus.read8(hl);
    cpu.set_hl(hl.wrapping_add(1));
    2
}

fn ld_a_mhld(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let hl = cpu.hl();
    cpu.a = bus.read8(hl);
    cpu.set_hl(hl.wrapping_sub(1));
    2
}

fn ldh_a8_a(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch8(bus);
    bus.write8(0xFF00 | u16::from(offset), cpu.a);
    3
}

fn ldh_a_a8(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch8(bus);
    cpu.a = bus.read8(0xFF00 | u16::from(offset));
    3
}

fn ld_mc_a(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    bus.write8(0xFF00 | u16::from(cpu.c), cpu.a);
    2
}

fn ld_a_mc(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.a = bus.read8(0xFF00 | u16::from(cpu.c));
    2
}

fn ld_a16_a(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let addr = cpu.fetch16(bus);
    bus.write8(addr, cpu.a);
    4
}

fn ld_a_a16(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let addr = cpu.fetch16(bus);
    cpu.a = bus.read8(addr);
    4
}

//
// 16-bit loads and stack ops
//

fn ld_bc_d16(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let value = cpu.fetch16(bus);
    cpu.set_bc(value);
    3
}

fn ld_de_d16(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let value = cpu.fetch16(bus);
    cpu.set_de(value);
    3
}

fn ld_hl_d16(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let value = cpu.fetch16(bus);
    cpu.set_hl(value);
    3
}

fn ld_sp_d16(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.sp = cpu.fetch16(bus);
    cpu.stack_base = cpu.sp;
    3
}

fn ld_a16_sp(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let addr = cpu.fetch16(bus);
    bus.write16(addr, cpu.sp);
    5
}

fn ld_sp_hl(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    cpu.sp = cpu.hl();
    cpu.stack_base = cpu.sp;
    2
}

fn ld_hl_sp_r8(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch8(bus);
    let value = cpu.add_sp_offset(offset);
    cpu.set_hl(value);
    3
}

fn push_bc(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.push16(bus, cpu.bc());
    4
}

fn push_de(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.push16(bus, cpu.de());
    4
}

fn push_hl(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.push16(bus, cpu.hl());
    4
}

fn push_af(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.push16(bus, cpu.af());
    4
}

fn pop_bc(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let value = cpu.pop16(bus);
    cpu.set_bc(value);
    3
}

fn pop_de(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let value = cpu.pop16(bus);
    cpu.set_de(value);
    3
}

fn pop_hl(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let value = cpu.pop16(bus);
    cpu.set_hl(value);
    3
}

fn pop_af(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let value = cpu.pop16(bus);
    cpu.set_af(value);
    3
}

//
// 8-bit arithmetic and logic
//

macro_rules! alu_r {
    ($($name:ident: $op:ident, $src:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
            let x = cpu.$src;
            cpu.$op(x);
            1
        }
    )*};
}

macro_rules! alu_mhl {
    ($($name:ident: $op:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
            let x = bus.read8(cpu.hl());
            cpu.$op(x);
            2
        }
    )*};
}

macro_rules! alu_d8 {
    ($($name:ident: $op:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
            let x = cpu.fetch8(bus);
            cpu.$op(x);
            2
        }
    )*};
}

alu_r! {
    add_a_b: add, b; add_a_c: add, c; add_a_d: add, d; add_a_e: add, e;
    add_a_h: add, h; add_a_l: add, l; add_a_a: add, a;
    adc_a_b: adc, b; adc_a_c: adc, c; adc_a_d: adc, d; adc_a_e: adc, e;
    adc_a_h: adc, h; adc_a_l: adc, l; adc_a_a: adc, a;
    sub_b: sub, b; sub_c: sub, c; sub_d: sub, d; sub_e: sub, e;
    sub_h: sub, h; sub_l: sub, l; sub_a: sub, a;
    sbc_b: sbc, b; sbc_c: sbc, c; sbc_d: sbc, d; sbc_e: sbc, e;
    sbc_h: sbc, h; sbc_l: sbc, l; sbc_a: sbc, a;
    and_b: and, b; and_c: and, c; and_d: and, d; and_e: and, e;
    and_h: and, h; and_l: and, l; and_a: and, a;
    xor_b: xor, b; xor_c: xor, c; xor_d: xor, d; xor_e: xor, e;
    xor_h: xor, h; xor_l: xor, l; xor_a: xor, a;
    or_b: or, b; or_c: or, c; or_d: or, d; or_e: or, e;
    or_h: or, h; or_l: or, l; or_a: or, a;
    cp_b: cp, b; cp_c: cp, c; cp_d: cp, d; cp_e: cp, e;
    cp_h: cp, h; cp_l: cp, l; cp_a: cp, a;
}

alu_mhl! {
    add_a_mhl: add; adc_a_mhl: adc; sub_mhl: sub; sbc_mhl: sbc;
    and_mhl: and; xor_mhl: xor; or_mhl: or; cp_mhl: cp;
}

alu_d8! {
    add_a_d8: add; adc_a_d8: adc; sub_d8: sub; sbc_d8: sbc;
    and_d8: and; xor_d8: xor; or_d8: or; cp_d8: cp;
}

macro_rules! inc_dec_r {
    ($($name:ident: $op:ident, $reg:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
            let x = cpu.$reg;
            cpu.$reg = cpu.$op(x);
            1
        }
    )*};
}

inc_dec_r! {
    inc_b: inc, b; inc_c: inc, c; inc_d: inc, d; inc_e: inc, e;
    inc_h: inc, h; inc_l: inc, l; inc_a: inc, a;
    dec_b: dec, b; dec_c: dec, c; dec_d: dec, d; dec_e: dec, e;
    dec_h: dec, h; dec_l: dec, l; dec_a: dec, a;
}

fn inc_mhl(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let hl = cpu.hl();
    let x = bus.read8(hl);
    let y = cpu.inc(x);
    bus.write8(hl, y);
    3
}

fn dec_mhl(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let hl = cpu.hl();
    let x = bus.read8(hl);
    let y = cpu.dec(x);
    bus.write8(hl, y);
    3
}

//
// 16-bit arithmetic
//

macro_rules! inc_dec_rr {
    ($($name:ident: $get:ident, $set:ident, $delta:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
            let x = cpu.$get().$delta(1);
            cpu.$set(x);
            2
        }
    )*};
}

inc_dec_rr! {
    inc_bc: bc, set_bc, wrapping_add; inc_de: de, set_de, wrapping_add;
    inc_hl: hl, set_hl, wrapping_add;
    dec_bc: bc, set_bc, wrapping_sub; dec_de: de, set_de, wrapping_sub;
    dec_hl: hl, set_hl, wrapping_sub;
}

fn inc_sp(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    cpu.sp = cpu.sp.wrapping_add(1);
    2
}

fn dec_sp(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    cpu.sp = cpu.sp.wrapping_sub(1);
    2
}

macro_rules! add_hl_rr {
    ($($name:ident: $get:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
            let sum = cpu.add16(cpu.hl(), cpu.$get());
            cpu.set_hl(sum);
            2
        }
    )*};
}

add_hl_rr! {
    add_hl_bc: bc; add_hl_de: de; add_hl_hl: hl;
}

fn add_hl_sp(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    let sum = cpu.add16(cpu.hl(), cpu.sp);
    cpu.set_hl(sum);
    2
}

fn add_sp_r8(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch8(bus);
    cpu.sp = cpu.add_sp_offset(offset);
    4
}

//
// Rotates on A and flag ops
//

fn rlca(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    let x = cpu.a;
    cpu.a = cpu.rlc(x);
    cpu.zf = false;
    1
}

fn rrca(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    let x = cpu.a;
    cpu.a = cpu.rrc(x);
    cpu.zf = false;
    1
}

fn rla(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    let x = cpu.a;
    cpu.a = cpu.rl(x);
    cpu.zf = false;
    1
}

fn rra(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    let x = cpu.a;
    cpu.a = cpu.rr(x);
    cpu.zf = false;
    1
}

fn daa(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    if cpu.nf {
        cpu.das();
    } else {
        cpu.daa();
    }
    1
}

fn cpl(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    cpu.a = !cpu.a;
    cpu.nf = true;
    cpu.hf = true;
    1
}

fn scf(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    cpu.nf = false;
    cpu.hf = false;
    cpu.cf = true;
    1
}

fn ccf(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    cpu.nf = false;
    cpu.hf = false;
    cpu.cf = !cpu.cf;
    1
}

//
// Control flow
//

fn jr_r8(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.jr(bus, true)
}

fn jr_nz(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = !cpu.zf;
    cpu.jr(bus, jump)
}

fn jr_z(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = cpu.zf;
    cpu.jr(bus, jump)
}

fn jr_nc(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = !cpu.cf;
    cpu.jr(bus, jump)
}

fn jr_c(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = cpu.cf;
    cpu.jr(bus, jump)
}

fn jp_a16(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.jp(bus, true)
}

fn jp_nz(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = !cpu.zf;
    cpu.jp(bus, jump)
}

fn jp_z(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = cpu.zf;
    cpu.jp(bus, jump)
}

fn jp_nc(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = !cpu.cf;
    cpu.jp(bus, jump)
}

fn jp_c(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = cpu.cf;
    cpu.jp(bus, jump)
}

fn jp_mhl(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    cpu.pc = cpu.hl();
    1
}

fn call_a16(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.call(bus, true)
}

fn call_nz(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = !cpu.zf;
    cpu.call(bus, jump)
}

fn call_z(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = cpu.zf;
    cpu.call(bus, jump)
}

fn call_nc(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = !cpu.cf;
    cpu.call(bus, jump)
}

fn call_c(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = cpu.cf;
    cpu.call(bus, jump)
}

fn ret(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.pc = cpu.pop16(bus);
    4
}

fn ret_nz(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = !cpu.zf;
    cpu.ret_cond(bus, jump)
}

fn ret_z(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = cpu.zf;
    cpu.ret_cond(bus, jump)
}

fn ret_nc(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = !cpu.cf;
    cpu.ret_cond(bus, jump)
}

fn ret_c(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let jump = cpu.cf;
    cpu.ret_cond(bus, jump)
}

fn reti(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.ime = true;
    cpu.pc = cpu.pop16(bus);
    4
}

macro_rules! rst_op {
    ($($name:ident: $vector:literal;)*) => {$(
        fn $name(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
            cpu.rst(bus, $vector)
        }
    )*};
}

rst_op! {
    rst_00: 0x00; rst_08: 0x08; rst_10: 0x10; rst_18: 0x18;
    rst_20: 0x20; rst_28: 0x28; rst_30: 0x30; rst_38: 0x38;
}

//
// Misc
//

fn nop(_cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    1
}

fn halt(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    cpu.halted = true;
    1
}

fn stop(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    cpu.stopped = true;
    1
}

fn di(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    cpu.ime = false;
    1
}

fn ei(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
    cpu.ime = true;
    1
}

fn prefix_cb(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    let opcode = cpu.fetch8(bus);
    CB[usize::from(opcode)](cpu, bus)
}

pub(super) static BASE: [Option<OpFn>; 256] = [
    // 0x00 - 0x0F
    Some(nop), Some(ld_bc_d16), Some(ld_mbc_a), Some(inc_bc),
    Some(inc_b), Some(dec_b), Some(ld_b_d8), Some(rlca),
    Some(ld_a16_sp), Some(add_hl_bc), Some(ld_a_mbc), Some(dec_bc),
    Some(inc_c), Some(dec_c), Some(ld_c_d8), Some(rrca),
    // 0x10 - 0x1F
    Some(stop), Some(ld_de_d16), Some(ld_mde_a), Some(inc_de),
    Some(inc_d), Some(dec_d), Some(ld_d_d8), Some(rla),
    Some(jr_r8), Some(add_hl_de), Some(ld_a_mde), Some(dec_de),
    Some(inc_e), Some(dec_e), Some(ld_e_d8), Some(rra),
    // 0x20 - 0x2F
    Some(jr_nz), Some(ld_hl_d16), Some(ld_mhli_a), Some(inc_hl),
    Some(inc_h), Some(dec_h), Some(ld_h_d8), Some(daa),
    Some(jr_z), Some(add_hl_hl), Some(ld_a_mhli), Some(dec_hl),
    Some(inc_l), Some(dec_l), Some(ld_l_d8), Some(cpl),
    // 0x30 - 0x3F
    Some(jr_nc), Some(ld_sp_d16), Some(ld_mhld_a), Some(inc_sp),
    Some(inc_mhl), Some(dec_mhl), Some(ld_mhl_d8), Some(scf),
    Some(jr_c), Some(add_hl_sp), Some(ld_a_mhld), Some(dec_sp),
    Some(inc_a), Some(dec_a), Some(ld_a_d8), Some(ccf),
    // 0x40 - 0x4F
    Some(ld_same), Some(ld_b_c), Some(ld_b_d), Some(ld_b_e),
    Some(ld_b_h), Some(ld_b_l), Some(ld_b_mhl), Some(ld_b_a),
    Some(ld_c_b), Some(ld_same), Some(ld_c_d), Some(ld_c_e),
    Some(ld_c_h), Some(ld_c_l), Some(ld_c_mhl), Some(ld_c_a),
    // 0x50 - 0x5F
    Some(ld_d_b), Some(ld_d_c), Some(ld_same), Some(ld_d_e),
    Some(ld_d_h), Some(ld_d_l), Some(ld_d_mhl), Some(ld_d_a),
    Some(ld_e_b), Some(ld_e_c), Some(ld_e_d), Some(ld_same),
    Some(ld_e_h), Some(ld_e_l), Some(ld_e_mhl), Some(ld_e_a),
    // 0x60 - 0x6F
    Some(ld_h_b), Some(ld_h_c), Some(ld_h_d), Some(ld_h_e),
    Some(ld_same), Some(ld_h_l), Some(ld_h_mhl), Some(ld_h_a),
    Some(ld_l_b), Some(ld_l_c), Some(ld_l_d), Some(ld_l_e),
    Some(ld_l_h), Some(ld_same), Some(ld_l_mhl), Some(ld_l_a),
    // 0x70 - 0x7F
    Some(ld_mhl_b), Some(ld_mhl_c), Some(ld_mhl_d), Some(ld_mhl_e),
    Some(ld_mhl_h), Some(ld_mhl_l), Some(halt), Some(ld_mhl_a),
    Some(ld_a_b), Some(ld_a_c), Some(ld_a_d), Some(ld_a_e),
    Some(ld_a_h), Some(ld_a_l), Some(ld_a_mhl), Some(ld_same),
    // 0x80 - 0x8F
    Some(add_a_b), Some(add_a_c), Some(add_a_d), Some(add_a_e),
    Some(add_a_h), Some(add_a_l), Some(add_a_mhl), Some(add_a_a),
    Some(adc_a_b), Some(adc_a_c), Some(adc_a_d), Some(adc_a_e),
    Some(adc_a_h), Some(adc_a_l), Some(adc_a_mhl), Some(adc_a_a),
    // 0x90 - 0x9F
    Some(sub_b), Some(sub_c), Some(sub_d), Some(sub_e),
    Some(sub_h), Some(sub_l), Some(sub_mhl), Some(sub_a),
    Some(sbc_b), Some(sbc_c), Some(sbc_d), Some(sbc_e),
    Some(sbc_h), Some(sbc_l), Some(sbc_mhl), Some(sbc_a),
    // 0xA0 - 0xAF
    Some(and_b), Some(and_c), Some(and_d), Some(and_e),
    Some(and_h), Some(and_l), Some(and_mhl), Some(and_a),
    Some(xor_b), Some(xor_c), Some(xor_d), Some(xor_e),
    Some(xor_h), Some(xor_l), Some(xor_mhl), Some(xor_a),
    // 0xB0 - 0xBF
    Some(or_b), Some(or_c), Some(or_d), Some(or_e),
    Some(or_h), Some(or_l), Some(or_mhl), Some(or_a),
    Some(cp_b), Some(cp_c), Some(cp_d), Some(cp_e),
    Some(cp_h), Some(cp_l), Some(cp_mhl), Some(cp_a),
    // 0xC0 - 0xCF
    Some(ret_nz), Some(pop_bc), Some(jp_nz), Some(jp_a16),
    Some(call_nz), Some(push_bc), Some(add_a_d8), Some(rst_00),
    Some(ret_z), Some(ret), Some(jp_z), Some(prefix_cb),
    Some(call_z), Some(call_a16), Some(adc_a_d8), Some(rst_08),
    // 0xD0 - 0xDF
    Some(ret_nc), Some(pop_de), Some(jp_nc), None,
    Some(call_nc), Some(push_de), Some(sub_d8), Some(rst_10),
    Some(ret_c), Some(reti), Some(jp_c), None,
    Some(call_c), None, Some(sbc_d8), Some(rst_18),
    // 0xE0 - 0xEF
    Some(ldh_a8_a), Some(pop_hl), Some(ld_mc_a), None,
    None, Some(push_hl), Some(and_d8), Some(rst_20),
    Some(add_sp_r8), Some(jp_mhl), Some(ld_a16_a), None,
    None, None, Some(xor_d8), Some(rst_28),
    // 0xF0 - 0xFF
    Some(ldh_a_a8), Some(pop_af), Some(ld_a_mc), Some(di),
    None, Some(push_af), Some(or_d8), Some(rst_30),
    Some(ld_hl_sp_r8), Some(ld_sp_hl), Some(ld_a_a16), Some(ei),
    None, None, Some(cp_d8), Some(rst_38),
];

//
// CB-prefixed table: bits 7-6 select shift/BIT/RES/SET, bits 5-3 the
// operation or bit index, bits 2-0 the register ((HL) is memory).
//

macro_rules! cb_shift_r {
    ($($name:ident: $op:ident, $reg:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
            let x = cpu.$reg;
            cpu.$reg = cpu.$op(x);
            2
        }
    )*};
}

macro_rules! cb_shift_mhl {
    ($($name:ident: $op:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
            let hl = cpu.hl();
            let x = bus.read8(hl);
            let y = cpu.$op(x);
            bus.write8(hl, y);
            4
        }
    )*};
}

macro_rules! cb_bit_r {
    ($($name:ident: $n:literal, $reg:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
            let x = cpu.$reg;
            cpu.bit($n, x);
            2
        }
    )*};
}

macro_rules! cb_bit_mhl {
    ($($name:ident: $n:literal;)*) => {$(
        fn $name(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
            let x = bus.read8(cpu.hl());
            cpu.bit($n, x);
            4
        }
    )*};
}

macro_rules! cb_res_r {
    ($($name:ident: $n:literal, $reg:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
            cpu.$reg &= !(1 << $n);
            2
        }
    )*};
}

macro_rules! cb_res_mhl {
    ($($name:ident: $n:literal;)*) => {$(
        fn $name(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
            let hl = cpu.hl();
            let x = bus.read8(hl);
            bus.write8(hl, x & !(1 << $n));
            4
        }
    )*};
}

macro_rules! cb_set_r {
    ($($name:ident: $n:literal, $reg:ident;)*) => {$(
        fn $name(cpu: &mut Cpu, _bus: &mut Bus) -> u32 {
            cpu.$reg |= 1 << $n;
            2
        }
    )*};
}

macro_rules! cb_set_mhl {
    ($($name:ident: $n:literal;)*) => {$(
        fn $name(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
            let hl = cpu.hl();
            let x = bus.read8(hl);
            bus.write8(hl, x | (1 << $n));
            4
        }
    )*};
}

cb_shift_r! {
    rlc_b: rlc, b; rlc_c: rlc, c; rlc_d: rlc, d; rlc_e: rlc, e;
    rlc_h: rlc, h; rlc_l: rlc, l; rlc_a: rlc, a;
    rrc_b: rrc, b; rrc_c: rrc, c; rrc_d: rrc, d; rrc_e: rrc, e;
    rrc_h: rrc, h; rrc_l: rrc, l; rrc_a: rrc, a;
    rl_b: rl, b; rl_c: rl, c; rl_d: rl, d; rl_e: rl, e;
    rl_h: rl, h; rl_l: rl, l; rl_a: rl, a;
    rr_b: rr, b; rr_c: rr, c; rr_d: rr, d; rr_e: rr, e;
    rr_h: rr, h; rr_l: rr, l; rr_a: rr, a;
    sla_b: sla, b; sla_c: sla, c; sla_d: sla, d; sla_e: sla, e;
    sla_h: sla, h; sla_l: sla, l; sla_a: sla, a;
    sra_b: sra, b; sra_c: sra, c; sra_d: sra, d; sra_e: sra, e;
    sra_h: sra, h; sra_l: sra, l; sra_a: sra, a;
    swap_b: swap, b; swap_c: swap, c; swap_d: swap, d; swap_e: swap, e;
    swap_h: swap, h; swap_l: swap, l; swap_a: swap, a;
    srl_b: srl, b; srl_c: srl, c; srl_d: srl, d; srl_e: srl, e;
    srl_h: srl, h; srl_l: srl, l; srl_a: srl, a;
}

cb_shift_mhl! {
    rlc_mhl: rlc; rrc_mhl: rrc; rl_mhl: rl; rr_mhl: rr;
    sla_mhl: sla; sra_mhl: sra; swap_mhl: swap; srl_mhl: srl;
}

cb_bit_r! {
    bit_0_b: 0, b; bit_0_c: 0, c; bit_0_d: 0, d; bit_0_e: 0, e;
    bit_0_h: 0, h; bit_0_l: 0, l; bit_0_a: 0, a;
    bit_1_b: 1, b; bit_1_c: 1, c; bit_1_d: 1, d; bit_1_e: 1, e;
    bit_1_h: 1, h; bit_1_l: 1, l; bit_1_a: 1, a;
    bit_2_b: 2, b; bit_2_c: 2, c; bit_2_d: 2, d; bit_2_e: 2, e;
    bit_2_h: 2, h; bit_2_l: 2, l; bit_2_a: 2, a;
    bit_3_b: 3, b; bit_3_c: 3, c; bit_3_d: 3, d; bit_3_e: 3, e;
    bit_3_h: 3, h; bit_3_l: 3, l; bit_3_a: 3, a;
    bit_4_b: 4, b; bit_4_c: 4, c; bit_4_d: 4, d; bit_4_e: 4, e;
    bit_4_h: 4, h; bit_4_l: 4, l; bit_4_a: 4, a;
    bit_5_b: 5, b; bit_5_c: 5, c; bit_5_d: 5, d; bit_5_e: 5, e;
    bit_5_h: 5, h; bit_5_l: 5, l; bit_5_a: 5, a;
    bit_6_b: 6, b; bit_6_c: 6, c; bit_6_d: 6, d; bit_6_e: 6, e;
    bit_6_h: 6, h; bit_6_l: 6, l; bit_6_a: 6, a;
    bit_7_b: 7, b; bit_7_c: 7, c; bit_7_d: 7, d; bit_7_e: 7, e;
    bit_7_h: 7, h; bit_7_l: 7, l; bit_7_a: 7, a;
}

cb_bit_mhl! {
    bit_0_mhl: 0; bit_1_mhl: 1; bit_2_mhl: 2; bit_3_mhl: 3;
    bit_4_mhl: 4; bit_5_mhl: 5; bit_6_mhl: 6; bit_7_mhl: 7;
}

cb_res_r! {
    res_0_b: 0, b; res_0_c: 0, c; res_0_d: 0, d; res_0_e: 0, e;
    res_0_h: 0, h; res_0_l: 0, l; res_0_a: 0, a;
    res_1_b: 1, b; res_1_c: 1, c; res_1_d: 1, d; res_1_e: 1, e;
    res_1_h: 1, h; res_1_l: 1, l; res_1_a: 1, a;
    res_2_b: 2, b; res_2_c: 2, c; res_2_d: 2, d; res_2_e: 2, e;
    res_2_h: 2, h; res_2_l: 2, l; res_2_a: 2, a;
    res_3_b: 3, b; res_3_c: 3, c; res_3_d: 3, d; res_3_e: 3, e;
    res_3_h: 3, h; res_3_l: 3, l; res_3_a: 3, a;
    res_4_b: 4, b; res_4_c: 4, c; res_4_d: 4, d; res_4_e: 4, e;
    res_4_h: 4, h; res_4_l: 4, l; res_4_a: 4, a;
    res_5_b: 5, b; res_5_c: 5, c; res_5_d: 5, d; res_5_e: 5, e;
    res_5_h: 5, h; res_5_l: 5, l; res_5_a: 5, a;
    res_6_b: 6, b; res_6_c: 6, c; res_6_d: 6, d; res_6_e: 6, e;
    res_6_h: 6, h; res_6_l: 6, l; res_6_a: 6, a;
    res_7_b: 7, b; res_7_c: 7, c; res_7_d: 7, d; res_7_e: 7, e;
    res_7_h: 7, h; res_7_l: 7, l; res_7_a: 7, a;
}

cb_res_mhl! {
    res_0_mhl: 0; res_1_mhl: 1; res_2_mhl: 2; res_3_mhl: 3;
    res_4_mhl: 4; res_5_mhl: 5; res_6_mhl: 6; res_7_mhl: 7;
}

cb_set_r! {
    set_0_b: 0, b; set_0_c: 0, c; set_0_d: 0, d; set_0_e: 0, e;
    set_0_h: 0, h; set_0_l: 0, l; set_0_a: 0, a;
    set_1_b: 1, b; set_1_c: 1, c; set_1_d: 1, d; set_1_e: 1, e;
    set_1_h: 1, h; set_1_l: 1, l; set_1_a: 1, a;
    set_2_b: 2, b; set_2_c: 2, c; set_2_d: 2, d; set_2_e: 2, e;
    set_2_h: 2, h; set_2_l: 2, l; set_2_a: 2, a;
    set_3_b: 3, b; set_3_c: 3, c; set_3_d: 3, d; set_3_e: 3, e;
    set_3_h: 3, h; set_3_l: 3, l; set_3_a: 3, a;
    set_4_b: 4, b; set_4_c: 4, c; set_4_d: 4, d; set_4_e: 4, e;
    set_4_h: 4, h; set_4_l: 4, l; set_4_a: 4, a;
    set_5_b: 5, b; set_5_c: 5, c; set_5_d: 5, d; set_5_e: 5, e;
    set_5_h: 5, h; set_5_l: 5, l; set_5_a: 5, a;
    set_6_b: 6, b; set_6_c: 6, c; set_6_d: 6, d; set_6_e: 6, e;
    set_6_h: 6, h; set_6_l: 6, l; set_6_a: 6, a;
    set_7_b: 7, b; set_7_c: 7, c; set_7_d: 7, d; set_7_e: 7, e;
    set_7_h: 7, h; set_7_l: 7, l; set_7_a: 7, a;
}

cb_set_mhl! {
    set_0_mhl: 0; set_1_mhl: 1; set_2_mhl: 2; set_3_mhl: 3;
    set_4_mhl: 4; set_5_mhl: 5; set_6_mhl: 6; set_7_mhl: 7;
}

static CB: [OpFn; 256] = [
    // 0x00 - 0x0F: RLC / RRC
    rlc_b, rlc_c, rlc_d, rlc_e, rlc_h, rlc_l, rlc_mhl, rlc_a,
    rrc_b, rrc_c, rrc_d, rrc_e, rrc_h, rrc_l, rrc_mhl, rrc_a,
    // 0x10 - 0x1F: RL / RR
    rl_b, rl_c, rl_d, rl_e, rl_h, rl_l, rl_mhl, rl_a,
    rr_b, rr_c, rr_d, rr_e, rr_h, rr_l, rr_mhl, rr_a,
    // 0x20 - 0x2F: SLA / SRA
    sla_b, sla_c, sla_d, sla_e, sla_h, sla_l, sla_mhl, sla_a,
    sra_b, sra_c, sra_d, sra_e, sra_h, sra_l, sra_mhl, sra_a,
    // 0x30 - 0x3F: SWAP / SRL
    swap_b, swap_c, swap_d, swap_e, swap_h, swap_l, swap_mhl, swap_a,
    srl_b, srl_c, srl_d, srl_e, srl_h, srl_l, srl_mhl, srl_a,
    // 0x40 - 0x7F: BIT
    bit_0_b, bit_0_c, bit_0_d, bit_0_e, bit_0_h, bit_0_l, bit_0_mhl, bit_0_a,
    bit_1_b, bit_1_c, bit_1_d, bit_1_e, bit_1_h, bit_1_l, bit_1_mhl, bit_1_a,
    bit_2_b, bit_2_c, bit_2_d, bit_2_e, bit_2_h, bit_2_l, bit_2_mhl, bit_2_a,
    bit_3_b, bit_3_c, bit_3_d, bit_3_e, bit_3_h, bit_3_l, bit_3_mhl, bit_3_a,
    bit_4_b, bit_4_c, bit_4_d, bit_4_e, bit_4_h, bit_4_l, bit_4_mhl, bit_4_a,
    bit_5_b, bit_5_c, bit_5_d, bit_5_e, bit_5_h, bit_5_l, bit_5_mhl, bit_5_a,
    bit_6_b, bit_6_c, bit_6_d, bit_6_e, bit_6_h, bit_6_l, bit_6_mhl, bit_6_a,
    bit_7_b, bit_7_c, bit_7_d, bit_7_e, bit_7_h, bit_7_l, bit_7_mhl, bit_7_a,
    // 0x80 - 0xBF: RES
    res_0_b, res_0_c, res_0_d, res_0_e, res_0_h, res_0_l, res_0_mhl, res_0_a,
    res_1_b, res_1_c, res_1_d, res_1_e, res_1_h, res_1_l, res_1_mhl, res_1_a,
    res_2_b, res_2_c, res_2_d, res_2_e, res_2_h, res_2_l, res_2_mhl, res_2_a,
    res_3_b, res_3_c, res_3_d, res_3_e, res_3_h, res_3_l, res_3_mhl, res_3_a,
    res_4_b, res_4_c, res_4_d, res_4_e, res_4_h, res_4_l, res_4_mhl, res_4_a,
    res_5_b, res_5_c, res_5_d, res_5_e, res_5_h, res_5_l, res_5_mhl, res_5_a,
    res_6_b, res_6_c, res_6_d, res_6_e, res_6_h, res_6_l, res_6_mhl, res_6_a,
    res_7_b, res_7_c, res_7_d, res_7_e, res_7_h, res_7_l, res_7_mhl, res_7_a,
    // 0xC0 - 0xFF: SET
    set_0_b, set_0_c, set_0_d, set_0_e, set_0_h, set_0_l, set_0_mhl, set_0_a,
    set_1_b, set_1_c, set_1_d, set_1_e, set_1_h, set_1_l, set_1_mhl, set_1_a,
    set_2_b, set_2_c, set_2_d, set_2_e, set_2_h, set_2_l, set_2_mhl, set_2_a,
    set_3_b, set_3_c, set_3_d, set_3_e, set_3_h, set_3_l, set_3_mhl, set_3_a,
    set_4_b, set_4_c, set_4_d, set_4_e, set_4_h, set_4_l, set_4_mhl, set_4_a,
    set_5_b, set_5_c, set_5_d, set_5_e, set_5_h, set_5_l, set_5_mhl, set_5_a,
    set_6_b, set_6_c, set_6_d, set_6_e, set_6_h, set_6_l, set_6_mhl, set_6_a,
    set_7_b, set_7_c, set_7_d, set_7_e, set_7_h, set_7_l, set_7_mhl, set_7_a,
];
