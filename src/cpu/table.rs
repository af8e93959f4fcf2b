/*!
Base instruction table: 256 descriptors indexed by opcode byte.

Dispatch is data, not control flow: each slot carries the assembly
mnemonic (diagnostic only), the operand byte length (0/1/2), both fixed
cycle costs in T-cycles (`cycles` for the untaken path of conditional
control flow, `cycles_taken` otherwise equal to `cycles`), and the
execution routine as a plain function pointer. A handful of slots are
permanently unused hardware traps; they stay addressable with no routine
and the dispatcher surfaces them as illegal-opcode errors.

The 0xCB slot is the prefix byte; the dispatcher intercepts it and
indexes the extended table in `cb.rs` instead, so its entry here is a
placeholder that never executes.

Execution routines receive the CPU state, the bus, and the pre-fetched
operand. Conditional routines latch `mark_branch_taken` so the
dispatcher can charge the taken cost.
*/

use crate::bus::Bus;
use crate::cpu::flags::{CARRY, ZERO};
use crate::cpu::state::CpuState;

/// The fetched operand bytes of one instruction (0, 1 or 2 bytes).
///
/// Stored little-endian, matching fetch order: the byte at the lower
/// address is the low byte of a 16-bit operand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Operand {
    raw: [u8; 2],
}

impl Operand {
    pub const NONE: Operand = Operand { raw: [0, 0] };

    #[inline]
    pub const fn byte(b: u8) -> Self {
        Self { raw: [b, 0] }
    }

    #[inline]
    pub const fn word(lo: u8, hi: u8) -> Self {
        Self { raw: [lo, hi] }
    }

    #[inline]
    pub fn u8(&self) -> u8 {
        self.raw[0]
    }

    #[inline]
    pub fn i8(&self) -> i8 {
        self.raw[0] as i8
    }

    #[inline]
    pub fn u16(&self) -> u16 {
        u16::from_le_bytes(self.raw)
    }
}

pub type ExecFn = fn(&mut CpuState, &mut Bus, Operand);

/// One instruction descriptor.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    /// Assembly mnemonic, for diagnostics and tracing only.
    pub mnemonic: &'static str,
    /// Operand bytes following the opcode (0, 1 or 2).
    pub length: u8,
    /// T-cycle cost; for conditional control flow, the untaken cost.
    pub cycles: u32,
    /// T-cycle cost when a conditional branch is taken. Equal to
    /// `cycles` for everything else.
    pub cycles_taken: u32,
    /// Execution routine. `None` marks a permanently unused slot.
    pub exec: Option<ExecFn>,
}

const fn op(mnemonic: &'static str, length: u8, cycles: u32, exec: ExecFn) -> Opcode {
    Opcode {
        mnemonic,
        length,
        cycles,
        cycles_taken: cycles,
        exec: Some(exec),
    }
}

const fn cond(
    mnemonic: &'static str,
    length: u8,
    cycles: u32,
    cycles_taken: u32,
    exec: ExecFn,
) -> Opcode {
    Opcode {
        mnemonic,
        length,
        cycles,
        cycles_taken,
        exec: Some(exec),
    }
}

const fn unused() -> Opcode {
    Opcode {
        mnemonic: "??",
        length: 0,
        cycles: 0,
        cycles_taken: 0,
        exec: None,
    }
}

/// Push the current PC and jump to a fixed target (CALL/RST bodies).
#[inline]
fn call_to(s: &mut CpuState, b: &mut Bus, target: u16) {
    let pc = s.pc;
    s.push(b, pc);
    s.pc = target;
}

pub static OPCODES: [Opcode; 256] = [
    // 0x00
    op("NOP", 0, 4, |_, _, _| {}),
    op("LD BC,u16", 2, 12, |s, _, v| s.regs.bc.set_word(v.u16())),
    op("LD (BC),A", 0, 8, |s, b, _| {
        b.write(s.regs.bc.word(), s.regs.a())
    }),
    op("INC BC", 0, 8, |s, _, _| s.regs.bc.inc()),
    op("INC B", 0, 4, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bc.hi = s.regs.inc8(x);
    }),
    op("DEC B", 0, 4, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bc.hi = s.regs.dec8(x);
    }),
    op("LD B,u8", 1, 8, |s, _, v| s.regs.bc.hi = v.u8()),
    op("RLCA", 0, 4, |s, _, _| s.regs.rlca()),
    op("LD (u16),SP", 2, 20, |s, b, v| b.write_word(v.u16(), s.sp)),
    op("ADD HL,BC", 0, 8, |s, _, _| {
        let x = s.regs.bc.word();
        s.regs.add_hl(x);
    }),
    op("LD A,(BC)", 0, 8, |s, b, _| {
        s.regs.af.hi = b.read(s.regs.bc.word())
    }),
    op("DEC BC", 0, 8, |s, _, _| s.regs.bc.dec()),
    op("INC C", 0, 4, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bc.lo = s.regs.inc8(x);
    }),
    op("DEC C", 0, 4, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bc.lo = s.regs.dec8(x);
    }),
    op("LD C,u8", 1, 8, |s, _, v| s.regs.bc.lo = v.u8()),
    op("RRCA", 0, 4, |s, _, _| s.regs.rrca()),
    // 0x10
    op("STOP", 1, 4, |s, _, _| s.stop()),
    op("LD DE,u16", 2, 12, |s, _, v| s.regs.de.set_word(v.u16())),
    op("LD (DE),A", 0, 8, |s, b, _| {
        b.write(s.regs.de.word(), s.regs.a())
    }),
    op("INC DE", 0, 8, |s, _, _| s.regs.de.inc()),
    op("INC D", 0, 4, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.de.hi = s.regs.inc8(x);
    }),
    op("DEC D", 0, 4, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.de.hi = s.regs.dec8(x);
    }),
    op("LD D,u8", 1, 8, |s, _, v| s.regs.de.hi = v.u8()),
    op("RLA", 0, 4, |s, _, _| s.regs.rla()),
    op("JR i8", 1, 12, |s, _, v| s.jump_rel(v.i8())),
    op("ADD HL,DE", 0, 8, |s, _, _| {
        let x = s.regs.de.word();
        s.regs.add_hl(x);
    }),
    op("LD A,(DE)", 0, 8, |s, b, _| {
        s.regs.af.hi = b.read(s.regs.de.word())
    }),
    op("DEC DE", 0, 8, |s, _, _| s.regs.de.dec()),
    op("INC E", 0, 4, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.de.lo = s.regs.inc8(x);
    }),
    op("DEC E", 0, 4, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.de.lo = s.regs.dec8(x);
    }),
    op("LD E,u8", 1, 8, |s, _, v| s.regs.de.lo = v.u8()),
    op("RRA", 0, 4, |s, _, _| s.regs.rra()),
    // 0x20
    cond("JR NZ,i8", 1, 8, 12, |s, _, v| {
        if !s.regs.flag(ZERO) {
            s.jump_rel(v.i8());
            s.mark_branch_taken();
        }
    }),
    op("LD HL,u16", 2, 12, |s, _, v| s.regs.hl.set_word(v.u16())),
    op("LD (HL+),A", 0, 8, |s, b, _| {
        b.write(s.regs.hl.word(), s.regs.a());
        s.regs.hl.inc();
    }),
    op("INC HL", 0, 8, |s, _, _| s.regs.hl.inc()),
    op("INC H", 0, 4, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.hl.hi = s.regs.inc8(x);
    }),
    op("DEC H", 0, 4, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.hl.hi = s.regs.dec8(x);
    }),
    op("LD H,u8", 1, 8, |s, _, v| s.regs.hl.hi = v.u8()),
    op("DAA", 0, 4, |s, _, _| s.regs.daa()),
    cond("JR Z,i8", 1, 8, 12, |s, _, v| {
        if s.regs.flag(ZERO) {
            s.jump_rel(v.i8());
            s.mark_branch_taken();
        }
    }),
    op("ADD HL,HL", 0, 8, |s, _, _| {
        let x = s.regs.hl.word();
        s.regs.add_hl(x);
    }),
    op("LD A,(HL+)", 0, 8, |s, b, _| {
        s.regs.af.hi = b.read(s.regs.hl.word());
        s.regs.hl.inc();
    }),
    op("DEC HL", 0, 8, |s, _, _| s.regs.hl.dec()),
    op("INC L", 0, 4, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.hl.lo = s.regs.inc8(x);
    }),
    op("DEC L", 0, 4, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.hl.lo = s.regs.dec8(x);
    }),
    op("LD L,u8", 1, 8, |s, _, v| s.regs.hl.lo = v.u8()),
    op("CPL", 0, 4, |s, _, _| s.regs.cpl()),
    // 0x30
    cond("JR NC,i8", 1, 8, 12, |s, _, v| {
        if !s.regs.flag(CARRY) {
            s.jump_rel(v.i8());
            s.mark_branch_taken();
        }
    }),
    op("LD SP,u16", 2, 12, |s, _, v| s.sp = v.u16()),
    op("LD (HL-),A", 0, 8, |s, b, _| {
        b.write(s.regs.hl.word(), s.regs.a());
        s.regs.hl.dec();
    }),
    op("INC SP", 0, 8, |s, _, _| s.sp = s.sp.wrapping_add(1)),
    op("INC (HL)", 0, 12, |s, b, _| {
        let addr = s.regs.hl.word();
        let x = b.read(addr);
        let x = s.regs.inc8(x);
        b.write(addr, x);
    }),
    op("DEC (HL)", 0, 12, |s, b, _| {
        let addr = s.regs.hl.word();
        let x = b.read(addr);
        let x = s.regs.dec8(x);
        b.write(addr, x);
    }),
    op("LD (HL),u8", 1, 12, |s, b, v| {
        b.write(s.regs.hl.word(), v.u8())
    }),
    op("SCF", 0, 4, |s, _, _| s.regs.scf()),
    cond("JR C,i8", 1, 8, 12, |s, _, v| {
        if s.regs.flag(CARRY) {
            s.jump_rel(v.i8());
            s.mark_branch_taken();
        }
    }),
    op("ADD HL,SP", 0, 8, |s, _, _| {
        let x = s.sp;
        s.regs.add_hl(x);
    }),
    op("LD A,(HL-)", 0, 8, |s, b, _| {
        s.regs.af.hi = b.read(s.regs.hl.word());
        s.regs.hl.dec();
    }),
    op("DEC SP", 0, 8, |s, _, _| s.sp = s.sp.wrapping_sub(1)),
    op("INC A", 0, 4, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.af.hi = s.regs.inc8(x);
    }),
    op("DEC A", 0, 4, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.af.hi = s.regs.dec8(x);
    }),
    op("LD A,u8", 1, 8, |s, _, v| s.regs.af.hi = v.u8()),
    op("CCF", 0, 4, |s, _, _| s.regs.ccf()),
    // 0x40: LD B,r
    op("LD B,B", 0, 4, |_, _, _| {}),
    op("LD B,C", 0, 4, |s, _, _| s.regs.bc.hi = s.regs.bc.lo),
    op("LD B,D", 0, 4, |s, _, _| s.regs.bc.hi = s.regs.de.hi),
    op("LD B,E", 0, 4, |s, _, _| s.regs.bc.hi = s.regs.de.lo),
    op("LD B,H", 0, 4, |s, _, _| s.regs.bc.hi = s.regs.hl.hi),
    op("LD B,L", 0, 4, |s, _, _| s.regs.bc.hi = s.regs.hl.lo),
    op("LD B,(HL)", 0, 8, |s, b, _| {
        s.regs.bc.hi = b.read(s.regs.hl.word())
    }),
    op("LD B,A", 0, 4, |s, _, _| s.regs.bc.hi = s.regs.af.hi),
    // 0x48: LD C,r
    op("LD C,B", 0, 4, |s, _, _| s.regs.bc.lo = s.regs.bc.hi),
    op("LD C,C", 0, 4, |_, _, _| {}),
    op("LD C,D", 0, 4, |s, _, _| s.regs.bc.lo = s.regs.de.hi),
    op("LD C,E", 0, 4, |s, _, _| s.regs.bc.lo = s.regs.de.lo),
    op("LD C,H", 0, 4, |s, _, _| s.regs.bc.lo = s.regs.hl.hi),
    op("LD C,L", 0, 4, |s, _, _| s.regs.bc.lo = s.regs.hl.lo),
    op("LD C,(HL)", 0, 8, |s, b, _| {
        s.regs.bc.lo = b.read(s.regs.hl.word())
    }),
    op("LD C,A", 0, 4, |s, _, _| s.regs.bc.lo = s.regs.af.hi),
    // 0x50: LD D,r
    op("LD D,B", 0, 4, |s, _, _| s.regs.de.hi = s.regs.bc.hi),
    op("LD D,C", 0, 4, |s, _, _| s.regs.de.hi = s.regs.bc.lo),
    op("LD D,D", 0, 4, |_, _, _| {}),
    op("LD D,E", 0, 4, |s, _, _| s.regs.de.hi = s.regs.de.lo),
    op("LD D,H", 0, 4, |s, _, _| s.regs.de.hi = s.regs.hl.hi),
    op("LD D,L", 0, 4, |s, _, _| s.regs.de.hi = s.regs.hl.lo),
    op("LD D,(HL)", 0, 8, |s, b, _| {
        s.regs.de.hi = b.read(s.regs.hl.word())
    }),
    op("LD D,A", 0, 4, |s, _, _| s.regs.de.hi = s.regs.af.hi),
    // 0x58: LD E,r
    op("LD E,B", 0, 4, |s, _, _| s.regs.de.lo = s.regs.bc.hi),
    op("LD E,C", 0, 4, |s, _, _| s.regs.de.lo = s.regs.bc.lo),
    op("LD E,D", 0, 4, |s, _, _| s.regs.de.lo = s.regs.de.hi),
    op("LD E,E", 0, 4, |_, _, _| {}),
    op("LD E,H", 0, 4, |s, _, _| s.regs.de.lo = s.regs.hl.hi),
    op("LD E,L", 0, 4, |s, _, _| s.regs.de.lo = s.regs.hl.lo),
    op("LD E,(HL)", 0, 8, |s, b, _| {
        s.regs.de.lo = b.read(s.regs.hl.word())
    }),
    op("LD E,A", 0, 4, |s, _, _| s.regs.de.lo = s.regs.af.hi),
    // 0x60: LD H,r
    op("LD H,B", 0, 4, |s, _, _| s.regs.hl.hi = s.regs.bc.hi),
    op("LD H,C", 0, 4, |s, _, _| s.regs.hl.hi = s.regs.bc.lo),
    op("LD H,D", 0, 4, |s, _, _| s.regs.hl.hi = s.regs.de.hi),
    op("LD H,E", 0, 4, |s, _, _| s.regs.hl.hi = s.regs.de.lo),
    op("LD H,H", 0, 4, |_, _, _| {}),
    op("LD H,L", 0, 4, |s, _, _| s.regs.hl.hi = s.regs.hl.lo),
    op("LD H,(HL)", 0, 8, |s, b, _| {
        s.regs.hl.hi = b.read(s.regs.hl.word())
    }),
    op("LD H,A", 0, 4, |s, _, _| s.regs.hl.hi = s.regs.af.hi),
    // 0x68: LD L,r
    op("LD L,B", 0, 4, |s, _, _| s.regs.hl.lo = s.regs.bc.hi),
    op("LD L,C", 0, 4, |s, _, _| s.regs.hl.lo = s.regs.bc.lo),
    op("LD L,D", 0, 4, |s, _, _| s.regs.hl.lo = s.regs.de.hi),
    op("LD L,E", 0, 4, |s, _, _| s.regs.hl.lo = s.regs.de.lo),
    op("LD L,H", 0, 4, |s, _, _| s.regs.hl.lo = s.regs.hl.hi),
    op("LD L,L", 0, 4, |_, _, _| {}),
    op("LD L,(HL)", 0, 8, |s, b, _| {
        s.regs.hl.lo = b.read(s.regs.hl.word())
    }),
    op("LD L,A", 0, 4, |s, _, _| s.regs.hl.lo = s.regs.af.hi),
    // 0x70: LD (HL),r
    op("LD (HL),B", 0, 8, |s, b, _| {
        b.write(s.regs.hl.word(), s.regs.bc.hi)
    }),
    op("LD (HL),C", 0, 8, |s, b, _| {
        b.write(s.regs.hl.word(), s.regs.bc.lo)
    }),
    op("LD (HL),D", 0, 8, |s, b, _| {
        b.write(s.regs.hl.word(), s.regs.de.hi)
    }),
    op("LD (HL),E", 0, 8, |s, b, _| {
        b.write(s.regs.hl.word(), s.regs.de.lo)
    }),
    op("LD (HL),H", 0, 8, |s, b, _| {
        b.write(s.regs.hl.word(), s.regs.hl.hi)
    }),
    op("LD (HL),L", 0, 8, |s, b, _| {
        b.write(s.regs.hl.word(), s.regs.hl.lo)
    }),
    op("HALT", 0, 4, |s, _, _| s.stop()),
    op("LD (HL),A", 0, 8, |s, b, _| {
        b.write(s.regs.hl.word(), s.regs.af.hi)
    }),
    // 0x78: LD A,r
    op("LD A,B", 0, 4, |s, _, _| s.regs.af.hi = s.regs.bc.hi),
    op("LD A,C", 0, 4, |s, _, _| s.regs.af.hi = s.regs.bc.lo),
    op("LD A,D", 0, 4, |s, _, _| s.regs.af.hi = s.regs.de.hi),
    op("LD A,E", 0, 4, |s, _, _| s.regs.af.hi = s.regs.de.lo),
    op("LD A,H", 0, 4, |s, _, _| s.regs.af.hi = s.regs.hl.hi),
    op("LD A,L", 0, 4, |s, _, _| s.regs.af.hi = s.regs.hl.lo),
    op("LD A,(HL)", 0, 8, |s, b, _| {
        s.regs.af.hi = b.read(s.regs.hl.word())
    }),
    op("LD A,A", 0, 4, |_, _, _| {}),
    // 0x80: ADD A,r
    op("ADD A,B", 0, 4, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.add(x);
    }),
    op("ADD A,C", 0, 4, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.add(x);
    }),
    op("ADD A,D", 0, 4, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.add(x);
    }),
    op("ADD A,E", 0, 4, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.add(x);
    }),
    op("ADD A,H", 0, 4, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.add(x);
    }),
    op("ADD A,L", 0, 4, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.add(x);
    }),
    op("ADD A,(HL)", 0, 8, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.add(x);
    }),
    op("ADD A,A", 0, 4, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.add(x);
    }),
    // 0x88: ADC A,r
    op("ADC A,B", 0, 4, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.adc(x);
    }),
    op("ADC A,C", 0, 4, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.adc(x);
    }),
    op("ADC A,D", 0, 4, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.adc(x);
    }),
    op("ADC A,E", 0, 4, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.adc(x);
    }),
    op("ADC A,H", 0, 4, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.adc(x);
    }),
    op("ADC A,L", 0, 4, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.adc(x);
    }),
    op("ADC A,(HL)", 0, 8, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.adc(x);
    }),
    op("ADC A,A", 0, 4, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.adc(x);
    }),
    // 0x90: SUB A,r
    op("SUB A,B", 0, 4, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.sub(x);
    }),
    op("SUB A,C", 0, 4, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.sub(x);
    }),
    op("SUB A,D", 0, 4, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.sub(x);
    }),
    op("SUB A,E", 0, 4, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.sub(x);
    }),
    op("SUB A,H", 0, 4, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.sub(x);
    }),
    op("SUB A,L", 0, 4, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.sub(x);
    }),
    op("SUB A,(HL)", 0, 8, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.sub(x);
    }),
    op("SUB A,A", 0, 4, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.sub(x);
    }),
    // 0x98: SBC A,r
    op("SBC A,B", 0, 4, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.sbc(x);
    }),
    op("SBC A,C", 0, 4, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.sbc(x);
    }),
    op("SBC A,D", 0, 4, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.sbc(x);
    }),
    op("SBC A,E", 0, 4, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.sbc(x);
    }),
    op("SBC A,H", 0, 4, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.sbc(x);
    }),
    op("SBC A,L", 0, 4, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.sbc(x);
    }),
    op("SBC A,(HL)", 0, 8, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.sbc(x);
    }),
    op("SBC A,A", 0, 4, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.sbc(x);
    }),
    // 0xA0: AND A,r
    op("AND A,B", 0, 4, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.and(x);
    }),
    op("AND A,C", 0, 4, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.and(x);
    }),
    op("AND A,D", 0, 4, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.and(x);
    }),
    op("AND A,E", 0, 4, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.and(x);
    }),
    op("AND A,H", 0, 4, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.and(x);
    }),
    op("AND A,L", 0, 4, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.and(x);
    }),
    op("AND A,(HL)", 0, 8, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.and(x);
    }),
    op("AND A,A", 0, 4, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.and(x);
    }),
    // 0xA8: XOR A,r
    op("XOR A,B", 0, 4, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.xor(x);
    }),
    op("XOR A,C", 0, 4, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.xor(x);
    }),
    op("XOR A,D", 0, 4, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.xor(x);
    }),
    op("XOR A,E", 0, 4, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.xor(x);
    }),
    op("XOR A,H", 0, 4, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.xor(x);
    }),
    op("XOR A,L", 0, 4, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.xor(x);
    }),
    op("XOR A,(HL)", 0, 8, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.xor(x);
    }),
    op("XOR A,A", 0, 4, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.xor(x);
    }),
    // 0xB0: OR A,r
    op("OR A,B", 0, 4, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.or(x);
    }),
    op("OR A,C", 0, 4, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.or(x);
    }),
    op("OR A,D", 0, 4, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.or(x);
    }),
    op("OR A,E", 0, 4, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.or(x);
    }),
    op("OR A,H", 0, 4, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.or(x);
    }),
    op("OR A,L", 0, 4, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.or(x);
    }),
    op("OR A,(HL)", 0, 8, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.or(x);
    }),
    op("OR A,A", 0, 4, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.or(x);
    }),
    // 0xB8: CP A,r
    op("CP A,B", 0, 4, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.cp(x);
    }),
    op("CP A,C", 0, 4, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.cp(x);
    }),
    op("CP A,D", 0, 4, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.cp(x);
    }),
    op("CP A,E", 0, 4, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.cp(x);
    }),
    op("CP A,H", 0, 4, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.cp(x);
    }),
    op("CP A,L", 0, 4, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.cp(x);
    }),
    op("CP A,(HL)", 0, 8, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.cp(x);
    }),
    op("CP A,A", 0, 4, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.cp(x);
    }),
    // 0xC0
    cond("RET NZ", 0, 8, 20, |s, b, _| {
        if !s.regs.flag(ZERO) {
            s.pc = s.pop(b);
            s.mark_branch_taken();
        }
    }),
    op("POP BC", 0, 12, |s, b, _| {
        let w = s.pop(b);
        s.regs.bc.set_word(w);
    }),
    cond("JP NZ,u16", 2, 12, 16, |s, _, v| {
        if !s.regs.flag(ZERO) {
            s.pc = v.u16();
            s.mark_branch_taken();
        }
    }),
    op("JP u16", 2, 16, |s, _, v| s.pc = v.u16()),
    cond("CALL NZ,u16", 2, 12, 24, |s, b, v| {
        if !s.regs.flag(ZERO) {
            call_to(s, b, v.u16());
            s.mark_branch_taken();
        }
    }),
    op("PUSH BC", 0, 16, |s, b, _| {
        let w = s.regs.bc.word();
        s.push(b, w);
    }),
    op("ADD A,u8", 1, 8, |s, _, v| s.regs.add(v.u8())),
    op("RST 00h", 0, 16, |s, b, _| call_to(s, b, 0x0000)),
    cond("RET Z", 0, 8, 20, |s, b, _| {
        if s.regs.flag(ZERO) {
            s.pc = s.pop(b);
            s.mark_branch_taken();
        }
    }),
    op("RET", 0, 16, |s, b, _| s.pc = s.pop(b)),
    cond("JP Z,u16", 2, 12, 16, |s, _, v| {
        if s.regs.flag(ZERO) {
            s.pc = v.u16();
            s.mark_branch_taken();
        }
    }),
    // The dispatcher intercepts 0xCB and indexes the extended table;
    // this slot never executes.
    op("PREFIX CB", 0, 4, |_, _, _| {}),
    cond("CALL Z,u16", 2, 12, 24, |s, b, v| {
        if s.regs.flag(ZERO) {
            call_to(s, b, v.u16());
            s.mark_branch_taken();
        }
    }),
    op("CALL u16", 2, 24, |s, b, v| call_to(s, b, v.u16())),
    op("ADC A,u8", 1, 8, |s, _, v| s.regs.adc(v.u8())),
    op("RST 08h", 0, 16, |s, b, _| call_to(s, b, 0x0008)),
    // 0xD0
    cond("RET NC", 0, 8, 20, |s, b, _| {
        if !s.regs.flag(CARRY) {
            s.pc = s.pop(b);
            s.mark_branch_taken();
        }
    }),
    op("POP DE", 0, 12, |s, b, _| {
        let w = s.pop(b);
        s.regs.de.set_word(w);
    }),
    cond("JP NC,u16", 2, 12, 16, |s, _, v| {
        if !s.regs.flag(CARRY) {
            s.pc = v.u16();
            s.mark_branch_taken();
        }
    }),
    unused(),
    cond("CALL NC,u16", 2, 12, 24, |s, b, v| {
        if !s.regs.flag(CARRY) {
            call_to(s, b, v.u16());
            s.mark_branch_taken();
        }
    }),
    op("PUSH DE", 0, 16, |s, b, _| {
        let w = s.regs.de.word();
        s.push(b, w);
    }),
    op("SUB A,u8", 1, 8, |s, _, v| s.regs.sub(v.u8())),
    op("RST 10h", 0, 16, |s, b, _| call_to(s, b, 0x0010)),
    cond("RET C", 0, 8, 20, |s, b, _| {
        if s.regs.flag(CARRY) {
            s.pc = s.pop(b);
            s.mark_branch_taken();
        }
    }),
    op("RETI", 0, 16, |s, b, _| {
        s.pc = s.pop(b);
        b.interrupt.set_master(true);
    }),
    cond("JP C,u16", 2, 12, 16, |s, _, v| {
        if s.regs.flag(CARRY) {
            s.pc = v.u16();
            s.mark_branch_taken();
        }
    }),
    unused(),
    cond("CALL C,u16", 2, 12, 24, |s, b, v| {
        if s.regs.flag(CARRY) {
            call_to(s, b, v.u16());
            s.mark_branch_taken();
        }
    }),
    unused(),
    op("SBC A,u8", 1, 8, |s, _, v| s.regs.sbc(v.u8())),
    op("RST 18h", 0, 16, |s, b, _| call_to(s, b, 0x0018)),
    // 0xE0
    op("LD (FF00+u8),A", 1, 12, |s, b, v| {
        b.write(0xFF00 + u16::from(v.u8()), s.regs.a())
    }),
    op("POP HL", 0, 12, |s, b, _| {
        let w = s.pop(b);
        s.regs.hl.set_word(w);
    }),
    op("LD (FF00+C),A", 0, 8, |s, b, _| {
        b.write(0xFF00 + u16::from(s.regs.bc.lo), s.regs.a())
    }),
    unused(),
    unused(),
    op("PUSH HL", 0, 16, |s, b, _| {
        let w = s.regs.hl.word();
        s.push(b, w);
    }),
    op("AND A,u8", 1, 8, |s, _, v| s.regs.and(v.u8())),
    op("RST 20h", 0, 16, |s, b, _| call_to(s, b, 0x0020)),
    op("ADD SP,i8", 1, 16, |s, _, v| {
        s.sp = s.regs.add_sp_offset(s.sp, v.i8());
    }),
    op("JP HL", 0, 4, |s, _, _| s.pc = s.regs.hl.word()),
    op("LD (u16),A", 2, 16, |s, b, v| b.write(v.u16(), s.regs.a())),
    unused(),
    unused(),
    unused(),
    op("XOR A,u8", 1, 8, |s, _, v| s.regs.xor(v.u8())),
    op("RST 28h", 0, 16, |s, b, _| call_to(s, b, 0x0028)),
    // 0xF0
    op("LD A,(FF00+u8)", 1, 12, |s, b, v| {
        s.regs.af.hi = b.read(0xFF00 + u16::from(v.u8()))
    }),
    op("POP AF", 0, 12, |s, b, _| {
        let w = s.pop(b);
        s.regs.set_af(w);
    }),
    op("LD A,(FF00+C)", 0, 8, |s, b, _| {
        s.regs.af.hi = b.read(0xFF00 + u16::from(s.regs.bc.lo))
    }),
    op("DI", 0, 4, |_, b, _| b.interrupt.set_master(false)),
    unused(),
    op("PUSH AF", 0, 16, |s, b, _| {
        let w = s.regs.af.word();
        s.push(b, w);
    }),
    op("OR A,u8", 1, 8, |s, _, v| s.regs.or(v.u8())),
    op("RST 30h", 0, 16, |s, b, _| call_to(s, b, 0x0030)),
    op("LD HL,SP+i8", 1, 12, |s, _, v| {
        let w = s.regs.add_sp_offset(s.sp, v.i8());
        s.regs.hl.set_word(w);
    }),
    op("LD SP,HL", 0, 8, |s, _, _| s.sp = s.regs.hl.word()),
    op("LD A,(u16)", 2, 16, |s, b, v| s.regs.af.hi = b.read(v.u16())),
    op("EI", 0, 4, |_, b, _| b.interrupt.set_master(true)),
    unused(),
    unused(),
    op("CP A,u8", 1, 8, |s, _, v| s.regs.cp(v.u8())),
    op("RST 38h", 0, 16, |s, b, _| call_to(s, b, 0x0038)),
];

#[cfg(test)]
mod tests {
    use super::*;

    /// The hardware traps: slots with no execution routine.
    pub(crate) const UNUSED_SLOTS: [u8; 11] = [
        0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
    ];

    #[test]
    fn exactly_the_trap_slots_are_unused() {
        for (i, entry) in OPCODES.iter().enumerate() {
            let expect_unused = UNUSED_SLOTS.contains(&(i as u8));
            assert_eq!(
                entry.exec.is_none(),
                expect_unused,
                "opcode 0x{i:02X} ({})",
                entry.mnemonic
            );
        }
    }

    #[test]
    fn implemented_entries_have_costs() {
        for (i, entry) in OPCODES.iter().enumerate() {
            if entry.exec.is_some() {
                assert!(entry.cycles >= 4, "opcode 0x{i:02X}");
                assert!(entry.cycles % 4 == 0, "opcode 0x{i:02X}");
                assert!(entry.cycles_taken >= entry.cycles, "opcode 0x{i:02X}");
                assert!(entry.length <= 2, "opcode 0x{i:02X}");
            }
        }
    }

    #[test]
    fn conditional_entries_carry_two_costs() {
        for i in [0x20u8, 0x28, 0x30, 0x38] {
            let e = &OPCODES[i as usize];
            assert_eq!((e.cycles, e.cycles_taken), (8, 12), "JR cc 0x{i:02X}");
        }
        for i in [0xC0u8, 0xC8, 0xD0, 0xD8] {
            let e = &OPCODES[i as usize];
            assert_eq!((e.cycles, e.cycles_taken), (8, 20), "RET cc 0x{i:02X}");
        }
        for i in [0xC2u8, 0xCA, 0xD2, 0xDA] {
            let e = &OPCODES[i as usize];
            assert_eq!((e.cycles, e.cycles_taken), (12, 16), "JP cc 0x{i:02X}");
        }
        for i in [0xC4u8, 0xCC, 0xD4, 0xDC] {
            let e = &OPCODES[i as usize];
            assert_eq!((e.cycles, e.cycles_taken), (12, 24), "CALL cc 0x{i:02X}");
        }
    }

    #[test]
    fn operand_views() {
        let v = Operand::word(0x34, 0x12);
        assert_eq!(v.u16(), 0x1234);
        assert_eq!(v.u8(), 0x34);
        let v = Operand::byte(0xFE);
        assert_eq!(v.i8(), -2);
    }
}
