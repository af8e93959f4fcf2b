/*!
Extended instruction table: the 256 opcodes reached through the 0xCB
prefix byte.

Every slot is populated (the prefix page has no hardware traps) and every
operation routes through the flag engine: the rotate/shift families, the
nibble swap, and the single-bit test/clear/set groups. Register forms
cost 8 T-cycles and the (HL) read-modify-write forms 16, except BIT
against (HL) which only reads and costs 12.

The page layout is regular: bits 3-7 of the opcode select the operation
and bits 0-2 the target (B, C, D, E, H, L, (HL), A).
*/

use crate::cpu::flags::{res_bit, set_bit};
use crate::cpu::table::{Opcode, Operand};

const fn op(
    mnemonic: &'static str,
    cycles: u32,
    exec: fn(&mut crate::cpu::state::CpuState, &mut crate::bus::Bus, Operand),
) -> Opcode {
    Opcode {
        mnemonic,
        length: 0,
        cycles,
        cycles_taken: cycles,
        exec: Some(exec),
    }
}

pub static CB_OPCODES: [Opcode; 256] = [
    // 0x00: RLC r
    op("RLC B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bc.hi = s.regs.rlc(x);
    }),
    op("RLC C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bc.lo = s.regs.rlc(x);
    }),
    op("RLC D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.de.hi = s.regs.rlc(x);
    }),
    op("RLC E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.de.lo = s.regs.rlc(x);
    }),
    op("RLC H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.hl.hi = s.regs.rlc(x);
    }),
    op("RLC L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.hl.lo = s.regs.rlc(x);
    }),
    op("RLC (HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = b.read(a);
        let x = s.regs.rlc(x);
        b.write(a, x);
    }),
    op("RLC A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.af.hi = s.regs.rlc(x);
    }),
    // 0x08: RRC r
    op("RRC B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bc.hi = s.regs.rrc(x);
    }),
    op("RRC C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bc.lo = s.regs.rrc(x);
    }),
    op("RRC D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.de.hi = s.regs.rrc(x);
    }),
    op("RRC E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.de.lo = s.regs.rrc(x);
    }),
    op("RRC H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.hl.hi = s.regs.rrc(x);
    }),
    op("RRC L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.hl.lo = s.regs.rrc(x);
    }),
    op("RRC (HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = b.read(a);
        let x = s.regs.rrc(x);
        b.write(a, x);
    }),
    op("RRC A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.af.hi = s.regs.rrc(x);
    }),
    // 0x10: RL r
    op("RL B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bc.hi = s.regs.rl(x);
    }),
    op("RL C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bc.lo = s.regs.rl(x);
    }),
    op("RL D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.de.hi = s.regs.rl(x);
    }),
    op("RL E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.de.lo = s.regs.rl(x);
    }),
    op("RL H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.hl.hi = s.regs.rl(x);
    }),
    op("RL L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.hl.lo = s.regs.rl(x);
    }),
    op("RL (HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = b.read(a);
        let x = s.regs.rl(x);
        b.write(a, x);
    }),
    op("RL A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.af.hi = s.regs.rl(x);
    }),
    // 0x18: RR r
    op("RR B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bc.hi = s.regs.rr(x);
    }),
    op("RR C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bc.lo = s.regs.rr(x);
    }),
    op("RR D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.de.hi = s.regs.rr(x);
    }),
    op("RR E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.de.lo = s.regs.rr(x);
    }),
    op("RR H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.hl.hi = s.regs.rr(x);
    }),
    op("RR L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.hl.lo = s.regs.rr(x);
    }),
    op("RR (HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = b.read(a);
        let x = s.regs.rr(x);
        b.write(a, x);
    }),
    op("RR A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.af.hi = s.regs.rr(x);
    }),
    // 0x20: SLA r
    op("SLA B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bc.hi = s.regs.sla(x);
    }),
    op("SLA C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bc.lo = s.regs.sla(x);
    }),
    op("SLA D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.de.hi = s.regs.sla(x);
    }),
    op("SLA E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.de.lo = s.regs.sla(x);
    }),
    op("SLA H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.hl.hi = s.regs.sla(x);
    }),
    op("SLA L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.hl.lo = s.regs.sla(x);
    }),
    op("SLA (HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = b.read(a);
        let x = s.regs.sla(x);
        b.write(a, x);
    }),
    op("SLA A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.af.hi = s.regs.sla(x);
    }),
    // 0x28: SRA r
    op("SRA B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bc.hi = s.regs.sra(x);
    }),
    op("SRA C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bc.lo = s.regs.sra(x);
    }),
    op("SRA D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.de.hi = s.regs.sra(x);
    }),
    op("SRA E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.de.lo = s.regs.sra(x);
    }),
    op("SRA H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.hl.hi = s.regs.sra(x);
    }),
    op("SRA L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.hl.lo = s.regs.sra(x);
    }),
    op("SRA (HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = b.read(a);
        let x = s.regs.sra(x);
        b.write(a, x);
    }),
    op("SRA A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.af.hi = s.regs.sra(x);
    }),
    // 0x30: SWAP r
    op("SWAP B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bc.hi = s.regs.swap(x);
    }),
    op("SWAP C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bc.lo = s.regs.swap(x);
    }),
    op("SWAP D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.de.hi = s.regs.swap(x);
    }),
    op("SWAP E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.de.lo = s.regs.swap(x);
    }),
    op("SWAP H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.hl.hi = s.regs.swap(x);
    }),
    op("SWAP L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.hl.lo = s.regs.swap(x);
    }),
    op("SWAP (HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = b.read(a);
        let x = s.regs.swap(x);
        b.write(a, x);
    }),
    op("SWAP A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.af.hi = s.regs.swap(x);
    }),
    // 0x38: SRL r
    op("SRL B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bc.hi = s.regs.srl(x);
    }),
    op("SRL C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bc.lo = s.regs.srl(x);
    }),
    op("SRL D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.de.hi = s.regs.srl(x);
    }),
    op("SRL E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.de.lo = s.regs.srl(x);
    }),
    op("SRL H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.hl.hi = s.regs.srl(x);
    }),
    op("SRL L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.hl.lo = s.regs.srl(x);
    }),
    op("SRL (HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = b.read(a);
        let x = s.regs.srl(x);
        b.write(a, x);
    }),
    op("SRL A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.af.hi = s.regs.srl(x);
    }),
    // 0x40: BIT 0,r
    op("BIT 0,B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bit(0, x);
    }),
    op("BIT 0,C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bit(0, x);
    }),
    op("BIT 0,D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.bit(0, x);
    }),
    op("BIT 0,E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.bit(0, x);
    }),
    op("BIT 0,H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.bit(0, x);
    }),
    op("BIT 0,L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.bit(0, x);
    }),
    op("BIT 0,(HL)", 12, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.bit(0, x);
    }),
    op("BIT 0,A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.bit(0, x);
    }),
    // 0x48: BIT 1,r
    op("BIT 1,B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bit(1, x);
    }),
    op("BIT 1,C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bit(1, x);
    }),
    op("BIT 1,D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.bit(1, x);
    }),
    op("BIT 1,E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.bit(1, x);
    }),
    op("BIT 1,H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.bit(1, x);
    }),
    op("BIT 1,L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.bit(1, x);
    }),
    op("BIT 1,(HL)", 12, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.bit(1, x);
    }),
    op("BIT 1,A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.bit(1, x);
    }),
    // 0x50: BIT 2,r
    op("BIT 2,B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bit(2, x);
    }),
    op("BIT 2,C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bit(2, x);
    }),
    op("BIT 2,D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.bit(2, x);
    }),
    op("BIT 2,E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.bit(2, x);
    }),
    op("BIT 2,H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.bit(2, x);
    }),
    op("BIT 2,L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.bit(2, x);
    }),
    op("BIT 2,(HL)", 12, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.bit(2, x);
    }),
    op("BIT 2,A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.bit(2, x);
    }),
    // 0x58: BIT 3,r
    op("BIT 3,B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bit(3, x);
    }),
    op("BIT 3,C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bit(3, x);
    }),
    op("BIT 3,D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.bit(3, x);
    }),
    op("BIT 3,E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.bit(3, x);
    }),
    op("BIT 3,H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.bit(3, x);
    }),
    op("BIT 3,L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.bit(3, x);
    }),
    op("BIT 3,(HL)", 12, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.bit(3, x);
    }),
    op("BIT 3,A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.bit(3, x);
    }),
    // 0x60: BIT 4,r
    op("BIT 4,B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bit(4, x);
    }),
    op("BIT 4,C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bit(4, x);
    }),
    op("BIT 4,D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.bit(4, x);
    }),
    op("BIT 4,E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.bit(4, x);
    }),
    op("BIT 4,H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.bit(4, x);
    }),
    op("BIT 4,L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.bit(4, x);
    }),
    op("BIT 4,(HL)", 12, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.bit(4, x);
    }),
    op("BIT 4,A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.bit(4, x);
    }),
    // 0x68: BIT 5,r
    op("BIT 5,B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bit(5, x);
    }),
    op("BIT 5,C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bit(5, x);
    }),
    op("BIT 5,D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.bit(5, x);
    }),
    op("BIT 5,E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.bit(5, x);
    }),
    op("BIT 5,H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.bit(5, x);
    }),
    op("BIT 5,L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.bit(5, x);
    }),
    op("BIT 5,(HL)", 12, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.bit(5, x);
    }),
    op("BIT 5,A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.bit(5, x);
    }),
    // 0x70: BIT 6,r
    op("BIT 6,B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bit(6, x);
    }),
    op("BIT 6,C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bit(6, x);
    }),
    op("BIT 6,D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.bit(6, x);
    }),
    op("BIT 6,E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.bit(6, x);
    }),
    op("BIT 6,H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.bit(6, x);
    }),
    op("BIT 6,L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.bit(6, x);
    }),
    op("BIT 6,(HL)", 12, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.bit(6, x);
    }),
    op("BIT 6,A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.bit(6, x);
    }),
    // 0x78: BIT 7,r
    op("BIT 7,B", 8, |s, _, _| {
        let x = s.regs.bc.hi;
        s.regs.bit(7, x);
    }),
    op("BIT 7,C", 8, |s, _, _| {
        let x = s.regs.bc.lo;
        s.regs.bit(7, x);
    }),
    op("BIT 7,D", 8, |s, _, _| {
        let x = s.regs.de.hi;
        s.regs.bit(7, x);
    }),
    op("BIT 7,E", 8, |s, _, _| {
        let x = s.regs.de.lo;
        s.regs.bit(7, x);
    }),
    op("BIT 7,H", 8, |s, _, _| {
        let x = s.regs.hl.hi;
        s.regs.bit(7, x);
    }),
    op("BIT 7,L", 8, |s, _, _| {
        let x = s.regs.hl.lo;
        s.regs.bit(7, x);
    }),
    op("BIT 7,(HL)", 12, |s, b, _| {
        let x = b.read(s.regs.hl.word());
        s.regs.bit(7, x);
    }),
    op("BIT 7,A", 8, |s, _, _| {
        let x = s.regs.af.hi;
        s.regs.bit(7, x);
    }),
    // 0x80: RES 0,r
    op("RES 0,B", 8, |s, _, _| s.regs.bc.hi = res_bit(0, s.regs.bc.hi)),
    op("RES 0,C", 8, |s, _, _| s.regs.bc.lo = res_bit(0, s.regs.bc.lo)),
    op("RES 0,D", 8, |s, _, _| s.regs.de.hi = res_bit(0, s.regs.de.hi)),
    op("RES 0,E", 8, |s, _, _| s.regs.de.lo = res_bit(0, s.regs.de.lo)),
    op("RES 0,H", 8, |s, _, _| s.regs.hl.hi = res_bit(0, s.regs.hl.hi)),
    op("RES 0,L", 8, |s, _, _| s.regs.hl.lo = res_bit(0, s.regs.hl.lo)),
    op("RES 0,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = res_bit(0, b.read(a));
        b.write(a, x);
    }),
    op("RES 0,A", 8, |s, _, _| s.regs.af.hi = res_bit(0, s.regs.af.hi)),
    // 0x88: RES 1,r
    op("RES 1,B", 8, |s, _, _| s.regs.bc.hi = res_bit(1, s.regs.bc.hi)),
    op("RES 1,C", 8, |s, _, _| s.regs.bc.lo = res_bit(1, s.regs.bc.lo)),
    op("RES 1,D", 8, |s, _, _| s.regs.de.hi = res_bit(1, s.regs.de.hi)),
    op("RES 1,E", 8, |s, _, _| s.regs.de.lo = res_bit(1, s.regs.de.lo)),
    op("RES 1,H", 8, |s, _, _| s.regs.hl.hi = res_bit(1, s.regs.hl.hi)),
    op("RES 1,L", 8, |s, _, _| s.regs.hl.lo = res_bit(1, s.regs.hl.lo)),
    op("RES 1,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = res_bit(1, b.read(a));
        b.write(a, x);
    }),
    op("RES 1,A", 8, |s, _, _| s.regs.af.hi = res_bit(1, s.regs.af.hi)),
    // 0x90: RES 2,r
    op("RES 2,B", 8, |s, _, _| s.regs.bc.hi = res_bit(2, s.regs.bc.hi)),
    op("RES 2,C", 8, |s, _, _| s.regs.bc.lo = res_bit(2, s.regs.bc.lo)),
    op("RES 2,D", 8, |s, _, _| s.regs.de.hi = res_bit(2, s.regs.de.hi)),
    op("RES 2,E", 8, |s, _, _| s.regs.de.lo = res_bit(2, s.regs.de.lo)),
    op("RES 2,H", 8, |s, _, _| s.regs.hl.hi = res_bit(2, s.regs.hl.hi)),
    op("RES 2,L", 8, |s, _, _| s.regs.hl.lo = res_bit(2, s.regs.hl.lo)),
    op("RES 2,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = res_bit(2, b.read(a));
        b.write(a, x);
    }),
    op("RES 2,A", 8, |s, _, _| s.regs.af.hi = res_bit(2, s.regs.af.hi)),
    // 0x98: RES 3,r
    op("RES 3,B", 8, |s, _, _| s.regs.bc.hi = res_bit(3, s.regs.bc.hi)),
    op("RES 3,C", 8, |s, _, _| s.regs.bc.lo = res_bit(3, s.regs.bc.lo)),
    op("RES 3,D", 8, |s, _, _| s.regs.de.hi = res_bit(3, s.regs.de.hi)),
    op("RES 3,E", 8, |s, _, _| s.regs.de.lo = res_bit(3, s.regs.de.lo)),
    op("RES 3,H", 8, |s, _, _| s.regs.hl.hi = res_bit(3, s.regs.hl.hi)),
    op("RES 3,L", 8, |s, _, _| s.regs.hl.lo = res_bit(3, s.regs.hl.lo)),
    op("RES 3,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = res_bit(3, b.read(a));
        b.write(a, x);
    }),
    op("RES 3,A", 8, |s, _, _| s.regs.af.hi = res_bit(3, s.regs.af.hi)),
    // 0xA0: RES 4,r
    op("RES 4,B", 8, |s, _, _| s.regs.bc.hi = res_bit(4, s.regs.bc.hi)),
    op("RES 4,C", 8, |s, _, _| s.regs.bc.lo = res_bit(4, s.regs.bc.lo)),
    op("RES 4,D", 8, |s, _, _| s.regs.de.hi = res_bit(4, s.regs.de.hi)),
    op("RES 4,E", 8, |s, _, _| s.regs.de.lo = res_bit(4, s.regs.de.lo)),
    op("RES 4,H", 8, |s, _, _| s.regs.hl.hi = res_bit(4, s.regs.hl.hi)),
    op("RES 4,L", 8, |s, _, _| s.regs.hl.lo = res_bit(4, s.regs.hl.lo)),
    op("RES 4,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = res_bit(4, b.read(a));
        b.write(a, x);
    }),
    op("RES 4,A", 8, |s, _, _| s.regs.af.hi = res_bit(4, s.regs.af.hi)),
    // 0xA8: RES 5,r
    op("RES 5,B", 8, |s, _, _| s.regs.bc.hi = res_bit(5, s.regs.bc.hi)),
    op("RES 5,C", 8, |s, _, _| s.regs.bc.lo = res_bit(5, s.regs.bc.lo)),
    op("RES 5,D", 8, |s, _, _| s.regs.de.hi = res_bit(5, s.regs.de.hi)),
    op("RES 5,E", 8, |s, _, _| s.regs.de.lo = res_bit(5, s.regs.de.lo)),
    op("RES 5,H", 8, |s, _, _| s.regs.hl.hi = res_bit(5, s.regs.hl.hi)),
    op("RES 5,L", 8, |s, _, _| s.regs.hl.lo = res_bit(5, s.regs.hl.lo)),
    op("RES 5,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = res_bit(5, b.read(a));
        b.write(a, x);
    }),
    op("RES 5,A", 8, |s, _, _| s.regs.af.hi = res_bit(5, s.regs.af.hi)),
    // 0xB0: RES 6,r
    op("RES 6,B", 8, |s, _, _| s.regs.bc.hi = res_bit(6, s.regs.bc.hi)),
    op("RES 6,C", 8, |s, _, _| s.regs.bc.lo = res_bit(6, s.regs.bc.lo)),
    op("RES 6,D", 8, |s, _, _| s.regs.de.hi = res_bit(6, s.regs.de.hi)),
    op("RES 6,E", 8, |s, _, _| s.regs.de.lo = res_bit(6, s.regs.de.lo)),
    op("RES 6,H", 8, |s, _, _| s.regs.hl.hi = res_bit(6, s.regs.hl.hi)),
    op("RES 6,L", 8, |s, _, _| s.regs.hl.lo = res_bit(6, s.regs.hl.lo)),
    op("RES 6,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = res_bit(6, b.read(a));
        b.write(a, x);
    }),
    op("RES 6,A", 8, |s, _, _| s.regs.af.hi = res_bit(6, s.regs.af.hi)),
    // 0xB8: RES 7,r
    op("RES 7,B", 8, |s, _, _| s.regs.bc.hi = res_bit(7, s.regs.bc.hi)),
    op("RES 7,C", 8, |s, _, _| s.regs.bc.lo = res_bit(7, s.regs.bc.lo)),
    op("RES 7,D", 8, |s, _, _| s.regs.de.hi = res_bit(7, s.regs.de.hi)),
    op("RES 7,E", 8, |s, _, _| s.regs.de.lo = res_bit(7, s.regs.de.lo)),
    op("RES 7,H", 8, |s, _, _| s.regs.hl.hi = res_bit(7, s.regs.hl.hi)),
    op("RES 7,L", 8, |s, _, _| s.regs.hl.lo = res_bit(7, s.regs.hl.lo)),
    op("RES 7,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = res_bit(7, b.read(a));
        b.write(a, x);
    }),
    op("RES 7,A", 8, |s, _, _| s.regs.af.hi = res_bit(7, s.regs.af.hi)),
    // 0xC0: SET 0,r
    op("SET 0,B", 8, |s, _, _| s.regs.bc.hi = set_bit(0, s.regs.bc.hi)),
    op("SET 0,C", 8, |s, _, _| s.regs.bc.lo = set_bit(0, s.regs.bc.lo)),
    op("SET 0,D", 8, |s, _, _| s.regs.de.hi = set_bit(0, s.regs.de.hi)),
    op("SET 0,E", 8, |s, _, _| s.regs.de.lo = set_bit(0, s.regs.de.lo)),
    op("SET 0,H", 8, |s, _, _| s.regs.hl.hi = set_bit(0, s.regs.hl.hi)),
    op("SET 0,L", 8, |s, _, _| s.regs.hl.lo = set_bit(0, s.regs.hl.lo)),
    op("SET 0,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = set_bit(0, b.read(a));
        b.write(a, x);
    }),
    op("SET 0,A", 8, |s, _, _| s.regs.af.hi = set_bit(0, s.regs.af.hi)),
    // 0xC8: SET 1,r
    op("SET 1,B", 8, |s, _, _| s.regs.bc.hi = set_bit(1, s.regs.bc.hi)),
    op("SET 1,C", 8, |s, _, _| s.regs.bc.lo = set_bit(1, s.regs.bc.lo)),
    op("SET 1,D", 8, |s, _, _| s.regs.de.hi = set_bit(1, s.regs.de.hi)),
    op("SET 1,E", 8, |s, _, _| s.regs.de.lo = set_bit(1, s.regs.de.lo)),
    op("SET 1,H", 8, |s, _, _| s.regs.hl.hi = set_bit(1, s.regs.hl.hi)),
    op("SET 1,L", 8, |s, _, _| s.regs.hl.lo = set_bit(1, s.regs.hl.lo)),
    op("SET 1,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = set_bit(1, b.read(a));
        b.write(a, x);
    }),
    op("SET 1,A", 8, |s, _, _| s.regs.af.hi = set_bit(1, s.regs.af.hi)),
    // 0xD0: SET 2,r
    op("SET 2,B", 8, |s, _, _| s.regs.bc.hi = set_bit(2, s.regs.bc.hi)),
    op("SET 2,C", 8, |s, _, _| s.regs.bc.lo = set_bit(2, s.regs.bc.lo)),
    op("SET 2,D", 8, |s, _, _| s.regs.de.hi = set_bit(2, s.regs.de.hi)),
    op("SET 2,E", 8, |s, _, _| s.regs.de.lo = set_bit(2, s.regs.de.lo)),
    op("SET 2,H", 8, |s, _, _| s.regs.hl.hi = set_bit(2, s.regs.hl.hi)),
    op("SET 2,L", 8, |s, _, _| s.regs.hl.lo = set_bit(2, s.regs.hl.lo)),
    op("SET 2,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = set_bit(2, b.read(a));
        b.write(a, x);
    }),
    op("SET 2,A", 8, |s, _, _| s.regs.af.hi = set_bit(2, s.regs.af.hi)),
    // 0xD8: SET 3,r
    op("SET 3,B", 8, |s, _, _| s.regs.bc.hi = set_bit(3, s.regs.bc.hi)),
    op("SET 3,C", 8, |s, _, _| s.regs.bc.lo = set_bit(3, s.regs.bc.lo)),
    op("SET 3,D", 8, |s, _, _| s.regs.de.hi = set_bit(3, s.regs.de.hi)),
    op("SET 3,E", 8, |s, _, _| s.regs.de.lo = set_bit(3, s.regs.de.lo)),
    op("SET 3,H", 8, |s, _, _| s.regs.hl.hi = set_bit(3, s.regs.hl.hi)),
    op("SET 3,L", 8, |s, _, _| s.regs.hl.lo = set_bit(3, s.regs.hl.lo)),
    op("SET 3,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = set_bit(3, b.read(a));
        b.write(a, x);
    }),
    op("SET 3,A", 8, |s, _, _| s.regs.af.hi = set_bit(3, s.regs.af.hi)),
    // 0xE0: SET 4,r
    op("SET 4,B", 8, |s, _, _| s.regs.bc.hi = set_bit(4, s.regs.bc.hi)),
    op("SET 4,C", 8, |s, _, _| s.regs.bc.lo = set_bit(4, s.regs.bc.lo)),
    op("SET 4,D", 8, |s, _, _| s.regs.de.hi = set_bit(4, s.regs.de.hi)),
    op("SET 4,E", 8, |s, _, _| s.regs.de.lo = set_bit(4, s.regs.de.lo)),
    op("SET 4,H", 8, |s, _, _| s.regs.hl.hi = set_bit(4, s.regs.hl.hi)),
    op("SET 4,L", 8, |s, _, _| s.regs.hl.lo = set_bit(4, s.regs.hl.lo)),
    op("SET 4,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = set_bit(4, b.read(a));
        b.write(a, x);
    }),
    op("SET 4,A", 8, |s, _, _| s.regs.af.hi = set_bit(4, s.regs.af.hi)),
    // 0xE8: SET 5,r
    op("SET 5,B", 8, |s, _, _| s.regs.bc.hi = set_bit(5, s.regs.bc.hi)),
    op("SET 5,C", 8, |s, _, _| s.regs.bc.lo = set_bit(5, s.regs.bc.lo)),
    op("SET 5,D", 8, |s, _, _| s.regs.de.hi = set_bit(5, s.regs.de.hi)),
    op("SET 5,E", 8, |s, _, _| s.regs.de.lo = set_bit(5, s.regs.de.lo)),
    op("SET 5,H", 8, |s, _, _| s.regs.hl.hi = set_bit(5, s.regs.hl.hi)),
    op("SET 5,L", 8, |s, _, _| s.regs.hl.lo = set_bit(5, s.regs.hl.lo)),
    op("SET 5,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = set_bit(5, b.read(a));
        b.write(a, x);
    }),
    op("SET 5,A", 8, |s, _, _| s.regs.af.hi = set_bit(5, s.regs.af.hi)),
    // 0xF0: SET 6,r
    op("SET 6,B", 8, |s, _, _| s.regs.bc.hi = set_bit(6, s.regs.bc.hi)),
    op("SET 6,C", 8, |s, _, _| s.regs.bc.lo = set_bit(6, s.regs.bc.lo)),
    op("SET 6,D", 8, |s, _, _| s.regs.de.hi = set_bit(6, s.regs.de.hi)),
    op("SET 6,E", 8, |s, _, _| s.regs.de.lo = set_bit(6, s.regs.de.lo)),
    op("SET 6,H", 8, |s, _, _| s.regs.hl.hi = set_bit(6, s.regs.hl.hi)),
    op("SET 6,L", 8, |s, _, _| s.regs.hl.lo = set_bit(6, s.regs.hl.lo)),
    op("SET 6,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = set_bit(6, b.read(a));
        b.write(a, x);
    }),
    op("SET 6,A", 8, |s, _, _| s.regs.af.hi = set_bit(6, s.regs.af.hi)),
    // 0xF8: SET 7,r
    op("SET 7,B", 8, |s, _, _| s.regs.bc.hi = set_bit(7, s.regs.bc.hi)),
    op("SET 7,C", 8, |s, _, _| s.regs.bc.lo = set_bit(7, s.regs.bc.lo)),
    op("SET 7,D", 8, |s, _, _| s.regs.de.hi = set_bit(7, s.regs.de.hi)),
    op("SET 7,E", 8, |s, _, _| s.regs.de.lo = set_bit(7, s.regs.de.lo)),
    op("SET 7,H", 8, |s, _, _| s.regs.hl.hi = set_bit(7, s.regs.hl.hi)),
    op("SET 7,L", 8, |s, _, _| s.regs.hl.lo = set_bit(7, s.regs.hl.lo)),
    op("SET 7,(HL)", 16, |s, b, _| {
        let a = s.regs.hl.word();
        let x = set_bit(7, b.read(a));
        b.write(a, x);
    }),
    op("SET 7,A", 8, |s, _, _| s.regs.af.hi = set_bit(7, s.regs.af.hi)),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Bus;
    use crate::cpu::state::CpuState;

    fn run(opcode: u8, s: &mut CpuState, b: &mut Bus) {
        let entry = &CB_OPCODES[opcode as usize];
        (entry.exec.expect("cb slots are all populated"))(s, b, Operand::NONE);
    }

    #[test]
    fn every_slot_is_populated() {
        for (i, e) in CB_OPCODES.iter().enumerate() {
            assert!(e.exec.is_some(), "cb opcode 0x{i:02X}");
            assert_eq!(e.length, 0, "cb opcode 0x{i:02X}");
        }
    }

    #[test]
    fn cycle_costs_follow_the_page_layout() {
        for (i, e) in CB_OPCODES.iter().enumerate() {
            let hl_form = (i & 0x07) == 6;
            let bit_row = (0x40..0x80).contains(&i);
            let expect = match (hl_form, bit_row) {
                (false, _) => 8,
                (true, true) => 12,
                (true, false) => 16,
            };
            assert_eq!(e.cycles, expect, "cb opcode 0x{i:02X} ({})", e.mnemonic);
        }
    }

    #[test]
    fn swap_a_exchanges_nibbles() {
        let mut s = CpuState::new();
        let mut b = Bus::new();
        s.regs.af.hi = 0xF1;
        run(0x37, &mut s, &mut b); // SWAP A
        assert_eq!(s.regs.af.hi, 0x1F);
    }

    #[test]
    fn rlc_b_carries_high_bit() {
        let mut s = CpuState::new();
        let mut b = Bus::new();
        s.regs.bc.hi = 0x80;
        run(0x00, &mut s, &mut b); // RLC B
        assert_eq!(s.regs.bc.hi, 0x01);
        assert!(s.regs.flag(crate::cpu::flags::CARRY));
    }

    #[test]
    fn bit_res_set_on_memory_operand() {
        let mut s = CpuState::new();
        let mut b = Bus::new();
        s.regs.hl.set_word(0xC123);
        b.write(0xC123, 0x00);

        run(0xC6, &mut s, &mut b); // SET 0,(HL)
        assert_eq!(b.read(0xC123), 0x01);

        run(0x46, &mut s, &mut b); // BIT 0,(HL)
        assert!(!s.regs.flag(crate::cpu::flags::ZERO));

        run(0x86, &mut s, &mut b); // RES 0,(HL)
        assert_eq!(b.read(0xC123), 0x00);

        run(0x46, &mut s, &mut b); // BIT 0,(HL)
        assert!(s.regs.flag(crate::cpu::flags::ZERO));
    }

    #[test]
    fn set_then_res_round_trips_registers() {
        let mut s = CpuState::new();
        let mut b = Bus::new();
        s.regs.de.lo = 0x00;
        run(0xDB, &mut s, &mut b); // SET 3,E
        assert_eq!(s.regs.de.lo, 0x08);
        run(0x9B, &mut s, &mut b); // RES 3,E
        assert_eq!(s.regs.de.lo, 0x00);
    }
}
