/*!
Single-step orchestration: fetch, decode, execute, charge cycles, step
the rest of the machine, then poll the interrupt controller.

One step is one instruction (or one idle tick while parked). The flow:

1. Hand off the boot overlay the first time PC reaches 0x0100.
2. If parked by STOP/HALT, wake when any interrupt request is pending;
   otherwise idle for one machine cycle so the picture unit (the very
   source of the wake-up) keeps running.
3. Fetch the opcode at PC; 0xCB selects the extended table and fetches a
   second opcode byte.
4. Fetch the descriptor's operand bytes, then run its routine. A slot
   with no routine is a fatal decode error naming the opcode and its
   address.
5. Advance the bus by the descriptor's cost, using the taken-branch cost
   when the routine latched one.
6. Service at most one pending, enabled interrupt: clear its request
   bit, drop the master latch, push PC, jump to the fixed vector, and
   charge the fixed dispatch cost.
*/

use crate::bus::Bus;
use crate::cpu::cb::CB_OPCODES;
use crate::cpu::state::CpuState;
use crate::cpu::table::{OPCODES, Operand};
use crate::error::{CoreError, Result};

/// Fixed cost of vectoring to an interrupt handler, in T-cycles.
pub const INTERRUPT_DISPATCH_CYCLES: u32 = 20;

/// Idle cost per step while parked by STOP/HALT.
const STOPPED_IDLE_CYCLES: u32 = 4;

/// The extended-table prefix byte.
const PREFIX: u8 = 0xCB;

/// Execute one interpreter step. Returns the T-cycles consumed.
pub fn step(state: &mut CpuState, bus: &mut Bus) -> Result<u32> {
    if bus.boot_active() && state.pc == 0x0100 {
        bus.finish_boot();
    }

    if state.stopped() {
        if bus.interrupt.requested() != 0 {
            state.resume();
        } else {
            bus.tick(STOPPED_IDLE_CYCLES);
            return Ok(STOPPED_IDLE_CYCLES);
        }
    }

    let at = state.pc;
    let mut code = state.fetch(bus);
    let prefixed = code == PREFIX;
    let entry = if prefixed {
        code = state.fetch(bus);
        &CB_OPCODES[usize::from(code)]
    } else {
        &OPCODES[usize::from(code)]
    };

    let operand = match entry.length {
        0 => Operand::NONE,
        1 => Operand::byte(state.fetch(bus)),
        _ => {
            let lo = state.fetch(bus);
            let hi = state.fetch(bus);
            Operand::word(lo, hi)
        }
    };

    let Some(exec) = entry.exec else {
        return Err(CoreError::IllegalOpcode {
            opcode: code,
            addr: at,
            prefixed,
        });
    };

    log::trace!("[0x{at:04X}] executing {}", entry.mnemonic);
    exec(state, bus, operand);

    let mut cycles = if state.take_branch() {
        entry.cycles_taken
    } else {
        entry.cycles
    };
    bus.tick(cycles);

    cycles += service_interrupts(state, bus);
    Ok(cycles)
}

/// Dispatch the highest-priority pending, enabled interrupt, if any.
fn service_interrupts(state: &mut CpuState, bus: &mut Bus) -> u32 {
    let Some(source) = bus.interrupt.pending() else {
        return 0;
    };
    bus.interrupt.acknowledge(source);
    let pc = state.pc;
    state.push(bus, pc);
    state.pc = source.vector();
    bus.tick(INTERRUPT_DISPATCH_CYCLES);
    INTERRUPT_DISPATCH_CYCLES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::flags::{CARRY, HALF_CARRY, NEGATIVE, ZERO};
    use crate::interrupt::Source;
    use crate::test_utils::{bus_with_program, bus_with_program_at};

    fn stepped(bus: &mut Bus, state: &mut CpuState, n: usize) -> u32 {
        let mut total = 0;
        for _ in 0..n {
            total += step(state, bus).expect("step");
        }
        total
    }

    #[test]
    fn end_to_end_add_then_stop() {
        // LD A,0x05; ADD A,0x03; STOP
        let mut bus = bus_with_program(&[0x3E, 0x05, 0xC6, 0x03, 0x10, 0x00]);
        let mut state = CpuState::new();

        let cycles = stepped(&mut bus, &mut state, 2);
        assert_eq!(state.regs.a(), 0x08);
        for mask in [ZERO, CARRY, HALF_CARRY, NEGATIVE] {
            assert!(!state.regs.flag(mask));
        }
        // Both instructions advance the clock by their declared costs.
        assert_eq!(cycles, 8 + 8);
        assert_eq!(bus.clock.t_cycles(), 16);

        step(&mut state, &mut bus).unwrap();
        assert!(state.stopped());
    }

    #[test]
    fn illegal_opcode_is_a_fatal_decode_error() {
        let mut bus = bus_with_program(&[0xD3]);
        let mut state = CpuState::new();
        match step(&mut state, &mut bus) {
            Err(CoreError::IllegalOpcode {
                opcode,
                addr,
                prefixed,
            }) => {
                assert_eq!(opcode, 0xD3);
                assert_eq!(addr, 0x0100);
                assert!(!prefixed);
            }
            other => panic!("expected IllegalOpcode, got {other:?}"),
        }
    }

    #[test]
    fn prefixed_opcodes_execute_from_the_extended_table() {
        // SWAP A via the prefix byte.
        let mut bus = bus_with_program(&[0x3E, 0xF1, 0xCB, 0x37]);
        let mut state = CpuState::new();
        stepped(&mut bus, &mut state, 2);
        assert_eq!(state.regs.a(), 0x1F);
        assert_eq!(bus.clock.t_cycles(), 8 + 8);
    }

    #[test]
    fn relative_jump_displaces_from_the_next_instruction() {
        // JR +2 skips the two bytes after the operand.
        // 0x100: JR +2; 0x102: (skipped); 0x104: LD A,0x44
        let mut bus = bus_with_program(&[0x18, 0x02, 0x00, 0x00, 0x3E, 0x44]);
        let mut state = CpuState::new();
        step(&mut state, &mut bus).unwrap();
        assert_eq!(state.pc, 0x0104);
        step(&mut state, &mut bus).unwrap();
        assert_eq!(state.regs.a(), 0x44);
    }

    #[test]
    fn conditional_branch_charges_both_fixed_costs() {
        // JR NZ with Z set: untaken.
        let mut bus = bus_with_program(&[0xAF, 0x20, 0x02, 0x20, 0x02]);
        let mut state = CpuState::new();
        step(&mut state, &mut bus).unwrap(); // XOR A: sets Z
        let untaken = step(&mut state, &mut bus).unwrap();
        assert_eq!(untaken, 8);
        assert_eq!(state.pc, 0x0103);

        // Clear Z and take the same branch shape.
        state.regs.set_flag(ZERO, false);
        let taken = step(&mut state, &mut bus).unwrap();
        assert_eq!(taken, 12);
        assert_eq!(state.pc, 0x0107);
    }

    #[test]
    fn call_and_ret_round_trip_through_the_stack() {
        // 0x100: CALL 0x0110; 0x103: STOP ... 0x110: RET
        let mut program = vec![0xCD, 0x10, 0x01, 0x10, 0x00];
        program.resize(0x10, 0x00);
        program.push(0xC9); // at 0x0110
        let mut bus = bus_with_program(&program);
        let mut state = CpuState::new();

        let sp0 = state.sp;
        step(&mut state, &mut bus).unwrap();
        assert_eq!(state.pc, 0x0110);
        assert_eq!(state.sp, sp0.wrapping_sub(2));

        step(&mut state, &mut bus).unwrap();
        assert_eq!(state.pc, 0x0103);
        assert_eq!(state.sp, sp0);
    }

    #[test]
    fn interrupt_dispatch_vectors_and_charges_fixed_cost() {
        let mut bus = bus_with_program(&[0x00, 0x00]);
        let mut state = CpuState::new();
        bus.interrupt.set_master(true);
        bus.interrupt.set_enabled(0x1F);
        bus.interrupt.request(Source::Timer);

        let cycles = step(&mut state, &mut bus).unwrap();
        assert_eq!(cycles, 4 + INTERRUPT_DISPATCH_CYCLES);
        assert_eq!(state.pc, Source::Timer.vector());
        assert!(!bus.interrupt.master());
        assert_eq!(bus.interrupt.requested(), 0);
        // The interrupted PC (0x0101) is on the stack.
        assert_eq!(bus.read_word(state.sp), 0x0101);
    }

    #[test]
    fn highest_priority_request_dispatches_first() {
        let mut bus = bus_with_program(&[0x00]);
        let mut state = CpuState::new();
        bus.interrupt.set_master(true);
        bus.interrupt.set_enabled(0x1F);
        bus.interrupt.request(Source::Joypad);
        bus.interrupt.request(Source::VBlank);

        step(&mut state, &mut bus).unwrap();
        assert_eq!(state.pc, Source::VBlank.vector());
        assert_eq!(bus.interrupt.requested(), Source::Joypad.mask());
    }

    #[test]
    fn ei_services_the_accumulated_backlog() {
        // Requests pile up while the master latch is off; EI lets the
        // next boundary service them.
        let mut bus = bus_with_program(&[0x00, 0xFB, 0x00]);
        let mut state = CpuState::new();
        bus.interrupt.set_enabled(0x1F);
        bus.interrupt.request(Source::Serial);

        step(&mut state, &mut bus).unwrap(); // NOP: nothing dispatched
        assert_eq!(state.pc, 0x0101);
        step(&mut state, &mut bus).unwrap(); // EI
        assert_eq!(state.pc, Source::Serial.vector());
    }

    #[test]
    fn reti_restores_the_master_latch() {
        // RETI at the v-blank vector returns to the interrupted code.
        let mut bus = bus_with_program_at(
            &[0x00, 0x10, 0x00],
            &[(usize::from(Source::VBlank.vector()), &[0xD9][..])],
        );
        let mut state = CpuState::new();
        bus.interrupt.set_master(true);
        bus.interrupt.set_enabled(0x1F);
        bus.interrupt.request(Source::VBlank);

        step(&mut state, &mut bus).unwrap(); // NOP + dispatch
        assert_eq!(state.pc, Source::VBlank.vector());
        step(&mut state, &mut bus).unwrap(); // RETI
        assert_eq!(state.pc, 0x0101);
        assert!(bus.interrupt.master());
    }

    #[test]
    fn stop_parks_until_a_request_arrives() {
        let mut bus = bus_with_program(&[0x10, 0x00, 0x3E, 0x07]);
        let mut state = CpuState::new();
        step(&mut state, &mut bus).unwrap();
        assert!(state.stopped());

        // Parked steps idle but keep the clock moving.
        let t0 = bus.clock.t_cycles();
        step(&mut state, &mut bus).unwrap();
        assert!(state.stopped());
        assert!(bus.clock.t_cycles() > t0);
        assert_eq!(state.pc, 0x0102);

        // Any request wakes the interpreter.
        bus.interrupt.request(Source::Joypad);
        step(&mut state, &mut bus).unwrap();
        assert!(!state.stopped());
        assert_eq!(state.regs.a(), 0x07);
    }

    #[test]
    fn parked_machine_wakes_on_vblank() {
        // With no request pending, idle ticks eventually reach v-blank
        // and its request wakes the CPU.
        let mut bus = bus_with_program(&[0x76, 0x3E, 0x09]);
        let mut state = CpuState::new();
        step(&mut state, &mut bus).unwrap(); // HALT
        let mut guard = 0u32;
        while state.stopped() {
            step(&mut state, &mut bus).unwrap();
            guard += 1;
            assert!(guard < 20_000, "machine never woke");
        }
        step(&mut state, &mut bus).unwrap();
        assert_eq!(state.regs.a(), 0x09);
    }

    #[test]
    fn boot_overlay_hands_off_at_the_entry_point() {
        use crate::cartridge::{BootImage, Cartridge};
        // Boot: JP 0x0100. Cartridge byte 0 differs from the boot byte.
        let mut cart_image = vec![0x55u8; 0x200];
        cart_image[0x100] = 0x3E; // LD A,0x21
        cart_image[0x101] = 0x21;
        cart_image[0x102] = 0x10; // STOP
        cart_image[0x103] = 0x00;
        let mut bus = Bus::new();
        bus.attach_cartridge(Cartridge::from_bytes(&cart_image).unwrap());
        bus.attach_boot(BootImage::from_bytes(&[0xC3, 0x00, 0x01]).unwrap());
        let mut state = CpuState::new_with_boot();

        assert_eq!(bus.read(0x0000), 0xC3); // overlay visible
        step(&mut state, &mut bus).unwrap(); // JP 0x0100
        assert_eq!(state.pc, 0x0100);
        assert!(bus.boot_active());

        step(&mut state, &mut bus).unwrap(); // hand-off, then LD A,0x21
        assert!(!bus.boot_active());
        assert_eq!(state.regs.a(), 0x21);
        assert_eq!(bus.read(0x0000), 0x55); // cartridge now visible
    }
}
