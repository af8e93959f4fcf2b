/*!
cpu - the instruction interpreter and its parts.

    regs.rs     - register pairs and the register file
    flags.rs    - the flag engine (ALU, rotates, bit ops, DAA)
    state.rs    - architectural state: registers, SP, PC, latches
    table.rs    - 256-entry base instruction table (descriptors as data)
    cb.rs       - 256-entry extended table behind the 0xCB prefix
    dispatch.rs - one-step orchestration and interrupt service

The public surface is the `Cpu` facade wrapping `CpuState`; internal
organization may evolve without affecting downstream code.
*/

pub mod cb;
pub mod dispatch;
pub mod flags;
pub mod regs;
pub mod state;
pub mod table;

use crate::bus::Bus;
use crate::error::Result;

pub use regs::{Pair, Registers};
pub use state::CpuState;

/// Facade over the interpreter: owns the architectural state and steps
/// it against a borrowed bus.
#[derive(Debug, Clone)]
pub struct Cpu {
    state: CpuState,
}

impl Cpu {
    /// A CPU at the cartridge entry point with post-boot registers.
    pub fn new() -> Self {
        Self {
            state: CpuState::new(),
        }
    }

    /// A CPU that starts in a boot image at address zero.
    pub fn new_with_boot() -> Self {
        Self {
            state: CpuState::new_with_boot(),
        }
    }

    /// Immutable view of the architectural state.
    #[inline]
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Mutable view of the architectural state (tests, debuggers).
    #[inline]
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// Execute one instruction (or idle tick while parked). Returns the
    /// T-cycles consumed.
    pub fn step(&mut self, bus: &mut Bus) -> Result<u32> {
        dispatch::step(&mut self.state, bus)
    }

    /// Run up to `max_instructions` steps, stopping early if parked.
    pub fn run(&mut self, bus: &mut Bus, max_instructions: usize) -> Result<()> {
        for _ in 0..max_instructions {
            if self.state.stopped() {
                break;
            }
            self.step(bus)?;
        }
        Ok(())
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::bus_with_program;

    #[test]
    fn facade_steps_the_interpreter() {
        let mut bus = bus_with_program(&[0x3E, 0x2A, 0x10, 0x00]);
        let mut cpu = Cpu::new();
        cpu.step(&mut bus).unwrap();
        assert_eq!(cpu.state().regs.a(), 0x2A);
    }

    #[test]
    fn run_stops_at_the_stop_latch() {
        let mut bus = bus_with_program(&[0x10, 0x00, 0x3E, 0x77]);
        let mut cpu = Cpu::new();
        cpu.run(&mut bus, 100).unwrap();
        assert!(cpu.state().stopped());
        assert_ne!(cpu.state().regs.a(), 0x77);
    }
}
