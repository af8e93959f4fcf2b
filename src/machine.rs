/*!
Machine facade: the host-facing surface wiring the interpreter to the
bus.

Owns one `Cpu` and one `Bus` and exposes image loading, single-stepping,
frame-granular running, and an open-ended run loop that honors a
host-level stop flag between instructions (never mid-instruction, so
machine state is always consistent at the check point).
*/

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::bus::Bus;
use crate::cartridge::{BootImage, Cartridge};
use crate::cpu::Cpu;
use crate::error::{CoreError, Result};
use crate::joypad::Button;

pub struct Machine {
    pub cpu: Cpu,
    pub bus: Bus,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: Bus::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Image loading
    // ---------------------------------------------------------------------

    /// Load a program image (up to 32 KiB) into the ROM window.
    pub fn load_rom(&mut self, data: &[u8]) -> Result<()> {
        self.bus.attach_cartridge(Cartridge::from_bytes(data)?);
        Ok(())
    }

    pub fn load_rom_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.bus.attach_cartridge(Cartridge::from_file(path)?);
        Ok(())
    }

    /// Load a boot image (up to 256 bytes); execution restarts at
    /// address zero with the overlay active.
    pub fn load_boot(&mut self, data: &[u8]) -> Result<()> {
        self.bus.attach_boot(BootImage::from_bytes(data)?);
        self.cpu = Cpu::new_with_boot();
        Ok(())
    }

    pub fn load_boot_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.bus.attach_boot(BootImage::from_file(path)?);
        self.cpu = Cpu::new_with_boot();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    /// Execute one interpreter step; returns the T-cycles consumed.
    pub fn step(&mut self) -> Result<u32> {
        self.cpu.step(&mut self.bus)
    }

    /// Run until the picture unit completes the current frame, then
    /// return the composited RGBA framebuffer.
    pub fn run_frame(&mut self) -> Result<&[u8]> {
        if !self.bus.has_program() {
            return Err(CoreError::NoProgram);
        }
        while !self.bus.ppu.take_frame_complete() {
            self.step()?;
        }
        Ok(self.bus.ppu.framebuffer())
    }

    /// Interpret instructions until `stop` is raised or a fatal error
    /// surfaces. The flag is checked between instructions only.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        if !self.bus.has_program() {
            return Err(CoreError::NoProgram);
        }
        while !stop.load(Ordering::Relaxed) {
            self.step()?;
        }
        Ok(())
    }

    /// The current frame, RGBA row-major.
    #[inline]
    pub fn framebuffer(&self) -> &[u8] {
        self.bus.ppu.framebuffer()
    }

    // ---------------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------------

    pub fn press(&mut self, button: Button) {
        self.bus.press_button(button);
    }

    pub fn release(&mut self, button: Button) {
        self.bus.release_button(button);
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu::{BYTES_PER_PIXEL, SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::test_utils::machine_with_program;

    #[test]
    fn run_requires_a_program() {
        let mut m = Machine::new();
        assert!(matches!(m.run_frame(), Err(CoreError::NoProgram)));
        let stop = AtomicBool::new(false);
        assert!(matches!(m.run(&stop), Err(CoreError::NoProgram)));
    }

    #[test]
    fn run_frame_produces_a_full_framebuffer() {
        // A parked machine still drives the picture unit.
        let mut m = machine_with_program(&[0x10, 0x00]);
        let frame = m.run_frame().expect("frame");
        assert_eq!(frame.len(), SCREEN_WIDTH * SCREEN_HEIGHT * BYTES_PER_PIXEL);
        // Blank tiles under the identity palette render white.
        assert_eq!(&frame[..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn stop_flag_halts_the_run_loop_between_instructions() {
        let mut m = machine_with_program(&[0x00, 0x00]);
        let stop = AtomicBool::new(true); // raised before the first step
        m.run(&stop).expect("clean exit");
        assert_eq!(m.cpu.state().pc, 0x0100);
    }

    #[test]
    fn fatal_errors_surface_from_the_run_loop() {
        let mut m = machine_with_program(&[0xD3]);
        let stop = AtomicBool::new(false);
        assert!(matches!(
            m.run(&stop),
            Err(CoreError::IllegalOpcode { opcode: 0xD3, .. })
        ));
    }

    #[test]
    fn clock_is_shared_between_steps_and_frames() {
        let mut m = machine_with_program(&[0x00, 0x00, 0x10, 0x00]);
        m.step().unwrap();
        assert_eq!(m.bus.clock.t_cycles(), 4);
        m.run_frame().unwrap();
        // One frame of the mode machine has elapsed in total.
        assert!(m.bus.clock.t_cycles() >= 65664);
    }
}
