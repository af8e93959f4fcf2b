#![doc = r#"
Dotmatrix library crate.

An emulator core for the programmable heart of an 8-bit handheld game
console: the 512-opcode instruction interpreter, the bit-exact flag
engine, the memory-mapped address bus, the interrupt controller, and the
scanline-granular picture unit, all sharing one notion of elapsed time.

Modules:
- bus: address decoding across all storage regions and memory-mapped I/O
- cartridge: flat ROM image and boot image loading
- clock: monotonic T-cycle counter
- cpu: interpreter facade, register file, flag engine, opcode tables
- error: CoreError taxonomy (fatal decode, resource, host I/O)
- interrupt: enable/request masks, master latch, fixed vectors
- joypad: button group select/poll register
- machine: top-level facade (load, step, run_frame, run)
- palette: the 4-shade abstraction and packed palette registers
- ppu: mode state machine, tile/sprite caches, scanline compositor

The core is single-threaded and synchronous; hosts embed it by driving
`Machine::step`/`run_frame` and presenting the RGBA framebuffer. The
optional `display` and `screenshot` features add thin windowing and PNG
wrappers around that surface.

In tests, shared program-image builders are available under
`crate::test_utils`.
"#]

// Core emulator modules
pub mod bus;
pub mod cartridge;
pub mod clock;
pub mod cpu;
pub mod error;
pub mod interrupt;
pub mod joypad;
pub mod machine;
pub mod palette;
pub mod ppu;

// Thin host-side wrappers (feature-gated)
#[cfg(feature = "display")]
pub mod display;
#[cfg(feature = "screenshot")]
pub mod screenshot;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use cartridge::{BootImage, Cartridge};
pub use cpu::Cpu;
pub use error::CoreError;
pub use joypad::Button;
pub use machine::Machine;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
