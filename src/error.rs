/*!
Error taxonomy for the emulator core.

Three classes exist:
- fatal decode errors (`IllegalOpcode`), which abort the step loop;
- resource errors (`RomTooLarge`, `BootTooLarge`, `NoProgram`), reported
  before any execution begins;
- host I/O failures when loading images from disk.

Soft conditions (writes to ROM, unmapped I/O traffic) are not errors; the
bus accepts them as no-ops and emits a diagnostic instead, because real
programs probe those paths routinely.
*/

use thiserror::Error;

/// The size of the cartridge ROM window in bytes.
pub const ROM_WINDOW: usize = 0x8000;

/// The maximum size of a boot image in bytes.
pub const BOOT_WINDOW: usize = 0x100;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The interpreter fetched an opcode with no execution routine.
    /// `addr` is the address the opcode was fetched from; `prefixed`
    /// distinguishes the 0xCB-extended table.
    #[error("illegal opcode 0x{opcode:02X} (cb-prefixed: {prefixed}) at 0x{addr:04X}")]
    IllegalOpcode {
        opcode: u8,
        addr: u16,
        prefixed: bool,
    },

    /// Program image does not fit the 32 KiB ROM window.
    #[error("program image is {len} bytes; the ROM window holds {ROM_WINDOW}")]
    RomTooLarge { len: usize },

    /// Boot image does not fit the 256-byte boot window.
    #[error("boot image is {len} bytes; the boot window holds {BOOT_WINDOW}")]
    BootTooLarge { len: usize },

    /// Run was requested with neither a program nor a boot image loaded.
    #[error("no program or boot image loaded")]
    NoProgram,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
