//! Shared test utilities for building flat program images.
//!
//! These helpers de-duplicate image construction across the CPU, bus,
//! and machine tests. A "program" is placed at the cartridge entry
//! point (0x0100) where the interpreter starts after power-on; segments
//! at other addresses (interrupt vectors, data tables) can be supplied
//! separately.

#![allow(dead_code)]

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::machine::Machine;

/// Entry point of a cartridge program.
pub const ENTRY: usize = 0x0100;

/// Build a flat ROM image with `program` at the entry point.
pub fn rom_with_program(program: &[u8]) -> Vec<u8> {
    rom_with_segments(program, &[])
}

/// Build a flat ROM image with `program` at the entry point and extra
/// byte segments at explicit addresses (e.g. interrupt vectors).
pub fn rom_with_segments(program: &[u8], extra: &[(usize, &[u8])]) -> Vec<u8> {
    let mut image = vec![0u8; ENTRY + program.len()];
    image[ENTRY..].copy_from_slice(program);
    for (addr, bytes) in extra {
        if image.len() < addr + bytes.len() {
            image.resize(addr + bytes.len(), 0);
        }
        image[*addr..addr + bytes.len()].copy_from_slice(bytes);
    }
    image
}

/// A bus with `program` loaded at the entry point.
pub fn bus_with_program(program: &[u8]) -> Bus {
    bus_with_program_at(program, &[])
}

/// A bus with `program` at the entry point plus extra segments.
pub fn bus_with_program_at(program: &[u8], extra: &[(usize, &[u8])]) -> Bus {
    let rom = rom_with_segments(program, extra);
    let cart = Cartridge::from_bytes(&rom).expect("test image fits the ROM window");
    let mut bus = Bus::new();
    bus.attach_cartridge(cart);
    bus
}

/// A whole machine with `program` loaded at the entry point.
pub fn machine_with_program(program: &[u8]) -> Machine {
    let mut machine = Machine::new();
    machine
        .load_rom(&rom_with_program(program))
        .expect("test image fits the ROM window");
    machine
}
