/*!
Cartridge: a flat program image filling (part of) the 32 KiB ROM window,
plus the optional 256-byte boot image that overlays low addresses until
execution reaches the cartridge entry point.

Bank switching is out of scope; images larger than the window are
rejected before any execution begins. The ROM is read-only: the bus
discards writes with a diagnostic rather than failing, because programs
probe that path routinely.
*/

use std::fs;
use std::path::Path;

use crate::error::{BOOT_WINDOW, CoreError, ROM_WINDOW, Result};

/// A flat, read-only program image occupying 0x0000-0x7FFF.
pub struct Cartridge {
    rom: Box<[u8; ROM_WINDOW]>,
    len: usize,
}

impl Cartridge {
    /// Load a cartridge from raw bytes. Short images are zero-padded to
    /// the window; oversize images are a resource error.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() > ROM_WINDOW {
            return Err(CoreError::RomTooLarge { len: data.len() });
        }
        let mut rom = Box::new([0u8; ROM_WINDOW]);
        rom[..data.len()].copy_from_slice(data);
        log::info!("loaded program image: {} bytes", data.len());
        Ok(Self {
            rom,
            len: data.len(),
        })
    }

    /// Load a cartridge from a file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }

    /// Bytes of the original image (before padding).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read a byte from the ROM window.
    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.rom[usize::from(addr)]
    }
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge").field("len", &self.len).finish()
    }
}

/// A boot image of up to 256 bytes, overlaid at address zero while
/// active.
pub struct BootImage {
    data: [u8; BOOT_WINDOW],
    len: usize,
}

impl BootImage {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() > BOOT_WINDOW {
            return Err(CoreError::BootTooLarge { len: data.len() });
        }
        let mut image = [0u8; BOOT_WINDOW];
        image[..data.len()].copy_from_slice(data);
        log::info!("loaded boot image: {} bytes", data.len());
        Ok(Self {
            data: image,
            len: data.len(),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }

    /// The byte at `addr` if the overlay covers it.
    #[inline]
    pub fn read(&self, addr: u16) -> Option<u8> {
        self.data.get(usize::from(addr)).copied()
    }
}

impl std::fmt::Debug for BootImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootImage").field("len", &self.len).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_images_are_zero_padded() {
        let cart = Cartridge::from_bytes(&[1, 2, 3]).unwrap();
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.read(0x0000), 1);
        assert_eq!(cart.read(0x0002), 3);
        assert_eq!(cart.read(0x0003), 0);
        assert_eq!(cart.read(0x7FFF), 0);
    }

    #[test]
    fn full_window_image_is_accepted() {
        let data = vec![0xAB; ROM_WINDOW];
        let cart = Cartridge::from_bytes(&data).unwrap();
        assert_eq!(cart.read(0x7FFF), 0xAB);
    }

    #[test]
    fn oversize_image_is_a_resource_error() {
        let data = vec![0; ROM_WINDOW + 1];
        match Cartridge::from_bytes(&data) {
            Err(CoreError::RomTooLarge { len }) => assert_eq!(len, ROM_WINDOW + 1),
            other => panic!("expected RomTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn oversize_boot_image_is_a_resource_error() {
        let data = vec![0; BOOT_WINDOW + 1];
        assert!(matches!(
            BootImage::from_bytes(&data),
            Err(CoreError::BootTooLarge { .. })
        ));
    }

    #[test]
    fn boot_image_covers_only_its_window() {
        let boot = BootImage::from_bytes(&[0x42; 16]).unwrap();
        assert_eq!(boot.read(0x0000), Some(0x42));
        assert_eq!(boot.read(0x00FF), Some(0x00)); // padded
        assert_eq!(boot.read(0x0100), None);
    }
}
