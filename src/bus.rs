/*!
Bus mapping the CPU address space to ROM, RAM regions, the picture unit,
and the memory-mapped I/O registers.

Address map:
- 0x0000-0x7FFF: cartridge ROM (boot image overlays 0x0000-0x00FF while
  active); writes are discarded with a diagnostic
- 0x8000-0x9FFF: video RAM; writes below 0x9800 re-decode the touched
  tile row in the picture unit's cache
- 0xA000-0xDFFF: external + work RAM (one 16 KiB backing store)
- 0xE000-0xFDFF: echo of work RAM (same backing store, not a copy)
- 0xFE00-0xFE9F: sprite attribute RAM; writes re-decode the touched
  sprite entry
- 0xFEA0-0xFEFF: unused gap; reads 0, writes ignored
- 0xFF00-0xFF7F: I/O registers, dispatched individually below
- 0xFF80-0xFFFE: high RAM
- 0xFFFF: interrupt enable mask

The bus also owns emulated time: `tick` advances the clock and steps the
picture unit by the same T-cycles, so every device sees one shared
timeline.
*/

use crate::cartridge::{BootImage, Cartridge};
use crate::clock::Clock;
use crate::interrupt::{InterruptController, Source};
use crate::joypad::{Button, Joypad};
use crate::ppu::{Ppu, TILE_DATA_SIZE, VRAM_SIZE};

/// External + work RAM size (0xA000-0xDFFF).
const RAM_SIZE: usize = 0x4000;
/// Sprite attribute RAM size.
const OAM_SIZE: usize = 0xA0;
/// High RAM size (0xFF80-0xFFFE).
const HRAM_SIZE: usize = 0x7F;

pub struct Bus {
    // Storage regions
    vram: [u8; VRAM_SIZE],
    ram: [u8; RAM_SIZE],
    oam: [u8; OAM_SIZE],
    hram: [u8; HRAM_SIZE],

    // Devices
    pub ppu: Ppu,
    pub joypad: Joypad,
    pub interrupt: InterruptController,
    pub clock: Clock,

    // Program images
    pub cartridge: Option<Cartridge>,
    boot: Option<BootImage>,
    boot_active: bool,

    // Free-running divider stand-in (0xFF04).
    div_state: u8,
}

impl Bus {
    pub fn new() -> Self {
        Self {
            vram: [0; VRAM_SIZE],
            ram: [0; RAM_SIZE],
            oam: [0; OAM_SIZE],
            hram: [0; HRAM_SIZE],
            ppu: Ppu::new(),
            joypad: Joypad::new(),
            interrupt: InterruptController::new(),
            clock: Clock::new(),
            cartridge: None,
            boot: None,
            boot_active: false,
            div_state: 0x4D,
        }
    }

    pub fn attach_cartridge(&mut self, cart: Cartridge) {
        self.cartridge = Some(cart);
    }

    /// Install a boot image; it overlays low ROM until execution first
    /// reaches 0x0100.
    pub fn attach_boot(&mut self, boot: BootImage) {
        self.boot = Some(boot);
        self.boot_active = true;
    }

    #[inline]
    pub fn boot_active(&self) -> bool {
        self.boot_active
    }

    /// Drop the boot overlay; the cartridge's own low addresses become
    /// visible.
    pub fn finish_boot(&mut self) {
        self.boot_active = false;
    }

    #[inline]
    pub fn has_program(&self) -> bool {
        self.cartridge.is_some() || self.boot.is_some()
    }

    // -----------------------------
    // CPU-visible memory interface
    // -----------------------------

    pub fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => {
                if self.boot_active {
                    if let Some(b) = self.boot.as_ref().and_then(|boot| boot.read(addr)) {
                        return b;
                    }
                }
                match &self.cartridge {
                    Some(cart) => cart.read(addr),
                    None => 0xFF,
                }
            }
            0x8000..=0x9FFF => self.vram[usize::from(addr - 0x8000)],
            0xA000..=0xDFFF => self.ram[usize::from(addr - 0xA000)],
            0xE000..=0xFDFF => self.ram[usize::from(addr - 0xC000)],
            0xFE00..=0xFE9F => self.oam[usize::from(addr - 0xFE00)],
            0xFEA0..=0xFEFF => 0,
            0xFF00..=0xFF7F => self.io_read(addr),
            0xFF80..=0xFFFE => self.hram[usize::from(addr - 0xFF80)],
            0xFFFF => self.interrupt.enabled(),
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => {
                // Cartridges probe this path routinely; accept and drop.
                log::warn!("discarding write to ROM: 0x{addr:04X} <- 0x{value:02X}");
            }
            0x8000..=0x9FFF => {
                let offset = usize::from(addr - 0x8000);
                self.vram[offset] = value;
                if offset < TILE_DATA_SIZE {
                    self.ppu.update_tile(offset, &self.vram);
                }
            }
            0xA000..=0xDFFF => self.ram[usize::from(addr - 0xA000)] = value,
            0xE000..=0xFDFF => self.ram[usize::from(addr - 0xC000)] = value,
            0xFE00..=0xFE9F => {
                let offset = usize::from(addr - 0xFE00);
                self.oam[offset] = value;
                self.ppu.update_sprite(offset, value);
            }
            0xFEA0..=0xFEFF => {}
            0xFF00..=0xFF7F => self.io_write(addr, value),
            0xFF80..=0xFFFE => self.hram[usize::from(addr - 0xFF80)] = value,
            0xFFFF => self.interrupt.set_enabled(value),
        }
    }

    /// Little-endian 16-bit read (low byte at the lower address).
    pub fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Little-endian 16-bit write.
    pub fn write_word(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write(addr, lo);
        self.write(addr.wrapping_add(1), hi);
    }

    // -----------------------------
    // I/O register dispatch
    // -----------------------------

    fn io_read(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF00 => self.joypad.poll(),
            0xFF04 => self.div_read(),
            0xFF0F => self.interrupt.requested(),
            0xFF40 => self.ppu.control,
            0xFF42 => self.ppu.scroll_y,
            0xFF43 => self.ppu.scroll_x,
            0xFF44 => self.ppu.scanline(),
            0xFF47 => self.ppu.bg_palette.read(),
            0xFF48 => self.ppu.obj_palettes[0].read(),
            0xFF49 => self.ppu.obj_palettes[1].read(),
            _ => 0,
        }
    }

    fn io_write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF00 => self.joypad.select(value),
            0xFF0F => self.interrupt.set_requested(value),
            0xFF40 => self.ppu.control = value,
            0xFF42 => self.ppu.scroll_y = value,
            0xFF43 => self.ppu.scroll_x = value,
            // 0xFF44 is read-only from the program's perspective.
            0xFF44 => {}
            0xFF46 => self.oam_dma(value),
            0xFF47 => self.ppu.bg_palette.write(value),
            0xFF48 => self.ppu.obj_palettes[0].write(value),
            0xFF49 => self.ppu.obj_palettes[1].write(value),
            _ => {
                log::trace!("discarding write to unmapped I/O 0x{addr:04X} <- 0x{value:02X}");
            }
        }
    }

    /// Copy a 160-byte page into sprite attribute RAM. Goes through the
    /// normal read/write paths so the sprite cache re-decodes.
    fn oam_dma(&mut self, page: u8) {
        let src = u16::from(page) << 8;
        for i in 0..OAM_SIZE as u16 {
            let b = self.read(src + i);
            self.write(0xFE00 + i, b);
        }
    }

    /// Divider stand-in: architecturally a free-running counter, served
    /// here as pseudo-random bytes.
    // TODO: replace with a counter derived from Clock once a timer block
    // is modeled.
    fn div_read(&mut self) -> u8 {
        let mut x = self.div_state;
        x ^= x << 3;
        x ^= x >> 5;
        x ^= x << 1;
        self.div_state = x;
        x
    }

    // -----------------------------
    // Timing
    // -----------------------------

    /// Advance emulated time: the clock and the picture unit both see
    /// the same `t_cycles`.
    pub fn tick(&mut self, t_cycles: u32) {
        self.clock.step(t_cycles);
        self.ppu.step(t_cycles, &self.vram, &mut self.interrupt);
    }

    // -----------------------------
    // Input
    // -----------------------------

    /// Press a button; the release-to-press edge requests the joypad
    /// interrupt.
    pub fn press_button(&mut self, button: Button) {
        if self.joypad.press(button) {
            self.interrupt.request(Source::Joypad);
        }
    }

    pub fn release_button(&mut self, button: Button) {
        self.joypad.release(button);
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ram_regions_read_back() {
        let mut bus = Bus::new();
        bus.write(0xA000, 0x11); // external RAM base
        bus.write(0xC000, 0x22); // work RAM base
        bus.write(0xFF80, 0x33); // high RAM base
        assert_eq!(bus.read(0xA000), 0x11);
        assert_eq!(bus.read(0xC000), 0x22);
        assert_eq!(bus.read(0xFF80), 0x33);
    }

    #[test]
    fn echo_ram_aliases_work_ram_both_ways() {
        let mut bus = Bus::new();
        bus.write(0xC000, 0xAB);
        assert_eq!(bus.read(0xE000), 0xAB);
        bus.write(0xFDFF, 0xCD);
        assert_eq!(bus.read(0xDDFF), 0xCD);
        // Sampled across the whole echo window.
        for offset in (0u16..0x1E00).step_by(0x111) {
            bus.write(0xC000 + offset, offset as u8);
            assert_eq!(bus.read(0xE000 + offset), offset as u8);
        }
    }

    #[test]
    fn rom_writes_are_discarded() {
        let mut bus = Bus::new();
        bus.write(0x0100, 0x42);
        assert_eq!(bus.read(0x0100), 0xFF); // no cartridge: open bus
    }

    #[test]
    fn unused_gap_reads_zero_and_ignores_writes() {
        let mut bus = Bus::new();
        for addr in 0xFEA0..=0xFEFF {
            bus.write(addr, 0x99);
            assert_eq!(bus.read(addr), 0);
        }
    }

    #[test]
    fn unmapped_io_reads_zero_and_ignores_writes() {
        let mut bus = Bus::new();
        bus.write(0xFF7F, 0x77);
        assert_eq!(bus.read(0xFF7F), 0);
        assert_eq!(bus.read(0xFF41), 0);
    }

    #[test]
    fn interrupt_masks_are_memory_mapped() {
        let mut bus = Bus::new();
        bus.write(0xFFFF, 0xFF);
        assert_eq!(bus.read(0xFFFF), 0x1F);
        bus.write(0xFF0F, 0x05);
        assert_eq!(bus.read(0xFF0F), 0x05);
        assert_eq!(bus.interrupt.requested(), 0x05);
    }

    #[test]
    fn vram_writes_update_the_tile_cache() {
        let mut bus = Bus::new();
        bus.write(0x8000, 0xFF); // tile 0, row 0, low plane
        assert_eq!(bus.ppu.tile(0)[0], [1; 8]);
        bus.write(0x8001, 0xFF); // high plane
        assert_eq!(bus.ppu.tile(0)[0], [3; 8]);
    }

    #[test]
    fn oam_writes_update_the_sprite_cache() {
        let mut bus = Bus::new();
        bus.write(0xFE00, 0x40);
        bus.write(0xFE03, 0x80);
        assert_eq!(bus.ppu.sprite(0).y, 0x40);
        assert!(bus.ppu.sprite(0).behind_background());
    }

    #[test]
    fn oam_dma_copies_a_page_through_the_cache() {
        let mut bus = Bus::new();
        for i in 0..OAM_SIZE as u16 {
            bus.write(0xC000 + i, i as u8);
        }
        bus.write(0xFF46, 0xC0);
        assert_eq!(bus.read(0xFE00), 0);
        assert_eq!(bus.read(0xFE9F), 0x9F);
        // Sprite 1 decoded from the copied bytes (y, x, tile, flags).
        assert_eq!(bus.ppu.sprite(1).y, 4);
        assert_eq!(bus.ppu.sprite(1).x, 5);
    }

    #[test]
    fn scroll_and_control_registers_round_trip() {
        let mut bus = Bus::new();
        bus.write(0xFF40, 0x1B);
        bus.write(0xFF42, 0x12);
        bus.write(0xFF43, 0x34);
        assert_eq!(bus.read(0xFF40), 0x1B);
        assert_eq!(bus.read(0xFF42), 0x12);
        assert_eq!(bus.read(0xFF43), 0x34);
    }

    #[test]
    fn scanline_register_is_read_only() {
        let mut bus = Bus::new();
        let before = bus.read(0xFF44);
        bus.write(0xFF44, 0x90);
        assert_eq!(bus.read(0xFF44), before);
    }

    #[test]
    fn palette_registers_round_trip() {
        let mut bus = Bus::new();
        bus.write(0xFF47, 0x1B);
        bus.write(0xFF48, 0xE4);
        bus.write(0xFF49, 0x27);
        assert_eq!(bus.read(0xFF47), 0x1B);
        assert_eq!(bus.read(0xFF48), 0xE4);
        assert_eq!(bus.read(0xFF49), 0x27);
    }

    #[test]
    fn tick_advances_clock_and_picture_unit_together() {
        let mut bus = Bus::new();
        bus.tick(80);
        assert_eq!(bus.clock.t_cycles(), 80);
        assert_eq!(bus.ppu.mode(), crate::ppu::Mode::PixelTransfer);
    }

    #[test]
    fn button_press_requests_joypad_interrupt_once() {
        let mut bus = Bus::new();
        bus.press_button(Button::Start);
        assert_eq!(bus.interrupt.requested(), Source::Joypad.mask());
        bus.interrupt.set_requested(0);
        bus.press_button(Button::Start); // still held: no new edge
        assert_eq!(bus.interrupt.requested(), 0);
    }

    #[test]
    fn word_access_is_little_endian() {
        let mut bus = Bus::new();
        bus.write_word(0xC100, 0x1234);
        assert_eq!(bus.read(0xC100), 0x34);
        assert_eq!(bus.read(0xC101), 0x12);
        assert_eq!(bus.read_word(0xC100), 0x1234);
    }
}
