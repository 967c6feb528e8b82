use super::super::AddressSpace;
use super::{DMA_ADDR, ECHO_OFFSET};
use crate::interrupts::{IE_ADDR, IF_ADDR};
use crate::machine::joypad::P1_ADDR;

impl AddressSpace {
    /// Read without side effects. Used by the CPU and by debugger peeks.
    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.cartridge.rom_read(addr),
            0x8000..=0x9FFF => self.vram[(addr - 0x8000) as usize],
            0xA000..=0xBFFF => self.cartridge.ram_read(addr),
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize],
            0xE000..=0xFDFF => self.wram[(addr - ECHO_OFFSET - 0xC000) as usize],
            0xFE00..=0xFE9F => self.oam[(addr - 0xFE00) as usize],
            // Unusable.
            0xFEA0..=0xFEFF => 0xFF,
            0xFF00..=0xFF7F => self.read_io(addr),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],
            IE_ADDR => self.interrupts.enable,
        }
    }

    fn read_io(&self, addr: u16) -> u8 {
        match addr {
            P1_ADDR => self.joypad.read(),
            0xFF01..=0xFF02 => self.serial.read(addr),
            0xFF04..=0xFF07 => self.timer.read(addr),
            IF_ADDR => self.interrupts.read_if(),
            DMA_ADDR => self.dma,
            0xFF40..=0xFF4B => self.ppu.read(addr),
            _ => self.io[(addr - 0xFF00) as usize],
        }
    }
}
