use super::super::AddressSpace;
use super::{DMA_ADDR, ECHO_OFFSET};
use crate::interrupts::{IE_ADDR, IF_ADDR};
use crate::machine::joypad::P1_ADDR;

impl AddressSpace {
    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // Never a store: the bank controller interprets it.
            0x0000..=0x7FFF => self.cartridge.on_control_write(addr, value),
            0x8000..=0x9FFF => self.vram[(addr - 0x8000) as usize] = value,
            0xA000..=0xBFFF => self.cartridge.ram_write(addr, value),
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize] = value,
            0xE000..=0xFDFF => self.wram[(addr - ECHO_OFFSET - 0xC000) as usize] = value,
            0xFE00..=0xFE9F => self.oam[(addr - 0xFE00) as usize] = value,
            0xFEA0..=0xFEFF => {}
            0xFF00..=0xFF7F => self.write_io(addr, value),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = value,
            IE_ADDR => self.interrupts.enable = value,
        }
    }

    fn write_io(&mut self, addr: u16, value: u8) {
        let raised = match addr {
            P1_ADDR => {
                self.joypad.write(value);
                return;
            }
            0xFF01..=0xFF02 => self.serial.write(addr, value),
            0xFF04..=0xFF07 => self.timer.write(addr, value),
            IF_ADDR => {
                self.interrupts.write_if(value);
                return;
            }
            DMA_ADDR => {
                self.start_oam_dma(value);
                return;
            }
            0xFF40..=0xFF4B => self.ppu.write(addr, value),
            _ => {
                self.io[(addr - 0xFF00) as usize] = value;
                return;
            }
        };
        self.request(raised);
    }
}
