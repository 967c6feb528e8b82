use super::{Timer, DIV_ADDR, TAC_ADDR, TIMA_ADDR, TMA_ADDR};
use crate::interrupts::InterruptFlags;

impl Timer {
    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            DIV_ADDR => (self.counter >> 8) as u8,
            TIMA_ADDR => self.tima,
            TMA_ADDR => self.tma,
            TAC_ADDR => self.tac | 0b1111_1000,
            _ => 0xFF,
        }
    }

    /// Register write. DIV and TAC writes can clock TIMA once when they
    /// pull the timer input low, so interrupts may be raised here too.
    pub(crate) fn write(&mut self, addr: u16, value: u8) -> InterruptFlags {
        match addr {
            DIV_ADDR => {
                let before = self.input();
                self.counter = 0;
                self.falling_edge(before)
            }
            TIMA_ADDR => {
                self.tima = value;
                InterruptFlags::empty()
            }
            TMA_ADDR => {
                self.tma = value;
                InterruptFlags::empty()
            }
            TAC_ADDR => {
                let before = self.input();
                self.tac = value & 0x07;
                self.falling_edge(before)
            }
            _ => InterruptFlags::empty(),
        }
    }

    fn falling_edge(&mut self, before: bool) -> InterruptFlags {
        if before && !self.input() {
            self.increment_tima()
        } else {
            InterruptFlags::empty()
        }
    }
}
