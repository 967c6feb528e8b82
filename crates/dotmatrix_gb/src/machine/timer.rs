//! Divider and programmable timer.
//!
//! A single 16-bit counter advances once per T-cycle; DIV exposes its upper
//! byte. TIMA counts falling edges of the counter bit selected by TAC, so
//! anything that clears that bit early (a DIV reset, a TAC write) can
//! produce an extra increment the same way it does on hardware.
mod io;

use crate::interrupts::InterruptFlags;

pub(crate) const DIV_ADDR: u16 = 0xFF04;
pub(crate) const TIMA_ADDR: u16 = 0xFF05;
pub(crate) const TMA_ADDR: u16 = 0xFF06;
pub(crate) const TAC_ADDR: u16 = 0xFF07;

/// Counter value that reads back as DIV=0xAB when cartridge code starts.
const POWER_ON_COUNTER: u16 = 0xABCC;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Timer {
    /// Hidden system counter; DIV is bits 15..8.
    pub(crate) counter: u16,
    pub(crate) tima: u8,
    pub(crate) tma: u8,
    /// Low three bits of TAC.
    pub(crate) tac: u8,
}

impl Timer {
    pub(crate) fn power_on() -> Self {
        Self {
            counter: POWER_ON_COUNTER,
            ..Self::default()
        }
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// Counter bit whose falling edge clocks TIMA:
    /// 00 → bit 9 (4096 Hz), 01 → bit 3, 10 → bit 5, 11 → bit 7.
    #[inline]
    fn selected_bit(&self) -> u16 {
        match self.tac & 0x03 {
            0x00 => 1 << 9,
            0x01 => 1 << 3,
            0x02 => 1 << 5,
            _ => 1 << 7,
        }
    }

    /// Timer input: the selected bit gated by the enable bit.
    #[inline]
    fn input(&self) -> bool {
        self.enabled() && self.counter & self.selected_bit() != 0
    }

    /// Increment TIMA. An overflow reloads TMA and requests the timer
    /// interrupt immediately.
    fn increment_tima(&mut self) -> InterruptFlags {
        let (next, overflow) = self.tima.overflowing_add(1);
        if overflow {
            log::trace!("GB TIMER: overflow, reload TMA=0x{:02X}", self.tma);
            self.tima = self.tma;
            InterruptFlags::TIMER
        } else {
            self.tima = next;
            InterruptFlags::empty()
        }
    }

    /// Advance by `cycles` T-cycles and return the interrupts raised.
    pub(crate) fn advance(&mut self, cycles: u32) -> InterruptFlags {
        let mut raised = InterruptFlags::empty();
        for _ in 0..cycles {
            let before = self.input();
            self.counter = self.counter.wrapping_add(1);
            if before && !self.input() {
                raised |= self.increment_tima();
            }
        }
        raised
    }
}
