use super::{ram_enable_value, BankedRam, BankedRom};
use crate::CLOCK_HZ;

const DAY_HIGH_BIT8: u8 = 0x01;
const DAY_HIGH_HALT: u8 = 0x40;
const DAY_HIGH_CARRY: u8 = 0x80;

/// MBC3 real-time clock registers, selected as 0x08..=0x0C.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RtcRegisters {
    seconds: u8,
    minutes: u8,
    hours: u8,
    day_low: u8,
    /// Bit 0: day bit 8. Bit 6: halt. Bit 7: day counter carry.
    day_high: u8,
}

impl RtcRegisters {
    fn read(&self, select: u8) -> u8 {
        match select {
            0x08 => self.seconds,
            0x09 => self.minutes,
            0x0A => self.hours,
            0x0B => self.day_low,
            0x0C => self.day_high,
            _ => 0xFF,
        }
    }

    fn write(&mut self, select: u8, value: u8) {
        match select {
            0x08 => self.seconds = value & 0x3F,
            0x09 => self.minutes = value & 0x3F,
            0x0A => self.hours = value & 0x1F,
            0x0B => self.day_low = value,
            0x0C => self.day_high = value & (DAY_HIGH_BIT8 | DAY_HIGH_HALT | DAY_HIGH_CARRY),
            _ => {}
        }
    }

    fn halted(&self) -> bool {
        self.day_high & DAY_HIGH_HALT != 0
    }

    fn tick_second(&mut self) {
        self.seconds = (self.seconds + 1) & 0x3F;
        if self.seconds != 60 {
            return;
        }
        self.seconds = 0;
        self.minutes = (self.minutes + 1) & 0x3F;
        if self.minutes != 60 {
            return;
        }
        self.minutes = 0;
        self.hours = (self.hours + 1) & 0x1F;
        if self.hours != 24 {
            return;
        }
        self.hours = 0;

        let day = ((self.day_high as u16 & DAY_HIGH_BIT8 as u16) << 8 | self.day_low as u16) + 1;
        self.day_low = day as u8;
        self.day_high = (self.day_high & !DAY_HIGH_BIT8) | ((day >> 8) as u8 & DAY_HIGH_BIT8);
        if day > 0x1FF {
            self.day_high |= DAY_HIGH_CARRY;
        }
    }
}

/// Clock driven by emulated T-cycles so runs stay reproducible.
#[derive(Clone, Copy, Debug, Default)]
struct Rtc {
    live: RtcRegisters,
    latched: RtcRegisters,
    /// T-cycles accumulated towards the next second.
    subsecond: u32,
    /// Last value written to 0x6000-0x7FFF; 0x00 then 0x01 latches.
    latch_armed: bool,
}

impl Rtc {
    fn advance(&mut self, cycles: u32) {
        if self.live.halted() {
            return;
        }
        self.subsecond += cycles;
        while self.subsecond >= CLOCK_HZ {
            self.subsecond -= CLOCK_HZ;
            self.live.tick_second();
        }
    }

    fn latch_write(&mut self, value: u8) {
        if self.latch_armed && value == 0x01 {
            self.latched = self.live;
            log::debug!("GB MBC3: RTC latched {:?}", self.latched);
        }
        self.latch_armed = value == 0x00;
    }

    fn write(&mut self, select: u8, value: u8) {
        if select == 0x08 {
            self.subsecond = 0;
        }
        self.live.write(select, value);
        // Reads see the latched copy; keep it coherent with explicit writes.
        self.latched.write(select, value);
    }
}

/// MBC3: 7-bit ROM bank, up to four RAM banks, optional clock.
///
/// Only a written 0 maps to bank 1; unlike MBC1 there is no 0x20/0x40/0x60
/// quirk.
pub(crate) struct Mbc3 {
    pub(super) rom: BankedRom,
    ram: BankedRam,
    rtc: Option<Rtc>,
    ram_enable: bool,
    rom_bank: u8,
    /// 0x00..=0x03 selects a RAM bank, 0x08..=0x0C an RTC register.
    select: u8,
}

impl Mbc3 {
    pub(super) fn new(rom: BankedRom, ram_banks: usize, has_rtc: bool) -> Self {
        Self {
            rom,
            ram: BankedRam::new(ram_banks),
            rtc: has_rtc.then(Rtc::default),
            ram_enable: false,
            rom_bank: 1,
            select: 0,
        }
    }

    pub(super) fn decode_rom_address(&self, addr: u16) -> usize {
        let bank = if addr < 0x4000 { 0 } else { self.rom_bank };
        self.rom.offset(bank as usize, addr)
    }

    pub(super) fn on_control_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = ram_enable_value(value),
            0x2000..=0x3FFF => {
                self.rom_bank = match value & 0x7F {
                    0 => 1,
                    bank => bank,
                };
                log::debug!("GB MBC3: ROM bank = {}", self.rom_bank);
            }
            0x4000..=0x5FFF => self.select = value & 0x0F,
            0x6000..=0x7FFF => {
                if let Some(rtc) = self.rtc.as_mut() {
                    rtc.latch_write(value);
                }
            }
            _ => {}
        }
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        if !self.ram_enable {
            return 0xFF;
        }
        match (self.select, &self.rtc) {
            (0x00..=0x03, _) => self.ram.read(self.select as usize, addr),
            (0x08..=0x0C, Some(rtc)) => rtc.latched.read(self.select),
            _ => 0xFF,
        }
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if !self.ram_enable {
            return;
        }
        match (self.select, self.rtc.as_mut()) {
            (0x00..=0x03, _) => self.ram.write(self.select as usize, addr, value),
            (0x08..=0x0C, Some(rtc)) => rtc.write(self.select, value),
            _ => {}
        }
    }

    pub(super) fn advance(&mut self, cycles: u32) {
        if let Some(rtc) = self.rtc.as_mut() {
            rtc.advance(cycles);
        }
    }
}
