use bitflags::bitflags;

/// Address of the interrupt-flag register (IF).
pub const IF_ADDR: u16 = 0xFF0F;
/// Address of the interrupt-enable register (IE).
pub const IE_ADDR: u16 = 0xFFFF;

bitflags! {
    /// Interrupt request / enable bits shared by IF and IE.
    ///
    /// Bit order is also dispatch priority: lower bits win.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InterruptFlags: u8 {
        const VBLANK   = 0b0000_0001;
        const LCD_STAT = 0b0000_0010;
        const TIMER    = 0b0000_0100;
        const SERIAL   = 0b0000_1000;
        const JOYPAD   = 0b0001_0000;
    }
}

impl InterruptFlags {
    /// Highest-priority source contained in `self`, if any.
    pub fn highest_priority(self) -> Option<Interrupt> {
        Interrupt::ALL.into_iter().find(|irq| self.contains(irq.flag()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    /// All sources in priority order.
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    pub fn flag(self) -> InterruptFlags {
        match self {
            Interrupt::VBlank => InterruptFlags::VBLANK,
            Interrupt::LcdStat => InterruptFlags::LCD_STAT,
            Interrupt::Timer => InterruptFlags::TIMER,
            Interrupt::Serial => InterruptFlags::SERIAL,
            Interrupt::Joypad => InterruptFlags::JOYPAD,
        }
    }

    /// Fixed dispatch address (0x40, 0x48, 0x50, 0x58, 0x60).
    pub fn vector(self) -> u16 {
        0x0040 + 8 * (self as u16)
    }
}

/// IE/IF register pair.
///
/// IE keeps all eight written bits (software can read them back) but only
/// the low five take part in dispatch. IF stores five bits and reads back
/// with bits 5-7 set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterruptState {
    pub enable: u8,
    pub flags: InterruptFlags,
}

impl InterruptState {
    #[inline]
    pub fn request(&mut self, flags: InterruptFlags) {
        self.flags |= flags;
    }

    #[inline]
    pub fn acknowledge(&mut self, irq: Interrupt) {
        self.flags.remove(irq.flag());
    }

    /// Requested and enabled sources.
    #[inline]
    pub fn pending(&self) -> InterruptFlags {
        self.flags & InterruptFlags::from_bits_truncate(self.enable)
    }

    pub fn read_if(&self) -> u8 {
        self.flags.bits() | 0b1110_0000
    }

    pub fn write_if(&mut self, value: u8) {
        self.flags = InterruptFlags::from_bits_truncate(value);
    }
}
