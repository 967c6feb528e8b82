use crate::interrupts::InterruptFlags;

pub(crate) const P1_ADDR: u16 = 0xFF00;

const SELECT_DPAD: u8 = 0x10;
const SELECT_BUTTONS: u8 = 0x20;

/// DMG input buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// (is a d-pad direction, bit in the P1 low nibble)
    fn line(self) -> (bool, u8) {
        match self {
            Button::Right => (true, 0),
            Button::Left => (true, 1),
            Button::Up => (true, 2),
            Button::Down => (true, 3),
            Button::A => (false, 0),
            Button::B => (false, 1),
            Button::Select => (false, 2),
            Button::Start => (false, 3),
        }
    }
}

/// P1/JOYP register. Pressed state is kept active-high and inverted on read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Joypad {
    /// Bits 4 (d-pad) and 5 (buttons); 0 selects the group.
    select: u8,
    dpad: u8,
    buttons: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            select: SELECT_DPAD | SELECT_BUTTONS,
            dpad: 0,
            buttons: 0,
        }
    }
}

impl Joypad {
    pub(crate) fn read(&self) -> u8 {
        let mut low = 0x0F;
        if self.select & SELECT_DPAD == 0 {
            low &= !self.dpad;
        }
        if self.select & SELECT_BUTTONS == 0 {
            low &= !self.buttons;
        }
        0xC0 | self.select | (low & 0x0F)
    }

    pub(crate) fn write(&mut self, value: u8) {
        self.select = value & (SELECT_DPAD | SELECT_BUTTONS);
    }

    /// Update a button. A new press requests the joypad interrupt.
    pub(crate) fn set_button(&mut self, button: Button, pressed: bool) -> InterruptFlags {
        let (dpad, bit) = button.line();
        let group = if dpad { &mut self.dpad } else { &mut self.buttons };
        let mask = 1u8 << bit;
        let was_pressed = *group & mask != 0;
        if pressed {
            *group |= mask;
        } else {
            *group &= !mask;
        }

        if pressed && !was_pressed {
            InterruptFlags::JOYPAD
        } else {
            InterruptFlags::empty()
        }
    }
}
