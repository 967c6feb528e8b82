use crate::interrupts::InterruptFlags;

pub(crate) const SB_ADDR: u16 = 0xFF01;
pub(crate) const SC_ADDR: u16 = 0xFF02;

/// Serial port reduced to what test ROMs need: bytes shifted out with the
/// internal clock are captured in `output`.
///
/// Transfers complete instantly. Nothing is connected on the other end, so
/// SB reads back 0xFF afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Serial {
    pub(crate) sb: u8,
    pub(crate) sc: u8,
    pub(crate) output: Vec<u8>,
}

impl Serial {
    pub(crate) fn power_on() -> Self {
        Self {
            sb: 0x00,
            sc: 0x7E,
            output: Vec::new(),
        }
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            SB_ADDR => self.sb,
            SC_ADDR => self.sc | 0x7E,
            _ => 0xFF,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) -> InterruptFlags {
        match addr {
            SB_ADDR => {
                self.sb = value;
                InterruptFlags::empty()
            }
            SC_ADDR => {
                self.sc = value;
                // Start bit with the internal clock selected.
                if value & 0x81 == 0x81 {
                    log::trace!("GB SERIAL: sent 0x{:02X}", self.sb);
                    self.output.push(self.sb);
                    self.sb = 0xFF;
                    self.sc &= !0x80;
                    InterruptFlags::SERIAL
                } else {
                    InterruptFlags::empty()
                }
            }
            _ => InterruptFlags::empty(),
        }
    }
}
