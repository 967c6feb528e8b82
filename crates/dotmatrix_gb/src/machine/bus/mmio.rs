mod read;
mod write;

pub(super) const DMA_ADDR: u16 = 0xFF46;

/// Echo RAM offset: 0xE000..=0xFDFF mirrors 0xC000..=0xDDFF.
pub(super) const ECHO_OFFSET: u16 = 0x2000;
