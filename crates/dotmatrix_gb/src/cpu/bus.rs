/// Abstraction over the Game Boy address space as seen by the CPU.
///
/// The machine's [`AddressSpace`](crate::machine::AddressSpace) implements
/// this; CPU tests use a flat 64 KiB array. Interrupt state is reached
/// through the IE (0xFFFF) and IF (0xFF0F) addresses like any other access.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr);
        let hi = self.read8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo);
        self.write8(addr.wrapping_add(1), hi);
    }
}
