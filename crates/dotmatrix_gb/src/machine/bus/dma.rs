use super::{AddressSpace, OAM_SIZE};

impl AddressSpace {
    /// OAM DMA: copy 160 bytes from `value << 8` into OAM at once. The
    /// 160 M-cycle transfer time and its bus conflicts are not modelled.
    pub(super) fn start_oam_dma(&mut self, value: u8) {
        self.dma = value;
        let base = (value as u16) << 8;
        for i in 0..OAM_SIZE {
            self.oam[i] = self.read(base.wrapping_add(i as u16));
        }
        log::trace!("GB DMA: OAM <- 0x{:04X}", base);
    }
}
