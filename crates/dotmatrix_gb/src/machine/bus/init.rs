use super::AddressSpace;
use crate::interrupts::InterruptFlags;

/// Sound registers as the boot ROM leaves them. Nothing models the APU,
/// but software can read these back.
const SOUND_POWER_ON: [(u16, u8); 21] = [
    (0xFF10, 0x80),
    (0xFF11, 0xBF),
    (0xFF12, 0xF3),
    (0xFF13, 0xFF),
    (0xFF14, 0xBF),
    (0xFF16, 0x3F),
    (0xFF17, 0x00),
    (0xFF18, 0xFF),
    (0xFF19, 0xBF),
    (0xFF1A, 0x7F),
    (0xFF1B, 0xFF),
    (0xFF1C, 0x9F),
    (0xFF1D, 0xFF),
    (0xFF1E, 0xBF),
    (0xFF20, 0xFF),
    (0xFF21, 0x00),
    (0xFF22, 0x00),
    (0xFF23, 0xBF),
    (0xFF24, 0x77),
    (0xFF25, 0xF3),
    (0xFF26, 0xF1),
];

impl AddressSpace {
    /// DMG post-boot I/O state. Timer, PPU, serial and joypad start from
    /// their own `power_on` values; this covers the rest.
    pub(super) fn apply_power_on_state(&mut self, ram_seed: Option<u32>) {
        self.fill_internal_ram(ram_seed);

        for (addr, value) in SOUND_POWER_ON {
            self.io[(addr - 0xFF00) as usize] = value;
        }

        // The boot ROM leaves a VBlank request behind.
        self.interrupts.flags = InterruptFlags::VBLANK;
        self.interrupts.enable = 0x00;
    }

    /// WRAM and HRAM hold garbage at power-on. A fixed-seed xorshift32
    /// keeps runs reproducible without handing software all zeroes.
    fn fill_internal_ram(&mut self, seed: Option<u32>) {
        let Some(seed) = seed else {
            self.wram.fill(0);
            self.hram.fill(0);
            return;
        };

        // xorshift32 has a fixed point at zero.
        let mut x = if seed == 0 { 1 } else { seed };
        let mut next_byte = || {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x as u8
        };

        for byte in self.wram.iter_mut().chain(self.hram.iter_mut()) {
            *byte = next_byte();
        }
    }
}
