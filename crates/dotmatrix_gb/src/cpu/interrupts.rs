use super::{Bus, Cpu};
use crate::interrupts::{InterruptFlags, IE_ADDR, IF_ADDR};

impl Cpu {
    /// Check IE & IF before a fetch.
    ///
    /// Any pending source wakes a halted CPU, even with IME clear. When IME
    /// is set the highest-priority source is dispatched: IME is cleared, PC
    /// is pushed, the IF bit is acknowledged and PC jumps to the vector.
    /// Returns the dispatch cost in T-cycles when one happened.
    pub(super) fn service_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        let ie = bus.read8(IE_ADDR);
        let iflags = bus.read8(IF_ADDR);
        let pending = InterruptFlags::from_bits_truncate(ie & iflags);
        let irq = pending.highest_priority()?;

        self.halted = false;
        if !self.ime {
            return None;
        }

        self.ime = false;
        self.ime_enable_pending = false;
        self.halt_bug = false;

        let pc = self.regs.pc;
        self.push_u16(bus, pc);
        bus.write8(IF_ADDR, iflags & !irq.flag().bits());
        self.regs.pc = irq.vector();

        log::debug!(
            "GB CPU: interrupt {:?} vector=0x{:04X} from pc=0x{:04X} IE=0x{:02X} IF=0x{:02X}",
            irq,
            irq.vector(),
            pc,
            ie,
            iflags & 0x1F,
        );

        Some(20)
    }
}
