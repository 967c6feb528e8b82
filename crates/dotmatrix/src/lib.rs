use dotmatrix_gb::{Diagnostic, Framebuffer, GameBoy};

/// Shade 0 is the lightest DMG colour; PGM 255 is white.
const SHADE_TO_GREY: [u8; 4] = [255, 170, 85, 0];

/// What a headless run produced besides the final frame.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Frames that completed (the LCD may be off for some of the requested ones).
    pub frames_completed: u32,
    pub cycles: u64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Run `frames` frames and collect what happened along the way.
pub fn run_headless(gb: &mut GameBoy, frames: u32) -> RunReport {
    let mut report = RunReport::default();
    for _ in 0..frames {
        report.cycles += gb.step_frame() as u64;
        if gb.take_frame_ready() {
            report.frames_completed += 1;
        }
        for diagnostic in gb.drain_diagnostics() {
            log::warn!("{:?}", diagnostic);
            report.diagnostics.push(diagnostic);
        }
    }
    report
}

/// Binary PGM (P5) of `frame`, one grey byte per pixel.
pub fn encode_pgm(frame: &Framebuffer) -> Vec<u8> {
    let mut out = format!("P5\n{} {}\n255\n", frame.width(), frame.height()).into_bytes();
    out.extend(
        frame
            .pixels()
            .iter()
            .map(|&shade| SHADE_TO_GREY[(shade & 0x03) as usize]),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotmatrix_gb::machine::header_checksum;
    use dotmatrix_gb::MachineConfig;

    fn looping_rom() -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000];
        rom[0x0100..0x0102].copy_from_slice(&[0x18, 0xFE]); // JR -2
        rom[0x014D] = header_checksum(&rom);
        rom
    }

    #[test]
    fn pgm_header_and_white_background() {
        let frame = Framebuffer::default();
        let pgm = encode_pgm(&frame);
        let header = b"P5\n160 144\n255\n";
        assert_eq!(&pgm[..header.len()], header);
        assert_eq!(pgm.len(), header.len() + 160 * 144);
        assert!(pgm[header.len()..].iter().all(|&b| b == 255));
    }

    #[test]
    fn headless_run_counts_frames() {
        let mut gb = GameBoy::new(&looping_rom(), MachineConfig::default()).unwrap();
        let report = run_headless(&mut gb, 3);
        assert_eq!(report.frames_completed, 3);
        assert!(report.diagnostics.is_empty());
        assert!(report.cycles >= 2 * 70_224);
    }
}
