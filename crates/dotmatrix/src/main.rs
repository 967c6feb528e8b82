use std::path::PathBuf;

use anyhow::{Context, Result};
use dotmatrix_gb::{GameBoy, MachineConfig};

const USAGE: &str = "Usage: dotmatrix <rom_path> [frames] [out.pgm]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(rom_path) = args.next().map(PathBuf::from) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let frames: u32 = match args.next() {
        Some(value) => value
            .parse()
            .with_context(|| format!("invalid frame count '{value}'"))?,
        None => 60,
    };
    let out_path = args.next().map(PathBuf::from);

    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM '{}'", rom_path.display()))?;
    let mut gb = GameBoy::new(&rom, MachineConfig::from_env())
        .with_context(|| format!("refusing ROM '{}'", rom_path.display()))?;

    let header = gb.header();
    log::info!(
        "\"{}\": {:?}, {} ROM banks, {} RAM banks",
        header.title,
        header.kind,
        header.rom_banks,
        header.ram_banks
    );

    let report = dotmatrix::run_headless(&mut gb, frames);
    log::info!(
        "ran {} frames ({} completed, {} cycles)",
        frames,
        report.frames_completed,
        report.cycles
    );

    let serial = gb.serial_output();
    if !serial.is_empty() {
        println!("{}", String::from_utf8_lossy(serial));
    }

    if let Some(out_path) = out_path {
        let pgm = dotmatrix::encode_pgm(gb.framebuffer());
        std::fs::write(&out_path, pgm)
            .with_context(|| format!("failed to write '{}'", out_path.display()))?;
        println!("wrote {} after {} frames", out_path.display(), frames);
    }

    Ok(())
}
