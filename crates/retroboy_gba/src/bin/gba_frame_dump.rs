use std::path::PathBuf;

use anyhow::{Context, Result};
use retroboy_gba::machine::{Bios, Rom};
use retroboy_gba::{GameBoyAdvance, MachineConfig, SCREEN_HEIGHT, SCREEN_WIDTH};

const USAGE: &str = "Usage: gba_frame_dump <rom_path> <out_rgb24_path> [bios_path]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let rom_path: PathBuf = args.next().map(PathBuf::from).unwrap_or_else(|| {
        eprintln!("{USAGE}");
        std::process::exit(2);
    });
    let out_path: PathBuf = args.next().map(PathBuf::from).unwrap_or_else(|| {
        eprintln!("{USAGE}");
        std::process::exit(2);
    });
    // An explicit argument wins over the environment.
    let bios_path = args
        .next()
        .or_else(|| std::env::var("RETROBOY_GBA_BIOS").ok())
        .map(PathBuf::from);

    let rom = Rom::load(&rom_path)
        .with_context(|| format!("loading ROM '{}'", rom_path.display()))?;
    let bios = bios_path
        .map(|path| {
            Bios::load(&path).with_context(|| format!("loading BIOS '{}'", path.display()))
        })
        .transpose()?;

    println!(
        "ROM '{}': title '{}', code '{}', maker '{}', version {}, {} bytes",
        rom_path.display(),
        rom.title(),
        rom.game_code(),
        rom.maker_code(),
        rom.software_version(),
        rom.len()
    );

    // No instruction interpreter is attached; the frame shows the video
    // state the bus holds at boot.
    let config = MachineConfig::builder()
        .rom(rom)
        .bios(bios)
        .skip_bios(true)
        .build();
    let mut gba = GameBoyAdvance::new(config).context("creating machine")?;
    gba.render_frame();

    let mut buffer = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
    gba.video_frame(&mut buffer);
    std::fs::write(&out_path, &buffer)
        .with_context(|| format!("writing '{}'", out_path.display()))?;

    println!(
        "Wrote {} bytes ({}x{} rgb24) to '{}'",
        buffer.len(),
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        out_path.display()
    );
    Ok(())
}
