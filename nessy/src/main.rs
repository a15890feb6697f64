use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use nessy::error::RomError;
use nessy::{ppm, Cartridge, Machine};

#[derive(Parser)]
#[command(name = "nessy", about = "Nessy NES core emulator")]
struct Args {
    /// iNES ROM image to load
    rom: PathBuf,

    /// Number of frames to render; non-positive values are clamped to 1.
    frames: Option<i64>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let frames = args.frames.unwrap_or(1).max(1) as u32;

    let cartridge = match load_cartridge(&args.rom) {
        Ok(cart) => cart,
        Err(e) => {
            eprintln!("nessy: failed to load {}: {e}", args.rom.display());
            return ExitCode::FAILURE;
        }
    };

    let mut machine = Machine::new(cartridge);
    let out_dir = PathBuf::from(".");

    for frame_index in 0..frames {
        machine.run_frame();
        let path = ppm::frame_path(&out_dir, frame_index);
        if let Err(e) = ppm::write_frame(&path, machine.framebuffer()) {
            eprintln!("nessy: failed to write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        log::info!("wrote {}", path.display());
    }

    ExitCode::SUCCESS
}

fn load_cartridge(path: &PathBuf) -> Result<Cartridge, RomError> {
    let bytes = std::fs::read(path)?;
    Cartridge::from_bytes(&bytes)
}
