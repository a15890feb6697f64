use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use duovm::cpu::Cpu;
use duovm::driver::Driver;
use duovm::error::VmError;
use duovm::loader;
use duovm::memory::Memory;

#[derive(Parser)]
#[command(name = "duovm", about = "DuoVM toy machine emulator")]
struct Args {
    /// Hex program to load, e.g. program.hex
    program: PathBuf,

    /// Instructions executed per driver burst before re-checking state.
    #[arg(long, default_value_t = duovm::driver::DEFAULT_BURST_SIZE)]
    burst_size: usize,
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

    let mut mem = Memory::new();
    if let Err(e) = loader::load_hex_file(&mut mem, &args.program) {
        eprintln!("duovm: failed to load {}: {e}", args.program.display());
        return ExitCode::FAILURE;
    }

    let mut cpu = Cpu::new();
    let driver = Driver::new(args.burst_size);

    #[cfg(feature = "terminal")]
    {
        let mut io = match duovm::terminal::TerminalIo::new() {
            Ok(io) => io,
            Err(e) => {
                eprintln!("duovm: failed to initialize terminal: {e}");
                return ExitCode::FAILURE;
            }
        };

        match driver.run_forever(&mut cpu, &mut mem, &mut io) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fatal(e),
        }
    }

    #[cfg(not(feature = "terminal"))]
    {
        let mut io = duovm::io::HeadlessIo::new();
        match driver.run_forever(&mut cpu, &mut mem, &mut io) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fatal(e),
        }
    }
}

#[cfg(feature = "terminal")]
fn fatal(err: VmError) -> ExitCode {
    duovm::terminal::restore();
    eprintln!("duovm: {err}");
    ExitCode::FAILURE
}

#[cfg(not(feature = "terminal"))]
fn fatal(err: VmError) -> ExitCode {
    eprintln!("duovm: {err}");
    ExitCode::FAILURE
}
