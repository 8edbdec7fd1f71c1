use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

mod config;
mod cpu;
mod display;
mod image;
mod reloader;
mod simulator;
mod window;

use crate::config::{DEFAULT_LOG_LEVEL, DEFAULT_SCALE, MAX_SCALE};
use crate::cpu::{decode, CpuError, Halt, InputLatch};
use crate::image::MemoryImage;
use crate::reloader::Reloader;
use crate::simulator::program_state::ProgramState;
use crate::simulator::SimulatorError;

fn main() -> Result<(), Box<dyn Error>> {
    let args = CommandLineArgs::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_LEVEL))
        .init();

    let image = MemoryImage::read_file(&args.image)?;
    log::info!("Loaded {}", args.image.display());

    let input = Arc::new(InputLatch::new());
    let mut program_state = ProgramState::simulate_async(&image, input.clone())?;

    /* kept alive until the end of main; dropping it stops the watch */
    let _reloader = if args.no_watch {
        None
    } else {
        match Reloader::watch(&args.image, program_state.reset_handle()) {
            Ok(reloader) => Some(reloader),
            Err(error) => {
                log::error!("Hot reload disabled: {error}");
                None
            }
        }
    };

    let outcome = if args.headless {
        program_state.join().map(Some)
    } else {
        let ui_result =
            window::initialize_ui(program_state.memory_view.clone(), input, args.scale);
        let outcome = program_state.cleanup();
        ui_result?;
        outcome
    };

    match outcome {
        Ok(Some(Halt::Returned(accumulator))) => {
            log::info!("Program returned {accumulator:#04x}");
            if args.headless {
                exit(accumulator as i32);
            }
            Ok(())
        }
        Ok(Some(Halt::Break { pc })) => {
            log::info!("Program hit BRK at {pc:#06x}");
            Ok(())
        }
        Ok(Some(Halt::Ended)) | Ok(None) => Ok(()),
        Err(SimulatorError::Cpu(CpuError::UndefinedOpcode { pc, opcode })) => {
            log::error!(
                "Undefined opcode {opcode:#04x} at PC {pc:#06x} (decoded as {})",
                decode(opcode)
            );
            Err(CpuError::UndefinedOpcode { pc, opcode }.into())
        }
        Err(error) => Err(error.into()),
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CommandLineArgs {
    /// memory image file; must be exactly 65536 bytes
    image: PathBuf,

    /// screen pixels per display pixel
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_SCALE,
        value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64)
    )]
    scale: u32,

    /// don't reload the image when it changes on disk
    #[arg(long)]
    no_watch: bool,

    /// run without a window and exit with the accumulator once the program returns
    #[arg(long)]
    headless: bool,
}
