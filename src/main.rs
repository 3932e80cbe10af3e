//! PIONEER Pinball entry point
//!
//! Parses the command line, sets up logging, probes the hardware once and then
//! runs the frame loop until the operator quits.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use pioneer_pinball::audio::{AudioManager, LogSink};
use pioneer_pinball::hardware::Hardware;
use pioneer_pinball::platform;
use pioneer_pinball::renderer::{Display, NullDisplay, TerminalDisplay};
use pioneer_pinball::{Controller, Error, Result, Settings};

/// Scoreboard controller for the PIONEER pinball cabinet
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Settings file (JSON); defaults are used when missing
    #[arg(long, default_value = "pinball_settings.json")]
    config: PathBuf,

    /// Override the high score file from the settings
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Use mock hardware even when GPIO is available
    #[arg(long)]
    mock: bool,

    /// Boot straight into test mode
    #[arg(long)]
    test: bool,

    /// Run without the terminal scoreboard
    #[arg(long)]
    headless: bool,

    /// Override the frame rate from the settings
    #[arg(long)]
    fps: Option<u32>,

    /// Write log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
        if std::env::var_os("RUST_LOG").is_none() {
            builder.filter_level(log::LevelFilter::Info);
        }
    }
    builder.init();
    Ok(())
}

fn run(args: Args) -> Result<()> {
    init_logging(args.log_file.as_ref())?;
    log::info!("PIONEER Pinball starting...");

    let mut settings = Settings::load(&args.config);
    if let Some(path) = args.high_score_file {
        settings.high_score_file = path;
    }
    if let Some(fps) = args.fps {
        settings.fps = fps;
        settings.sanitize();
    }

    let hardware = Hardware::probe(&settings.pins, args.mock);
    let audio = AudioManager::new(Some(Box::new(LogSink)));
    let mut controller = Controller::new(&settings, hardware, audio, args.test, Instant::now())?;

    let mut display: Box<dyn Display> = if args.headless {
        Box::new(NullDisplay::default())
    } else {
        Box::new(TerminalDisplay::new()?)
    };

    if let Err(e) = platform::watch_signals(controller.quit_flag()) {
        log::warn!("Signal handler not installed: {e}");
    }

    let result = controller.run(display.as_mut(), &mut platform::poll_commands, settings.frame_time());
    controller.shutdown();
    // restore the terminal before anything is printed
    drop(display);
    result
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("pioneer-pinball: {e}");
            ExitCode::FAILURE
        }
    }
}
