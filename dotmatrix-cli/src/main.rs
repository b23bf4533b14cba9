use clap::Parser;
use dotmatrix_core::RunConfig;
use std::path::PathBuf;
use std::process::ExitCode;

/// A DMG Game Boy emulator.
#[derive(Parser)]
#[command(name = "dotmatrix")]
struct Cli {
    /// Cartridge ROM image
    rom: String,

    /// Where to store battery save files
    #[arg(long = "savedir")]
    savedir: Option<PathBuf>,

    /// Display scaling factor
    #[arg(long = "scale", default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=6))]
    scale: u32,

    /// Run in fullscreen mode
    #[arg(long = "fullscreen")]
    fullscreen: bool,

    /// Audio sample rate
    #[arg(long = "freq", default_value_t = 48000)]
    freq: u32,

    /// Number of audio buffers
    #[arg(long = "nbuf", default_value_t = 4)]
    nbuf: usize,

    /// Audio device name
    #[arg(long = "adev")]
    adev: Option<String>,

    /// Disable audio output entirely
    #[arg(long = "no-audio")]
    no_audio: bool,

    /// Which joystick to use
    #[arg(long = "joystick", default_value_t = 0)]
    joystick: u32,

    /// Joystick A button
    #[arg(long = "joy-a", default_value_t = 1)]
    joy_a: u32,

    /// Joystick B button
    #[arg(long = "joy-b", default_value_t = 0)]
    joy_b: u32,

    /// Joystick start button
    #[arg(long = "joy-start", default_value_t = 6)]
    joy_start: u32,

    /// Joystick select button
    #[arg(long = "joy-select", default_value_t = 10)]
    joy_select: u32,

    /// Joystick x-axis (for the d-pad)
    #[arg(long = "joy-x", default_value_t = 0)]
    joy_x: u32,

    /// Joystick y-axis (for the d-pad)
    #[arg(long = "joy-y", default_value_t = 1)]
    joy_y: u32,

    /// Print verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Print debug messages
    #[arg(long = "debug")]
    debug: bool,
}

fn default_save_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".dotmatrix").join("sav"),
        None => PathBuf::from("sav"),
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let level = if args.debug {
        log::LevelFilter::Debug
    } else if args.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = RunConfig {
        rom_path: args.rom,
        save_dir: args.savedir.unwrap_or_else(default_save_dir),
        scale: args.scale,
        fullscreen: args.fullscreen,
        audio_enabled: !args.no_audio,
        audio_freq: args.freq,
        audio_buffers: args.nbuf,
        audio_driver: args.adev,
        joystick: args.joystick,
        joy_a: args.joy_a,
        joy_b: args.joy_b,
        joy_start: args.joy_start,
        joy_select: args.joy_select,
        joy_x: args.joy_x,
        joy_y: args.joy_y,
        verbose: args.verbose,
        debug: args.debug,
    };

    match dotmatrix_core::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dotmatrix: {err}");
            ExitCode::FAILURE
        }
    }
}
