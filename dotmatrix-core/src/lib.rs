//! A DMG Game Boy emulator: interpreted LR35902 CPU, banked memory bus
//! (MBC1/2/3), scanline PPU and four-channel APU stepped off a shared
//! machine-cycle budget, presented through SDL2.

pub mod apu;
pub mod audio;
pub mod bus;
pub mod config;
pub mod cpu;
pub mod debug;
pub mod eventloop;
pub mod graphics;
pub mod input;
pub mod ppu;
pub mod rom;
pub mod startup;
pub mod timer;

use thiserror::Error;

pub use config::RunConfig;
pub use eventloop::RunError;
pub use startup::StartupError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Load the ROM named by the config, bring up SDL, and run the emulator
/// until it exits.
pub fn run(config: RunConfig) -> Result<(), Error> {
    let (bus, cpu, sdl_state) = startup::init(&config)?;
    eventloop::run(bus, cpu, sdl_state, &config)?;
    Ok(())
}
