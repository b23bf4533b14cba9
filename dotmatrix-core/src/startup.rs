use crate::apu::Apu;
use crate::audio::{self, AudioError, Sink};
use crate::bus::Bus;
use crate::config::RunConfig;
use crate::cpu::Cpu;
use crate::graphics::{self, GraphicsError};
use crate::rom::{RomError, RomImage};
use sdl2::audio::AudioDevice;
use sdl2::joystick::Joystick;
use sdl2::render::WindowCanvas;
use sdl2::{EventPump, Sdl};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("error loading ROM: {source}")]
    Rom {
        #[from]
        source: RomError,
    },
    #[error("error creating save directory {dir}: {source}")]
    SaveDir {
        dir: String,
        #[source]
        source: io::Error,
    },
    #[error("SDL2 error: {msg}")]
    Sdl { msg: String },
    #[error("audio initialization failed: {source}")]
    Audio {
        #[from]
        source: AudioError,
    },
    #[error("video initialization failed: {source}")]
    Graphics {
        #[from]
        source: GraphicsError,
    },
}

impl From<String> for StartupError {
    fn from(msg: String) -> Self {
        Self::Sdl { msg }
    }
}

/// SDL handles that must outlive the emulation loop. The audio device and
/// joystick close when dropped.
pub struct SdlState {
    pub sdl: Sdl,
    pub canvas: WindowCanvas,
    pub event_pump: EventPump,
    pub audio_device: Option<AudioDevice<Sink>>,
    pub joystick: Option<Joystick>,
}

/// Load the cartridge and bring up SDL. Fatal errors here surface to the
/// front end, which prints them and exits nonzero.
pub fn init(config: &RunConfig) -> Result<(Bus, Cpu, SdlState), StartupError> {
    std::fs::create_dir_all(&config.save_dir).map_err(|source| StartupError::SaveDir {
        dir: config.save_dir.display().to_string(),
        source,
    })?;

    let rom = RomImage::from_file(&config.rom_path)?;
    let title = rom.title();

    let sdl = sdl2::init()?;
    let video = sdl.video()?;

    let (audio_device, apu) = if config.audio_enabled {
        let audio_subsystem = sdl.audio()?;
        let (device, sender) = audio::open(&audio_subsystem, config)?;
        (Some(device), Apu::with_sink(config.audio_freq, sender))
    } else {
        (None, Apu::new(config.audio_freq))
    };

    let joystick = open_joystick(&sdl, config);

    let mut bus = Bus::new(rom, apu)?;
    bus.load_battery(&config.save_dir);
    let cpu = Cpu::new();

    let canvas = graphics::create_canvas(&video, &title, config)?;
    let event_pump = sdl.event_pump()?;

    Ok((
        bus,
        cpu,
        SdlState {
            sdl,
            canvas,
            event_pump,
            audio_device,
            joystick,
        },
    ))
}

/// A missing joystick is not fatal; keyboard input still works.
fn open_joystick(sdl: &Sdl, config: &RunConfig) -> Option<Joystick> {
    let subsystem = match sdl.joystick() {
        Ok(subsystem) => subsystem,
        Err(msg) => {
            log::warn!("joystick subsystem unavailable: {msg}");
            return None;
        }
    };

    match subsystem.num_joysticks() {
        Ok(count) if count > config.joystick => match subsystem.open(config.joystick) {
            Ok(joystick) => {
                log::info!("Using joystick {}: {}", config.joystick, joystick.name());
                Some(joystick)
            }
            Err(err) => {
                log::warn!("error opening joystick {}: {err}", config.joystick);
                None
            }
        },
        _ => None,
    }
}
