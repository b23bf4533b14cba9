use std::fmt;
use std::path::PathBuf;

/// Everything the emulator needs to know for one run. Built by the CLI from
/// its flags; the defaults here match the CLI defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub rom_path: String,
    pub save_dir: PathBuf,
    /// Display scaling factor, 1-6.
    pub scale: u32,
    pub fullscreen: bool,
    pub audio_enabled: bool,
    pub audio_freq: u32,
    /// Number of audio buffers; the sink channel holds `audio_buffers - 2`.
    pub audio_buffers: usize,
    /// SDL audio driver name, or None for the platform default.
    pub audio_driver: Option<String>,
    pub joystick: u32,
    pub joy_a: u32,
    pub joy_b: u32,
    pub joy_start: u32,
    pub joy_select: u32,
    pub joy_x: u32,
    pub joy_y: u32,
    pub verbose: bool,
    pub debug: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rom_path: String::new(),
            save_dir: PathBuf::from("."),
            scale: 2,
            fullscreen: false,
            audio_enabled: true,
            audio_freq: 48000,
            audio_buffers: 4,
            audio_driver: None,
            joystick: 0,
            joy_a: 1,
            joy_b: 0,
            joy_start: 6,
            joy_select: 10,
            joy_x: 0,
            joy_y: 1,
            verbose: false,
            debug: false,
        }
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rom_path: {}", self.rom_path)?;
        writeln!(f, "save_dir: {}", self.save_dir.display())?;
        writeln!(f, "scale: {}", self.scale)?;
        writeln!(f, "fullscreen: {}", self.fullscreen)?;
        writeln!(f, "audio_enabled: {}", self.audio_enabled)?;
        writeln!(f, "audio_freq: {}", self.audio_freq)?;
        writeln!(f, "audio_buffers: {}", self.audio_buffers)?;
        writeln!(
            f,
            "audio_driver: {}",
            self.audio_driver.as_deref().unwrap_or("<default>")
        )?;
        writeln!(f, "joystick: {}", self.joystick)?;
        writeln!(
            f,
            "joy buttons: a={} b={} start={} select={}",
            self.joy_a, self.joy_b, self.joy_start, self.joy_select
        )?;
        writeln!(f, "joy axes: x={} y={}", self.joy_x, self.joy_y)?;
        writeln!(f, "verbose: {}", self.verbose)?;
        write!(f, "debug: {}", self.debug)
    }
}
