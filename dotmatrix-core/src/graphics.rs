use crate::config::RunConfig;
use crate::ppu::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::{Texture, TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;
use sdl2::VideoSubsystem;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphicsError {
    #[error("error building SDL2 window: {source}")]
    WindowBuild {
        #[from]
        source: sdl2::video::WindowBuildError,
    },
    #[error("error building SDL2 canvas: {source}")]
    CanvasBuild {
        #[from]
        source: sdl2::IntegerOrSdlError,
    },
    #[error("error creating frame texture: {source}")]
    TextureCreate {
        #[from]
        source: sdl2::render::TextureValueError,
    },
    #[error("error updating frame texture: {msg}")]
    TextureUpdate { msg: String },
    #[error("error copying frame texture to canvas: {msg}")]
    CopyToCanvas { msg: String },
}

/// The classic DMG green shades, lightest to darkest.
const DMG_PALETTE: [[u8; 3]; 4] = [
    [0x9B, 0xBC, 0x0F],
    [0x8B, 0xAC, 0x0F],
    [0x30, 0x62, 0x30],
    [0x0F, 0x38, 0x0F],
];

/// One frame period at the hardware refresh rate (59.73 Hz).
const FRAME_DURATION: Duration = Duration::from_nanos(16_742_706);

/// Create the emulator window and canvas, cleared to the palette's lightest
/// shade.
pub fn create_canvas(
    video: &VideoSubsystem,
    title: &str,
    config: &RunConfig,
) -> Result<WindowCanvas, GraphicsError> {
    let width = SCREEN_WIDTH as u32 * config.scale;
    let height = SCREEN_HEIGHT as u32 * config.scale;

    let mut builder = video.window(title, width, height);
    builder.position_centered();
    if config.fullscreen {
        builder.fullscreen();
    }
    let window = builder.build()?;

    let mut canvas = window.into_canvas().build()?;
    let [r, g, b] = DMG_PALETTE[0];
    canvas.set_draw_color(Color::RGB(r, g, b));
    canvas.clear();
    canvas.present();

    Ok(canvas)
}

pub fn create_frame_texture(
    texture_creator: &TextureCreator<WindowContext>,
) -> Result<Texture<'_>, GraphicsError> {
    Ok(texture_creator.create_texture_streaming(
        PixelFormatEnum::RGB24,
        SCREEN_WIDTH as u32,
        SCREEN_HEIGHT as u32,
    )?)
}

/// Blit the palette-indexed framebuffer to the window, scaled by the canvas.
pub fn render_frame(
    canvas: &mut WindowCanvas,
    texture: &mut Texture<'_>,
    frame: &FrameBuffer,
) -> Result<(), GraphicsError> {
    texture
        .with_lock(None, |pixels: &mut [u8], pitch: usize| {
            for (y, row) in frame.iter().enumerate() {
                for (x, &index) in row.iter().enumerate() {
                    let start = y * pitch + 3 * x;
                    pixels[start..start + 3].copy_from_slice(&DMG_PALETTE[usize::from(index)]);
                }
            }
        })
        .map_err(|msg| GraphicsError::TextureUpdate { msg })?;

    canvas.clear();
    canvas
        .copy(texture, None, None)
        .map_err(|msg| GraphicsError::CopyToCanvas { msg })?;
    canvas.present();

    Ok(())
}

/// Sleep-until-deadline frame pacer, used when audio backpressure is not
/// pacing the emulator.
pub struct FrameTimer {
    last: Instant,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    pub fn pace(&mut self) {
        let elapsed = self.last.elapsed();
        if elapsed < FRAME_DURATION {
            thread::sleep(FRAME_DURATION - elapsed);
        }
        self.last = Instant::now();
    }
}
