use crate::bus::Bus;
use crate::config::RunConfig;
use crate::cpu::{Cpu, CpuError};
use crate::debug;
use crate::graphics::{self, FrameTimer, GraphicsError};
use crate::startup::SdlState;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use std::io;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TryRecvError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("CPU fault: {source}")]
    Cpu {
        #[from]
        source: CpuError,
    },
    #[error("rendering error: {source}")]
    Graphics {
        #[from]
        source: GraphicsError,
    },
    #[error("error persisting battery RAM: {source}")]
    BatteryPersist {
        #[source]
        source: io::Error,
    },
}

/// Messages on the control channel. Checked once per frame, at V-blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMsg {
    Quit,
}

/// Minimum machine cycles to run the CPU for before stepping peripherals.
const CPU_BURST_CYCLES: u32 = 10;

/// Run the emulator until the control channel says quit or a fatal CPU error
/// occurs. On a fatal error the diagnostic dump is written to stderr before
/// the error propagates; on a clean quit battery RAM is persisted.
pub fn run(
    mut bus: Bus,
    mut cpu: Cpu,
    sdl_state: SdlState,
    config: &RunConfig,
) -> Result<(), RunError> {
    log::info!("Running with config:\n{config}");

    // The SDL context, audio device and joystick must stay alive for the
    // whole run; bind them so the destructure does not drop them early.
    let SdlState {
        sdl: _sdl,
        mut canvas,
        mut event_pump,
        audio_device: _audio_device,
        joystick: _joystick,
    } = sdl_state;

    let texture_creator = canvas.texture_creator();
    let mut texture = graphics::create_frame_texture(&texture_creator)?;

    let (control_tx, control_rx): (SyncSender<ControlMsg>, Receiver<ControlMsg>) =
        sync_channel(1);

    let mut frame_timer = FrameTimer::new();

    loop {
        // Tight inner loop: several instructions per peripheral step
        let mut cycles = 0;
        while cycles < CPU_BURST_CYCLES {
            match cpu.step(&mut bus) {
                Ok(step_cycles) => cycles += step_cycles,
                Err(err) => {
                    log::error!("{err}");
                    let stderr = io::stderr();
                    if let Err(dump_err) = debug::dump(&mut stderr.lock(), &cpu, &bus) {
                        log::error!("error writing crash dump: {dump_err}");
                    }
                    return Err(err.into());
                }
            }
        }

        bus.update_timers(cycles);
        bus.step_peripherals(cycles);

        if !bus.ppu.take_frame() {
            continue;
        }

        graphics::render_frame(&mut canvas, &mut texture, bus.ppu.frame_buffer())?;

        // Audio backpressure paces emulation while sound runs; otherwise
        // sleep out the rest of the frame
        if !(config.audio_enabled && bus.apu.enabled()) {
            frame_timer.pace();
        }

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => {
                    let _ = control_tx.try_send(ControlMsg::Quit);
                }
                _ => bus.joypad.handle_event(&event, config),
            }
        }

        match control_rx.try_recv() {
            Ok(ControlMsg::Quit) => {
                log::info!("Quit requested, shutting down");
                bus.save_battery(&config.save_dir)
                    .map_err(|source| RunError::BatteryPersist { source })?;
                return Ok(());
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
        }
    }
}
