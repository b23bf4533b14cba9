use crate::apu::{AudioMsg, BUFFER_FRAMES};
use crate::config::RunConfig;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::AudioSubsystem;
use std::collections::VecDeque;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("error opening audio device: {msg}")]
    DeviceOpen { msg: String },
}

/// The audio sink: runs on SDL's audio thread and drains the bounded buffer
/// channel the APU produces into. While the APU is ahead of real time the
/// channel is full and the APU's send blocks, which is what paces emulation
/// when audio is enabled. While masked off through NR52, buffers are drained
/// and dropped so the producer never stalls.
pub struct Sink {
    rx: Receiver<AudioMsg>,
    pending: VecDeque<i16>,
    paused: bool,
}

impl AudioCallback for Sink {
    type Channel = i16;

    fn callback(&mut self, out: &mut [i16]) {
        while self.paused || self.pending.len() < out.len() {
            match self.rx.try_recv() {
                Ok(AudioMsg::Buffer(buffer)) => {
                    if !self.paused {
                        self.pending.extend(buffer);
                    }
                }
                Ok(AudioMsg::Pause(paused)) => {
                    self.paused = paused;
                }
                Err(_) => break,
            }
        }

        for sample in out.iter_mut() {
            *sample = self.pending.pop_front().unwrap_or(0);
        }
    }
}

/// Open the playback device and spawn the sink. Returns the device (which
/// must stay alive for playback to continue) and the producer side of the
/// buffer channel for the APU.
pub fn open(
    audio: &AudioSubsystem,
    config: &RunConfig,
) -> Result<(AudioDevice<Sink>, SyncSender<AudioMsg>), AudioError> {
    // Keeping two buffers out of the channel bounds how far the emulator can
    // run ahead of the speaker
    let capacity = config.audio_buffers.saturating_sub(2).max(1);
    let (tx, rx) = sync_channel(capacity);

    let desired = AudioSpecDesired {
        freq: Some(config.audio_freq as i32),
        channels: Some(2),
        samples: Some(BUFFER_FRAMES as u16),
    };

    let device = audio
        .open_playback(config.audio_driver.as_deref(), &desired, |spec| {
            log::info!("Opened audio:");
            log::info!("  rate:        {}Hz", spec.freq);
            log::info!("  channels:    {}", spec.channels);
            log::info!("  buffer size: {} samples", spec.samples);
            log::info!("  buffers:     {}", config.audio_buffers);

            Sink {
                rx,
                pending: VecDeque::with_capacity(4 * BUFFER_FRAMES),
                paused: false,
            }
        })
        .map_err(|msg| AudioError::DeviceOpen { msg })?;

    device.resume();

    Ok((device, tx))
}
