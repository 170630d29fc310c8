use std::f32::consts::TAU;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use rodio::decoder::DecoderError;
use rodio::{OutputStream, OutputStreamHandle, PlayError, Sink, Source, StreamError};
use thiserror::Error;

const TONE_SAMPLE_RATE: u32 = 22_050;
const TONE_DURATION: Duration = Duration::from_millis(100);

// Sound side effects requested by the simulation, drained by the host once per frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioIntent {
    ThrustStart,
    ThrustStop,
    Shoot,
    StopAll,
    MusicStart,
    MusicStop,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Stream(#[from] StreamError),
    #[error("could not open playback sink: {0}")]
    Play(#[from] PlayError),
    #[error("could not decode music: {0}")]
    Decode(#[from] DecoderError),
    #[error("could not read music file: {0}")]
    Io(#[from] io::Error),
}

pub trait AudioSink {
    fn apply(&mut self, intent: AudioIntent);

    fn maintain(&mut self) {}
}

pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn apply(&mut self, intent: AudioIntent) {
        debug!("Audio muted, dropping {:?}", intent);
    }
}

// --- Synthesised effects ---

/// A decaying sine burst: `amplitude * sin(2*pi*f*t) * exp(-decay*t)`.
#[derive(Clone, Debug)]
pub struct Tone {
    frequency: f32,
    amplitude: f32,
    decay: f32,
    index: usize,
    samples: usize,
}

impl Tone {
    pub fn new(frequency: f32, amplitude: f32, decay: f32, duration: Duration) -> Self {
        let samples = (duration.as_millis() * TONE_SAMPLE_RATE as u128 / 1000) as usize;
        Tone { frequency, amplitude, decay, index: 0, samples }
    }

    pub fn thrust() -> Self {
        Tone::new(80.0, 4096.0 / 32768.0, 5.0, TONE_DURATION)
    }

    pub fn shot() -> Self {
        Tone::new(1200.0, 3000.0 / 32768.0, 15.0, TONE_DURATION)
    }
}

impl Iterator for Tone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.samples {
            return None;
        }
        let time = self.index as f32 / TONE_SAMPLE_RATE as f32;
        self.index += 1;
        Some(self.amplitude * (TAU * self.frequency * time).sin() * (-time * self.decay).exp())
    }
}

impl Source for Tone {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples - self.index)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        TONE_SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(self.samples as f32 / TONE_SAMPLE_RATE as f32))
    }
}

pub fn locate_music(configured: &Path) -> Option<PathBuf> {
    if configured.is_file() {
        return Some(configured.to_path_buf());
    }
    let file_name = configured.file_name()?;
    let beside_exe = std::env::current_exe().ok()?.parent()?.join(file_name);
    if beside_exe.is_file() {
        info!("Loaded music from {}", beside_exe.display());
        Some(beside_exe)
    } else {
        None
    }
}

// --- rodio backend ---

pub struct SoundDriver {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    thrust: Sink,
    effects: Vec<Sink>,
    music: Option<Sink>,
    music_path: Option<PathBuf>,
}

impl SoundDriver {
    pub fn try_create(music: &Path) -> Result<Self, AudioError> {
        let (_stream, handle) = OutputStream::try_default()?;
        let thrust = Sink::try_new(&handle)?;
        thrust.append(Tone::thrust().buffered().repeat_infinite());
        thrust.pause();

        let music_path = locate_music(music);
        if music_path.is_none() {
            warn!("Could not find {} in any location, game over will be silent", music.display());
        }

        Ok(SoundDriver {
            _stream,
            handle,
            thrust,
            effects: Vec::new(),
            music: None,
            music_path,
        })
    }

    fn play_shot(&mut self) -> Result<(), AudioError> {
        let sink = Sink::try_new(&self.handle)?;
        sink.append(Tone::shot());
        self.effects.push(sink);
        Ok(())
    }

    fn start_music(&mut self) -> Result<(), AudioError> {
        let Some(path) = &self.music_path else {
            return Ok(());
        };
        let decoder = rodio::Decoder::new(BufReader::new(File::open(path)?))?;
        let sink = Sink::try_new(&self.handle)?;
        sink.append(decoder);
        if let Some(previous) = self.music.replace(sink) {
            previous.stop();
        }
        Ok(())
    }

    fn stop_effects(&mut self) {
        self.thrust.pause();
        for sink in self.effects.drain(..) {
            sink.stop();
        }
    }
}

impl AudioSink for SoundDriver {
    fn apply(&mut self, intent: AudioIntent) {
        match intent {
            AudioIntent::ThrustStart => self.thrust.play(),
            AudioIntent::ThrustStop => self.thrust.pause(),
            AudioIntent::Shoot => {
                if let Err(e) = self.play_shot() {
                    warn!("Could not play bullet sound: {}", e);
                }
            }
            AudioIntent::StopAll => self.stop_effects(),
            AudioIntent::MusicStart => {
                if let Err(e) = self.start_music() {
                    warn!("Could not play game over music: {}", e);
                    self.music_path = None;
                }
            }
            AudioIntent::MusicStop => {
                if let Some(sink) = self.music.take() {
                    sink.stop();
                }
            }
        }
    }

    fn maintain(&mut self) {
        self.effects.retain(|sink| !sink.empty());
    }
}

pub fn open_audio(mute: bool, music: &Path) -> Box<dyn AudioSink> {
    if mute {
        info!("Audio disabled by --mute.");
        return Box::new(SilentAudio);
    }
    match SoundDriver::try_create(music) {
        Ok(driver) => {
            info!("Audio output opened.");
            Box::new(driver)
        }
        Err(e) => {
            warn!("Audio unavailable, continuing without sound: {}", e);
            Box::new(SilentAudio)
        }
    }
}
