/// Sound cues: one procedural tone per game event, played via rodio.
///
/// Each cue is a single oscillator (sine, square or sawtooth) whose gain
/// starts at 0.3 and decays exponentially to 0.01 over the tone's length.
/// Buffers are rendered to in-memory WAV once at init; playback is
/// fire-and-forget through a detached rodio Sink.
///
/// Compile without the "sound" feature to get a stub engine that does
/// nothing. `SoundEngine::new()` returning None (no audio device) is
/// handled the same way by the caller: the game runs silent.

use std::f32::consts::TAU;

use crate::domain::entity::GemKind;
use crate::sim::event::GameEvent;

const SAMPLE_RATE: u32 = 22050;
const START_GAIN: f32 = 0.3;
const END_GAIN: f32 = 0.01;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Tone {
    pub frequency: f32,
    /// Seconds.
    pub duration: f32,
    pub waveform: Waveform,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Jump,
    Death,
    Diamond,
    Emerald,
    Stomp,
    LevelClear,
    Win,
    Lose,
    Start,
}

impl Cue {
    pub const ALL: [Cue; 9] = [
        Cue::Jump, Cue::Death, Cue::Diamond, Cue::Emerald, Cue::Stomp,
        Cue::LevelClear, Cue::Win, Cue::Lose, Cue::Start,
    ];

    pub fn tone(self) -> Tone {
        let (frequency, duration, waveform) = match self {
            Cue::Jump       => (440.0, 0.2, Waveform::Square),
            Cue::Death      => (220.0, 0.5, Waveform::Sawtooth),
            Cue::Diamond    => (880.0, 0.3, Waveform::Sine),
            Cue::Emerald    => (660.0, 0.3, Waveform::Sine),
            Cue::Stomp      => (330.0, 0.4, Waveform::Square),
            Cue::LevelClear => (660.0, 0.5, Waveform::Sine),
            Cue::Win        => (440.0, 1.0, Waveform::Sine),
            Cue::Lose       => (110.0, 1.0, Waveform::Sawtooth),
            Cue::Start      => (220.0, 0.1, Waveform::Sine),
        };
        Tone { frequency, duration, waveform }
    }
}

/// The cue an event sounds. Every event has one.
pub fn cue_for(event: &GameEvent) -> Cue {
    match event {
        GameEvent::GameStarted => Cue::Start,
        GameEvent::Jumped => Cue::Jump,
        GameEvent::PlayerDied { .. } => Cue::Death,
        GameEvent::GemCollected { kind: GemKind::Diamond, .. } => Cue::Diamond,
        GameEvent::GemCollected { kind: GemKind::Emerald, .. } => Cue::Emerald,
        GameEvent::EnemyDefeated { .. } => Cue::Stomp,
        GameEvent::LevelCleared { .. } => Cue::LevelClear,
        GameEvent::GameWon { .. } => Cue::Win,
        GameEvent::GameLost { .. } => Cue::Lose,
    }
}

// ════════════════════════════════════════════════════════════
//  Synthesis
// ════════════════════════════════════════════════════════════

/// Oscillator value in [-1, 1] at `phase` cycles.
fn oscillator(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (phase * TAU).sin(),
        Waveform::Square => if phase.fract() < 0.5 { 1.0 } else { -1.0 },
        Waveform::Sawtooth => 2.0 * (phase - (phase + 0.5).floor()),
    }
}

/// Render a tone to mono samples with the exponential gain ramp.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
pub fn synth(tone: &Tone) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * tone.duration) as usize;
    let ratio = END_GAIN / START_GAIN;
    (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let progress = i as f32 / n as f32;
            let gain = START_GAIN * ratio.powf(progress);
            oscillator(tone.waveform, t * tone.frequency) * gain
        })
        .collect()
}

/// Wrap f32 samples into a 16-bit mono PCM WAV buffer.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_size = samples.len() as u32 * 2;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }

    buf
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{make_wav, synth, Cue};

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        /// Rendered WAV per cue, indexed by `Cue as usize`.
        buffers: Vec<Arc<Vec<u8>>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, running silent: {e}");
                    return None;
                }
            };

            let buffers = Cue::ALL.iter()
                .map(|cue| Arc::new(make_wav(&synth(&cue.tone()))))
                .collect();

            log::info!("audio ready");
            Some(SoundEngine { _stream: stream, handle, buffers })
        }

        pub fn play(&self, cue: Cue) {
            let Some(buf) = self.buffers.get(cue as usize) else { return };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API (no-ops when the sound feature is off)
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _cue: Cue) {}
}
