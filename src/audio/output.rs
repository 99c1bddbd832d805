// Audio output - playback through cpal
//
// Manages the audio device, stream and callback. The player thread pushes
// signed 16-bit mono samples into a shared ring buffer; the device callback
// drains it, padding with silence on underrun.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use std::fmt;
use std::sync::{Arc, Mutex};

use super::SampleBuffer;

/// Errors raised while opening the audio output
#[derive(Debug)]
pub enum AudioError {
    /// No output device available
    NoDevice,

    /// Building the output stream failed
    BuildStream(cpal::BuildStreamError),

    /// Starting the output stream failed
    PlayStream(cpal::PlayStreamError),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoDevice => write!(f, "no audio output device available"),
            AudioError::BuildStream(e) => write!(f, "failed to build audio stream: {}", e),
            AudioError::PlayStream(e) => write!(f, "failed to start audio stream: {}", e),
        }
    }
}

impl std::error::Error for AudioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AudioError::NoDevice => None,
            AudioError::BuildStream(e) => Some(e),
            AudioError::PlayStream(e) => Some(e),
        }
    }
}

/// Audio output configuration
#[derive(Clone)]
pub struct AudioConfig {
    /// Sample rate in Hz (44100 or 48000)
    pub sample_rate: u32,

    /// Buffer capacity in frames
    pub buffer_frames: usize,
}

impl AudioConfig {
    /// Create default audio configuration: 48 kHz, ~50 ms of buffer
    pub fn new() -> Self {
        Self {
            sample_rate: 48000,
            buffer_frames: 2400,
        }
    }

    /// Set the sample rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the buffer capacity in frames
    pub fn with_buffer_frames(mut self, frames: usize) -> Self {
        self.buffer_frames = frames;
        self
    }

    /// Set the buffer capacity from a duration in milliseconds
    pub fn with_buffer_duration(mut self, duration_ms: u32) -> Self {
        self.buffer_frames = (u64::from(duration_ms) * u64::from(self.sample_rate) / 1000) as usize;
        self
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Audio output handle
///
/// Keeps the device and stream alive for the lifetime of the playback.
pub struct AudioOutput {
    /// Audio device
    _device: Device,

    /// Audio stream
    stream: Stream,

    /// Shared sample buffer
    buffer: Arc<Mutex<SampleBuffer>>,
}

impl AudioOutput {
    /// Open the default output device as a mono signed 16-bit stream
    pub fn new(config: AudioConfig) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        println!("Audio device: {}", device.name().unwrap_or_default());

        let stream_config = StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let buffer = Arc::new(Mutex::new(SampleBuffer::new(config.buffer_frames)));
        let buffer_clone = Arc::clone(&buffer);

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    let mut buf = buffer_clone.lock().unwrap();
                    for sample in data.iter_mut() {
                        *sample = buf.pop().unwrap_or(0);
                    }
                },
                move |err| {
                    eprintln!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(AudioError::BuildStream)?;

        stream.play().map_err(AudioError::PlayStream)?;

        println!("Audio output initialized: {} Hz, mono", config.sample_rate);

        Ok(Self {
            _device: device,
            stream,
            buffer,
        })
    }

    /// Push a sample into the playback buffer
    ///
    /// Returns false when the buffer is full; the caller should back off
    /// briefly and retry.
    pub fn push_sample(&self, sample: i16) -> bool {
        self.buffer.lock().unwrap().push(sample)
    }

    /// Number of samples waiting in the playback buffer
    pub fn buffered(&self) -> usize {
        self.buffer.lock().unwrap().len()
    }

    /// Drop any buffered samples
    pub fn clear(&self) {
        self.buffer.lock().unwrap().clear();
    }

    /// Pause playback
    pub fn pause(&self) -> Result<(), cpal::PauseStreamError> {
        self.stream.pause()
    }

    /// Resume playback
    pub fn resume(&self) -> Result<(), AudioError> {
        self.stream.play().map_err(AudioError::PlayStream)
    }
}

// Note: AudioOutput cannot be constructed in unit tests, as it requires
// audio hardware. The ring buffer it is built on is covered in the parent
// module.
