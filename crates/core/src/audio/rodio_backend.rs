use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::backend::{AudioBackend, AudioError, AudioHandle};
use super::probe::{guard_malformed, probe_duration};

/// Plays audio through a rodio output stream.
pub struct RodioBackend {
    stream: OutputStream,
    device_name: String,
}

impl RodioBackend {
    /// Open the system default output.
    pub fn new() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::Output(format!("Failed to open audio output stream: {}", e)))?;

        Ok(Self {
            stream,
            device_name: "Default".to_string(),
        })
    }

    /// Open the named output device, or the default for `"Default"`.
    ///
    /// An unknown name falls back to the default device with a warning.
    pub fn with_device(name: &str) -> Result<Self, AudioError> {
        if name.is_empty() || name == "Default" {
            return Self::new();
        }

        let host = cpal::default_host();
        let device = host
            .output_devices()
            .map_err(|e| AudioError::Output(format!("Failed to enumerate audio devices: {e}")))?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false));

        let Some(device) = device else {
            log::warn!("Audio device '{}' not found, using the default output", name);
            return Self::new();
        };

        let stream = OutputStreamBuilder::from_device(device)
            .and_then(|builder| builder.open_stream())
            .map_err(|e| AudioError::Output(format!("Failed to open '{}': {}", name, e)))?;

        log::info!("Opened audio output '{}'", name);
        Ok(Self {
            stream,
            device_name: name.to_string(),
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl AudioBackend for RodioBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn AudioHandle>, AudioError> {
        if !path.exists() {
            return Err(AudioError::NotFound(path.to_path_buf()));
        }

        let length = decoded_length(path)?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();

        log::debug!("Opened {:?} ({} ms)", path, length.as_millis());
        Ok(Box::new(RodioHandle {
            sink,
            path: path.to_path_buf(),
            length,
            offset: Duration::ZERO,
        }))
    }
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
    let file = File::open(path)?;
    guard_malformed(path, || {
        Decoder::new(BufReader::new(file))
            .map_err(|e| AudioError::Decode(format!("{}: {}", path.display(), e)))
    })
}

/// Length as seen by the decoder that will play the file, falling back to the
/// header probe when the decoder can't tell. Needs no output device.
pub fn decoded_length(path: &Path) -> Result<Duration, AudioError> {
    let decoder = open_decoder(path)?;
    match guard_malformed(path, || Ok(decoder.total_duration()))? {
        Some(length) => Ok(length),
        None => probe_duration(path),
    }
}

/// One open asset feeding its own sink.
pub struct RodioHandle {
    sink: Sink,
    path: PathBuf,
    length: Duration,
    /// Start of the span currently queued; the sink counts from there.
    offset: Duration,
}

impl AudioHandle for RodioHandle {
    fn play_range(&mut self, start: Duration, end: Duration) {
        self.sink.clear();

        let decoder = match open_decoder(&self.path) {
            Ok(decoder) => decoder,
            Err(e) => {
                log::warn!("Unable to play {:?}: {}", self.path, e);
                return;
            }
        };

        let end = end.min(self.length);
        let source = decoder
            .skip_duration(start)
            .take_duration(end.saturating_sub(start));

        self.offset = start;
        self.sink.append(source);
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn resume(&mut self) {
        self.sink.play();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }

    fn set_volume(&mut self, percent: u32) {
        self.sink.set_volume(percent.min(100) as f32 / 100.0);
    }

    fn position(&self) -> Duration {
        if self.sink.empty() {
            return Duration::ZERO;
        }
        self.offset + self.sink.get_pos()
    }

    fn length(&self) -> Duration {
        self.length
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}
