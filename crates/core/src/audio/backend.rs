use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Errors raised while opening, probing or playing audio.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Audio file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to probe audio file: {0}")]
    Probe(String),

    #[error("Failed to decode audio file: {0}")]
    Decode(String),

    #[error("No supported audio tracks found")]
    NoTrack,

    #[error("Audio output error: {0}")]
    Output(String),
}

/// An open, decodable audio asset bound to an output.
///
/// Dropping the handle releases the decoder and its output.
pub trait AudioHandle {
    /// Play the span `[start, end)` from the beginning of that span.
    fn play_range(&mut self, start: Duration, end: Duration);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Stop output. A stopped handle plays again only through `play_range`.
    fn stop(&mut self);

    /// Output volume as a percentage, 0..=100.
    fn set_volume(&mut self, percent: u32);

    /// Current playback position from the start of the asset.
    fn position(&self) -> Duration;

    /// Full length of the asset.
    fn length(&self) -> Duration;

    fn is_finished(&self) -> bool;
}

/// Source of audio handles plus a cheap header-only duration probe.
pub trait AudioBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn AudioHandle>, AudioError>;

    fn probe_duration(&self, path: &Path) -> Result<Duration, AudioError> {
        super::probe::probe_duration(path)
    }
}
