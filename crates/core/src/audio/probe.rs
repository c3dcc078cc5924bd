//! Header-only audio inspection.

use std::fs::File;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Duration;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::backend::AudioError;

/// File extensions treated as playable audio.
pub const AUDIO_EXTENSIONS: [&str; 8] = ["mp3", "ogg", "mid", "au", "wav", "m4a", "wma", "m4p"];

/// True when `ext` (without the dot) names a playable audio format.
pub fn is_audio(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    AUDIO_EXTENSIONS.contains(&ext.as_str())
}

/// True when the path's extension names a playable audio format.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(is_audio)
        .unwrap_or(false)
}

/// Read the duration of an audio file from its container headers.
///
/// No packets are decoded, so this is cheap enough to run whenever a file
/// path changes.
pub fn probe_duration<P: AsRef<Path>>(path: P) -> Result<Duration, AudioError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AudioError::NotFound(path.to_path_buf()));
    }

    guard_malformed(path, || read_header_duration(path))
}

/// Run a decoder call that may panic on malformed headers (a zero sample rate,
/// for instance) and report the panic as a probe error.
pub(crate) fn guard_malformed<T>(
    path: &Path,
    f: impl FnOnce() -> Result<T, AudioError>,
) -> Result<T, AudioError> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        Err(AudioError::Probe(format!(
            "{}: malformed audio header",
            path.display()
        )))
    })
}

fn read_header_duration(path: &Path) -> Result<Duration, AudioError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::Probe(e.to_string()))?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(AudioError::NoTrack)?;

    let params = &track.codec_params;
    let n_frames = params
        .n_frames
        .ok_or_else(|| AudioError::Probe("track length is not known".to_string()))?;

    if let Some(time_base) = params.time_base {
        let time = time_base.calc_time(n_frames);
        return Ok(Duration::from_secs(time.seconds) + Duration::from_secs_f64(time.frac));
    }

    let sample_rate = params
        .sample_rate
        .ok_or_else(|| AudioError::Probe("track has no sample rate".to_string()))?;
    Ok(Duration::from_secs_f64(n_frames as f64 / sample_rate as f64))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    /// Write a silent 16-bit mono PCM wav file of the given length. A zero
    /// sample rate produces a header-only file with a zero byte rate.
    pub(crate) fn write_silent_wav(path: &Path, sample_rate: u32, millis: u32) {
        let samples = sample_rate as u64 * millis as u64 / 1000;
        let data_len = (samples * 2) as u32;

        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(44 + data_len as usize, 0);

        let mut file = File::create(path).unwrap();
        file.write_all(&bytes).unwrap();
    }

    #[test]
    fn test_is_audio_extensions() {
        for ext in ["mp3", "ogg", "mid", "au", "wav", "m4a", "wma", "m4p", "MP3", "Wav"] {
            assert!(is_audio(ext), "{} should be audio", ext);
        }
        assert!(!is_audio("flac"));
        assert!(!is_audio("txt"));
        assert!(!is_audio(""));
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("/shows/xmas/song.mp3")));
        assert!(!is_audio_file(Path::new("/shows/xmas/song")));
        assert!(!is_audio_file(Path::new("/shows/xmas/layout.xml")));
    }

    #[test]
    fn test_probe_wav_duration() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_silent_wav(&path, 8000, 1500);

        let duration = probe_duration(&path).unwrap();
        assert_eq!(duration.as_millis(), 1500);
    }

    #[test]
    fn test_probe_missing_file() {
        let result = probe_duration("/definitely/not/here.wav");
        assert!(matches!(result, Err(AudioError::NotFound(_))));
    }

    #[test]
    fn test_zero_sample_rate_is_probe_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.wav");
        write_silent_wav(&path, 0, 1000);

        let result = probe_duration(&path);
        assert!(matches!(result, Err(AudioError::Probe(_))), "{:?}", result);
    }

    #[test]
    fn test_probe_garbage_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("noise.wav");
        std::fs::write(&path, b"this is not audio").unwrap();

        assert!(probe_duration(&path).is_err());
    }
}
