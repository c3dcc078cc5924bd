//! Playlist item that plays an audio file and clocks its step.
//!
//! An audio item is the timing authority for its step as soon as it has a
//! readable file with a known length. The decode handle is only held while
//! the item is started; stopping, replacing the file, or dropping the item
//! releases it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use lumen_fixtures::attributes::{get_str, Attributes};

use super::item::{ItemSettings, PlaylistItem};
use crate::audio::{AudioBackend, AudioHandle};

/// Element name used when persisting audio items.
pub const AUDIO_ITEM_ELEMENT: &str = "PLIAudio";
pub const ATTR_AUDIO_FILE: &str = "AudioFile";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// No handle open.
    Idle,
    /// Handle open, not yet playing.
    Loaded,
    Playing,
    Paused,
    /// Stopped by the scheduler; the handle has been released.
    Stopped,
}

pub struct PlaylistItemAudio {
    settings: ItemSettings,
    audio_file: PathBuf,
    duration_ms: u64,
    controls_timing: bool,
    change_count: u32,
    state: PlaybackState,
    handle: Option<Box<dyn AudioHandle>>,
    backend: Rc<dyn AudioBackend>,
}

impl PlaylistItemAudio {
    pub fn new(backend: Rc<dyn AudioBackend>) -> Self {
        Self {
            settings: ItemSettings::default(),
            audio_file: PathBuf::new(),
            duration_ms: 0,
            controls_timing: false,
            change_count: 0,
            state: PlaybackState::Idle,
            handle: None,
            backend,
        }
    }

    /// Restore an item from its persisted attributes and probe its length.
    pub fn from_attributes(backend: Rc<dyn AudioBackend>, attrs: &Attributes) -> Self {
        let mut item = Self::new(backend);
        item.settings = ItemSettings::from_attributes(attrs);
        item.audio_file = PathBuf::from(get_str(attrs, ATTR_AUDIO_FILE, ""));
        item.fast_probe_duration();
        item
    }

    pub fn audio_file(&self) -> &Path {
        &self.audio_file
    }

    pub fn settings(&self) -> &ItemSettings {
        &self.settings
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn set_volume(&mut self, volume: Option<u32>) {
        let volume = volume.map(|v| v.min(100));
        if self.settings.volume != volume {
            self.settings.volume = volume;
            self.change_count += 1;
            if let (Some(handle), Some(v)) = (self.handle.as_mut(), volume) {
                handle.set_volume(v);
            }
        }
    }

    /// Point the item at a different file.
    ///
    /// Any open handle is released and the length is re-probed; the new file
    /// is not opened until the item starts.
    pub fn set_audio_file<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        if self.audio_file == path {
            return;
        }

        self.close_files();
        self.state = PlaybackState::Idle;
        self.audio_file = path.to_path_buf();
        self.fast_probe_duration();
        self.change_count += 1;
    }

    /// Read the file's length from its headers without opening a decoder.
    ///
    /// The item becomes timing-authority capable when the file exists and
    /// reports a non-zero length.
    pub fn fast_probe_duration(&mut self) {
        self.duration_ms = 0;
        self.controls_timing = false;

        if !self.audio_file.is_file() {
            return;
        }

        match self.backend.probe_duration(&self.audio_file) {
            Ok(duration) => {
                self.duration_ms = duration.as_millis() as u64;
                self.controls_timing = self.duration_ms > 0;
            }
            Err(e) => {
                log::warn!("Unable to read length of {:?}: {}", self.audio_file, e);
            }
        }
    }

    /// Open a fresh decode handle for the current file.
    ///
    /// A missing or unreadable file leaves the item idle; nothing is raised.
    pub fn load_files(&mut self) {
        self.close_files();

        if !self.audio_file.is_file() {
            log::debug!("Audio file {:?} does not exist", self.audio_file);
            return;
        }

        match self.backend.open(&self.audio_file) {
            Ok(mut handle) => {
                if let Some(volume) = self.settings.volume {
                    handle.set_volume(volume);
                }
                self.duration_ms = handle.length().as_millis() as u64;
                self.controls_timing = true;
                self.handle = Some(handle);
                self.state = PlaybackState::Loaded;
                log::info!(
                    "Loaded {:?} ({} ms)",
                    self.audio_file,
                    self.duration_ms
                );
            }
            Err(e) => {
                log::warn!("Unable to open {:?}: {}", self.audio_file, e);
            }
        }
    }

    /// Release the decode handle, if any.
    pub fn close_files(&mut self) {
        if self.handle.take().is_some() {
            log::debug!("Closed {:?}", self.audio_file);
            if self.state != PlaybackState::Stopped {
                self.state = PlaybackState::Idle;
            }
        }
    }

    pub fn resume(&mut self) {
        self.pause(false);
    }

    /// True once a started item has played to its end.
    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Playing
            && self.handle.as_ref().map_or(false, |h| h.is_finished())
    }

    fn play_from_start(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let length = handle.length();
            handle.play_range(Duration::ZERO, length);
            self.state = PlaybackState::Playing;
        }
    }
}

impl PlaylistItem for PlaylistItemAudio {
    fn title(&self) -> &'static str {
        "Audio"
    }

    fn name_no_time(&self) -> String {
        self.audio_file
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("Audio")
            .to_string()
    }

    fn start(&mut self) {
        self.load_files();

        if self.controls_timing {
            self.play_from_start();
        }
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            handle.stop();
            self.state = PlaybackState::Stopped;
        }
        self.close_files();
    }

    fn pause(&mut self, pause: bool) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };

        if pause {
            handle.pause();
            self.state = PlaybackState::Paused;
        } else {
            handle.resume();
            self.state = PlaybackState::Playing;
        }
    }

    fn restart(&mut self) {
        if !self.controls_timing {
            return;
        }
        if let Some(handle) = self.handle.as_mut() {
            handle.stop();
            self.play_from_start();
        }
    }

    fn position_ms(&self) -> u64 {
        match &self.handle {
            Some(handle) if self.controls_timing => handle.position().as_millis() as u64,
            _ => 0,
        }
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    fn controls_timing(&self) -> bool {
        self.controls_timing
    }

    fn is_running(&self) -> bool {
        matches!(self.state, PlaybackState::Playing | PlaybackState::Paused)
    }

    fn change_count(&self) -> u32 {
        self.change_count
    }

    fn to_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert(
            ATTR_AUDIO_FILE.to_string(),
            self.audio_file.to_string_lossy().to_string(),
        );
        self.settings.write_attributes(&mut attrs);
        attrs
    }
}

/// Copies the file, settings and probed length. The copy starts idle with no
/// handle of its own.
impl Clone for PlaylistItemAudio {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            audio_file: self.audio_file.clone(),
            duration_ms: self.duration_ms,
            controls_timing: self.controls_timing,
            change_count: self.change_count,
            state: PlaybackState::Idle,
            handle: None,
            backend: Rc::clone(&self.backend),
        }
    }
}

impl fmt::Debug for PlaylistItemAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaylistItemAudio")
            .field("audio_file", &self.audio_file)
            .field("duration_ms", &self.duration_ms)
            .field("controls_timing", &self.controls_timing)
            .field("state", &self.state)
            .field("open", &self.handle.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tempfile::TempDir;

    use super::*;
    use crate::audio::decoded_length;
    use crate::audio::probe::tests::write_silent_wav;
    use crate::audio::AudioError;

    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<String>,
        open_handles: usize,
        position: Duration,
        finished: bool,
    }

    /// Backend that records calls instead of producing sound. Handles report
    /// the length the playback decoder sees.
    struct FakeBackend {
        recorder: Rc<RefCell<Recorder>>,
        length: Option<Duration>,
    }

    struct FakeHandle {
        recorder: Rc<RefCell<Recorder>>,
        length: Duration,
    }

    impl AudioBackend for FakeBackend {
        fn open(&self, path: &Path) -> Result<Box<dyn AudioHandle>, AudioError> {
            let length = match self.length {
                Some(length) => length,
                None => decoded_length(path)?,
            };
            let mut rec = self.recorder.borrow_mut();
            rec.open_handles += 1;
            rec.events.push("open".to_string());
            Ok(Box::new(FakeHandle {
                recorder: Rc::clone(&self.recorder),
                length,
            }))
        }
    }

    impl FakeHandle {
        fn log(&self, event: String) {
            self.recorder.borrow_mut().events.push(event);
        }
    }

    impl AudioHandle for FakeHandle {
        fn play_range(&mut self, start: Duration, end: Duration) {
            self.log(format!("play {}..{}", start.as_millis(), end.as_millis()));
        }

        fn pause(&mut self) {
            self.log("pause".to_string());
        }

        fn resume(&mut self) {
            self.log("resume".to_string());
        }

        fn stop(&mut self) {
            self.log("stop".to_string());
        }

        fn set_volume(&mut self, percent: u32) {
            self.log(format!("volume {}", percent));
        }

        fn position(&self) -> Duration {
            self.recorder.borrow().position
        }

        fn length(&self) -> Duration {
            self.length
        }

        fn is_finished(&self) -> bool {
            self.recorder.borrow().finished
        }
    }

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            let mut rec = self.recorder.borrow_mut();
            rec.open_handles -= 1;
            rec.events.push("close".to_string());
        }
    }

    struct Fixture {
        _dir: TempDir,
        path: PathBuf,
        recorder: Rc<RefCell<Recorder>>,
        backend: Rc<dyn AudioBackend>,
    }

    fn fixture(millis: u32) -> Fixture {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song.wav");
        write_silent_wav(&path, 8000, millis);

        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let backend: Rc<dyn AudioBackend> = Rc::new(FakeBackend {
            recorder: Rc::clone(&recorder),
            length: None,
        });

        Fixture {
            _dir: dir,
            path,
            recorder,
            backend,
        }
    }

    fn events(recorder: &Rc<RefCell<Recorder>>) -> Vec<String> {
        recorder.borrow().events.clone()
    }

    #[test]
    fn test_set_audio_file_probes_without_opening() {
        let f = fixture(2000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));

        item.set_audio_file(&f.path);

        assert_eq!(item.duration_ms(), 2000);
        assert!(item.controls_timing());
        assert!(!item.is_open());
        assert_eq!(item.change_count(), 1);
        assert!(events(&f.recorder).is_empty());

        // Same path again changes nothing
        item.set_audio_file(&f.path);
        assert_eq!(item.change_count(), 1);
    }

    #[test]
    fn test_probed_duration_matches_opened_duration() {
        let f = fixture(1250);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));

        item.set_audio_file(&f.path);
        let probed = item.duration_ms();

        item.start();
        let opened = item.duration_ms();
        item.stop();

        assert_eq!(probed, opened);
        assert_eq!(item.duration_ms(), 1250);
    }

    #[test]
    fn test_start_plays_full_length() {
        let f = fixture(1000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(&f.path);

        item.start();

        assert_eq!(item.state(), PlaybackState::Playing);
        assert!(item.is_running());
        assert_eq!(events(&f.recorder), vec!["open", "play 0..1000"]);
    }

    #[test]
    fn test_start_missing_file_is_silent_noop() {
        let f = fixture(1000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(f.path.with_file_name("missing.mp3"));

        item.start();

        assert_eq!(item.position_ms(), 0);
        assert_eq!(item.duration_ms(), 0);
        assert!(!item.controls_timing());
        assert!(!item.is_open());
        assert_eq!(item.state(), PlaybackState::Idle);
        assert!(events(&f.recorder).is_empty());
    }

    #[test]
    fn test_configured_volume_applied_on_load() {
        let f = fixture(1000);
        let mut attrs = Attributes::new();
        attrs.insert("AudioFile".to_string(), f.path.to_string_lossy().to_string());
        attrs.insert("Volume".to_string(), "65".to_string());

        let mut item = PlaylistItemAudio::from_attributes(Rc::clone(&f.backend), &attrs);
        assert_eq!(item.duration_ms(), 1000);

        item.start();
        assert_eq!(events(&f.recorder), vec!["open", "volume 65", "play 0..1000"]);
    }

    #[test]
    fn test_position_reported_only_while_open() {
        let f = fixture(1000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(&f.path);
        f.recorder.borrow_mut().position = Duration::from_millis(420);

        // Timing capable but nothing open yet
        assert_eq!(item.position_ms(), 0);

        item.start();
        assert_eq!(item.position_ms(), 420);

        item.stop();
        assert_eq!(item.position_ms(), 0);
        assert_eq!(item.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_pause_keeps_handle() {
        let f = fixture(1000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(&f.path);
        item.start();

        item.pause(true);
        assert_eq!(item.state(), PlaybackState::Paused);
        assert!(item.is_open());

        item.resume();
        assert_eq!(item.state(), PlaybackState::Playing);

        item.suspend(true);
        assert_eq!(item.state(), PlaybackState::Paused);

        assert_eq!(
            events(&f.recorder),
            vec!["open", "play 0..1000", "pause", "resume", "pause"]
        );
        assert_eq!(f.recorder.borrow().open_handles, 1);
    }

    #[test]
    fn test_pause_without_handle_is_noop() {
        let f = fixture(1000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(&f.path);

        item.pause(true);
        assert_eq!(item.state(), PlaybackState::Idle);
        assert!(events(&f.recorder).is_empty());
    }

    #[test]
    fn test_restart_replays_from_zero() {
        let f = fixture(1000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(&f.path);

        // Nothing open yet
        item.restart();
        assert!(events(&f.recorder).is_empty());

        item.start();
        item.pause(true);
        item.restart();

        assert_eq!(item.state(), PlaybackState::Playing);
        assert_eq!(
            events(&f.recorder),
            vec!["open", "play 0..1000", "pause", "stop", "play 0..1000"]
        );
    }

    #[test]
    fn test_stop_releases_handle() {
        let f = fixture(1000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(&f.path);

        item.start();
        item.stop();

        assert!(!item.is_open());
        assert!(!item.is_running());
        assert_eq!(f.recorder.borrow().open_handles, 0);
        assert_eq!(events(&f.recorder).last().map(String::as_str), Some("close"));
    }

    #[test]
    fn test_restarting_item_never_leaks_handles() {
        let f = fixture(1000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(&f.path);

        item.start();
        item.start();
        item.load_files();
        assert_eq!(f.recorder.borrow().open_handles, 1);

        // Replacing the file releases the open handle
        item.set_audio_file(f.path.with_file_name("other.wav"));
        assert_eq!(f.recorder.borrow().open_handles, 0);
        assert_eq!(item.state(), PlaybackState::Idle);

        item.set_audio_file(&f.path);
        item.start();
        drop(item);
        assert_eq!(f.recorder.borrow().open_handles, 0);
    }

    #[test]
    fn test_clone_does_not_share_handle() {
        let f = fixture(1000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(&f.path);
        item.start();

        let copy = item.clone();
        assert!(!copy.is_open());
        assert_eq!(copy.state(), PlaybackState::Idle);
        assert_eq!(copy.duration_ms(), 1000);
        assert!(copy.controls_timing());
        assert_eq!(copy.audio_file(), item.audio_file());
        assert_eq!(f.recorder.borrow().open_handles, 1);
    }

    #[test]
    fn test_finished_detection() {
        let f = fixture(1000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(&f.path);
        item.start();

        assert!(!item.is_finished());
        f.recorder.borrow_mut().finished = true;
        assert!(item.is_finished());
    }

    #[test]
    fn test_names_and_attributes() {
        let f = fixture(1000);
        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        assert_eq!(item.title(), "Audio");
        assert_eq!(item.name_no_time(), "Audio");

        item.set_audio_file(&f.path);
        item.set_volume(Some(120));
        assert_eq!(item.name_no_time(), "song");
        assert_eq!(item.settings().volume, Some(100));

        let attrs = item.to_attributes();
        let expected = f.path.to_string_lossy().to_string();
        assert_eq!(attrs.get("AudioFile"), Some(&expected));

        let restored = PlaylistItemAudio::from_attributes(Rc::clone(&f.backend), &attrs);
        assert_eq!(restored.audio_file(), f.path.as_path());
        assert_eq!(restored.duration_ms(), 1000);
        assert_eq!(restored.settings().volume, Some(100));
    }

    #[test]
    fn test_malformed_header_degrades_silently() {
        let f = fixture(1000);
        let broken = f.path.with_file_name("broken.wav");
        write_silent_wav(&broken, 0, 1000);

        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(&broken);
        assert_eq!(item.duration_ms(), 0);
        assert!(!item.controls_timing());

        item.start();
        assert!(!item.is_open());
        assert_eq!(item.position_ms(), 0);
        assert_eq!(item.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_unreadable_file_has_no_authority() {
        let f = fixture(1000);
        let junk = f.path.with_file_name("junk.wav");
        std::fs::write(&junk, b"not audio").unwrap();

        let mut item = PlaylistItemAudio::new(Rc::clone(&f.backend));
        item.set_audio_file(&junk);
        assert_eq!(item.duration_ms(), 0);
        assert!(!item.controls_timing());

        item.start();
        assert!(!item.is_open());
        assert_eq!(item.position_ms(), 0);
    }
}
