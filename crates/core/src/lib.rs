pub use audio::{
    enumerate_audio_devices, is_audio, is_audio_file, probe_duration, AudioBackend,
    AudioDeviceInfo, AudioError, AudioHandle, RodioBackend, AUDIO_EXTENSIONS,
};
pub use color::{Rgb, Rgba};
pub use config::{default_config_path, ConfigError, ConfigManager, ConfigSchema};
pub use playlist::{ItemSettings, PlaybackState, PlaylistItem, PlaylistItemAudio};
pub use projector::{
    BoxedPlacement, ChannelFrame, FixtureProjector, Placement, ProjectedGeometry, Projection,
    RenderOptions, RenderSink, Vertex,
};
pub use settings::Settings;
pub use show::{PatchedFixture, Show, ShowManager};

pub mod audio;
pub mod color;
mod config;
pub mod playlist;
pub mod projector;
mod settings;
mod show;
