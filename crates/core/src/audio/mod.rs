pub mod backend;
pub mod device_enumerator;
pub mod probe;
pub mod rodio_backend;

pub use backend::{AudioBackend, AudioError, AudioHandle};
pub use device_enumerator::{enumerate_audio_devices, AudioDeviceInfo};
pub use probe::{is_audio, is_audio_file, probe_duration, AUDIO_EXTENSIONS};
pub use rodio_backend::{decoded_length, RodioBackend};
