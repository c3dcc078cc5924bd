pub mod audio_item;
pub mod item;

pub use audio_item::{PlaybackState, PlaylistItemAudio, AUDIO_ITEM_ELEMENT};
pub use item::{ItemSettings, PlaylistItem};
