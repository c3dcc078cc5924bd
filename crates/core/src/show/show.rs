use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::SystemTime;

use lumen_fixtures::{Attributes, MovingHeadConfig};

use crate::audio::AudioBackend;
use crate::playlist::{PlaylistItem, PlaylistItemAudio, AUDIO_ITEM_ELEMENT};
use crate::projector::BoxedPlacement;

/// A moving head placed in the preview.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PatchedFixture {
    pub name: String,
    pub config: MovingHeadConfig,
    pub placement: BoxedPlacement,
}

/// A playlist item as stored in a show file: its element name plus attributes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersistedItem {
    pub element: String,
    pub attributes: Attributes,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct Show {
    pub name: String,
    pub created_at: SystemTime,
    pub modified_at: SystemTime,
    pub fixtures: Vec<PatchedFixture>,
    /// Playlist items in play order.
    pub audio_items: Vec<PersistedItem>,
    pub version: String, // Schema version for future compatibility
}

impl Show {
    pub fn new(name: String) -> Self {
        let now = SystemTime::now();
        Self {
            name,
            created_at: now,
            modified_at: now,
            fixtures: Vec::new(),
            audio_items: Vec::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Add a fixture, replacing any existing fixture with the same name.
    pub fn patch_fixture(&mut self, name: &str, config: MovingHeadConfig, placement: BoxedPlacement) {
        let fixture = PatchedFixture {
            name: name.to_string(),
            config,
            placement,
        };
        match self.fixtures.iter_mut().find(|f| f.name == name) {
            Some(existing) => *existing = fixture,
            None => self.fixtures.push(fixture),
        }
    }

    pub fn fixture(&self, name: &str) -> Option<&PatchedFixture> {
        self.fixtures.iter().find(|f| f.name == name)
    }

    pub fn add_audio_item(&mut self, item: &PlaylistItemAudio) {
        self.audio_items.push(PersistedItem {
            element: AUDIO_ITEM_ELEMENT.to_string(),
            attributes: item.to_attributes(),
        });
    }

    /// Rebuild the audio playlist items against a backend. Items of any other
    /// kind are skipped.
    pub fn audio_playlist(&self, backend: Rc<dyn AudioBackend>) -> Vec<PlaylistItemAudio> {
        self.audio_items
            .iter()
            .filter(|item| {
                let known = item.element == AUDIO_ITEM_ELEMENT;
                if !known {
                    log::warn!("Skipping unsupported playlist item '{}'", item.element);
                }
                known
            })
            .map(|item| PlaylistItemAudio::from_attributes(Rc::clone(&backend), &item.attributes))
            .collect()
    }
}
