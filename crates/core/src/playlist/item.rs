use lumen_fixtures::attributes::{get_int, get_str, set_int, Attributes};
use serde::{Deserialize, Serialize};

pub const ATTR_NAME: &str = "Name";
pub const ATTR_DELAY: &str = "Delay";
pub const ATTR_VOLUME: &str = "Volume";
pub const ATTR_PRIORITY: &str = "Priority";

/// Settings shared by every kind of playlist item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSettings {
    pub name: String,
    /// Delay before the item starts within its step.
    pub delay_ms: u64,
    /// Output volume percentage. `None` leaves the output untouched.
    pub volume: Option<u32>,
    pub priority: i32,
}

impl ItemSettings {
    pub fn from_attributes(attrs: &Attributes) -> Self {
        let volume = get_int(attrs, ATTR_VOLUME, -1);
        Self {
            name: get_str(attrs, ATTR_NAME, "").to_string(),
            delay_ms: get_int(attrs, ATTR_DELAY, 0).max(0) as u64,
            volume: (volume >= 0).then(|| volume.min(100) as u32),
            priority: get_int(attrs, ATTR_PRIORITY, 0),
        }
    }

    pub fn write_attributes(&self, attrs: &mut Attributes) {
        attrs.insert(ATTR_NAME.to_string(), self.name.clone());
        set_int(attrs, ATTR_DELAY, self.delay_ms.min(i32::MAX as u64) as i32);
        set_int(attrs, ATTR_VOLUME, self.volume.map_or(-1, |v| v as i32));
        set_int(attrs, ATTR_PRIORITY, self.priority);
    }
}

/// What a playlist step needs from each of its items.
///
/// The scheduler drives items from its tick: it starts them, polls position
/// and duration, and stops them when the step ends. Items never block.
pub trait PlaylistItem {
    /// Kind of item, e.g. "Audio".
    fn title(&self) -> &'static str;

    /// Display name without any timing decoration.
    fn name_no_time(&self) -> String;

    fn start(&mut self);

    fn stop(&mut self);

    fn pause(&mut self, pause: bool);

    /// Temporarily silence the item, e.g. while a higher priority step plays.
    fn suspend(&mut self, suspend: bool) {
        self.pause(suspend);
    }

    fn restart(&mut self);

    fn position_ms(&self) -> u64;

    fn duration_ms(&self) -> u64;

    /// True when this item's clock drives the step.
    fn controls_timing(&self) -> bool;

    fn is_running(&self) -> bool;

    /// Incremented whenever a persisted setting changes.
    fn change_count(&self) -> u32;

    fn to_attributes(&self) -> Attributes;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = ItemSettings::from_attributes(&Attributes::new());
        assert_eq!(settings, ItemSettings::default());
        assert_eq!(settings.volume, None);
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = ItemSettings {
            name: "Intro".to_string(),
            delay_ms: 250,
            volume: Some(80),
            priority: 2,
        };
        let mut attrs = Attributes::new();
        settings.write_attributes(&mut attrs);

        assert_eq!(attrs.get("Volume").map(String::as_str), Some("80"));
        assert_eq!(ItemSettings::from_attributes(&attrs), settings);
    }

    #[test]
    fn test_unset_volume_is_persisted_as_minus_one() {
        let mut attrs = Attributes::new();
        ItemSettings::default().write_attributes(&mut attrs);
        assert_eq!(attrs.get("Volume").map(String::as_str), Some("-1"));
        assert_eq!(ItemSettings::from_attributes(&attrs).volume, None);
    }
}
