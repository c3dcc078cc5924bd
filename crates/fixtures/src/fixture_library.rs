use std::collections::HashMap;

use crate::{channel_layout, Channel, ChannelType, DmxStyle, MovingHeadConfig};

#[derive(Clone, Debug, PartialEq)]
pub enum FixtureType {
    MovingHead,
    Wash,
}

/// A known fixture and its DMX channel layout.
#[derive(Clone, Debug)]
pub struct FixtureProfile {
    pub id: String,
    pub fixture_type: FixtureType,
    pub manufacturer: String,
    pub model: String,
    pub channel_layout: Vec<Channel>,
}

impl std::fmt::Display for FixtureProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.manufacturer, self.model)
    }
}

impl FixtureProfile {
    /// 1-based position of the first channel of the given type, or 0.
    pub fn channel_number(&self, channel_type: &ChannelType) -> i32 {
        self.channel_layout
            .iter()
            .position(|c| &c.channel_type == channel_type)
            .map(|i| i as i32 + 1)
            .unwrap_or(0)
    }

    /// Derive a preview configuration from the channel layout.
    ///
    /// Calibration starts at the usual 540/180 degree sweep; colour channels
    /// are only assigned when the profile has all three.
    pub fn moving_head_config(&self, style: DmxStyle) -> MovingHeadConfig {
        let mut config = MovingHeadConfig {
            style,
            channel_count: self.channel_layout.len() as i32,
            pan_channel: self.channel_number(&ChannelType::Pan),
            tilt_channel: self.channel_number(&ChannelType::Tilt),
            red_channel: self.channel_number(&ChannelType::Red),
            green_channel: self.channel_number(&ChannelType::Green),
            blue_channel: self.channel_number(&ChannelType::Blue),
            ..Default::default()
        };

        if !config.has_rgb() {
            config.red_channel = 0;
            config.green_channel = 0;
            config.blue_channel = 0;
        }

        config
    }
}

#[derive(Default)]
pub struct FixtureLibrary {
    pub profiles: HashMap<String, FixtureProfile>,
}

impl FixtureLibrary {
    pub fn new() -> Self {
        let mut profiles = HashMap::new();

        // Built in moving heads. Note in the future we'll load these from disk.
        profiles.insert(
            "shehds-led-spot-60w".to_string(),
            FixtureProfile {
                id: "shehds-led-spot-60w".to_string(),
                fixture_type: FixtureType::MovingHead,
                manufacturer: "Shehds".to_string(),
                model: "LED Spot 60W Lighting".to_string(),
                channel_layout: channel_layout![
                    ("Pan", ChannelType::Pan),
                    ("Tilt", ChannelType::Tilt),
                    ("Color", ChannelType::Color),
                    ("Gobo", ChannelType::Gobo),
                    ("Strobe", ChannelType::Strobe),
                    ("Dimmer", ChannelType::Dimmer),
                    ("Speed", ChannelType::Other("Speed".to_string())),
                    ("Auto", ChannelType::Other("Auto".to_string())),
                    ("Reset", ChannelType::Other("Reset".to_string())),
                ],
            },
        );

        profiles.insert(
            "shehds-led-wash-7x18w-rgbwa-uv".to_string(),
            FixtureProfile {
                id: "shehds-led-wash-7x18w-rgbwa-uv".to_string(),
                fixture_type: FixtureType::Wash,
                manufacturer: "Shehds".to_string(),
                model: "LED Wash 7x18W RGBWA+UV".to_string(),
                channel_layout: channel_layout![
                    ("Pan", ChannelType::Pan),
                    ("Tilt", ChannelType::Tilt),
                    ("Dimmer", ChannelType::Dimmer),
                    ("Red", ChannelType::Red),
                    ("Green", ChannelType::Green),
                    ("Blue", ChannelType::Blue),
                    ("White", ChannelType::White),
                    ("Amber", ChannelType::Amber),
                    ("UV", ChannelType::UV),
                    // TODO - I think this is XY speed? Check the manual and update accordingly.
                    ("Function", ChannelType::Function),
                ],
            },
        );

        profiles.insert(
            "generic-rgb-moving-head-8ch".to_string(),
            FixtureProfile {
                id: "generic-rgb-moving-head-8ch".to_string(),
                fixture_type: FixtureType::MovingHead,
                manufacturer: "Generic".to_string(),
                model: "RGB Moving Head 8ch".to_string(),
                channel_layout: channel_layout![
                    ("Pan", ChannelType::Pan),
                    ("Tilt", ChannelType::Tilt),
                    ("Red", ChannelType::Red),
                    ("Green", ChannelType::Green),
                    ("Blue", ChannelType::Blue),
                    ("Dimmer", ChannelType::Dimmer),
                    ("Strobe", ChannelType::Strobe),
                    ("Speed", ChannelType::FunctionSpeed),
                ],
            },
        );

        FixtureLibrary { profiles }
    }

    pub fn get(&self, id: &str) -> Option<&FixtureProfile> {
        self.profiles.get(id)
    }

    /// Profile ids in a stable order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
