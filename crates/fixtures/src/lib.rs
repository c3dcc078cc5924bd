pub use attributes::{atoi, get_int, get_str, Attributes};
pub use fixture_library::{FixtureLibrary, FixtureProfile, FixtureType};
pub use moving_head::{
    DmxStyle, MovingHeadConfig, DEG_OF_ROT_RANGE, DMX_STYLES, MAX_CHANNELS, ORIENT_RANGE,
};

pub mod attributes;
mod fixture_library;
pub mod moving_head;

#[derive(Clone, Debug)]
pub struct Channel {
    pub name: String,
    pub channel_type: ChannelType,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChannelType {
    Dimmer,
    Color,
    Gobo,
    Red,
    Green,
    Blue,
    White,
    Amber,
    UV,
    Strobe,
    Pan,
    Tilt,
    Function,
    FunctionSpeed,
    Other(String),
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ChannelType::Dimmer => write!(f, "Dimmer"),
            ChannelType::Color => write!(f, "Color"),
            ChannelType::Gobo => write!(f, "Gobo"),
            ChannelType::Red => write!(f, "Red"),
            ChannelType::Green => write!(f, "Green"),
            ChannelType::Blue => write!(f, "Blue"),
            ChannelType::White => write!(f, "White"),
            ChannelType::Amber => write!(f, "Amber"),
            ChannelType::UV => write!(f, "UV"),
            ChannelType::Strobe => write!(f, "Strobe"),
            ChannelType::Pan => write!(f, "Pan"),
            ChannelType::Tilt => write!(f, "Tilt"),
            ChannelType::Function => write!(f, "Function"),
            ChannelType::FunctionSpeed => write!(f, "FunctionSpeed"),
            ChannelType::Other(s) => write!(f, "Other({})", s),
        }
    }
}

#[macro_export]
macro_rules! channel_layout {
    ($(($name:expr, $type:expr)),* $(,)?) => {
        vec![
            $(
                $crate::Channel {
                    name: $name.to_string(),
                    channel_type: $type,
                },
            )*
        ]
    };
}
