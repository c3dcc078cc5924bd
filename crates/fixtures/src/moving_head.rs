use serde::{Deserialize, Serialize};

use crate::attributes::{get_int, get_str, set_int, Attributes};

pub const ATTR_STYLE: &str = "DmxStyle";
pub const ATTR_CHANNEL_COUNT: &str = "parm1";
pub const ATTR_PAN_CHANNEL: &str = "DmxPanChannel";
pub const ATTR_PAN_ORIENT: &str = "DmxPanOrient";
pub const ATTR_PAN_DEG_OF_ROT: &str = "DmxPanDegOfRot";
pub const ATTR_TILT_CHANNEL: &str = "DmxTiltChannel";
pub const ATTR_TILT_ORIENT: &str = "DmxTiltOrient";
pub const ATTR_TILT_DEG_OF_ROT: &str = "DmxTiltDegOfRot";
pub const ATTR_RED_CHANNEL: &str = "DmxRedChannel";
pub const ATTR_GREEN_CHANNEL: &str = "DmxGreenChannel";
pub const ATTR_BLUE_CHANNEL: &str = "DmxBlueChannel";

/// Largest channel span a single fixture can cover (one DMX universe).
pub const MAX_CHANNELS: i32 = 512;
/// Valid range for the pan/tilt orientation offsets, in degrees.
pub const ORIENT_RANGE: (i32, i32) = (0, 360);
/// Valid range for the pan/tilt sweep, in degrees.
pub const DEG_OF_ROT_RANGE: (i32, i32) = (0, 1000);

/// How a moving head is drawn in the preview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DmxStyle {
    /// Looking down on the head: the beam follows pan.
    #[default]
    MovingHeadTop,
    /// Looking at the head from the side: the beam follows tilt.
    MovingHeadSide,
}

/// Every selectable style, in editor order.
pub const DMX_STYLES: [DmxStyle; 2] = [DmxStyle::MovingHeadTop, DmxStyle::MovingHeadSide];

impl DmxStyle {
    pub fn name(&self) -> &'static str {
        match self {
            DmxStyle::MovingHeadTop => "Moving Head Top",
            DmxStyle::MovingHeadSide => "Moving Head Side",
        }
    }

    /// Anything other than the top view name is drawn as a side view.
    pub fn from_name(name: &str) -> Self {
        if name == DmxStyle::MovingHeadTop.name() {
            DmxStyle::MovingHeadTop
        } else {
            DmxStyle::MovingHeadSide
        }
    }

    pub fn index(&self) -> usize {
        DMX_STYLES.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn is_top_view(&self) -> bool {
        *self == DmxStyle::MovingHeadTop
    }
}

impl std::fmt::Display for DmxStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Channel assignment and calibration of a DMX moving head.
///
/// Channel numbers are 1-based offsets into the fixture's own channel span.
/// A colour channel of `0` is unassigned. Values are kept exactly as they
/// were entered; the projector is responsible for ignoring a configuration
/// that does not fit the live channel frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovingHeadConfig {
    pub style: DmxStyle,
    pub channel_count: i32,
    pub pan_channel: i32,
    pub pan_orient: i32,
    pub pan_deg_of_rot: i32,
    pub tilt_channel: i32,
    pub tilt_orient: i32,
    pub tilt_deg_of_rot: i32,
    pub red_channel: i32,
    pub green_channel: i32,
    pub blue_channel: i32,
}

impl Default for MovingHeadConfig {
    fn default() -> Self {
        Self {
            style: DmxStyle::MovingHeadTop,
            channel_count: 1,
            pan_channel: 1,
            pan_orient: 0,
            pan_deg_of_rot: 540,
            tilt_channel: 1,
            tilt_orient: 0,
            tilt_deg_of_rot: 180,
            red_channel: 0,
            green_channel: 0,
            blue_channel: 0,
        }
    }
}

impl MovingHeadConfig {
    /// Build a configuration from persisted attributes, falling back to the
    /// defaults for anything missing.
    pub fn from_attributes(attrs: &Attributes) -> Self {
        let d = Self::default();
        Self {
            style: DmxStyle::from_name(get_str(attrs, ATTR_STYLE, d.style.name())),
            channel_count: get_int(attrs, ATTR_CHANNEL_COUNT, d.channel_count),
            pan_channel: get_int(attrs, ATTR_PAN_CHANNEL, d.pan_channel),
            pan_orient: get_int(attrs, ATTR_PAN_ORIENT, d.pan_orient),
            pan_deg_of_rot: get_int(attrs, ATTR_PAN_DEG_OF_ROT, d.pan_deg_of_rot),
            tilt_channel: get_int(attrs, ATTR_TILT_CHANNEL, d.tilt_channel),
            tilt_orient: get_int(attrs, ATTR_TILT_ORIENT, d.tilt_orient),
            tilt_deg_of_rot: get_int(attrs, ATTR_TILT_DEG_OF_ROT, d.tilt_deg_of_rot),
            red_channel: get_int(attrs, ATTR_RED_CHANNEL, d.red_channel),
            green_channel: get_int(attrs, ATTR_GREEN_CHANNEL, d.green_channel),
            blue_channel: get_int(attrs, ATTR_BLUE_CHANNEL, d.blue_channel),
        }
    }

    /// Write every field into `attrs`, replacing existing values.
    pub fn write_attributes(&self, attrs: &mut Attributes) {
        attrs.insert(ATTR_STYLE.to_string(), self.style.name().to_string());
        set_int(attrs, ATTR_CHANNEL_COUNT, self.channel_count);
        set_int(attrs, ATTR_PAN_CHANNEL, self.pan_channel);
        set_int(attrs, ATTR_PAN_ORIENT, self.pan_orient);
        set_int(attrs, ATTR_PAN_DEG_OF_ROT, self.pan_deg_of_rot);
        set_int(attrs, ATTR_TILT_CHANNEL, self.tilt_channel);
        set_int(attrs, ATTR_TILT_ORIENT, self.tilt_orient);
        set_int(attrs, ATTR_TILT_DEG_OF_ROT, self.tilt_deg_of_rot);
        set_int(attrs, ATTR_RED_CHANNEL, self.red_channel);
        set_int(attrs, ATTR_GREEN_CHANNEL, self.green_channel);
        set_int(attrs, ATTR_BLUE_CHANNEL, self.blue_channel);
    }

    pub fn to_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        self.write_attributes(&mut attrs);
        attrs
    }

    /// True when all three colour channels are assigned.
    pub fn has_rgb(&self) -> bool {
        self.red_channel > 0 && self.green_channel > 0 && self.blue_channel > 0
    }

    /// Number of nodes the fixture spans. Each channel is one node.
    pub fn node_count(&self) -> usize {
        self.channel_count.max(0) as usize
    }

    /// Render buffer dimensions as `(width, height)`: one row, one cell per channel.
    pub fn buffer_size(&self) -> (usize, usize) {
        (self.node_count(), 1)
    }

    /// Render buffer cell of each node, in node order.
    pub fn buffer_coordinates(&self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.node_count()).map(|x| (x, 0))
    }

    /// Check the values against the ranges the editor allows.
    ///
    /// Returns every violation found. An out-of-range configuration is still
    /// usable; it just won't draw until it is fixed.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let mut check = |name: &str, value: i32, (min, max): (i32, i32)| {
            if value < min || value > max {
                errors.push(format!("{} must be between {} and {}", name, min, max));
            }
        };

        check("channel_count", self.channel_count, (1, MAX_CHANNELS));
        check("pan_channel", self.pan_channel, (1, MAX_CHANNELS));
        check("pan_orient", self.pan_orient, ORIENT_RANGE);
        check("pan_deg_of_rot", self.pan_deg_of_rot, DEG_OF_ROT_RANGE);
        check("tilt_channel", self.tilt_channel, (1, MAX_CHANNELS));
        check("tilt_orient", self.tilt_orient, ORIENT_RANGE);
        check("tilt_deg_of_rot", self.tilt_deg_of_rot, DEG_OF_ROT_RANGE);
        check("red_channel", self.red_channel, (0, MAX_CHANNELS));
        check("green_channel", self.green_channel, (0, MAX_CHANNELS));
        check("blue_channel", self.blue_channel, (0, MAX_CHANNELS));

        for (name, channel) in [
            ("pan_channel", self.pan_channel),
            ("tilt_channel", self.tilt_channel),
            ("red_channel", self.red_channel),
            ("green_channel", self.green_channel),
            ("blue_channel", self.blue_channel),
        ] {
            if channel > self.channel_count {
                errors.push(format!(
                    "{} ({}) is beyond the fixture's {} channels",
                    name, channel, self.channel_count
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_attributes() {
        let config = MovingHeadConfig::from_attributes(&Attributes::new());
        assert_eq!(config, MovingHeadConfig::default());
        assert_eq!(config.style, DmxStyle::MovingHeadTop);
        assert_eq!(config.pan_deg_of_rot, 540);
        assert_eq!(config.tilt_deg_of_rot, 180);
        assert!(!config.has_rgb());
    }

    #[test]
    fn test_attribute_round_trip() {
        let config = MovingHeadConfig {
            style: DmxStyle::MovingHeadSide,
            channel_count: 10,
            pan_channel: 1,
            pan_orient: 90,
            pan_deg_of_rot: 360,
            tilt_channel: 2,
            tilt_orient: 45,
            tilt_deg_of_rot: 270,
            red_channel: 4,
            green_channel: 5,
            blue_channel: 6,
        };

        let attrs = config.to_attributes();
        assert_eq!(attrs.get("DmxStyle").map(String::as_str), Some("Moving Head Side"));
        assert_eq!(attrs.get("parm1").map(String::as_str), Some("10"));
        assert_eq!(MovingHeadConfig::from_attributes(&attrs), config);
    }

    #[test]
    fn test_unknown_style_is_side_view() {
        assert_eq!(DmxStyle::from_name("Moving Head Top"), DmxStyle::MovingHeadTop);
        assert_eq!(DmxStyle::from_name("Moving Head Side"), DmxStyle::MovingHeadSide);
        assert_eq!(DmxStyle::from_name("Floodlight"), DmxStyle::MovingHeadSide);
    }

    #[test]
    fn test_style_table_order() {
        assert_eq!(DMX_STYLES.len(), 2);
        assert_eq!(DmxStyle::MovingHeadTop.index(), 0);
        assert_eq!(DmxStyle::MovingHeadSide.index(), 1);
    }

    #[test]
    fn test_validate_reports_all_errors() {
        let mut config = MovingHeadConfig {
            channel_count: 4,
            tilt_channel: 2,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.pan_orient = 400;
        config.red_channel = 6;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("pan_orient"));
        assert!(errors[1].contains("red_channel"));
    }

    #[test]
    fn test_buffer_size_is_one_row() {
        let config = MovingHeadConfig {
            channel_count: 12,
            ..Default::default()
        };
        assert_eq!(config.buffer_size(), (12, 1));

        let coords: Vec<_> = config.buffer_coordinates().collect();
        assert_eq!(coords.len(), 12);
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[11], (11, 0));
    }
}
