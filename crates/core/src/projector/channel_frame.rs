use crate::color::Rgb;

/// Live colour state of one fixture at one instant, one sample per node.
///
/// Every DMX channel of a moving head is a node. Brightness is always read
/// from a node's red component, for pan and tilt as well as for the beam's
/// red, green and blue channels. Single-channel nodes mirror their level into
/// all three components, so this only matters for frames built from
/// arbitrary colours.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelFrame {
    nodes: Vec<Rgb>,
}

impl ChannelFrame {
    pub fn new(nodes: Vec<Rgb>) -> Self {
        Self { nodes }
    }

    /// Build a frame from raw channel levels, one node per channel.
    pub fn from_dmx(values: &[u8]) -> Self {
        Self {
            nodes: values.iter().copied().map(Rgb::gray).collect(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Rgb] {
        &self.nodes
    }

    /// Sample of a 1-based channel. `None` when unassigned or out of range.
    pub fn node(&self, channel: i32) -> Option<Rgb> {
        if channel < 1 {
            return None;
        }
        self.nodes.get(channel as usize - 1).copied()
    }

    /// Brightness of a 1-based channel, read from the node's red component.
    pub fn brightness(&self, channel: i32) -> Option<u8> {
        self.node(channel).map(|n| n.r)
    }

    pub fn set_level(&mut self, channel: i32, level: u8) {
        if channel >= 1 {
            if let Some(node) = self.nodes.get_mut(channel as usize - 1) {
                *node = Rgb::gray(level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_are_one_based() {
        let frame = ChannelFrame::from_dmx(&[10, 20, 30]);
        assert_eq!(frame.node_count(), 3);
        assert_eq!(frame.brightness(1), Some(10));
        assert_eq!(frame.brightness(3), Some(30));
        assert_eq!(frame.brightness(0), None);
        assert_eq!(frame.brightness(4), None);
        assert_eq!(frame.brightness(-1), None);
    }

    #[test]
    fn test_brightness_reads_red_component() {
        let frame = ChannelFrame::new(vec![Rgb::new(7, 200, 100)]);
        assert_eq!(frame.brightness(1), Some(7));
    }

    #[test]
    fn test_set_level_ignores_out_of_range() {
        let mut frame = ChannelFrame::from_dmx(&[0, 0]);
        frame.set_level(2, 99);
        frame.set_level(5, 99);
        assert_eq!(frame.nodes(), &[Rgb::gray(0), Rgb::gray(99)]);
    }
}
