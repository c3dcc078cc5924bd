use serde::{Deserialize, Serialize};

/// 8-bit colour sample of a single node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// A single-channel node carries its level in every component.
    pub const fn gray(level: u8) -> Self {
        Rgb::new(level, level, level)
    }
}

/// Colour with alpha, as submitted to the drawing sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 7 || !hex.starts_with('#') {
            return None;
        }

        let r = u8::from_str_radix(&hex[1..3], 16).ok()?;
        let g = u8::from_str_radix(&hex[3..5], 16).ok()?;
        let b = u8::from_str_radix(&hex[5..7], 16).ok()?;

        Some(Rgba::rgb(r, g, b))
    }

    /// True when all colour components are zero, whatever the alpha.
    pub fn is_black(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Rgba { a, ..self }
    }

    /// Apply a transparency percentage.
    ///
    /// `0` leaves the colour alone, `100` makes it fully transparent. Values
    /// outside 0..=100 are clamped.
    pub fn with_transparency(self, transparency: i32) -> Self {
        if transparency == 0 {
            return self;
        }
        let t = (100 - transparency.clamp(0, 100)) as f32 * 2.55;
        self.with_alpha(t.clamp(0.0, 255.0) as u8)
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        Rgba::rgb(c.r, c.g, c.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparency_percentages() {
        assert_eq!(Rgba::WHITE.with_transparency(0).a, 255);
        assert_eq!(Rgba::WHITE.with_transparency(100).a, 0);
        assert_eq!(Rgba::WHITE.with_transparency(50).a, 127);
        assert_eq!(Rgba::WHITE.with_transparency(150).a, 0);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex("#c8c8c8"), Some(Rgba::rgb(200, 200, 200)));
        assert_eq!(Rgba::from_hex("c8c8c8"), None);
        assert_eq!(Rgba::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_black_ignores_alpha() {
        assert!(Rgba::BLACK.with_alpha(0).is_black());
        assert!(!Rgba::RED.is_black());
    }
}
