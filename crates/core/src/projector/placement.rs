use serde::{Deserialize, Serialize};

/// Where and how large a model sits in the preview.
pub trait Placement {
    /// Horizontal scale factor applied to the model's render width.
    fn scale_x(&self) -> f32;

    /// Unscaled width of the model in preview units.
    fn render_width(&self) -> f32;

    /// Map a model-local offset into screen space.
    fn translate_point(&self, x: f32, y: f32) -> (f32, f32);
}

/// A box centred on a point in the preview, scaled independently per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxedPlacement {
    pub center_x: f32,
    pub center_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub render_width: f32,
}

impl Default for BoxedPlacement {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            render_width: 100.0,
        }
    }
}

impl BoxedPlacement {
    pub fn centered(center_x: f32, center_y: f32, size: f32) -> Self {
        Self {
            center_x,
            center_y,
            render_width: size,
            ..Default::default()
        }
    }
}

impl Placement for BoxedPlacement {
    fn scale_x(&self) -> f32 {
        self.scale_x
    }

    fn render_width(&self) -> f32 {
        self.render_width
    }

    fn translate_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.center_x + x * self.scale_x,
            self.center_y + y * self.scale_y,
        )
    }
}
