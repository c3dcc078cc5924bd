//! Moving-head preview rendering.
//!
//! A moving head is drawn from its live channel levels: pan and tilt become
//! head angles, the colour channels become the beam colour, and the result is
//! a flat list of triangles in screen space. Top view looks down on the head
//! and points the beam along pan; side view points it along tilt.

use lumen_fixtures::{DmxStyle, MovingHeadConfig};
use serde::{Deserialize, Serialize};

use super::channel_frame::ChannelFrame;
use super::geometry::{GeometryAccumulator, Primitive, ProjectedGeometry, RenderSink};
use super::placement::Placement;
use crate::color::Rgba;

/// Full width of the beam cone in degrees.
pub const BEAM_WIDTH_DEG: f32 = 30.0;
/// Beam length as a multiple of the head radius.
pub const BEAM_LENGTH_FACTOR: f32 = 4.0;
/// Fraction of the radius the tilt marker travels at full tilt.
pub const TILT_MARKER_REACH: f32 = 0.8;

const BASE_COLOR: Rgba = Rgba::rgb(200, 200, 200);

// Local-space outlines, in twelfths of the radius.
const DIRECTION_INDICATOR: [(f32, f32); 4] = [(0.0, -1.0), (12.0, -1.0), (12.0, 1.0), (0.0, 1.0)];
const SIDE_HEAD: [(f32, f32); 6] = [
    (12.0, -13.0),
    (12.0, 13.0),
    (-12.0, 10.0),
    (-15.0, 5.0),
    (-15.0, -5.0),
    (-12.0, -10.0),
];
const PAN_MARKER: [(f32, f32); 2] = [(7.0, 2.0), (7.0, -2.0)];

/// Per-pass drawing options supplied by the preview.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Inactive fixtures always draw their beam as off.
    pub active: bool,
    /// Colour override for silhouette and selection passes.
    pub override_color: Option<Rgba>,
    /// Transparency percentage for body, base, marker and beam.
    pub transparency: i32,
    /// Transparency percentage used instead when the override colour is black.
    pub black_transparency: i32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            active: true,
            override_color: None,
            transparency: 0,
            black_transparency: 0,
        }
    }
}

impl RenderOptions {
    fn effective_transparency(&self) -> i32 {
        match self.override_color {
            Some(c) if c.is_black() => self.black_transparency,
            _ => self.transparency,
        }
    }
}

/// Head orientation derived from the pan and tilt channels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadAngles {
    /// Pan in degrees, already flipped when the head points backwards.
    pub pan: f32,
    /// Tilt in degrees.
    pub tilt: f32,
    /// Distance of the tilt marker from the head centre. Never negative.
    pub tilt_pos: i32,
}

impl HeadAngles {
    /// Angle the beam follows for the given view.
    pub fn governing(&self, style: DmxStyle) -> f32 {
        if style.is_top_view() {
            self.pan
        } else {
            self.tilt
        }
    }
}

/// Result of projecting a fixture for one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    Geometry(ProjectedGeometry),
    /// The configuration does not fit the frame; nothing to draw.
    Skip,
}

impl Projection {
    pub fn is_skip(&self) -> bool {
        matches!(self, Projection::Skip)
    }

    pub fn geometry(&self) -> Option<&ProjectedGeometry> {
        match self {
            Projection::Geometry(g) => Some(g),
            Projection::Skip => None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry().map_or(0, |g| g.vertices.len())
    }
}

/// Map a channel level onto `[orient, orient + deg_of_rot]` degrees.
pub fn channel_angle(level: u8, orient: i32, deg_of_rot: i32) -> f32 {
    (level as f32 / 255.0) * deg_of_rot as f32 + orient as f32
}

/// Half the scaled render width, with the width truncated to whole units first.
pub fn fixture_radius(placement: &dyn Placement) -> f32 {
    let size = (placement.scale_x() * placement.render_width()) as i32;
    size as f32 / 2.0
}

/// Scale, rotate by `angle_deg`, then translate by `(cx, cy)`.
pub fn transform_point(x: f32, y: f32, cx: f32, cy: f32, scale: f32, angle_deg: f32) -> (f32, f32) {
    let (s, c) = angle_deg.to_radians().sin_cos();
    let (x, y) = (x * scale, y * scale);
    (x * c - y * s + cx, x * s + y * c + cy)
}

fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

/// Every assigned channel must exist in the frame, and pan/tilt must be assigned.
fn channels_fit(config: &MovingHeadConfig, node_count: usize) -> bool {
    let in_frame = |channel: i32| channel >= 0 && channel as usize <= node_count;

    config.pan_channel >= 1
        && config.tilt_channel >= 1
        && in_frame(config.pan_channel)
        && in_frame(config.tilt_channel)
        && in_frame(config.red_channel)
        && in_frame(config.green_channel)
        && in_frame(config.blue_channel)
}

/// Compute the head angles, or `None` when the configuration does not fit.
pub fn head_angles(config: &MovingHeadConfig, frame: &ChannelFrame, radius: f32) -> Option<HeadAngles> {
    if !channels_fit(config, frame.node_count()) {
        return None;
    }

    let pan_level = frame.brightness(config.pan_channel)?;
    let tilt_level = frame.brightness(config.tilt_channel)?;

    let mut pan = channel_angle(pan_level, config.pan_orient, config.pan_deg_of_rot);
    let tilt = channel_angle(tilt_level, config.tilt_orient, config.tilt_deg_of_rot);

    // A head tilted past vertical points back over itself in the projection,
    // so draw it facing the other way with a positive marker offset.
    let mut tilt_pos = (tilt.to_radians().cos() * radius * TILT_MARKER_REACH) as i32;
    if tilt_pos < 0 {
        pan = wrap_degrees(pan + 180.0);
        tilt_pos = -tilt_pos;
    }

    Some(HeadAngles { pan, tilt, tilt_pos })
}

/// Beam colour and whether the beam is off.
///
/// Without all three colour channels the beam is white. A black beam, or any
/// beam of an inactive fixture, is off and drawn as a faded white cone.
pub fn beam_color(config: &MovingHeadConfig, frame: &ChannelFrame, active: bool) -> (Rgba, bool) {
    let mut color = Rgba::WHITE;
    if config.has_rgb() {
        color = Rgba::rgb(
            frame.brightness(config.red_channel).unwrap_or(0),
            frame.brightness(config.green_channel).unwrap_or(0),
            frame.brightness(config.blue_channel).unwrap_or(0),
        );
    }

    if color.is_black() || !active {
        (Rgba::WHITE, true)
    } else {
        (color, false)
    }
}

/// Project a moving head into screen-space triangles.
pub fn project(
    config: &MovingHeadConfig,
    frame: &ChannelFrame,
    placement: &dyn Placement,
    options: &RenderOptions,
) -> Projection {
    let radius = fixture_radius(placement);
    let Some(angles) = head_angles(config, frame, radius) else {
        return Projection::Skip;
    };

    let trans = options.effective_transparency();
    let body_color = Rgba::WHITE.with_transparency(trans);
    let point_color = Rgba::RED.with_transparency(trans);
    let base_color = BASE_COLOR.with_transparency(trans);

    let (beam, beam_off) = beam_color(config, frame, options.active);
    let mut marker_color = Rgba::BLACK;
    let beam = if beam_off {
        beam
    } else {
        let beam = beam.with_transparency(trans);
        marker_color = beam;
        beam
    };

    let (sx, sy) = placement.translate_point(0.0, 0.0);
    let top_view = config.style.is_top_view();
    let angle = angles.governing(config.style);

    let mut va = GeometryAccumulator::with_capacity(256);

    // Beam cone
    let beam_length = radius * BEAM_LENGTH_FACTOR;
    let angle1 = wrap_degrees(angle - BEAM_WIDTH_DEG / 2.0);
    let angle2 = wrap_degrees(angle + BEAM_WIDTH_DEG / 2.0);
    let ray = |a: f32| {
        let (s, c) = a.to_radians().sin_cos();
        ((c * beam_length) as i32 as f32, (s * beam_length) as i32 as f32)
    };
    let (x1, y1) = ray(angle1);
    let (x2, y2) = ray(angle2);

    let (origin_color, edge_color) = if beam_off {
        (beam.with_alpha(0), beam.with_alpha(255))
    } else {
        (beam, beam)
    };
    va.add_vertex(sx, sy, origin_color);
    va.add_vertex(sx + x1, sy + y1, edge_color);
    va.add_vertex(sx + x2, sy + y2, edge_color);

    let scale = radius / 12.0;
    let point = |(x, y): (f32, f32), a: f32| transform_point(x, y, sx, sy, scale, a);

    if top_view {
        va.add_triangles_circle(sx, sy, radius, body_color, body_color);

        let [p1, p2, p3, p4] = DIRECTION_INDICATOR.map(|p| point(p, angle));
        for (x, y) in [p1, p2, p3, p1, p3, p4] {
            va.add_vertex(x, y, point_color);
        }

        let (mx, my) = transform_point(angles.tilt_pos as f32, 0.0, sx, sy, 1.0, angle);
        va.add_triangles_circle(mx, my, radius * 0.2, marker_color, marker_color);
    } else {
        let [p1, p2, p3, p4, p5, p6] = SIDE_HEAD.map(|p| point(p, angle));
        for (x, y) in [p1, p2, p6, p2, p3, p6, p3, p5, p6, p3, p4, p5] {
            va.add_vertex(x, y, body_color);
        }

        va.add_triangles_circle(sx, sy, radius * 0.6, base_color, base_color);
        va.add_rect(sx - radius * 0.6, sy, sx + radius * 0.6, sy - radius * 2.0, base_color);

        let [p7, p8] = PAN_MARKER.map(|p| point(p, angles.pan));
        va.add_vertex(sx, sy, marker_color);
        va.add_vertex(p7.0, p7.1, marker_color);
        va.add_vertex(p8.0, p8.1, marker_color);
    }

    Projection::Geometry(va.finish(Primitive::Triangles))
}

/// Draws moving heads into a sink with a fixed set of render options.
#[derive(Clone, Debug, Default)]
pub struct FixtureProjector {
    pub options: RenderOptions,
}

impl FixtureProjector {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn project(
        &self,
        config: &MovingHeadConfig,
        frame: &ChannelFrame,
        placement: &dyn Placement,
    ) -> Projection {
        project(config, frame, placement, &self.options)
    }

    /// Project and submit. Returns false when the fixture was skipped.
    pub fn draw(
        &self,
        config: &MovingHeadConfig,
        frame: &ChannelFrame,
        placement: &dyn Placement,
        sink: &mut dyn RenderSink,
    ) -> bool {
        match self.project(config, frame, placement) {
            Projection::Geometry(geometry) => {
                sink.submit(&geometry);
                true
            }
            Projection::Skip => {
                log::trace!(
                    "Skipping moving head: channels {}/{}/{}/{}/{} don't fit {} nodes",
                    config.pan_channel,
                    config.tilt_channel,
                    config.red_channel,
                    config.green_channel,
                    config.blue_channel,
                    frame.node_count()
                );
                false
            }
        }
    }
}
