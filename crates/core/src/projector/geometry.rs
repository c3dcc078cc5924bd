use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Smallest number of triangles used to approximate a circle.
const MIN_CIRCLE_SEGMENTS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    Triangles,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub color: Rgba,
}

/// Screen-space geometry ready for submission to a drawing sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectedGeometry {
    pub vertices: Vec<Vertex>,
    pub primitive: Primitive,
}

impl ProjectedGeometry {
    pub fn triangle_count(&self) -> usize {
        match self.primitive {
            Primitive::Triangles => self.vertices.len() / 3,
        }
    }
}

/// Consumer of projected geometry, typically a GPU-backed preview canvas.
pub trait RenderSink {
    fn submit(&mut self, geometry: &ProjectedGeometry);
}

/// Collects every submission; useful for previews that batch a whole frame.
impl RenderSink for Vec<ProjectedGeometry> {
    fn submit(&mut self, geometry: &ProjectedGeometry) {
        self.push(geometry.clone());
    }
}

/// Vertex accumulator with the shape helpers the preview needs.
#[derive(Debug, Default)]
pub struct GeometryAccumulator {
    vertices: Vec<Vertex>,
}

impl GeometryAccumulator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
        }
    }

    pub fn add_vertex(&mut self, x: f32, y: f32, color: Rgba) {
        self.vertices.push(Vertex { x, y, color });
    }

    /// Approximate a filled circle with a fan of triangles around its centre.
    ///
    /// Larger circles get more segments: one per two units of radius, never
    /// fewer than sixteen.
    pub fn add_triangles_circle(&mut self, cx: f32, cy: f32, radius: f32, center: Rgba, edge: Rgba) {
        let segments = ((radius / 2.0) as usize).max(MIN_CIRCLE_SEGMENTS);
        let step = std::f32::consts::TAU / segments as f32;

        let mut last = (cx + radius, cy);
        for i in 1..=segments {
            let theta = step * i as f32;
            let next = (cx + radius * theta.cos(), cy + radius * theta.sin());
            self.add_vertex(cx, cy, center);
            self.add_vertex(last.0, last.1, edge);
            self.add_vertex(next.0, next.1, edge);
            last = next;
        }
    }

    /// Filled axis-aligned rectangle between two corners, as two triangles.
    pub fn add_rect(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgba) {
        self.add_vertex(x1, y1, color);
        self.add_vertex(x1, y2, color);
        self.add_vertex(x2, y2, color);

        self.add_vertex(x1, y1, color);
        self.add_vertex(x2, y2, color);
        self.add_vertex(x2, y1, color);
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn finish(self, primitive: Primitive) -> ProjectedGeometry {
        ProjectedGeometry {
            vertices: self.vertices,
            primitive,
        }
    }
}
