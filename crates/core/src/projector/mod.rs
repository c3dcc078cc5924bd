pub mod channel_frame;
pub mod geometry;
pub mod moving_head;
pub mod placement;

pub use channel_frame::ChannelFrame;
pub use geometry::{GeometryAccumulator, Primitive, ProjectedGeometry, RenderSink, Vertex};
pub use moving_head::{
    beam_color, channel_angle, head_angles, project, FixtureProjector, HeadAngles, Projection,
    RenderOptions,
};
pub use placement::{BoxedPlacement, Placement};
