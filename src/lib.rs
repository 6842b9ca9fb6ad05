mod app;
mod overlap;
mod polygon;
mod resolution;
mod scene;

pub use app::*;
pub use overlap::*;
pub use polygon::*;
pub use resolution::*;
pub use scene::*;

/// Units per second along the shape's heading
pub const DEFAULT_MOVE_SPEED: f32 = 60.0;
/// Radians per second
pub const DEFAULT_ROTATION_SPEED: f32 = 2.0;
