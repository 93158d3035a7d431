mod surface;
mod recording;

pub use self::surface::{Surface, Color, StrokeStyle};
pub use self::recording::{RecordingSurface, DrawCommand};
