pub mod color;
pub mod framebuffer;
pub mod recording;
pub mod surface;

pub use color::{ColorStop, Rgb, Rgba};
pub use framebuffer::Framebuffer;
pub use recording::{DrawOp, RecordingSurface};
pub use surface::{LinearGradient, Paint, Point, RadialGradient, Rect, Surface};
