pub mod passes;
pub mod population;
pub mod renderer;
pub mod trajectory;

pub use population::{Density, Population, Precipitation};
pub use renderer::{SkyConfig, SkyError, SkyRenderer};
pub use trajectory::{ArcDirection, BodyKind, CelestialBody};
