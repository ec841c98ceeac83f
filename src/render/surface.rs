use crate::render::color::{ColorStop, Rgba, sample_stops};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Vertical linear gradient running from `y0` (offset 0) to `y1` (offset 1).
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub y0: f32,
    pub y1: f32,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    #[must_use]
    pub fn vertical(y0: f32, y1: f32, stops: &[ColorStop]) -> Self {
        Self {
            y0,
            y1,
            stops: stops.to_vec(),
        }
    }

    #[must_use]
    pub fn color_at(&self, y: f32) -> Rgba {
        let span = self.y1 - self.y0;
        let t = if span.abs() <= f32::EPSILON {
            0.0
        } else {
            (y - self.y0) / span
        };
        sample_stops(&self.stops, t)
    }
}

/// Concentric radial gradient; offset 0 sits on `inner_radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    #[must_use]
    pub fn new(center: Point, inner_radius: f32, outer_radius: f32, stops: &[ColorStop]) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius,
            stops: stops.to_vec(),
        }
    }

    #[must_use]
    pub fn color_at(&self, point: Point) -> Rgba {
        let span = self.outer_radius - self.inner_radius;
        let d = self.center.distance(point);
        let t = if span <= f32::EPSILON {
            1.0
        } else {
            ((d - self.inner_radius) / span).clamp(0.0, 1.0)
        };
        sample_stops(&self.stops, t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

impl Paint {
    #[must_use]
    pub fn color_at(&self, point: Point) -> Rgba {
        match self {
            Self::Solid(color) => *color,
            Self::Radial(gradient) => gradient.color_at(point),
        }
    }
}

/// Minimal 2D raster capability the sky draws through.
pub trait Surface {
    fn size(&self) -> (u32, u32);

    fn resize(&mut self, width: u32, height: u32);

    fn clear(&mut self);

    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &LinearGradient);

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint);

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba);

    /// A surface with no pixels has no drawing context.
    fn is_drawable(&self) -> bool {
        let (width, height) = self.size();
        width > 0 && height > 0
    }
}
