#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]

/// sRGB colour with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0.0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| {
            (f32::from(a) + (f32::from(b) - f32::from(a)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Opaque pixel as stored in a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Source-over compositing of `src` scaled by `coverage`.
    #[must_use]
    pub fn blend(self, src: Rgba, coverage: f32) -> Self {
        let alpha = (src.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return self;
        }
        let mix = |dst: u8, s: u8| {
            (f32::from(s) * alpha + f32::from(dst) * (1.0 - alpha))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, src.r),
            g: mix(self.g, src.g),
            b: mix(self.b, src.b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    #[must_use]
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Samples a stop list at `t`, padding with the end colours outside the range.
/// Stops must be sorted by offset.
#[must_use]
pub fn sample_stops(stops: &[ColorStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.offset {
            let span = hi.offset - lo.offset;
            if span <= f32::EPSILON {
                return hi.color;
            }
            return lo.color.lerp(hi.color, (t - lo.offset) / span);
        }
    }
    stops.last().map_or(first.color, |last| last.color)
}
