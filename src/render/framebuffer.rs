#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::render::{
    color::{Rgb, Rgba},
    surface::{LinearGradient, Paint, Point, Rect, Surface},
};

/// Software raster target with anti-aliased primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Framebuffer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::default(); pixel_count(width, height)],
        }
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    #[must_use]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        if let Some(pixel) = self.pixels.get_mut(idx) {
            *pixel = pixel.blend(color, coverage);
        }
    }

    /// Pixel rows/columns touched by `[lo, hi]`, clipped to `limit`.
    fn span(lo: f32, hi: f32, limit: u32) -> std::ops::Range<i64> {
        let start = (lo.floor() as i64).max(0);
        let end = (hi.ceil() as i64 + 1).min(i64::from(limit));
        start..end.max(start)
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

fn coverage(radius: f32, distance: f32) -> f32 {
    (radius + 0.5 - distance).clamp(0.0, 1.0)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

impl Surface for Framebuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Rgb::default(); pixel_count(width, height)];
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgb::default());
    }

    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &LinearGradient) {
        let rows = Self::span(rect.y, rect.y + rect.height - 1.0, self.height);
        let cols = Self::span(rect.x, rect.x + rect.width - 1.0, self.width);
        for y in rows {
            let color = gradient.color_at(y as f32 + 0.5);
            for x in cols.clone() {
                self.blend_pixel(x, y, color, 1.0);
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        let reach = radius + 0.5;
        let rows = Self::span(center.y - reach, center.y + reach, self.height);
        let cols = Self::span(center.x - reach, center.x + reach, self.width);
        for y in rows {
            for x in cols.clone() {
                let sample = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let cover = coverage(radius, sample.distance(center));
                if cover > 0.0 {
                    self.blend_pixel(x, y, paint.color_at(sample), cover);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        let half = (width / 2.0).max(0.5);
        let reach = half + 0.5;
        let rows = Self::span(from.y.min(to.y) - reach, from.y.max(to.y) + reach, self.height);
        let cols = Self::span(from.x.min(to.x) - reach, from.x.max(to.x) + reach, self.width);
        for y in rows {
            for x in cols.clone() {
                let sample = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let cover = coverage(half, distance_to_segment(sample, from, to));
                if cover > 0.0 {
                    self.blend_pixel(x, y, color, cover);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::color::ColorStop;

    #[test]
    fn new_framebuffer_is_black() {
        let fb = Framebuffer::new(4, 3);
        assert_eq!(fb.pixels().len(), 12);
        assert!(fb.pixels().iter().all(|p| *p == Rgb::default()));
        assert_eq!(fb.pixel(4, 0), None);
    }

    #[test]
    fn gradient_fill_runs_top_to_bottom() {
        let mut fb = Framebuffer::new(2, 10);
        let gradient = LinearGradient::vertical(
            0.0,
            10.0,
            &[
                ColorStop::new(0.0, Rgba::rgb(0, 0, 0)),
                ColorStop::new(1.0, Rgba::rgb(0, 0, 200)),
            ],
        );
        fb.fill_rect_gradient(Rect::new(0.0, 0.0, 2.0, 10.0), &gradient);
        let top = fb.pixel(0, 0).expect("top");
        let bottom = fb.pixel(1, 9).expect("bottom");
        assert!(top.b < 20);
        assert!(bottom.b > 180);
        assert_eq!(fb.pixel(0, 5), fb.pixel(1, 5));
    }

    #[test]
    fn fill_circle_covers_center_but_not_corners() {
        let mut fb = Framebuffer::new(20, 20);
        fb.fill_circle(Point::new(10.0, 10.0), 4.0, &Paint::Solid(Rgba::WHITE));
        assert_eq!(fb.pixel(10, 10), Some(Rgb::new(255, 255, 255)));
        assert_eq!(fb.pixel(0, 0), Some(Rgb::default()));
        assert_eq!(fb.pixel(19, 19), Some(Rgb::default()));
    }

    #[test]
    fn fill_circle_clips_at_edges() {
        let mut fb = Framebuffer::new(8, 8);
        fb.fill_circle(Point::new(-2.0, 4.0), 5.0, &Paint::Solid(Rgba::WHITE));
        fb.fill_circle(Point::new(40.0, 40.0), 5.0, &Paint::Solid(Rgba::WHITE));
        assert_eq!(fb.pixel(0, 4), Some(Rgb::new(255, 255, 255)));
    }

    #[test]
    fn stroke_line_paints_vertical_segment() {
        let mut fb = Framebuffer::new(10, 10);
        fb.stroke_line(Point::new(5.5, 1.0), Point::new(5.5, 8.0), 1.0, Rgba::WHITE);
        assert_eq!(fb.pixel(5, 4), Some(Rgb::new(255, 255, 255)));
        assert_eq!(fb.pixel(1, 4), Some(Rgb::default()));
    }

    #[test]
    fn resize_reallocates_and_clear_resets() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill_circle(Point::new(2.0, 2.0), 2.0, &Paint::Solid(Rgba::WHITE));
        fb.resize(6, 2);
        assert_eq!(fb.size(), (6, 2));
        assert_eq!(fb.pixels().len(), 12);
        fb.fill_circle(Point::new(1.0, 1.0), 1.0, &Paint::Solid(Rgba::WHITE));
        fb.clear();
        assert!(fb.pixels().iter().all(|p| *p == Rgb::default()));
    }

    #[test]
    fn zero_sized_framebuffer_is_not_drawable() {
        assert!(!Framebuffer::new(0, 10).is_drawable());
        assert!(Framebuffer::new(1, 1).is_drawable());
    }
}
