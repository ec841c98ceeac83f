use crate::render::{
    color::Rgba,
    surface::{LinearGradient, Paint, Point, Rect, Surface},
};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    FillRectGradient {
        rect: Rect,
        gradient: LinearGradient,
    },
    FillCircle {
        center: Point,
        radius: f32,
        paint: Paint,
    },
    StrokeLine {
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
    },
}

/// Offscreen surface that records every draw call instead of rasterising.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    #[must_use]
    pub fn draw_calls(&self) -> usize {
        self.ops.len()
    }

    /// Ops recorded since the most recent `clear`, i.e. the last frame.
    #[must_use]
    pub fn last_frame(&self) -> &[DrawOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::Clear))
            .unwrap_or(0);
        &self.ops[start..]
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &LinearGradient) {
        self.ops.push(DrawOp::FillRectGradient {
            rect,
            gradient: gradient.clone(),
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        self.ops.push(DrawOp::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        self.ops.push(DrawOp::StrokeLine {
            from,
            to,
            width,
            color,
        });
    }
}
