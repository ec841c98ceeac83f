use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::render::{color::Rgb, framebuffer::Framebuffer};

const UPPER_HALF: &str = "▀";

/// Shows a framebuffer with two pixels per cell: the glyph's foreground is
/// the upper pixel, the cell background the lower one.
pub struct SkyWidget<'a> {
    pub framebuffer: &'a Framebuffer,
}

impl Widget for SkyWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            let upper_y = u32::from(row) * 2;
            for column in 0..area.width {
                let x = u32::from(column);
                let upper = pixel_color(self.framebuffer.pixel(x, upper_y));
                let lower = pixel_color(self.framebuffer.pixel(x, upper_y + 1));
                if let Some(cell) = buf.cell_mut((area.x + column, area.y + row)) {
                    cell.set_symbol(UPPER_HALF).set_fg(upper).set_bg(lower);
                }
            }
        }
    }
}

fn pixel_color(pixel: Option<Rgb>) -> Color {
    pixel.map_or(Color::Black, |p| Color::Rgb(p.r, p.g, p.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{
        color::Rgba,
        surface::{Paint, Point, Surface},
    };

    fn symbols(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    #[test]
    fn stacks_two_pixels_per_cell() {
        let mut fb = Framebuffer::new(2, 4);
        fb.fill_circle(Point::new(0.5, 0.5), 0.5, &Paint::Solid(Rgba::rgb(200, 0, 0)));
        fb.fill_circle(Point::new(1.5, 3.5), 0.5, &Paint::Solid(Rgba::rgb(0, 0, 200)));

        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        SkyWidget { framebuffer: &fb }.render(area, &mut buf);

        insta::assert_snapshot!(symbols(&buf), @"▀▀|▀▀");
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(200, 0, 0));
        assert_eq!(buf[(0, 0)].bg, Color::Rgb(0, 0, 0));
        assert_eq!(buf[(1, 1)].bg, Color::Rgb(0, 0, 200));
    }

    #[test]
    fn area_larger_than_framebuffer_pads_black() {
        let fb = Framebuffer::new(1, 1);
        let area = Rect::new(3, 1, 2, 1);
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 3));
        SkyWidget { framebuffer: &fb }.render(area, &mut buf);

        assert_eq!(buf[(4, 1)].fg, Color::Black);
        assert_eq!(buf[(3, 1)].bg, Color::Black);
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }
}
