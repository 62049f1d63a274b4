/// Half-block terminal rasterizer for screen-space triangles
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use rast3d_core::{ColorRGB, ScreenTriangle, TriangleSink, Viewport};
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '▀';

/// Pixel buffer covering the terminal, two pixels per character cell
///
/// Triangles are filled in the order they arrive with per-vertex colours
/// interpolated across the face. There is no depth buffer.
pub struct Canvas {
    columns: usize,
    rows: usize,
    background: ColorRGB,
    pixels: Vec<ColorRGB>,
}

impl Canvas {
    pub fn new(columns: u16, rows: u16, background: ColorRGB) -> Self {
        let (columns, rows) = (columns as usize, rows as usize);
        Self {
            columns,
            rows,
            background,
            pixels: vec![background; columns * rows * 2],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.columns
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.rows * 2
    }

    /// Pixel dimensions as a projection viewport
    pub fn viewport(&self) -> rast3d_core::Result<Viewport> {
        Viewport::new(self.width() as u32, self.height() as u32)
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        *self = Self::new(columns, rows, self.background);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<ColorRGB> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.pixels[y * self.columns + x])
    }

    fn rasterize_triangle(&mut self, triangle: &ScreenTriangle) {
        let [v0, v1, v2] = triangle.map(|v| (v.position.x, v.position.y));

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to canvas bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width() as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height() as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let color = triangle[0].color * w0
                            + triangle[1].color * w1
                            + triangle[2].color * w2;
                        let idx = y as usize * self.columns + x as usize;
                        self.pixels[idx] = color;
                    }
                }
            }
        }
    }

    /// Queue the whole canvas to `writer`, one half-block glyph per cell
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            let top = &self.pixels[(row * 2) * self.columns..(row * 2 + 1) * self.columns];
            let bottom = &self.pixels[(row * 2 + 1) * self.columns..(row * 2 + 2) * self.columns];

            for (upper, lower) in top.iter().zip(bottom) {
                writer.queue(SetForegroundColor(terminal_color(*upper)))?;
                writer.queue(SetBackgroundColor(terminal_color(*lower)))?;
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl TriangleSink for Canvas {
    fn draw_triangle(&mut self, triangle: &ScreenTriangle) {
        self.rasterize_triangle(triangle);
    }
}

/// Convert a `0.0..=1.0` colour to a 24-bit terminal colour
fn terminal_color(color: ColorRGB) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.r()),
        g: channel(color.g()),
        b: channel(color.b()),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rast3d_core::{ScreenVertex, Vector2};

    const RED: ColorRGB = ColorRGB::new(1.0, 0.0, 0.0);
    const GREEN: ColorRGB = ColorRGB::new(0.0, 1.0, 0.0);
    const BLUE: ColorRGB = ColorRGB::new(0.0, 0.0, 1.0);

    fn vertex(x: f32, y: f32, color: ColorRGB) -> ScreenVertex {
        ScreenVertex {
            position: Vector2::new(x, y),
            color,
        }
    }

    #[test]
    fn test_dimensions() {
        let canvas = Canvas::new(80, 24, ColorRGB::ZERO);
        assert_eq!(canvas.width(), 80);
        assert_eq!(canvas.height(), 48);
        assert_eq!(canvas.viewport().unwrap().height(), 48);
        assert!(Canvas::new(0, 24, ColorRGB::ZERO).viewport().is_err());
    }

    #[test]
    fn test_fills_inside_only() {
        let mut canvas = Canvas::new(20, 10, ColorRGB::ZERO);
        canvas.draw_triangle(&[
            vertex(0.0, 0.0, RED),
            vertex(10.0, 0.0, RED),
            vertex(0.0, 10.0, RED),
        ]);
        assert_eq!(canvas.pixel(1, 1), Some(RED));
        assert_eq!(canvas.pixel(9, 9), Some(ColorRGB::ZERO));
        assert_eq!(canvas.pixel(15, 2), Some(ColorRGB::ZERO));
    }

    #[test]
    fn test_winding_does_not_matter() {
        let mut canvas = Canvas::new(20, 10, ColorRGB::ZERO);
        canvas.draw_triangle(&[
            vertex(0.0, 0.0, BLUE),
            vertex(0.0, 10.0, BLUE),
            vertex(10.0, 0.0, BLUE),
        ]);
        assert_eq!(canvas.pixel(1, 1), Some(BLUE));
    }

    #[test]
    fn test_colours_are_interpolated() {
        let mut canvas = Canvas::new(100, 50, ColorRGB::ZERO);
        canvas.draw_triangle(&[
            vertex(0.0, 0.0, RED),
            vertex(100.0, 0.0, GREEN),
            vertex(0.0, 100.0, BLUE),
        ]);
        let near_red = canvas.pixel(0, 0).unwrap();
        assert!(near_red.r() > 0.98);

        let middle = canvas.pixel(33, 33).unwrap();
        assert!(middle.r() > 0.2 && middle.g() > 0.2 && middle.b() > 0.2);
        assert!((middle.r() + middle.g() + middle.b() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_later_triangles_paint_over_earlier_ones() {
        let mut canvas = Canvas::new(10, 5, ColorRGB::ZERO);
        let cover = |c| [vertex(-20.0, -20.0, c), vertex(40.0, -20.0, c), vertex(-20.0, 40.0, c)];
        canvas.draw_triangle(&cover(RED));
        canvas.draw_triangle(&cover(GREEN));
        assert_eq!(canvas.pixel(5, 5), Some(GREEN));
    }

    #[test]
    fn test_offscreen_and_degenerate_triangles_are_harmless() {
        let mut canvas = Canvas::new(10, 5, ColorRGB::ZERO);
        canvas.draw_triangle(&[
            vertex(-50.0, -50.0, RED),
            vertex(-40.0, -50.0, RED),
            vertex(-50.0, -40.0, RED),
        ]);
        canvas.draw_triangle(&[
            vertex(1.0, 1.0, RED),
            vertex(5.0, 5.0, RED),
            vertex(9.0, 9.0, RED),
        ]);
        canvas.draw_triangle(&[
            vertex(f32::INFINITY, 1.0, RED),
            vertex(f32::NAN, 5.0, RED),
            vertex(2.0, 9.0, RED),
        ]);
        assert!((0..10).all(|x| (0..10).all(|y| canvas.pixel(x, y) == Some(ColorRGB::ZERO))));
    }

    #[test]
    fn test_clear_and_resize() {
        let mut canvas = Canvas::new(10, 5, ColorRGB::new(0.1, 0.1, 0.1));
        canvas.draw_triangle(&[
            vertex(0.0, 0.0, RED),
            vertex(10.0, 0.0, RED),
            vertex(0.0, 10.0, RED),
        ]);
        canvas.clear();
        assert_eq!(canvas.pixel(1, 1), Some(ColorRGB::new(0.1, 0.1, 0.1)));

        canvas.resize(4, 3);
        assert_eq!((canvas.width(), canvas.height()), (4, 6));
        assert_eq!(canvas.pixel(3, 5), Some(ColorRGB::new(0.1, 0.1, 0.1)));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_draw_emits_one_glyph_per_cell() {
        let canvas = Canvas::new(3, 2, ColorRGB::ZERO);
        let mut out = Vec::new();
        canvas.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
    }

    #[test]
    fn test_terminal_color_clamps() {
        assert_eq!(
            terminal_color(ColorRGB::new(2.0, -1.0, 0.5)),
            Color::Rgb { r: 255, g: 0, b: 128 }
        );
    }
}
