use anyhow::{anyhow, Result};
use image::{Rgba, RgbaImage};
use log::{debug, info};
use rusttype::{point, Font, Scale};

use crate::{
    canvas::{Canvas, Colour, Paint, PaintStyle},
    Point2D,
};

pub fn load_font(font_file_path: &str) -> Result<Font<'static>> {
    let bytes = std::fs::read(font_file_path)
        .map_err(|e| anyhow!("Failed to read font file \"{}\": {}", font_file_path, e))?;
    let font = Font::try_from_vec(bytes)
        .ok_or_else(|| anyhow!("Not a usable TrueType font: \"{}\"", font_file_path))?;
    info!("Loaded font from \"{}\"", font_file_path);
    Ok(font)
}

/// A [`Canvas`] that draws straight into an RGBA bitmap.
///
/// Text is only drawn when a font was supplied.
pub struct RasterCanvas<'a> {
    image: &'a mut RgbaImage,
    font: Option<&'a Font<'static>>,
}

impl<'a> RasterCanvas<'a> {
    pub fn new(image: &'a mut RgbaImage, font: Option<&'a Font<'static>>) -> Self {
        RasterCanvas { image, font }
    }

    /// Alpha-blend `colour` onto one pixel; `coverage` is in [0;1]
    fn blend(&mut self, x: i32, y: i32, colour: Colour, coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.image.width() || y as u32 >= self.image.height() {
            return;
        }
        let alpha = coverage.clamp(0., 1.) * colour.a as f32 / 255.;
        if alpha <= 0. {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        let Rgba([r, g, b, a]) = *pixel;
        let mix = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * (1. - alpha)).round() as u8;
        *pixel = Rgba([
            mix(colour.r, r),
            mix(colour.g, g),
            mix(colour.b, b),
            a.max((alpha * 255.).round() as u8),
        ]);
    }

    /// Pixel bounds of a box around `(min, max)` grown by `margin`, clipped to the
    /// image; None if nothing is visible
    fn clip(&self, min: Point2D, max: Point2D, margin: f32) -> Option<(i32, i32, i32, i32)> {
        let x0 = ((min.0 - margin).floor() as i32).max(0);
        let y0 = ((min.1 - margin).floor() as i32).max(0);
        let x1 = ((max.0 + margin).ceil() as i32).min(self.image.width() as i32 - 1);
        let y1 = ((max.1 + margin).ceil() as i32).min(self.image.height() as i32 - 1);
        if x0 > x1 || y0 > y1 {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }
}

fn is_finite(p: &Point2D) -> bool {
    p.0.is_finite() && p.1.is_finite()
}

impl Canvas for RasterCanvas<'_> {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn draw_line(&mut self, from: Point2D, to: Point2D, paint: &Paint) {
        if !is_finite(&from) || !is_finite(&to) {
            debug!("Ignoring line with non-finite endpoints {:?} -> {:?}", from, to);
            return;
        }
        let half_width = paint.stroke_width.max(1.) / 2.;
        let Some((x0, y0, x1, y1)) = self.clip(
            (from.0.min(to.0), from.1.min(to.1)),
            (from.0.max(to.0), from.1.max(to.1)),
            half_width + 1.,
        ) else {
            return;
        };

        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len_sq = dx * dx + dy * dy;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (px, py) = (x as f32 - from.0, y as f32 - from.1);
                let t = if len_sq > 0. {
                    ((px * dx + py * dy) / len_sq).clamp(0., 1.)
                } else {
                    0.
                };
                let (ex, ey) = (px - t * dx, py - t * dy);
                let dist = (ex * ex + ey * ey).sqrt();
                self.blend(x, y, paint.colour, half_width + 0.5 - dist);
            }
        }
    }

    fn draw_circle(&mut self, centre: Point2D, radius: f32, paint: &Paint) {
        if !is_finite(&centre) || !radius.is_finite() {
            debug!("Ignoring circle at {:?} with radius {}", centre, radius);
            return;
        }
        let half_width = paint.stroke_width.max(1.) / 2.;
        let Some((x0, y0, x1, y1)) = self.clip(centre, centre, radius + half_width + 1.) else {
            return;
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dist = ((x as f32 - centre.0).powi(2) + (y as f32 - centre.1).powi(2)).sqrt();
                let coverage = match paint.style {
                    PaintStyle::Fill => radius + 0.5 - dist,
                    PaintStyle::Stroke => half_width + 0.5 - (dist - radius).abs(),
                };
                self.blend(x, y, paint.colour, coverage);
            }
        }
    }

    fn draw_text(&mut self, text: &str, origin: Point2D, paint: &Paint) {
        let Some(font) = self.font else {
            debug!("No font loaded; skip text \"{}\"", text);
            return;
        };
        if text.is_empty() || !is_finite(&origin) {
            return;
        }
        let scale = Scale::uniform(paint.text_size);
        for glyph in font.layout(text, scale, point(origin.0, origin.1)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    self.blend(bb.min.x + gx as i32, bb.min.y + gy as i32, paint.colour, v);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn blank(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, BLACK)
    }

    #[test]
    fn test_line_covers_its_path() {
        let mut image = blank(50, 50);
        {
            let mut canvas = RasterCanvas::new(&mut image, None);
            canvas.draw_line((5., 25.), (45., 25.), &Paint::stroke(Colour::rgb(255, 0, 0), 4.));
        }
        assert_eq!(*image.get_pixel(25, 25), Rgba([255, 0, 0, 255]));
        assert_eq!(*image.get_pixel(25, 26), Rgba([255, 0, 0, 255]));
        assert_eq!(*image.get_pixel(25, 40), BLACK);
        assert_eq!(*image.get_pixel(48, 25), BLACK);
    }

    #[test]
    fn test_filled_and_stroked_circles() {
        let mut image = blank(60, 30);
        {
            let mut canvas = RasterCanvas::new(&mut image, None);
            canvas.draw_circle((15., 15.), 6., &Paint::fill(Colour::rgb(0, 255, 0)));
            canvas.draw_circle((45., 15.), 8., &Paint::stroke(Colour::rgb(0, 0, 255), 2.));
        }
        // Disc is solid
        assert_eq!(*image.get_pixel(15, 15), Rgba([0, 255, 0, 255]));
        assert_eq!(*image.get_pixel(18, 15), Rgba([0, 255, 0, 255]));
        // Ring is hollow
        assert_eq!(*image.get_pixel(45, 15), BLACK);
        assert_eq!(*image.get_pixel(53, 15), Rgba([0, 0, 255, 255]));
        assert_eq!(*image.get_pixel(45, 7), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_drawing_outside_is_clipped() {
        let mut image = blank(10, 10);
        {
            let mut canvas = RasterCanvas::new(&mut image, None);
            let paint = Paint::stroke(Colour::rgb(255, 255, 255), 4.);
            canvas.draw_line((-100., -100.), (-50., -20.), &paint);
            canvas.draw_circle((500., 500.), 6., &paint);
            canvas.draw_line((f32::NAN, 0.), (5., 5.), &paint);
            canvas.draw_circle((5., 5.), f32::INFINITY, &paint);
        }
        assert!(image.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_line_partly_inside() {
        let mut image = blank(10, 10);
        {
            let mut canvas = RasterCanvas::new(&mut image, None);
            canvas.draw_line((-20., 5.), (30., 5.), &Paint::stroke(Colour::rgb(9, 9, 9), 2.));
        }
        assert!((0..10).all(|x| *image.get_pixel(x, 5) == Rgba([9, 9, 9, 255])));
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let mut image = blank(40, 40);
        {
            let mut canvas = RasterCanvas::new(&mut image, None);
            canvas.draw_text("Perfect!", (5., 20.), &Paint::text(Colour::rgb(0, 255, 0), 20.));
        }
        assert!(image.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_load_font_missing_file() {
        assert!(load_font("./definitely/not/here.ttf").is_err());
    }
}
