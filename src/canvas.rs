//! The drawing surface the overlay is rendered onto.
//!
//! Render logic only ever talks to [`Canvas`]; [`crate::raster::RasterCanvas`] draws into an
//! RGBA bitmap and [`RecordingCanvas`] keeps a list of the draw calls.

use colorsys::Rgb;

use crate::{
    body::RectF,
    error::{OverlayError, Result},
    Point2D,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Colour { r, g, b, a: 255 }
    }

    /// Parse a "#rrggbb" string
    pub fn from_hex(hex: &str) -> Result<Self> {
        let rgb: [u8; 3] = Rgb::from_hex_str(hex)
            .map_err(|_| OverlayError::InvalidColour(String::from(hex)))?
            .into();
        let [r, g, b] = rgb;
        Ok(Colour::rgb(r, g, b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintStyle {
    Fill,
    Stroke,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub colour: Colour,
    pub stroke_width: f32,
    pub style: PaintStyle,
    pub text_size: f32,
}

impl Paint {
    pub fn stroke(colour: Colour, stroke_width: f32) -> Self {
        Paint {
            colour,
            stroke_width,
            style: PaintStyle::Stroke,
            text_size: 0.,
        }
    }

    pub fn fill(colour: Colour) -> Self {
        Paint {
            colour,
            stroke_width: 0.,
            style: PaintStyle::Fill,
            text_size: 0.,
        }
    }

    pub fn text(colour: Colour, text_size: f32) -> Self {
        Paint {
            colour,
            stroke_width: 0.,
            style: PaintStyle::Fill,
            text_size,
        }
    }
}

pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn draw_line(&mut self, from: Point2D, to: Point2D, paint: &Paint);

    /// Filled disc or outlined ring, depending on `paint.style`
    fn draw_circle(&mut self, centre: Point2D, radius: f32, paint: &Paint);

    /// Rectangle outline
    fn draw_rect(&mut self, rect: &RectF, paint: &Paint) {
        let RectF {
            left,
            top,
            right,
            bottom,
        } = *rect;
        self.draw_line((left, top), (right, top), paint);
        self.draw_line((right, top), (right, bottom), paint);
        self.draw_line((right, bottom), (left, bottom), paint);
        self.draw_line((left, bottom), (left, top), paint);
    }

    /// `origin` is the left end of the text baseline
    fn draw_text(&mut self, text: &str, origin: Point2D, paint: &Paint);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point2D,
        to: Point2D,
        paint: Paint,
    },
    Circle {
        centre: Point2D,
        radius: f32,
        paint: Paint,
    },
    Rect {
        rect: RectF,
        paint: Paint,
    },
    Text {
        text: String,
        origin: Point2D,
        paint: Paint,
    },
}

/// Keeps every draw call, in order, instead of rasterizing
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        RecordingCanvas {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn texts(&self) -> Vec<(&str, Point2D)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, origin, .. } => Some((text.as_str(), *origin)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_line(&mut self, from: Point2D, to: Point2D, paint: &Paint) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            paint: paint.clone(),
        });
    }

    fn draw_circle(&mut self, centre: Point2D, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::Circle {
            centre,
            radius,
            paint: paint.clone(),
        });
    }

    fn draw_rect(&mut self, rect: &RectF, paint: &Paint) {
        self.commands.push(DrawCommand::Rect {
            rect: *rect,
            paint: paint.clone(),
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point2D, paint: &Paint) {
        self.commands.push(DrawCommand::Text {
            text: String::from(text),
            origin,
            paint: paint.clone(),
        });
    }
}
