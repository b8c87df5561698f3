//! Paints and colors for canvas draw commands

use serde::{Deserialize, Serialize};

/// RGBA color, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Alice blue (`#F0F8FF`)
    pub const ALICE_BLUE: Self = Self {
        r: 240.0 / 255.0,
        g: 248.0 / 255.0,
        b: 1.0,
        a: 1.0,
    };

    /// Create a color from float components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit components
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }
}

/// Whether draw commands fill or stroke their shapes
///
/// Text runs are always filled; `Stroke` is accepted and drawn as a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaintStyle {
    /// Fill the shape interior
    Fill,
    /// Stroke the shape outline
    Stroke,
}

/// Horizontal text alignment relative to the draw position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    /// The draw position is the left edge of the text run
    Left,
    /// The draw position is the horizontal center of the text run
    Center,
    /// The draw position is the right edge of the text run
    Right,
}

impl TextAlign {
    /// Left edge of a text run of the given advance width drawn at `x`
    pub fn origin_x(self, x: f32, advance_width: f32) -> f32 {
        match self {
            Self::Left => x,
            Self::Center => x - advance_width / 2.0,
            Self::Right => x - advance_width,
        }
    }
}

/// Draw style for canvas commands: color, anti-aliasing, fill mode, text
/// alignment and size
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    /// Draw color
    pub color: Color,

    /// Whether glyph edges keep fractional coverage; when false, coverage is
    /// thresholded to hard edges
    pub anti_alias: bool,

    /// Fill or stroke mode
    pub style: PaintStyle,

    /// Horizontal text alignment
    pub align: TextAlign,

    /// Text size in pixels
    pub text_size: f32,
}

impl Paint {
    /// Set the draw color
    #[must_use]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Enable or disable anti-aliasing
    #[must_use]
    pub const fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    /// Set the fill/stroke mode
    #[must_use]
    pub const fn with_style(mut self, style: PaintStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the text alignment
    #[must_use]
    pub const fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Set the text size in pixels
    #[must_use]
    pub const fn with_text_size(mut self, text_size: f32) -> Self {
        self.text_size = text_size;
        self
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            anti_alias: false,
            style: PaintStyle::Fill,
            align: TextAlign::Left,
            text_size: 16.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_defaults() {
        let paint = Paint::default();

        assert_eq!(paint.color, Color::BLACK);
        assert!(!paint.anti_alias);
        assert_eq!(paint.style, PaintStyle::Fill);
        assert_eq!(paint.align, TextAlign::Left);
        assert_eq!(paint.text_size, 16.0);
    }

    #[test]
    fn test_paint_builder() {
        let paint = Paint::default()
            .with_color(Color::ALICE_BLUE)
            .with_anti_alias(true)
            .with_align(TextAlign::Center)
            .with_text_size(24.0);

        assert_eq!(paint.color, Color::ALICE_BLUE);
        assert!(paint.anti_alias);
        assert_eq!(paint.align, TextAlign::Center);
        assert_eq!(paint.text_size, 24.0);
    }

    #[test]
    fn test_center_alignment_offsets_by_half_the_width() {
        assert_eq!(TextAlign::Left.origin_x(100.0, 40.0), 100.0);
        assert_eq!(TextAlign::Center.origin_x(100.0, 40.0), 80.0);
        assert_eq!(TextAlign::Right.origin_x(100.0, 40.0), 60.0);
    }

    #[test]
    fn test_color_from_rgb8() {
        let color = Color::from_rgb8(240, 248, 255);

        assert_eq!(color, Color::ALICE_BLUE);
        assert_eq!(color.a, 1.0);
    }
}
