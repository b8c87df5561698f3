//! Glyph atlas: a rasterized-glyph cache over a single texture page

use ab_glyph::{Font as _, ScaleFont as _};
use glow::HasContext;
use std::collections::HashMap;

use crate::render::canvas::CanvasError;
use crate::render::font::Typeface;

/// Atlas page dimensions in pixels
const PAGE_SIZE: u32 = 512;
/// Padding between packed glyphs, to keep linear sampling from bleeding
const PAGE_GAP: u32 = 1;

/// Row-based rectangle packer
///
/// Rectangles are placed left to right on the current shelf; a new shelf
/// opens when a rectangle does not fit horizontally. No GL involved, so the
/// packing logic is testable on its own.
#[derive(Debug)]
pub struct ShelfPacker {
    width: u32,
    height: u32,
    gap: u32,
    cursor_x: u32,
    cursor_y: u32,
    shelf_height: u32,
}

impl ShelfPacker {
    /// Create a packer for a `width` x `height` page with `gap` padding
    pub const fn new(width: u32, height: u32, gap: u32) -> Self {
        Self {
            width,
            height,
            gap,
            cursor_x: 0,
            cursor_y: 0,
            shelf_height: 0,
        }
    }

    /// Reserve a `w` x `h` region; returns its top-left corner, or `None`
    /// when the page cannot fit it
    pub fn insert(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w > self.width || h > self.height {
            return None;
        }

        if self.cursor_x + w > self.width {
            // open a new shelf
            self.cursor_y += self.shelf_height + self.gap;
            self.cursor_x = 0;
            self.shelf_height = 0;
        }

        if self.cursor_y + h > self.height {
            return None;
        }

        let position = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.gap;
        self.shelf_height = self.shelf_height.max(h);
        Some(position)
    }
}

/// A rasterized glyph resident in the atlas
#[derive(Debug, Clone, Copy)]
pub struct AtlasGlyph {
    /// Normalized texture coordinates of the glyph region, top-left
    pub uv_min: [f32; 2],
    /// Normalized texture coordinates of the glyph region, bottom-right
    pub uv_max: [f32; 2],
    /// Horizontal offset from the pen position to the glyph's left edge
    pub left: f32,
    /// Vertical offset from the baseline to the glyph's top edge (negative
    /// above the baseline)
    pub top: f32,
    /// Glyph width in pixels; zero for whitespace
    pub width: f32,
    /// Glyph height in pixels; zero for whitespace
    pub height: f32,
    /// Horizontal pen advance after this glyph
    pub advance: f32,
}

impl AtlasGlyph {
    const fn empty(advance: f32) -> Self {
        Self {
            uv_min: [0.0, 0.0],
            uv_max: [0.0, 0.0],
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            advance,
        }
    }
}

// Cache key packs the character with the pixel-size bits; hashing the f32
// directly would need float-hash fidgeting (same trick as a font-instance
// key in a bigger text stack).
fn glyph_key(ch: char, text_size: f32) -> u64 {
    (u64::from(u32::from(ch)) << 32) | u64::from(text_size.to_bits())
}

/// One R8 texture page plus the cache of glyphs packed into it
pub struct GlyphAtlas {
    texture: glow::NativeTexture,
    packer: ShelfPacker,
    glyphs: HashMap<u64, AtlasGlyph>,
}

impl GlyphAtlas {
    /// Allocate the atlas texture page
    ///
    /// # Safety
    ///
    /// The GL context must be current on this thread.
    pub unsafe fn new(gl: &glow::Context) -> Result<Self, CanvasError> {
        let texture = gl
            .create_texture()
            .map_err(|e| CanvasError::GlCreate(format!("create_texture failed: {e:?}")))?;

        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::R8 as i32,
            PAGE_SIZE as i32,
            PAGE_SIZE as i32,
            0,
            glow::RED,
            glow::UNSIGNED_BYTE,
            None,
        );
        gl.bind_texture(glow::TEXTURE_2D, None);

        Ok(Self {
            texture,
            packer: ShelfPacker::new(PAGE_SIZE, PAGE_SIZE, PAGE_GAP),
            glyphs: HashMap::new(),
        })
    }

    /// The atlas texture page
    pub const fn texture(&self) -> glow::NativeTexture {
        self.texture
    }

    /// Get a glyph, rasterizing and uploading it on first use
    ///
    /// # Safety
    ///
    /// The GL context must be current on this thread.
    pub unsafe fn get_or_rasterize(
        &mut self,
        gl: &glow::Context,
        typeface: &Typeface,
        ch: char,
        text_size: f32,
    ) -> Result<AtlasGlyph, CanvasError> {
        let key = glyph_key(ch, text_size);
        if let Some(glyph) = self.glyphs.get(&key) {
            return Ok(*glyph);
        }

        let glyph = self.rasterize(gl, typeface, ch, text_size)?;
        log::trace!("rasterized {ch:?} at {text_size}px into the atlas");
        self.glyphs.insert(key, glyph);
        Ok(glyph)
    }

    unsafe fn rasterize(
        &mut self,
        gl: &glow::Context,
        typeface: &Typeface,
        ch: char,
        text_size: f32,
    ) -> Result<AtlasGlyph, CanvasError> {
        let font = typeface.font();
        let px_scale = typeface.px_scale(text_size);
        let glyph_id = font.glyph_id(ch);
        let advance = font.as_scaled(px_scale).h_advance(glyph_id);

        // Whitespace and other empty glyphs only move the pen.
        let Some(outlined) = font.outline_glyph(glyph_id.with_scale(px_scale)) else {
            return Ok(AtlasGlyph::empty(advance));
        };

        let bounds = outlined.px_bounds();
        let width = bounds.width().ceil() as u32;
        let height = bounds.height().ceil() as u32;
        if width == 0 || height == 0 {
            return Ok(AtlasGlyph::empty(advance));
        }

        let (x, y) = self
            .packer
            .insert(width, height)
            .ok_or(CanvasError::AtlasFull)?;

        let mut coverage = vec![0u8; (width * height) as usize];
        outlined.draw(|px, py, c| {
            let idx = (py * width + px) as usize;
            if idx < coverage.len() {
                coverage[idx] = (c.clamp(0.0, 1.0) * 255.0) as u8;
            }
        });

        gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_sub_image_2d(
            glow::TEXTURE_2D,
            0,
            x as i32,
            y as i32,
            width as i32,
            height as i32,
            glow::RED,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(&coverage),
        );
        gl.bind_texture(glow::TEXTURE_2D, None);

        let page = PAGE_SIZE as f32;
        Ok(AtlasGlyph {
            uv_min: [x as f32 / page, y as f32 / page],
            uv_max: [(x + width) as f32 / page, (y + height) as f32 / page],
            left: bounds.min.x,
            top: bounds.min.y,
            width: width as f32,
            height: height as f32,
            advance,
        })
    }

    /// Delete the atlas texture
    ///
    /// # Safety
    ///
    /// The GL context must be current on this thread.
    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_texture(self.texture);
        self.glyphs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packer_places_left_to_right() {
        let mut packer = ShelfPacker::new(64, 64, 1);

        assert_eq!(packer.insert(10, 10), Some((0, 0)));
        assert_eq!(packer.insert(10, 10), Some((11, 0)));
        assert_eq!(packer.insert(10, 10), Some((22, 0)));
    }

    #[test]
    fn test_packer_opens_new_shelf_when_row_is_full() {
        let mut packer = ShelfPacker::new(32, 64, 1);

        assert_eq!(packer.insert(20, 12), Some((0, 0)));
        // Does not fit beside the first rect: next shelf starts below the
        // tallest rect on the previous shelf plus the gap.
        assert_eq!(packer.insert(20, 8), Some((0, 13)));
    }

    #[test]
    fn test_packer_shelf_height_tracks_tallest_entry() {
        let mut packer = ShelfPacker::new(32, 64, 1);

        assert_eq!(packer.insert(10, 4), Some((0, 0)));
        assert_eq!(packer.insert(10, 16), Some((11, 0)));
        assert_eq!(packer.insert(20, 4), Some((0, 17)));
    }

    #[test]
    fn test_packer_rejects_oversize() {
        let mut packer = ShelfPacker::new(16, 16, 1);

        assert_eq!(packer.insert(17, 4), None);
        assert_eq!(packer.insert(4, 17), None);
    }

    #[test]
    fn test_packer_reports_full_page() {
        let mut packer = ShelfPacker::new(16, 16, 0);

        assert_eq!(packer.insert(16, 16), Some((0, 0)));
        assert_eq!(packer.insert(1, 1), None);
    }

    #[test]
    fn test_glyph_key_distinguishes_char_and_size() {
        assert_ne!(glyph_key('a', 24.0), glyph_key('b', 24.0));
        assert_ne!(glyph_key('a', 24.0), glyph_key('a', 12.0));
        assert_eq!(glyph_key('a', 24.0), glyph_key('a', 24.0));
    }
}
