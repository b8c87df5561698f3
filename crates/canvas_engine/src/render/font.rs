//! Typeface loading and text layout metrics

use ab_glyph::{Font as _, FontArc, PxScale, ScaleFont as _};
use std::path::Path;

use crate::engine::CanvasConfig;
use crate::render::canvas::CanvasError;

/// System font locations probed when the config does not name a font
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A loaded font face shared by the canvas and the glyph atlas
#[derive(Clone)]
pub struct Typeface {
    font: FontArc,
}

impl Typeface {
    /// Load a typeface from TTF/OTF bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, CanvasError> {
        let font = FontArc::try_from_vec(data).map_err(|e| CanvasError::FontLoad(e.to_string()))?;
        Ok(Self { font })
    }

    /// Load a typeface from a TTF/OTF file
    pub fn from_file(path: &Path) -> Result<Self, CanvasError> {
        let data = std::fs::read(path)
            .map_err(|e| CanvasError::FontLoad(format!("{}: {e}", path.display())))?;
        Self::from_bytes(data)
    }

    /// Resolve a typeface from the canvas configuration
    ///
    /// A configured `font_path` is used as-is; otherwise common system font
    /// locations are probed in order.
    pub fn resolve(config: &CanvasConfig) -> Result<Self, CanvasError> {
        if let Some(path) = &config.font_path {
            return Self::from_file(Path::new(path));
        }

        for candidate in SYSTEM_FONT_CANDIDATES {
            let path = Path::new(candidate);
            if path.exists() {
                log::debug!("Using system font {}", path.display());
                return Self::from_file(path);
            }
        }

        Err(CanvasError::FontNotFound)
    }

    pub(crate) fn font(&self) -> &FontArc {
        &self.font
    }

    /// Pixel scale whose rendered height matches the nominal text size
    ///
    /// ab_glyph scales are font-unit heights, not pixel heights; see
    /// <https://github.com/alexheretic/ab-glyph/issues/14>.
    pub(crate) fn px_scale(&self, text_size: f32) -> PxScale {
        let font_scale = self
            .font
            .units_per_em()
            .map(|units_per_em| self.font.height_unscaled() / units_per_em)
            .unwrap_or(1.0);
        PxScale::from(text_size * font_scale)
    }

    /// Sum of advance widths for the string at the given text size
    pub fn measure_text(&self, text: &str, text_size: f32) -> f32 {
        let scaled = self.font.as_scaled(self.px_scale(text_size));
        text.chars()
            .map(|ch| scaled.h_advance(self.font.glyph_id(ch)))
            .sum()
    }

    /// Ascent above the baseline at the given text size
    pub fn ascent(&self, text_size: f32) -> f32 {
        self.font.as_scaled(self.px_scale(text_size)).ascent()
    }
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system_typeface() -> Option<Typeface> {
        Typeface::resolve(&CanvasConfig::default()).ok()
    }

    #[test]
    fn test_missing_font_file_is_an_error() {
        let config = CanvasConfig {
            font_path: Some("does/not/exist.ttf".to_string()),
        };
        assert!(Typeface::resolve(&config).is_err());
    }

    #[test]
    fn test_measure_text_is_monotonic_in_length() {
        // Skipped on machines without any of the probed system fonts.
        let Some(typeface) = system_typeface() else {
            eprintln!("no system font found; skipping");
            return;
        };

        let short = typeface.measure_text("Hello", 24.0);
        let long = typeface.measure_text("Hello World!", 24.0);

        assert!(short > 0.0);
        assert!(long > short);
    }

    #[test]
    fn test_empty_text_measures_zero() {
        let Some(typeface) = system_typeface() else {
            eprintln!("no system font found; skipping");
            return;
        };

        assert_eq!(typeface.measure_text("", 24.0), 0.0);
    }

    #[test]
    fn test_measure_scales_with_text_size() {
        let Some(typeface) = system_typeface() else {
            eprintln!("no system font found; skipping");
            return;
        };

        let small = typeface.measure_text("Hello World!", 12.0);
        let large = typeface.measure_text("Hello World!", 24.0);

        use approx::assert_relative_eq;
        assert_relative_eq!(large, small * 2.0, max_relative = 1e-3);
    }
}
