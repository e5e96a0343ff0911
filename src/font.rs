//! # Font Handling
//!
//! Loading, measuring, and outlining the two program fonts: the title
//! font (names, costs, type lines; it also carries the mana and face
//! symbols at private-use code points) and the rules font.
//!
//! Metrics are sampled once per font into plain maps so the text fitter
//! can measure candidate sizes without re-parsing the face. Glyph
//! outlines are converted to paths on demand when a fitted line is
//! actually drawn.

use crate::error::ProxyError;
use std::collections::HashMap;
use std::path::Path;
use tiny_skia::PathBuilder;
use ttf_parser::{Face, OutlineBuilder};

/// Advance widths and vertical metrics for one face, in font units.
///
/// The fields are plain data on purpose: tests build synthetic metrics
/// directly instead of shipping font binaries.
#[derive(Debug, Clone)]
pub struct FaceMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    /// Height of flat capitals; what vertical centering actually aligns.
    pub cap_height: i16,
    pub advances: HashMap<char, u16>,
    pub default_advance: u16,
}

impl FaceMetrics {
    /// Parse metrics from raw font data.
    pub fn from_font_data(data: &[u8]) -> Option<FaceMetrics> {
        let face = Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();
        let ascender = face.ascender();
        let descender = face.descender();
        let cap_height = match face.capital_height() {
            Some(h) if h > 0 => h,
            _ => (ascender as i32 * 7 / 10) as i16,
        };

        let mut advances = HashMap::new();
        let mut default_advance = 0u16;
        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advances.insert(ch, advance);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }
        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Some(FaceMetrics {
            units_per_em,
            ascender,
            descender,
            cap_height,
            advances,
            default_advance,
        })
    }

    pub fn char_width(&self, ch: char, font_size: f32) -> f32 {
        let advance = self.advances.get(&ch).copied().unwrap_or(self.default_advance);
        advance as f32 / self.units_per_em as f32 * font_size
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }

    /// Distance from baseline to the top of capitals at `font_size`.
    pub fn cap_height_px(&self, font_size: f32) -> f32 {
        self.cap_height as f32 / self.units_per_em as f32 * font_size
    }

    pub fn ascent(&self, font_size: f32) -> f32 {
        self.ascender as f32 / self.units_per_em as f32 * font_size
    }

    /// Baseline-to-baseline distance for stacked lines.
    pub fn line_height(&self, font_size: f32) -> f32 {
        (self.ascender as i32 - self.descender as i32) as f32 / self.units_per_em as f32
            * font_size
    }
}

/// One loaded font: raw bytes for outlining plus sampled metrics.
pub struct Font {
    data: Vec<u8>,
    pub metrics: FaceMetrics,
}

impl Font {
    pub fn load(path: &Path) -> Result<Font, ProxyError> {
        let data = std::fs::read(path)
            .map_err(|e| ProxyError::Font(format!("cannot read '{}': {}", path.display(), e)))?;
        let metrics = FaceMetrics::from_font_data(&data)
            .ok_or_else(|| ProxyError::Font(format!("cannot parse '{}'", path.display())))?;
        Ok(Font { data, metrics })
    }

    /// Build one path for a whole text run, pen starting at the baseline
    /// origin. Characters the font misses advance by half an em and leave
    /// no outline, so missing glyphs degrade to gaps instead of tofu.
    pub fn text_path(
        &self,
        text: &str,
        font_size: f32,
        baseline_x: f32,
        baseline_y: f32,
    ) -> Option<tiny_skia::Path> {
        let face = Face::parse(&self.data, 0).ok()?;
        let units_per_em = face.units_per_em().max(1) as f32;
        let scale = font_size / units_per_em;

        let mut builder = GlyphPathBuilder::new(baseline_x, baseline_y, scale);
        let mut pen_x = baseline_x;
        for ch in text.chars() {
            let Some(glyph_id) = face.glyph_index(ch) else {
                pen_x += font_size * 0.5;
                continue;
            };
            builder.origin_x = pen_x;
            face.outline_glyph(glyph_id, &mut builder);
            let advance_units = face.glyph_hor_advance(glyph_id).unwrap_or(0) as f32;
            let mut advance = advance_units / units_per_em * font_size;
            if advance <= 0.0 {
                advance = font_size * 0.5;
            }
            pen_x += advance;
        }
        builder.finish()
    }
}

/// The two program fonts, loaded once per run.
pub struct FontStore {
    pub title: Font,
    pub rules: Font,
}

impl FontStore {
    pub fn load(title_path: &Path, rules_path: &Path) -> Result<FontStore, ProxyError> {
        Ok(FontStore {
            title: Font::load(title_path)?,
            rules: Font::load(rules_path)?,
        })
    }
}

/// Accumulates glyph outlines into one tiny-skia path, flipping the y
/// axis (fonts point up, bitmaps point down) and scaling font units to
/// pixels.
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn new(origin_x: f32, origin_y: f32, scale: f32) -> Self {
        GlyphPathBuilder {
            builder: PathBuilder::new(),
            origin_x,
            origin_y,
            scale,
        }
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }

    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.origin_y - y * self.scale)
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::FaceMetrics;
    use std::collections::HashMap;

    /// A synthetic monospace-ish face: every sampled character is half an
    /// em wide. Lets the fitter tests measure without any font file.
    pub fn fixed_metrics() -> FaceMetrics {
        FaceMetrics {
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            cap_height: 700,
            advances: HashMap::new(),
            default_advance: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::fixed_metrics;

    #[test]
    fn widths_scale_linearly_with_font_size() {
        let metrics = fixed_metrics();
        assert_eq!(metrics.text_width("abcd", 10.0), 20.0);
        assert_eq!(metrics.text_width("abcd", 20.0), 40.0);
    }

    #[test]
    fn line_height_spans_ascent_and_descent() {
        let metrics = fixed_metrics();
        assert_eq!(metrics.line_height(10.0), 10.0);
        assert_eq!(metrics.cap_height_px(10.0), 7.0);
    }
}
