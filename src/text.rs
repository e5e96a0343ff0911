//! # Text Fitting
//!
//! Chooses font sizes and line wraps so card text fills its box without
//! overflowing, and resolves `{symbol}` escapes to the private-use code
//! points the title font carries the game symbols at.
//!
//! Width is a hard constraint: single-line fitting keeps shrinking until
//! the line fits. Height is soft: multi-line fitting shrinks down to a
//! minimum size and then admits defeat by clipping (the caller records a
//! diagnostic; clipping is policy, not an accident).

use crate::font::FaceMetrics;
use crate::model::{FaceSymbol, ManaColor};
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// Hard floor for single-line shrinking. Below this the text would be
/// unreadable on paper anyway.
pub const MIN_SINGLE_LINE_SIZE: f32 = 6.0;
/// Floor for rules text; below this the box clips instead.
pub const MIN_RULES_SIZE: f32 = 16.0;
/// Shrink step, matching the coarse steps the fitter needs to terminate
/// quickly at 300 DPI sizes.
const SIZE_STEP: f32 = 3.0;

const HYBRID_PAIRS: [&str; 10] = [
    "W/U", "U/B", "B/R", "R/G", "G/W", "W/B", "U/R", "B/G", "R/W", "G/U",
];

/// Map a `{...}` symbol body (already uppercased, braces stripped) to its
/// code point in the title font.
fn symbol_code_point(body: &str) -> Option<char> {
    // Generic costs {0}..{20}.
    if let Ok(n) = body.parse::<u32>() {
        if n <= 20 {
            return char::from_u32(0x200 + n);
        }
        return None;
    }
    if let Some(ix) = ManaColor::ALL.iter().position(|c| body == c.letter().to_string()) {
        return char::from_u32(0x220 + ix as u32);
    }
    if let Some(rest) = body.strip_prefix("2/") {
        let ix = ManaColor::ALL.iter().position(|c| rest == c.letter().to_string())?;
        return char::from_u32(0x225 + ix as u32);
    }
    if let Some(ix) = HYBRID_PAIRS.iter().position(|p| *p == body) {
        return char::from_u32(0x230 + ix as u32);
    }
    if let Some(pair) = body.strip_suffix("/P") {
        if let Some(ix) = ManaColor::ALL.iter().position(|c| pair == c.letter().to_string()) {
            return char::from_u32(0x22A + ix as u32);
        }
        if let Some(ix) = HYBRID_PAIRS.iter().position(|p| *p == pair) {
            return char::from_u32(0x240 + ix as u32);
        }
        return None;
    }
    match body {
        "X" => Some('\u{215}'),
        "Y" => Some('\u{216}'),
        "Z" => Some('\u{217}'),
        "T" => Some('\u{218}'),
        "Q" => Some('\u{219}'),
        "S" => Some('\u{21E}'),
        "C" => Some('\u{21F}'),
        "P" => Some('\u{22F}'),
        "E" => Some('\u{23A}'),
        "TK" => Some('\u{23B}'),
        _ => None,
    }
}

/// The indicator glyph for a double-faced or flip face. Flip reuses the
/// tap/untap symbols, like the original printings do.
pub fn face_symbol_char(symbol: FaceSymbol) -> char {
    match symbol {
        FaceSymbol::ModalFront => '\u{21A}',
        FaceSymbol::ModalBack => '\u{21B}',
        FaceSymbol::TransformFront => '\u{21C}',
        FaceSymbol::TransformBack => '\u{21D}',
        FaceSymbol::FlipTop => '\u{218}',
        FaceSymbol::FlipBottom => '\u{219}',
    }
}

pub const ACORN_CHAR: char = '\u{23C}';
pub const PAINTBRUSH_CHAR: char = '\u{23F}';
/// Backdrop glyph for emblems.
pub const PLANESWALKER_CHAR: char = '\u{23D}';

/// Backdrop glyph for a basic land, from its last name word.
pub fn land_symbol_char(name: &str) -> Option<char> {
    let last = name.split_whitespace().last()?;
    match last {
        "Plains" => symbol_code_point("W"),
        "Island" => symbol_code_point("U"),
        "Swamp" => symbol_code_point("B"),
        "Mountain" => symbol_code_point("R"),
        "Forest" => symbol_code_point("G"),
        "Wastes" => symbol_code_point("C"),
        _ => None,
    }
}

/// Substitute `{...}` escapes with symbol-font glyphs. With symbols
/// disabled the literal bracketed text stays, which is the documented
/// fallback look. The Unicode minus used in planeswalker abilities is
/// normalized either way, since the fonts only carry ASCII hyphen.
pub fn replace_symbols(text: &str, symbols_enabled: bool) -> String {
    let text = text.replace('\u{2212}', "-");
    if !symbols_enabled {
        return text;
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_str();
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail.find('}') {
            Some(close) => {
                let body = tail[1..close].to_ascii_uppercase();
                match symbol_code_point(&body) {
                    Some(glyph) => out.push(glyph),
                    None => out.push_str(&tail[..=close]),
                }
                rest = &tail[close + 1..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Largest size (stepping down from `start_size`) at which `text` fits in
/// `max_width`. Width never overflows at the returned size unless the
/// absolute floor is hit first.
pub fn fit_single_line(metrics: &FaceMetrics, text: &str, max_width: f32, start_size: f32) -> f32 {
    let mut size = start_size;
    while metrics.text_width(text, size) > max_width && size - SIZE_STEP >= MIN_SINGLE_LINE_SIZE {
        size -= SIZE_STEP;
    }
    size
}

/// Vertical centering for one line: the baseline such that the capital
/// height sits optically centered in the band. Centering on the raw band
/// or the full ascent puts most fonts visibly low, so cap height is the
/// measure used.
pub fn centered_baseline(metrics: &FaceMetrics, font_size: f32, band_top: i32, band_height: i32) -> f32 {
    let cap = metrics.cap_height_px(font_size);
    band_top as f32 + (band_height as f32 - cap) / 2.0 + cap
}

/// A multi-line fit: the chosen size, the wrapped lines (empty strings
/// separate paragraphs), and whether the box clips even at minimum size.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub font_size: f32,
    pub lines: Vec<String>,
    pub clipped: bool,
}

impl FittedText {
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }
}

/// Fit a sequence of paragraphs into a box: greedy wrap at the candidate
/// size, shrink stepwise while the wrapped height overflows, clip at the
/// minimum.
pub fn fit_multi_line(
    metrics: &FaceMetrics,
    paragraphs: &[String],
    max_width: f32,
    max_height: f32,
    start_size: f32,
) -> FittedText {
    let mut size = start_size;
    loop {
        let lines = wrap_paragraphs(metrics, paragraphs, max_width, size);
        let height = lines.len() as f32 * metrics.line_height(size);
        if height <= max_height {
            return FittedText {
                font_size: size,
                lines,
                clipped: false,
            };
        }
        if size - SIZE_STEP < MIN_RULES_SIZE {
            return FittedText {
                font_size: size,
                lines,
                clipped: true,
            };
        }
        size -= SIZE_STEP;
    }
}

fn wrap_paragraphs(
    metrics: &FaceMetrics,
    paragraphs: &[String],
    max_width: f32,
    size: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (ix, paragraph) in paragraphs.iter().enumerate() {
        if ix > 0 {
            lines.push(String::new());
        }
        lines.extend(wrap_line(metrics, paragraph, max_width, size));
    }
    lines
}

/// Greedy wrap of one paragraph at UAX#14 break opportunities. A segment
/// that alone exceeds the width gets its own overflowing line; the width
/// check belongs to the caller's shrink loop.
fn wrap_line(metrics: &FaceMetrics, text: &str, max_width: f32, size: f32) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut breaks: Vec<usize> = linebreaks(text)
        .filter(|(_, opportunity)| *opportunity == BreakOpportunity::Allowed)
        .map(|(offset, _)| offset)
        .collect();
    breaks.push(text.len());

    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut committed = None;
    for offset in breaks {
        let candidate = text[line_start..offset].trim_end();
        if metrics.text_width(candidate, size) > max_width {
            match committed {
                Some(end) if end > line_start => {
                    lines.push(text[line_start..end].trim_end().to_string());
                    line_start = end;
                }
                _ => {
                    // No earlier opportunity: the segment overflows alone.
                    lines.push(candidate.to_string());
                    line_start = offset;
                }
            }
        }
        committed = Some(offset);
    }
    if line_start < text.len() {
        let tail = text[line_start..].trim_end();
        if !tail.is_empty() {
            lines.push(tail.to_string());
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
