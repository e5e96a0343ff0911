//! # Pagination
//!
//! Tiles rendered card bitmaps onto printable pages: left to right, top
//! to bottom, new page when full, input order preserved. The grid is
//! sized from page dimensions against card dimensions (spacing between
//! cards counted, outer margins centered), so A4 and Letter both hold
//! 3×3 standard cards and 4×4 small ones.

use crate::error::ProxyError;
use crate::geometry::SizeClass;
use std::path::{Path, PathBuf};
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// Blank margin between cards, in pixels at 300 DPI.
pub const CARD_SPACING: i32 = 40;
/// Near-zero spacing for cut-friendly sheets.
pub const CARD_SPACING_TIGHT: i32 = 3;
/// Small cards print at three quarters of standard size.
const SMALL_SCALE: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    A4,
    Letter,
}

impl PageFormat {
    /// Page size in pixels at 300 DPI (A4 is 8.25in x 11.75in, Letter
    /// 8.5in x 11in).
    pub fn dimensions(self) -> (i32, i32) {
        match self {
            PageFormat::A4 => (2475, 3525),
            PageFormat::Letter => (2550, 3300),
        }
    }
}

impl std::str::FromStr for PageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<PageFormat, String> {
        match s.to_ascii_lowercase().as_str() {
            "a4" | "a4paper" => Ok(PageFormat::A4),
            "letter" => Ok(PageFormat::Letter),
            other => Err(format!("unknown page format '{}' (expected a4 or letter)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageOptions {
    pub format: PageFormat,
    /// Inter-card blank margin on (default) or off.
    pub spacing: bool,
    pub size_class: SizeClass,
}

impl Default for PageOptions {
    fn default() -> Self {
        PageOptions {
            format: PageFormat::A4,
            spacing: true,
            size_class: SizeClass::Standard,
        }
    }
}

/// Tile card bitmaps into page bitmaps.
pub fn paginate(cards: &[Pixmap], options: &PageOptions) -> Result<Vec<Pixmap>, ProxyError> {
    let (page_w, page_h) = options.format.dimensions();
    let spacing = if options.spacing {
        CARD_SPACING
    } else {
        CARD_SPACING_TIGHT
    };
    let scale = match options.size_class {
        SizeClass::Small => SMALL_SCALE,
        _ => 1.0,
    };
    paginate_onto(cards, page_w, page_h, spacing, scale)
}

/// How many cells of `card` (plus spacing between cells) fit along `page`.
fn grid_count(page: i32, card: i32, spacing: i32) -> i32 {
    ((page + spacing) / (card + spacing)).max(1)
}

pub(crate) fn paginate_onto(
    cards: &[Pixmap],
    page_w: i32,
    page_h: i32,
    spacing: i32,
    scale: f32,
) -> Result<Vec<Pixmap>, ProxyError> {
    if cards.is_empty() {
        return Ok(Vec::new());
    }

    let card_w = (cards[0].width() as f32 * scale).round() as i32;
    let card_h = (cards[0].height() as f32 * scale).round() as i32;
    let cols = grid_count(page_w, card_w, spacing);
    let rows = grid_count(page_h, card_h, spacing);
    let per_page = (cols * rows) as usize;

    // Whatever the grid does not use is split evenly into outer margins
    // (slightly negative slack crops the outermost cards by a hair
    // rather than dropping a whole row).
    let x0 = (page_w - (cols * (card_w + spacing) - spacing)) / 2;
    let y0 = (page_h - (rows * (card_h + spacing) - spacing)) / 2;

    let paint = PixmapPaint {
        quality: if scale < 1.0 {
            FilterQuality::Bilinear
        } else {
            FilterQuality::Nearest
        },
        ..PixmapPaint::default()
    };

    let mut pages = Vec::new();
    for batch in cards.chunks(per_page) {
        let mut page = Pixmap::new(page_w as u32, page_h as u32)
            .ok_or_else(|| ProxyError::Render("cannot allocate page bitmap".to_string()))?;
        page.fill(tiny_skia::Color::from_rgba8(255, 255, 255, 255));

        for (slot, card) in batch.iter().enumerate() {
            let col = (slot as i32) % cols;
            let row = (slot as i32) / cols;
            let x = x0 + col * (card_w + spacing);
            let y = y0 + row * (card_h + spacing);
            let transform = Transform::from_translate(x as f32, y as f32)
                .pre_concat(Transform::from_scale(scale, scale));
            page.draw_pixmap(0, 0, card.as_ref(), &paint, transform, None);
        }
        pages.push(page);
    }
    Ok(pages)
}

/// Write pages as numbered PNGs under `dir`. Returns the written paths.
pub fn save_pages(pages: &[Pixmap], dir: &Path) -> Result<Vec<PathBuf>, ProxyError> {
    std::fs::create_dir_all(dir).map_err(|source| ProxyError::Output {
        path: dir.display().to_string(),
        source,
    })?;
    let mut written = Vec::with_capacity(pages.len());
    for (ix, page) in pages.iter().enumerate() {
        let path = dir.join(format!("{:02}.png", ix + 1));
        let encoded = page
            .encode_png()
            .map_err(|e| ProxyError::Render(format!("PNG encode failed: {}", e)))?;
        std::fs::write(&path, encoded).map_err(|source| ProxyError::Output {
            path: path.display().to_string(),
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tinted(w: u32, h: u32, red: u8) -> Pixmap {
        let mut pixmap = Pixmap::new(w, h).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(red, 0, 0, 255));
        pixmap
    }

    fn pixel(pixmap: &Pixmap, x: i32, y: i32) -> [u8; 4] {
        let ix = (y as usize * pixmap.width() as usize + x as usize) * 4;
        pixmap.data()[ix..ix + 4].try_into().unwrap()
    }

    #[test]
    fn standard_grids_are_three_by_three() {
        let (w, h) = PageFormat::A4.dimensions();
        assert_eq!(grid_count(w, 750, CARD_SPACING), 3);
        assert_eq!(grid_count(h, 1050, CARD_SPACING), 3);
        let (w, h) = PageFormat::Letter.dimensions();
        assert_eq!(grid_count(w, 750, CARD_SPACING), 3);
        assert_eq!(grid_count(h, 1050, CARD_SPACING), 3);
    }

    #[test]
    fn small_grids_are_four_by_four() {
        let card_w = (750.0_f32 * 0.75).round() as i32;
        let card_h = (1050.0_f32 * 0.75).round() as i32;
        for format in [PageFormat::A4, PageFormat::Letter] {
            let (w, h) = format.dimensions();
            assert_eq!(grid_count(w, card_w, CARD_SPACING), 4);
            assert_eq!(grid_count(h, card_h, CARD_SPACING), 4);
        }
    }

    #[test]
    fn order_is_preserved_across_page_breaks() {
        // A page that holds exactly two cards: [A, A, B] must become
        // page 1 = [A, A], page 2 = [B].
        let a = tinted(10, 14, 100);
        let b = tinted(10, 14, 200);
        let pages = paginate_onto(&[a.clone(), a, b], 25, 16, 1, 1.0).unwrap();
        assert_eq!(pages.len(), 2);

        let page1 = &pages[0];
        let x0 = (25 - (2 * 11 - 1)) / 2;
        let y0 = (16 - 14) / 2;
        assert_eq!(pixel(page1, x0 + 5, y0 + 7)[0], 100, "slot 1 holds the first A");
        assert_eq!(pixel(page1, x0 + 11 + 5, y0 + 7)[0], 100, "slot 2 holds the second A");
        assert_eq!(pixel(&pages[1], x0 + 5, y0 + 7)[0], 200, "B starts page 2");
        assert_eq!(
            pixel(&pages[1], x0 + 11 + 5, y0 + 7),
            [255, 255, 255, 255],
            "the empty slot stays white"
        );
    }

    #[test]
    fn empty_input_produces_no_pages() {
        let pages = paginate(&[], &PageOptions::default()).unwrap();
        assert!(pages.is_empty());
    }
}
