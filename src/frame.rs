//! # Frame Renderer
//!
//! Draws the structural geometry of a card face: outer border, section
//! separators, power/toughness box, fuse bar, token arcs.
//!
//! Structure is always drawn first, in a single border tone with
//! anti-aliasing off. When color is requested, a full-card color field is
//! rendered separately (solid, or a left-to-right gradient for two to
//! four colors) and composited *only* onto the pixels the structural pass
//! marked: line geometry is defined once, color is a pure overlay. That
//! masking is why the structural pass must stay pixel-exact.

use crate::geometry::{FaceLayout, LayoutSpec, BORDER_THICKNESS, TOKEN_ARC_HEIGHT};
use crate::model::{LayoutCard, ManaColor, COLORLESS_RGB, MULTICOLOR_RGB};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

/// The single tone every structural line is drawn in.
pub const BORDER_RGB: (u8, u8, u8) = (0, 0, 0);
pub const WHITE_RGB: (u8, u8, u8) = (255, 255, 255);

pub(crate) fn solid_paint(rgb: (u8, u8, u8)) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgb.0, rgb.1, rgb.2, 255);
    paint.anti_alias = false;
    paint
}

pub(crate) fn fill_rect(
    pixmap: &mut Pixmap,
    transform: Transform,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    rgb: (u8, u8, u8),
) {
    if w <= 0 || h <= 0 {
        return;
    }
    if let Some(rect) = Rect::from_xywh(x as f32, y as f32, w as f32, h as f32) {
        pixmap.fill_rect(rect, &solid_paint(rgb), transform, None);
    }
}

/// Frame outline drawn as four bars just inside the rect bounds.
fn outline_rect(
    pixmap: &mut Pixmap,
    transform: Transform,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    rgb: (u8, u8, u8),
) {
    let t = BORDER_THICKNESS;
    fill_rect(pixmap, transform, x, y, w, t, rgb);
    fill_rect(pixmap, transform, x, y + h - t, w, t, rgb);
    fill_rect(pixmap, transform, x, y, t, h, rgb);
    fill_rect(pixmap, transform, x + w - t, y, t, h, rgb);
}

/// A horizontal separator whose bottom row sits on `y`, like the frame
/// lines it meets.
fn separator(pixmap: &mut Pixmap, transform: Transform, width: i32, y: i32, rgb: (u8, u8, u8)) {
    fill_rect(
        pixmap,
        transform,
        0,
        y - (BORDER_THICKNESS - 1),
        width,
        BORDER_THICKNESS,
        rgb,
    );
}

/// White card blank at the spec's dimensions.
pub fn blank_card(spec: &LayoutSpec) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(spec.card_width as u32, spec.card_height as u32)?;
    pixmap.fill(tiny_skia::Color::from_rgba8(255, 255, 255, 255));
    Some(pixmap)
}

/// Draw the monochrome structure for every face of the card.
pub fn draw_structure(pixmap: &mut Pixmap, spec: &LayoutSpec, card: &LayoutCard) {
    for face in &card.faces {
        let layout = spec.face(card.frame, face.ix);
        let transform = layout
            .placement
            .transform(spec.card_width, spec.card_height);
        draw_face_structure(pixmap, transform, &layout, face.card.has_bottom_data());
        if card.fuse_text.is_some() {
            if let Some(fuse) = layout.fuse {
                fill_rect(
                    pixmap,
                    transform,
                    0,
                    fuse.top,
                    layout.width,
                    fuse.height,
                    WHITE_RGB,
                );
                outline_rect(
                    pixmap,
                    transform,
                    0,
                    fuse.top,
                    layout.width,
                    fuse.height,
                    BORDER_RGB,
                );
            }
        }
    }
}

fn draw_face_structure(
    pixmap: &mut Pixmap,
    transform: Transform,
    layout: &FaceLayout,
    has_bottom_box: bool,
) {
    outline_rect(
        pixmap,
        transform,
        0,
        0,
        layout.width,
        layout.height,
        BORDER_RGB,
    );

    let mut boundaries = [
        layout.title.bottom(),
        layout.type_line.top,
        layout.type_line.bottom(),
        layout.rules.bottom(),
        layout.credits.bottom(),
    ];
    boundaries.sort_unstable();
    let mut previous = i32::MIN;
    for boundary in boundaries {
        if boundary != previous && boundary > 0 && boundary < layout.height {
            separator(pixmap, transform, layout.width, boundary, BORDER_RGB);
        }
        previous = boundary;
    }

    if layout.token_arc {
        token_arc(pixmap, transform, layout);
    }

    if has_bottom_box {
        let b = layout.pt_box;
        fill_rect(pixmap, transform, b.x, b.y, b.w, b.h, WHITE_RGB);
        outline_rect(pixmap, transform, b.x, b.y, b.w, b.h, BORDER_RGB);
    }
}

/// Tokens and emblems bow the line under the title into an arc: the top
/// half of a wide ellipse whose apex touches the title bar.
fn token_arc(pixmap: &mut Pixmap, transform: Transform, layout: &FaceLayout) {
    let top = (layout.title.bottom() - (BORDER_THICKNESS - 1)) as f32;
    let rx = layout.width as f32 / 2.0;
    let ry = TOKEN_ARC_HEIGHT as f32 / 2.0;
    let cx = rx;
    let cy = top + ry;
    // Two quarter-ellipse cubics (kappa approximation).
    let k = 0.5523;
    let mut pb = PathBuilder::new();
    pb.move_to(0.0, cy);
    pb.cubic_to(0.0, cy - k * ry, cx - k * rx, top, cx, top);
    pb.cubic_to(cx + k * rx, top, layout.width as f32, cy - k * ry, layout.width as f32, cy);
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width: BORDER_THICKNESS as f32,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &solid_paint(BORDER_RGB), &stroke, transform, None);
    }
}

/// The color of one vertical stripe of the color field. Zero, one and
/// five colors paint a uniform field; two to four interpolate adjacent
/// frame tints left to right, always in WUBRG order so the output is
/// deterministic.
pub(crate) fn column_color(colors: &[ManaColor], column: i32, width: i32) -> (u8, u8, u8) {
    let mut sorted = colors.to_vec();
    sorted.sort();
    sorted.dedup();
    match sorted.len() {
        0 => COLORLESS_RGB,
        1 => sorted[0].frame_rgb(),
        5 => MULTICOLOR_RGB,
        n => {
            let segments = (n - 1) as i32;
            let segment_length = (width / segments).max(1);
            let i = ((column / segment_length) as usize).min(n - 2);
            let t = (column - i as i32 * segment_length) as f32 / segment_length as f32;
            lerp_rgb(sorted[i].frame_rgb(), sorted[i + 1].frame_rgb(), t)
        }
    }
}

fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    let mix = |x: u8, y: u8| (x as f32 + t * (y as f32 - x as f32)) as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Replace every structural-tone pixel with the matching pixel of the
/// per-face color field. All other pixels are untouched. Runs before any
/// icon or text lands on the card, so only frame lines change.
pub fn color_pass(pixmap: &mut Pixmap, spec: &LayoutSpec, card: &LayoutCard) {
    let Some(mut field) = blank_card(spec) else {
        return;
    };
    for face in &card.faces {
        let layout = spec.face(card.frame, face.ix);
        let transform = layout
            .placement
            .transform(spec.card_width, spec.card_height);
        let colors = &face.card.colors;
        if matches!(colors.len(), 0 | 1 | 5) {
            fill_rect(
                &mut field,
                transform,
                0,
                0,
                layout.width,
                layout.height,
                column_color(colors, 0, layout.width),
            );
        } else {
            for column in 0..layout.width {
                fill_rect(
                    &mut field,
                    transform,
                    column,
                    0,
                    1,
                    layout.height,
                    column_color(colors, column, layout.width),
                );
            }
        }
    }

    let field_data = field.data();
    let data = pixmap.data_mut();
    for (pixel, source) in data.chunks_exact_mut(4).zip(field_data.chunks_exact(4)) {
        if pixel[..] == [BORDER_RGB.0, BORDER_RGB.1, BORDER_RGB.2, 255] {
            pixel.copy_from_slice(source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SizeClass;
    use crate::model::{layout_cards, Card};

    fn card(name: &str, type_line: &str, colors: Vec<ManaColor>) -> Card {
        Card {
            name: name.to_string(),
            type_line: type_line.to_string(),
            colors,
            ..Card::default()
        }
    }

    fn pixel(pixmap: &Pixmap, x: i32, y: i32) -> [u8; 4] {
        let ix = (y as usize * pixmap.width() as usize + x as usize) * 4;
        pixmap.data()[ix..ix + 4].try_into().unwrap()
    }

    #[test]
    fn structure_draws_border_tone_lines() {
        let spec = LayoutSpec::new(SizeClass::Standard);
        let lc = layout_cards(&card("Test", "Instant", vec![]), false, None)
            .remove(0);
        let mut pixmap = blank_card(&spec).unwrap();
        draw_structure(&mut pixmap, &spec, &lc);

        assert_eq!(pixel(&pixmap, 0, 0), [0, 0, 0, 255], "outer border");
        assert_eq!(
            pixel(&pixmap, 375, 90),
            [0, 0, 0, 255],
            "title separator bottom row"
        );
        assert_eq!(
            pixel(&pixmap, 375, 300),
            [255, 255, 255, 255],
            "art box stays white"
        );
    }

    #[test]
    fn color_mask_recolors_exactly_the_line_pixels() {
        let spec = LayoutSpec::new(SizeClass::Standard);
        let lc = layout_cards(
            &card("Test", "Instant", vec![ManaColor::U, ManaColor::R]),
            false,
            None,
        )
        .remove(0);
        let mut pixmap = blank_card(&spec).unwrap();
        draw_structure(&mut pixmap, &spec, &lc);

        let before = pixmap.data().to_vec();
        color_pass(&mut pixmap, &spec, &lc);
        let after = pixmap.data();

        let width = spec.card_width;
        let mut recolored = 0usize;
        for (ix, (old, new)) in before
            .chunks_exact(4)
            .zip(after.chunks_exact(4))
            .enumerate()
        {
            if old == [0, 0, 0, 255] {
                let column = (ix as i32) % width;
                let expected = column_color(&[ManaColor::U, ManaColor::R], column, width);
                assert_eq!(
                    [new[0], new[1], new[2], new[3]],
                    [expected.0, expected.1, expected.2, 255],
                    "line pixel at column {} takes the gradient color",
                    column
                );
                recolored += 1;
            } else {
                assert_eq!(old, new, "non-line pixel must not change");
            }
        }
        assert!(recolored > 0, "a frame has line pixels");
    }

    #[test]
    fn gradient_endpoints_are_the_frame_tints() {
        let colors = [ManaColor::U, ManaColor::R];
        assert_eq!(column_color(&colors, 0, 750), ManaColor::U.frame_rgb());
        let (r, ..) = column_color(&colors, 749, 750);
        // The last column is one interpolation step away from pure red.
        assert!(r >= 0xdd, "right edge approaches the red tint, got {}", r);
    }

    #[test]
    fn uniform_fields_for_zero_one_and_five_colors() {
        assert_eq!(column_color(&[], 10, 750), COLORLESS_RGB);
        assert_eq!(
            column_color(&[ManaColor::G], 10, 750),
            ManaColor::G.frame_rgb()
        );
        assert_eq!(column_color(&ManaColor::ALL, 10, 750), MULTICOLOR_RGB);
    }
}
