//! # Card Rendering
//!
//! Per-card orchestration: structure first, then the color overlay, then
//! backdrop and set icon, and text last, fitted with the text module and
//! filled as glyph paths. One [`LayoutCard`] in, one bitmap out.

use crate::error::ProxyError;
use crate::font::{Font, FontStore};
use crate::frame::{blank_card, color_pass, draw_structure};
use crate::geometry::{
    FaceLayout, LayoutSpec, RULES_FONT_SIZE, SEPARATOR, TITLE_FONT_SIZE, TYPE_FONT_SIZE,
    ICON_SIZE,
};
use crate::icon::SetIcon;
use crate::model::{Diagnostic, DiagnosticKind, Face, FrameVariant, LayoutCard};
use crate::text::{
    centered_baseline, face_symbol_char, fit_multi_line, fit_single_line, land_symbol_char,
    replace_symbols, ACORN_CHAR, PAINTBRUSH_CHAR, PLANESWALKER_CHAR,
};
use tiny_skia::{FillRule, Paint, Pixmap, Transform};

const TEXT_RGB: (u8, u8, u8) = (0, 0, 0);
const BACKDROP_RGB: (u8, u8, u8) = (205, 205, 205);

/// The per-card drawing switches from the configuration surface.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Color the frame lines instead of leaving them black.
    pub color: bool,
    /// Replace `{symbol}` escapes with symbol-font glyphs.
    pub symbols: bool,
    /// Print basic lands without the big mana-symbol backdrop.
    pub full_art_lands: bool,
    /// Stamp non tournament-legal cards with the acorn mark.
    pub acorn_stamp: bool,
}

/// Render one card (or one double-faced card face) to a bitmap.
pub fn render_card(
    card: &LayoutCard,
    spec: &LayoutSpec,
    fonts: &FontStore,
    icon: Option<&SetIcon>,
    options: &RenderOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Pixmap, ProxyError> {
    let mut pixmap = blank_card(spec)
        .ok_or_else(|| ProxyError::Render("cannot allocate card bitmap".to_string()))?;

    draw_structure(&mut pixmap, spec, card);
    if options.color {
        color_pass(&mut pixmap, spec, card);
    }

    for face in &card.faces {
        let layout = spec.face(card.frame, face.ix);
        let transform = layout
            .placement
            .transform(spec.card_width, spec.card_height);

        if !options.full_art_lands {
            draw_backdrop(&mut pixmap, transform, &layout, card.frame, face, fonts);
        }

        let icon_here = icon
            .filter(|_| layout.has_icon_slot)
            .filter(|_| !(card.frame == FrameVariant::Adventure && face.ix == 1));
        if let Some(icon) = icon_here {
            icon.paste(&mut pixmap, transform, layout.icon_center);
        }

        draw_face_text(
            &mut pixmap,
            transform,
            spec,
            &layout,
            card,
            face,
            fonts,
            icon_here.is_some(),
            options,
            diagnostics,
        );
    }

    if let Some(fuse_text) = &card.fuse_text {
        draw_fuse_text(&mut pixmap, spec, fonts, fuse_text);
    }

    Ok(pixmap)
}

fn draw_text_run(
    pixmap: &mut Pixmap,
    transform: Transform,
    font: &Font,
    text: &str,
    size: f32,
    baseline_x: f32,
    baseline_y: f32,
    rgb: (u8, u8, u8),
) {
    if text.is_empty() {
        return;
    }
    let Some(path) = font.text_path(text, size, baseline_x, baseline_y) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgb.0, rgb.1, rgb.2, 255);
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
}

#[allow(clippy::too_many_arguments)]
fn draw_face_text(
    pixmap: &mut Pixmap,
    transform: Transform,
    spec: &LayoutSpec,
    layout: &FaceLayout,
    card: &LayoutCard,
    face: &Face,
    fonts: &FontStore,
    has_icon: bool,
    options: &RenderOptions,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let title_metrics = &fonts.title.metrics;
    let rules_metrics = &fonts.rules.metrics;

    // ── Title line: face symbol, name, mana cost ──────────────────
    let is_token_frame = matches!(
        card.frame,
        FrameVariant::Token | FrameVariant::TextlessToken | FrameVariant::Emblem
    );
    let mut name_left = SEPARATOR as f32;
    let mut name_max_width = layout.width as f32 - 2.0 * SEPARATOR as f32;

    if !is_token_frame {
        let cost = replace_symbols(&face.card.mana_cost, options.symbols);
        if !cost.is_empty() {
            // Keep mana readable: budget at least enough width that
            // sixteen symbols span the card, growing up to half the face.
            let floor = (spec.card_width / 16) as f32 * cost.chars().count() as f32;
            let max_mana_width = (layout.width as f32 / 2.0).max(floor);
            let size = fit_single_line(title_metrics, &cost, max_mana_width, TITLE_FONT_SIZE);
            let width = title_metrics.text_width(&cost, size);
            let x = layout.width as f32 - SEPARATOR as f32 - width;
            let baseline = centered_baseline(title_metrics, size, layout.title.top, layout.title.height);
            draw_text_run(pixmap, transform, &fonts.title, &cost, size, x, baseline, TEXT_RGB);
            name_max_width = x - name_left - SEPARATOR as f32;
        }
    }

    // The indicator glyph (double-faced, flip, acorn) is always drawn at
    // full size; the name shrinks around it.
    let indicator = if card.acorn && options.acorn_stamp && face.symbol.is_none() {
        Some(ACORN_CHAR)
    } else {
        face.symbol.map(face_symbol_char)
    };
    if let Some(glyph) = indicator {
        let text = format!("{} ", glyph);
        let baseline = centered_baseline(
            title_metrics,
            TITLE_FONT_SIZE,
            layout.title.top,
            layout.title.height,
        );
        draw_text_run(
            pixmap,
            transform,
            &fonts.title,
            &text,
            TITLE_FONT_SIZE,
            name_left,
            baseline,
            TEXT_RGB,
        );
        let used = title_metrics.text_width(&text, TITLE_FONT_SIZE);
        name_left += used;
        name_max_width -= used;
    }

    let display_name = if face.ix == 0 {
        card.flavor_name
            .as_deref()
            .unwrap_or(face.card.name.as_str())
    } else {
        face.card.name.as_str()
    };
    let name_size = fit_single_line(title_metrics, display_name, name_max_width, TITLE_FONT_SIZE);
    let name_baseline =
        centered_baseline(title_metrics, name_size, layout.title.top, layout.title.height);
    let name_x = if is_token_frame {
        // Tokens and emblems carry no cost and center their title.
        let width = title_metrics.text_width(display_name, name_size);
        (layout.width as f32 - width) / 2.0
    } else {
        name_left
    };
    draw_text_run(
        pixmap,
        transform,
        &fonts.title,
        display_name,
        name_size,
        name_x,
        name_baseline,
        TEXT_RGB,
    );

    // With a flavor name in the title, the oracle name still has to be
    // findable: it goes small and centered at the top of the art box.
    let oracle_overlay = card.flavor_name.is_some()
        && face.ix == 0
        && !matches!(
            card.frame,
            FrameVariant::Split | FrameVariant::Fuse | FrameVariant::Aftermath | FrameVariant::Flip
        );
    if oracle_overlay {
        let size = RULES_FONT_SIZE;
        let width = title_metrics.text_width(&face.card.name, size);
        let x = (layout.width as f32 - width) / 2.0;
        let baseline =
            layout.art.top as f32 + SEPARATOR as f32 + title_metrics.cap_height_px(size);
        draw_text_run(
            pixmap,
            transform,
            &fonts.title,
            &face.card.name,
            size,
            x,
            baseline,
            TEXT_RGB,
        );
    }

    // ── Type line, leaving room for the set icon ──────────────────
    if !face.card.type_line.is_empty() {
        let icon_margin = if has_icon { SEPARATOR + ICON_SIZE } else { 0 };
        let max_width = (layout.width - 2 * SEPARATOR - icon_margin) as f32;
        let size = fit_single_line(title_metrics, &face.card.type_line, max_width, TYPE_FONT_SIZE);
        let baseline = centered_baseline(
            title_metrics,
            size,
            layout.type_line.top,
            layout.type_line.height,
        );
        draw_text_run(
            pixmap,
            transform,
            &fonts.title,
            &face.card.type_line,
            size,
            SEPARATOR as f32,
            baseline,
            TEXT_RGB,
        );
    }

    // ── Rules box ─────────────────────────────────────────────────
    let mut paragraphs: Vec<String> = Vec::new();
    if let Some(reminder) = face.card.color_indicator_reminder() {
        paragraphs.push(reminder);
    }
    for line in face.card.rules_lines() {
        paragraphs.push(replace_symbols(line, options.symbols));
    }
    if !paragraphs.is_empty() && layout.rules.height > 2 * SEPARATOR {
        let box_w = (layout.rules_w - 2 * SEPARATOR) as f32;
        let box_h = (layout.rules.height - 2 * SEPARATOR) as f32;
        let fit = fit_multi_line(rules_metrics, &paragraphs, box_w, box_h, RULES_FONT_SIZE);
        if fit.clipped {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::RenderOverflow,
                &face.card.name,
                "rules text does not fit at minimum size; clipping",
            ));
        }
        let x = (layout.rules_x + SEPARATOR) as f32;
        let bottom = layout.rules.bottom() as f32;
        let mut baseline =
            layout.rules.top as f32 + SEPARATOR as f32 + rules_metrics.ascent(fit.font_size);
        for line in &fit.lines {
            if baseline > bottom {
                break;
            }
            draw_text_run(
                pixmap,
                transform,
                &fonts.rules,
                line,
                fit.font_size,
                x,
                baseline,
                TEXT_RGB,
            );
            baseline += rules_metrics.line_height(fit.font_size);
        }
    }

    // ── Bottom box: power/toughness or loyalty ────────────────────
    if face.card.has_bottom_data() {
        let text = match (&face.card.power, &face.card.toughness, &face.card.loyalty) {
            (Some(p), Some(t), _) => format!("{}/{}", p, t),
            (_, _, Some(l)) => l.clone(),
            _ => String::new(),
        };
        let b = layout.pt_box;
        let size = fit_single_line(
            title_metrics,
            &text,
            (b.w - 2 * SEPARATOR) as f32,
            TITLE_FONT_SIZE,
        );
        let width = title_metrics.text_width(&text, size);
        let x = b.x as f32 + (b.w as f32 - width) / 2.0;
        let baseline = centered_baseline(title_metrics, size, b.y, b.h);
        draw_text_run(pixmap, transform, &fonts.title, &text, size, x, baseline, TEXT_RGB);
    }

    // ── Credits line ──────────────────────────────────────────────
    if layout.has_credits && layout.credits.height > 0 {
        let credits = match &face.card.artist {
            Some(artist) => format!("{} {} - proxyprint", PAINTBRUSH_CHAR, artist),
            None => format!("{} proxyprint", PAINTBRUSH_CHAR),
        };
        let size = fit_single_line(
            rules_metrics,
            &credits,
            (layout.width - 2 * SEPARATOR) as f32,
            spec.credits_font_size(),
        );
        let baseline = centered_baseline(
            rules_metrics,
            size,
            layout.credits.top,
            layout.credits.height,
        );
        draw_text_run(
            pixmap,
            transform,
            &fonts.rules,
            &credits,
            size,
            SEPARATOR as f32,
            baseline,
            TEXT_RGB,
        );
    }
}

/// Emblems and basic lands get a large faint symbol as their artwork.
fn draw_backdrop(
    pixmap: &mut Pixmap,
    transform: Transform,
    layout: &FaceLayout,
    frame: FrameVariant,
    face: &Face,
    fonts: &FontStore,
) {
    let Some(rect) = layout.backdrop else {
        return;
    };
    let glyph = match frame {
        FrameVariant::Emblem => Some(PLANESWALKER_CHAR),
        FrameVariant::Land => land_symbol_char(&face.card.name),
        _ => None,
    };
    let Some(glyph) = glyph else {
        return;
    };
    let metrics = &fonts.title.metrics;
    let size = rect.h as f32;
    let text = glyph.to_string();
    let width = metrics.text_width(&text, size);
    let x = rect.x as f32 + (rect.w as f32 - width) / 2.0;
    let baseline = centered_baseline(metrics, size, rect.y, rect.h);
    draw_text_run(
        pixmap,
        transform,
        &fonts.title,
        &text,
        size,
        x,
        baseline,
        BACKDROP_RGB,
    );
}

/// The fuse reminder runs across both halves in one strip, so it is
/// drawn once in the landscape coordinate space spanning the whole card.
fn draw_fuse_text(pixmap: &mut Pixmap, spec: &LayoutSpec, fonts: &FontStore, text: &str) {
    let layout = spec.face(FrameVariant::Fuse, 0);
    let Some(fuse) = layout.fuse else {
        return;
    };
    let transform = crate::geometry::FacePlacement::Quarter { offset: 0 }
        .transform(spec.card_width, spec.card_height);
    let strip_width = spec.card_height as f32;
    let metrics = &fonts.rules.metrics;
    let size = fit_single_line(
        metrics,
        text,
        strip_width - 2.0 * SEPARATOR as f32,
        RULES_FONT_SIZE,
    );
    let width = metrics.text_width(text, size);
    let x = (strip_width - width) / 2.0;
    let baseline = centered_baseline(metrics, size, fuse.top, fuse.height);
    draw_text_run(pixmap, transform, &fonts.rules, text, size, x, baseline, TEXT_RGB);
}
