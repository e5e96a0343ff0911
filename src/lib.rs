//! # proxyprint
//!
//! A printable-proxy generator for trading card games: a plain-text
//! decklist in, print-ready PNG pages out.
//!
//! Card names (including tokens and emblems) are resolved against the
//! Scryfall card database through a persistent local cache, each card is
//! drawn as a stylized monochrome-or-colored frame with fitted text, and
//! the results are tiled onto A4 or Letter sheets.
//!
//! ## Pipeline
//!
//! ```text
//! decklist text
//!       ↓
//!   [decklist]  — line grammar → CardRequest
//!       ↓
//!   [resolve]   — cache + Scryfall → Card (skip-and-continue)
//!       ↓
//!   [geometry]  — frame variant + size class → face geometry
//!       ↓
//!   [frame/render] — structure, color mask, fitted text → card bitmap
//!       ↓
//!   [page]      — grid tiling → page bitmaps
//! ```
//!
//! The flow is strictly one-way and synchronous; the only blocking points
//! are the Scryfall calls inside the resolver. Per-card problems never
//! abort a run; they accumulate as [`Diagnostic`]s in the output.

pub mod cache;
pub mod decklist;
pub mod error;
pub mod font;
pub mod frame;
pub mod geometry;
pub mod icon;
pub mod model;
pub mod page;
pub mod render;
pub mod resolve;
pub mod scryfall;
pub mod text;

pub use error::ProxyError;
pub use geometry::{LayoutSpec, SizeClass};
pub use model::{Card, CardKind, CardRequest, Diagnostic, DiagnosticKind, FrameVariant};
pub use page::PageFormat;
pub use render::RenderOptions;
pub use resolve::ResolveOptions;

use crate::cache::CardCache;
use crate::font::FontStore;
use crate::icon::SetIcon;
use crate::page::PageOptions;
use crate::resolve::Resolver;
use crate::scryfall::ScryfallClient;
use std::path::PathBuf;
use tiny_skia::Pixmap;

/// Everything one run needs: drawing switches, resolution switches, page
/// layout, and the file locations.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub render: RenderOptions,
    pub resolve: ResolveOptions,
    pub page: PageOptions,
    /// Set icon source: a file path or a `data:image/...` URI.
    pub icon_source: Option<String>,
    pub cache_dir: PathBuf,
    pub title_font: PathBuf,
    pub rules_font: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            render: RenderOptions {
                symbols: true,
                acorn_stamp: true,
                ..RenderOptions::default()
            },
            resolve: ResolveOptions::default(),
            page: PageOptions::default(),
            icon_source: None,
            cache_dir: PathBuf::from("cardcache"),
            title_font: PathBuf::from("fonts/title.ttf"),
            rules_font: PathBuf::from("fonts/rules.ttf"),
        }
    }
}

/// The result of a run: page bitmaps ready to save, the number of card
/// images placed, and every per-card problem encountered.
pub struct RunOutput {
    pub pages: Vec<Pixmap>,
    pub cards_placed: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the whole pipeline on a decklist.
///
/// Fatal conditions (missing fonts, unreadable icon, unwritable cache)
/// surface as [`ProxyError`]; everything per-card lands in
/// [`RunOutput::diagnostics`].
pub fn generate(decklist: &str, config: &RunConfig) -> Result<RunOutput, ProxyError> {
    let fonts = FontStore::load(&config.title_font, &config.rules_font)?;
    let icon = config
        .icon_source
        .as_deref()
        .map(SetIcon::load)
        .transpose()?;
    let spec = LayoutSpec::new(config.page.size_class);

    let parse = decklist::parse_decklist(decklist);
    let mut diagnostics = parse.diagnostics;

    let client = ScryfallClient::new();
    let mut cache = CardCache::open(&config.cache_dir);
    let mut resolver = Resolver::new(&client, &mut cache);
    let deck = resolver.resolve(&parse.requests, config.resolve);
    diagnostics.extend(deck.diagnostics);
    cache.save()?;

    let mut images: Vec<Pixmap> = Vec::new();
    for entry in &deck.entries {
        let bitmap = render::render_card(
            &entry.layout,
            &spec,
            &fonts,
            icon.as_ref(),
            &config.render,
            &mut diagnostics,
        )?;
        for _ in 1..entry.copies {
            images.push(bitmap.clone());
        }
        images.push(bitmap);
    }
    let cards_placed = images.len();

    let pages = page::paginate(&images, &config.page)?;
    Ok(RunOutput {
        pages,
        cards_placed,
        diagnostics,
    })
}
