//! Integration tests for the proxy pipeline.
//!
//! These exercise the full path from decklist text to page bitmaps
//! without touching the network (inline token specs and pre-seeded
//! caches) and without font files (structure, color masking and
//! pagination are font-free; text fitting has its own unit tests).

use proxyprint::cache::CardCache;
use proxyprint::decklist::parse_decklist;
use proxyprint::frame::{blank_card, color_pass, draw_structure};
use proxyprint::geometry::{LayoutSpec, SizeClass, CARD_H, CARD_W};
use proxyprint::model::{layout_cards, Card, FrameVariant, ManaColor};
use proxyprint::page::{paginate, PageFormat, PageOptions};
use proxyprint::resolve::{ResolveOptions, Resolver};
use proxyprint::scryfall::ScryfallClient;
use std::time::Duration;
use tiny_skia::Pixmap;

// ─── Helpers ────────────────────────────────────────────────────

fn offline_client() -> ScryfallClient {
    // Nothing listens here; any accidental network call fails fast and
    // shows up as a diagnostic instead of hanging the test.
    ScryfallClient::with_base_url("http://127.0.0.1:1")
}

fn temp_cache(tag: &str) -> CardCache {
    let dir = std::env::temp_dir().join(format!(
        "proxyprint-integration-{}-{}",
        tag,
        std::process::id()
    ));
    CardCache::open(&dir)
}

fn instant(name: &str, colors: Vec<ManaColor>) -> Card {
    Card {
        name: name.to_string(),
        type_line: "Instant".to_string(),
        mana_cost: colors.iter().map(|c| format!("{{{}}}", c.letter())).collect(),
        oracle_text: format!("{} does something.", name),
        colors,
        ..Card::default()
    }
}

fn pixel(pixmap: &Pixmap, x: i32, y: i32) -> [u8; 4] {
    let ix = (y as usize * pixmap.width() as usize + x as usize) * 4;
    pixmap.data()[ix..ix + 4].try_into().unwrap()
}

fn render_structure(card: &Card) -> Pixmap {
    let spec = LayoutSpec::new(SizeClass::Standard);
    let lc = layout_cards(card, false, None).remove(0);
    let mut pixmap = blank_card(&spec).expect("card bitmap");
    draw_structure(&mut pixmap, &spec, &lc);
    pixmap
}

// ─── Decklist to deck ───────────────────────────────────────────

#[test]
fn test_card_count_matches_quantities_minus_skips() {
    let decklist = "\
2 Shock
// a comment line
3x Counterspell
1 Unresolvable Nonsense
bad line count 0x # not really, this parses as a name
";
    let parse = parse_decklist(decklist);
    assert_eq!(parse.requested_count(), 7);

    let client = offline_client();
    let mut cache = temp_cache("count");
    cache.store_card("Shock", instant("Shock", vec![ManaColor::R]));
    cache.store_card("Counterspell", instant("Counterspell", vec![ManaColor::U]));
    cache.store_card(
        "bad line count 0x",
        instant("bad line count 0x", vec![]),
    );
    let mut resolver = Resolver::new(&client, &mut cache).with_courtesy_delay(Duration::ZERO);
    let deck = resolver.resolve(&parse.requests, ResolveOptions::default());

    // One request (the nonsense name) is skipped; the rest survive with
    // their quantities.
    let placed: u32 = deck.entries.iter().map(|e| e.copies).sum();
    assert_eq!(placed, 6);
    assert_eq!(deck.diagnostics.len(), 1);
}

#[test]
fn test_marit_lage_line_end_to_end() {
    let line = "1x Marit Lage (token) Legendary; 20/20; B; Avatar; Creature; Flying, indestructible [Marit Lage]";
    let parse = parse_decklist(line);
    assert!(parse.diagnostics.is_empty());

    let client = offline_client();
    let mut cache = temp_cache("marit");
    let mut resolver = Resolver::new(&client, &mut cache).with_courtesy_delay(Duration::ZERO);
    let deck = resolver.resolve(&parse.requests, ResolveOptions::default());

    assert!(deck.diagnostics.is_empty(), "{:?}", deck.diagnostics);
    assert_eq!(deck.entries.len(), 1);
    let layout = &deck.entries[0].layout;
    assert_eq!(layout.frame, FrameVariant::Token);
    let card = &layout.faces[0].card;
    assert_eq!(card.name, "Marit Lage");
    assert_eq!(card.power.as_deref(), Some("20"));
    assert_eq!(card.toughness.as_deref(), Some("20"));
    assert_eq!(card.colors, vec![ManaColor::B]);
    assert!(card.type_line.contains("Creature"));
    assert!(card.type_line.contains("Avatar"));
    assert!(card.oracle_text.contains("Flying"));
    assert!(card.oracle_text.contains("indestructible"));

    // And the token renders: structure only, no fonts needed.
    let spec = LayoutSpec::new(SizeClass::Standard);
    let mut pixmap = blank_card(&spec).unwrap();
    draw_structure(&mut pixmap, &spec, layout);
    assert_eq!(pixel(&pixmap, 0, 0), [0, 0, 0, 255]);
}

// ─── Frame rendering ────────────────────────────────────────────

#[test]
fn test_structure_is_monochrome() {
    let pixmap = render_structure(&instant("Shock", vec![ManaColor::R]));
    for chunk in pixmap.data().chunks_exact(4) {
        assert!(
            chunk == [0, 0, 0, 255] || chunk == [255, 255, 255, 255],
            "structural pass must stay black and white, got {:?}",
            chunk
        );
    }
}

#[test]
fn test_color_mask_is_pixel_exact_on_a_two_color_card() {
    let spec = LayoutSpec::new(SizeClass::Standard);
    let card = instant("Izzet Charm", vec![ManaColor::U, ManaColor::R]);
    let lc = layout_cards(&card, false, None).remove(0);

    let mut pixmap = blank_card(&spec).unwrap();
    draw_structure(&mut pixmap, &spec, &lc);
    let before = pixmap.data().to_vec();
    color_pass(&mut pixmap, &spec, &lc);

    let mut changed = 0usize;
    for (old, new) in before.chunks_exact(4).zip(pixmap.data().chunks_exact(4)) {
        if old == [0, 0, 0, 255] {
            assert_ne!(new, [0, 0, 0, 255], "line pixels are recolored");
            changed += 1;
        } else {
            assert_eq!(old, new, "non-line pixels are untouched");
        }
    }
    assert!(changed > 1000, "a frame recolors plenty of pixels");
}

#[test]
fn test_split_card_renders_both_halves_rotated() {
    let mut card = Card {
        name: "Fire // Ice".to_string(),
        layout: "split".to_string(),
        type_line: "Instant // Instant".to_string(),
        ..Card::default()
    };
    card.card_faces = vec![
        instant("Fire", vec![ManaColor::R]),
        instant("Ice", vec![ManaColor::U]),
    ];
    let cards = layout_cards(&card, false, None);
    assert_eq!(cards.len(), 1, "split halves share one bitmap");
    let lc = &cards[0];
    assert_eq!(lc.frame, FrameVariant::Split);

    let spec = LayoutSpec::new(SizeClass::Standard);
    let mut pixmap = blank_card(&spec).unwrap();
    draw_structure(&mut pixmap, &spec, lc);

    // The halves' shared boundary: face 0's outline lands just above
    // card row 525, face 1's just below.
    assert_eq!(pixel(&pixmap, CARD_W / 2, CARD_H / 2 - 2), [0, 0, 0, 255]);
    assert_eq!(pixel(&pixmap, CARD_W / 2, CARD_H / 2 + 2), [0, 0, 0, 255]);
    // Each half's title separator runs vertically in card space: face 0
    // title band ends 90 face-pixels in, which is 90 pixels from the
    // card's right edge.
    assert_eq!(pixel(&pixmap, CARD_W - 90, 100), [0, 0, 0, 255]);

    // Color masking colors each half from its own cost.
    color_pass(&mut pixmap, &spec, lc);
    let top = pixel(&pixmap, CARD_W - 90, 100);
    let bottom = pixel(&pixmap, CARD_W - 90, CARD_H / 2 + 100);
    assert_eq!(
        [top[0], top[1], top[2]],
        [0xe1, 0x3c, 0x32],
        "the first half is red"
    );
    assert_eq!(
        [bottom[0], bottom[1], bottom[2]],
        [0x12, 0x7d, 0xb4],
        "the second half is blue"
    );
}

#[test]
fn test_transform_card_yields_two_bitmaps() {
    let mut card = Card {
        name: "Delver of Secrets // Insectile Aberration".to_string(),
        layout: "transform".to_string(),
        type_line: "Creature".to_string(),
        ..Card::default()
    };
    card.card_faces = vec![
        instant("Delver of Secrets", vec![ManaColor::U]),
        instant("Insectile Aberration", vec![ManaColor::U]),
    ];
    let cards = layout_cards(&card, false, None);
    assert_eq!(cards.len(), 2);
    for lc in &cards {
        let spec = LayoutSpec::new(SizeClass::Standard);
        let mut pixmap = blank_card(&spec).unwrap();
        draw_structure(&mut pixmap, &spec, lc);
        assert_eq!(pixel(&pixmap, 0, 0), [0, 0, 0, 255]);
    }
}

// ─── Pagination ─────────────────────────────────────────────────

#[test]
fn test_ten_cards_fill_two_a4_pages() {
    let spec = LayoutSpec::new(SizeClass::Standard);
    let lc = layout_cards(&instant("Shock", vec![ManaColor::R]), false, None).remove(0);
    let mut card = blank_card(&spec).unwrap();
    draw_structure(&mut card, &spec, &lc);

    let cards: Vec<Pixmap> = std::iter::repeat(card).take(10).collect();
    let pages = paginate(
        &cards,
        &PageOptions {
            format: PageFormat::A4,
            spacing: true,
            size_class: SizeClass::Standard,
        },
    )
    .unwrap();
    assert_eq!(pages.len(), 2, "9 cards per A4 page, so 10 cards need 2");

    let (page_w, page_h) = PageFormat::A4.dimensions();
    assert_eq!(pages[0].width(), page_w as u32);
    assert_eq!(pages[0].height(), page_h as u32);

    // The first grid slot holds a card: its outer border is black.
    let x0 = (page_w - (3 * (CARD_W + 40) - 40)) / 2;
    let y0 = (page_h - (3 * (CARD_H + 40) - 40)) / 2;
    assert_eq!(pixel(&pages[0], x0 + 2, y0 + 2), [0, 0, 0, 255]);
    // The second page holds exactly one card; the second slot is blank.
    assert_eq!(pixel(&pages[1], x0 + 2, y0 + 2), [0, 0, 0, 255]);
    assert_eq!(
        pixel(&pages[1], x0 + CARD_W + 40 + 2, y0 + 2),
        [255, 255, 255, 255]
    );
}

#[test]
fn test_small_cards_pack_sixteen_per_page() {
    let spec = LayoutSpec::new(SizeClass::Small);
    let lc = layout_cards(&instant("Shock", vec![ManaColor::R]), false, None).remove(0);
    let mut card = blank_card(&spec).unwrap();
    draw_structure(&mut card, &spec, &lc);

    let cards: Vec<Pixmap> = std::iter::repeat(card).take(17).collect();
    let pages = paginate(
        &cards,
        &PageOptions {
            format: PageFormat::A4,
            spacing: true,
            size_class: SizeClass::Small,
        },
    )
    .unwrap();
    assert_eq!(pages.len(), 2, "16 small cards per page, so 17 need 2");
}
