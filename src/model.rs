//! # Card Model
//!
//! The input representation for the rendering pipeline. A [`Card`] is an
//! immutable record of a card's textual attributes, populated once from a
//! Scryfall response, a cache entry, or an inline token description, and
//! never mutated afterwards.
//!
//! Layout-time attributes (frame variant, face expansion, flavor-name
//! override, acorn stamp) do not live on the card itself: [`LayoutCard`]
//! is a separate derived record that *references* the card data, so the
//! resolved card stays a plain serializable value and the renderer reads
//! both explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five mana colors, in WUBRG order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ManaColor {
    W,
    U,
    B,
    R,
    G,
}

impl ManaColor {
    pub const ALL: [ManaColor; 5] = [
        ManaColor::W,
        ManaColor::U,
        ManaColor::B,
        ManaColor::R,
        ManaColor::G,
    ];

    pub fn from_letter(ch: char) -> Option<ManaColor> {
        match ch.to_ascii_uppercase() {
            'W' => Some(ManaColor::W),
            'U' => Some(ManaColor::U),
            'B' => Some(ManaColor::B),
            'R' => Some(ManaColor::R),
            'G' => Some(ManaColor::G),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            ManaColor::W => 'W',
            ManaColor::U => 'U',
            ManaColor::B => 'B',
            ManaColor::R => 'R',
            ManaColor::G => 'G',
        }
    }

    /// English color name, for color-indicator reminder text.
    pub fn name(self) -> &'static str {
        match self {
            ManaColor::W => "white",
            ManaColor::U => "blue",
            ManaColor::B => "black",
            ManaColor::R => "red",
            ManaColor::G => "green",
        }
    }

    /// Frame tint used by the color pass.
    pub fn frame_rgb(self) -> (u8, u8, u8) {
        match self {
            ManaColor::W => (0xfc, 0xf4, 0xa3),
            ManaColor::U => (0x12, 0x7d, 0xb4),
            ManaColor::B => (0x69, 0x24, 0x73),
            ManaColor::R => (0xe1, 0x3c, 0x32),
            ManaColor::G => (0x0f, 0x78, 0x46),
        }
    }
}

/// Frame tint for cards with no colors.
pub const COLORLESS_RGB: (u8, u8, u8) = (0x91, 0x97, 0x99);
/// Frame tint for five-color (and generic multicolor) frames.
pub const MULTICOLOR_RGB: (u8, u8, u8) = (0xd4, 0xaf, 0x37);

/// Extract the distinct colors appearing in a mana cost, in WUBRG order.
///
/// Split and fuse halves report the whole card's colors on the parent
/// record, so half colors are always recovered from the half's own cost.
pub fn extract_colors(mana_cost: &str) -> Vec<ManaColor> {
    let mut found: Vec<ManaColor> = mana_cost.chars().filter_map(ManaColor::from_letter).collect();
    found.sort();
    found.dedup();
    found
}

pub const CARD_SUPERTYPES: [&str; 7] = [
    "Basic", "Legendary", "Snow", "World", "Ongoing", "Elite", "Host",
];

pub const CARD_TYPES: [&str; 8] = [
    "Land",
    "Creature",
    "Artifact",
    "Enchantment",
    "Instant",
    "Sorcery",
    "Planeswalker",
    "Tribal",
];

pub const BASIC_LANDS: [&str; 11] = [
    "Plains",
    "Island",
    "Swamp",
    "Mountain",
    "Forest",
    "Wastes",
    "Snow-Covered Plains",
    "Snow-Covered Island",
    "Snow-Covered Swamp",
    "Snow-Covered Mountain",
    "Snow-Covered Forest",
];

/// What kind of object a decklist line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Normal,
    Token,
    Emblem,
}

impl CardKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CardKind::Normal => "card",
            CardKind::Token => "token",
            CardKind::Emblem => "emblem",
        }
    }
}

/// One parsed decklist entry, ready for resolution.
///
/// Created by the decklist parser, consumed once by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRequest {
    pub name: String,
    /// Always >= 1; a literal `0x` count is a parse error.
    pub quantity: u32,
    pub kind: CardKind,
    /// Present when the line spells the token out instead of naming one.
    pub inline_spec: Option<TokenSpec>,
    /// Custom name to print in the title bar (`[Flavor Name]`).
    pub flavor_name: Option<String>,
}

/// Structured inline token description, as written in a decklist line:
///
/// ```text
/// (token) Legendary; 20/20; B; Avatar; Creature; Flying, indestructible [Marit Lage]
/// ```
///
/// Supertypes and power/toughness are optional and recognized by content;
/// colors are mandatory (possibly empty, e.g. `C`); a spec with subtypes
/// and no custom name is named after its subtypes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    pub supertypes: Vec<String>,
    pub power_toughness: Option<(String, String)>,
    pub colors: Vec<ManaColor>,
    pub subtypes: Vec<String>,
    pub types: Vec<String>,
    pub rules: Vec<String>,
    pub name: Option<String>,
}

impl TokenSpec {
    /// The name this token will carry: the custom name if given, else the
    /// subtype line.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        if self.subtypes.is_empty() {
            None
        } else {
            Some(self.subtypes.join(" "))
        }
    }

    /// Canonical re-serialization of the spec. Re-parsing this string
    /// yields the same attributes, which keeps cache keys and tests stable.
    pub fn canonical(&self) -> String {
        let mut fields: Vec<String> = Vec::new();
        if !self.supertypes.is_empty() {
            fields.push(self.supertypes.join(" "));
        }
        if let Some((p, t)) = &self.power_toughness {
            fields.push(format!("{}/{}", p, t));
        }
        fields.push(self.colors.iter().map(|c| c.letter()).collect());
        if !self.subtypes.is_empty() {
            fields.push(self.subtypes.join(" "));
        }
        fields.push(self.types.join(" "));
        fields.extend(self.rules.iter().cloned());
        let mut out = fields.join("; ");
        if let Some(name) = &self.name {
            out.push_str(&format!(" [{}]", name));
        }
        out
    }

    /// Build a card from the spec. No network involved.
    pub fn to_card(&self) -> Result<Card, String> {
        let name = self
            .display_name()
            .ok_or_else(|| "token without subtypes needs a [Name]".to_string())?;

        let mut type_line = String::from("Token ");
        if !self.supertypes.is_empty() {
            type_line.push_str(&self.supertypes.join(" "));
            type_line.push(' ');
        }
        type_line.push_str(&self.types.join(" "));
        if !self.subtypes.is_empty() {
            type_line.push_str(" — ");
            type_line.push_str(&self.subtypes.join(" "));
        }

        let needs_pt = self
            .types
            .iter()
            .chain(self.subtypes.iter())
            .any(|t| t == "Creature" || t == "Vehicle");
        if needs_pt && self.power_toughness.is_none() {
            return Err(format!("power/toughness missing for token: {}", name));
        }

        let (power, toughness) = match &self.power_toughness {
            Some((p, t)) => (Some(p.clone()), Some(t.clone())),
            None => (None, None),
        };

        Ok(Card {
            name,
            type_line,
            oracle_text: self.rules.join("\n"),
            colors: self.colors.clone(),
            // Proxies are monochrome by default, so the color identity is
            // carried as an indicator and written out as reminder text.
            color_indicator: if self.colors.is_empty() {
                None
            } else {
                Some(self.colors.clone())
            },
            power,
            toughness,
            ..Card::default()
        })
    }
}

/// A card, a card face, or a card half, exactly as the lookup service (or
/// an inline token spec) describes it. Field names follow the Scryfall
/// schema so the same struct deserializes API responses and cache entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub mana_cost: String,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: String,
    #[serde(default)]
    pub colors: Vec<ManaColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_indicator: Option<Vec<ManaColor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_faces: Vec<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_stamp: Option<String>,
}

impl Card {
    pub fn is_token(&self) -> bool {
        self.type_line.contains("Token")
    }

    pub fn is_emblem(&self) -> bool {
        self.type_line.contains("Emblem")
    }

    pub fn is_token_or_emblem(&self) -> bool {
        self.is_token() || self.is_emblem()
    }

    pub fn is_basic_land(&self) -> bool {
        BASIC_LANDS.contains(&self.name.as_str())
    }

    pub fn is_two_part(&self) -> bool {
        !self.card_faces.is_empty()
    }

    pub fn has_pt(&self) -> bool {
        self.power.is_some()
    }

    /// Anything that goes into the bottom-right box: P/T or loyalty.
    pub fn has_bottom_data(&self) -> bool {
        self.power.is_some() || self.loyalty.is_some()
    }

    /// Non tournament-legal cards get an acorn stamp next to the name.
    /// This is an approximation based on the printed markers (old
    /// silver borders, modern acorn security stamps).
    pub fn is_acorn(&self) -> bool {
        if self.is_token_or_emblem() {
            return false;
        }
        self.border_color.as_deref() == Some("silver")
            || self.security_stamp.as_deref() == Some("acorn")
    }

    pub fn rules_lines(&self) -> Vec<&str> {
        if self.oracle_text.is_empty() {
            Vec::new()
        } else {
            self.oracle_text.lines().collect()
        }
    }

    /// Proxies are black and white, so a color indicator is spelled out as
    /// reminder text instead of the printed dot.
    pub fn color_indicator_reminder(&self) -> Option<String> {
        let indicator = self.color_indicator.as_deref()?;
        if indicator.is_empty() {
            return None;
        }
        let text = if indicator.len() == 5 {
            "all colors".to_string()
        } else {
            let names: Vec<&str> = indicator.iter().map(|c| c.name()).collect();
            match names.split_last() {
                Some((last, rest)) if !rest.is_empty() => {
                    format!("{} and {}", rest.join(", "), last)
                }
                _ => names[0].to_string(),
            }
        };
        let subject = if self.is_token() && self.type_line.contains(&self.name) {
            "This token"
        } else {
            self.name.as_str()
        };
        Some(format!("({} is {}.)", subject, text))
    }
}

/// The structural layout family a face belongs to. Drives which geometry
/// table entry applies and whether one card yields one or two bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameVariant {
    Standard,
    Split,
    Fuse,
    Aftermath,
    Adventure,
    Flip,
    Transform,
    ModalDfc,
    Land,
    Token,
    TextlessToken,
    TextlessCreature,
    Emblem,
}

impl FrameVariant {
    /// Front and back are separate physical cards: one bitmap per face.
    pub fn is_double_faced(self) -> bool {
        matches!(self, FrameVariant::Transform | FrameVariant::ModalDfc)
    }

    /// Both parts share one bitmap (halves, adventures, flips).
    pub fn is_two_part(self) -> bool {
        matches!(
            self,
            FrameVariant::Split
                | FrameVariant::Fuse
                | FrameVariant::Aftermath
                | FrameVariant::Adventure
                | FrameVariant::Flip
        )
    }

    /// Derive the variant for a whole card.
    ///
    /// `alternative_frames` folds flip into the double-faced frame,
    /// aftermath into plain split, and switches textless tokens and
    /// vanilla creatures to the frameless variants.
    pub fn from_card(card: &Card, alternative_frames: bool) -> FrameVariant {
        let base = if card.is_emblem() {
            FrameVariant::Emblem
        } else if card.is_token() {
            FrameVariant::Token
        } else if card.is_basic_land() {
            FrameVariant::Land
        } else {
            match card.layout.as_str() {
                "split" => match split_refinement(card) {
                    Some(v) => v,
                    None => FrameVariant::Split,
                },
                "aftermath" => FrameVariant::Aftermath,
                "adventure" => FrameVariant::Adventure,
                "flip" => FrameVariant::Flip,
                "transform" => FrameVariant::Transform,
                "modal_dfc" => FrameVariant::ModalDfc,
                _ => FrameVariant::Standard,
            }
        };

        if !alternative_frames {
            return base;
        }
        match base {
            FrameVariant::Flip => FrameVariant::Transform,
            FrameVariant::Aftermath => FrameVariant::Split,
            FrameVariant::Token if card.oracle_text.is_empty() && !card.is_two_part() => {
                FrameVariant::TextlessToken
            }
            FrameVariant::Standard
                if card.oracle_text.is_empty() && card.type_line.contains("Creature") =>
            {
                FrameVariant::TextlessCreature
            }
            other => other,
        }
    }
}

/// Scryfall reports aftermath and fuse cards under the split layout; the
/// second half's oracle text tells them apart.
fn split_refinement(card: &Card) -> Option<FrameVariant> {
    let second = card.card_faces.get(1)?;
    let lines: Vec<&str> = second.oracle_text.lines().collect();
    if lines.first()?.starts_with("Aftermath") {
        return Some(FrameVariant::Aftermath);
    }
    if lines.last()?.starts_with("Fuse") {
        return Some(FrameVariant::Fuse);
    }
    None
}

pub const FUSE_REMINDER: &str =
    "Fuse (You may cast one or both halves of this card from your hand.)";

/// The face indicator glyph drawn left of the title on double-faced and
/// flip cards. Resolved to a symbol-font code point at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSymbol {
    TransformFront,
    TransformBack,
    ModalFront,
    ModalBack,
    FlipTop,
    FlipBottom,
}

/// One face to draw: the card data plus its slot in the geometry table.
#[derive(Debug, Clone)]
pub struct Face {
    pub card: Card,
    /// Geometry slot: 0 for single faces and first halves, 1 for the other.
    pub ix: usize,
    pub symbol: Option<FaceSymbol>,
}

/// Everything the renderer needs for one bitmap: the frame variant, the
/// face(s) that land on it, and the per-card print options. This is
/// derived from a [`Card`] and the user options by composition, not
/// inheritance; the card data inside stays untouched.
#[derive(Debug, Clone)]
pub struct LayoutCard {
    pub frame: FrameVariant,
    pub faces: Vec<Face>,
    /// Fuse reminder drawn once across both halves.
    pub fuse_text: Option<String>,
    /// Custom name printed in the title bar instead of the oracle name.
    pub flavor_name: Option<String>,
    pub acorn: bool,
}

impl LayoutCard {
    /// The name shown in the title bar of the first face.
    pub fn display_name(&self) -> &str {
        self.flavor_name
            .as_deref()
            .unwrap_or_else(|| self.faces[0].card.name.as_str())
    }
}

/// Expand a resolved card into the bitmaps it produces: one for most
/// cards, one per face for double-faced layouts.
pub fn layout_cards(
    card: &Card,
    alternative_frames: bool,
    flavor_name: Option<String>,
) -> Vec<LayoutCard> {
    let frame = FrameVariant::from_card(card, alternative_frames);
    let acorn = card.is_acorn();

    if frame.is_double_faced() && card.is_two_part() {
        let symbols = match frame {
            FrameVariant::ModalDfc => [FaceSymbol::ModalFront, FaceSymbol::ModalBack],
            _ => [FaceSymbol::TransformFront, FaceSymbol::TransformBack],
        };
        return card
            .card_faces
            .iter()
            .zip(symbols)
            .map(|(face, symbol)| LayoutCard {
                frame,
                faces: vec![Face {
                    card: face.clone(),
                    ix: 0,
                    symbol: Some(symbol),
                }],
                fuse_text: None,
                flavor_name: None,
                acorn,
            })
            .collect();
    }

    if frame.is_two_part() && card.is_two_part() {
        let fuse_text = (frame == FrameVariant::Fuse).then(|| FUSE_REMINDER.to_string());
        let faces = card
            .card_faces
            .iter()
            .enumerate()
            .map(|(ix, raw)| {
                let mut face = raw.clone();
                match frame {
                    FrameVariant::Split | FrameVariant::Fuse | FrameVariant::Aftermath => {
                        // The parent record reports the whole card's colors
                        // for either half; recover them from the half cost.
                        face.colors = extract_colors(&face.mana_cost);
                    }
                    FrameVariant::Adventure => {
                        face.colors = extract_colors(&face.mana_cost);
                    }
                    FrameVariant::Flip => {
                        face.colors = card.colors.clone();
                        if ix == 1 {
                            face.color_indicator = Some(card.colors.clone());
                        }
                    }
                    _ => {}
                }
                if frame == FrameVariant::Fuse {
                    face.oracle_text = face
                        .oracle_text
                        .replace(&format!("\n{}", FUSE_REMINDER), "")
                        .replace(FUSE_REMINDER, "");
                }
                let symbol = (frame == FrameVariant::Flip).then(|| {
                    if ix == 0 {
                        FaceSymbol::FlipTop
                    } else {
                        FaceSymbol::FlipBottom
                    }
                });
                Face {
                    card: face,
                    ix,
                    symbol,
                }
            })
            .collect();
        return vec![LayoutCard {
            frame,
            faces,
            fuse_text,
            flavor_name,
            acorn,
        }];
    }

    vec![LayoutCard {
        frame,
        faces: vec![Face {
            card: card.clone(),
            ix: 0,
            symbol: None,
        }],
        fuse_text: None,
        flavor_name,
        acorn,
    }]
}

/// How a per-card problem was handled. Nothing here aborts a run: every
/// kind degrades to "skip or clip this card and keep going".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A decklist line could not be understood; the line was skipped.
    ParseError,
    /// The lookup service found no match; the card was skipped.
    LookupMiss,
    /// Several token printings matched; the first was kept.
    AmbiguousToken,
    /// Text did not fit at the minimum font size and was clipped.
    RenderOverflow,
}

impl DiagnosticKind {
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticKind::ParseError => "parse error",
            DiagnosticKind::LookupMiss => "not found",
            DiagnosticKind::AmbiguousToken => "ambiguous token",
            DiagnosticKind::RenderOverflow => "text clipped",
        }
    }
}

/// One collected per-card problem, surfaced in the run summary.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// What the problem is about: a line, a card name, a face.
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind.label(), self.subject, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, type_line: &str) -> Card {
        Card {
            name: name.to_string(),
            type_line: type_line.to_string(),
            ..Card::default()
        }
    }

    #[test]
    fn extract_colors_orders_and_dedups() {
        assert_eq!(
            extract_colors("{2}{G}{W}{G}"),
            vec![ManaColor::W, ManaColor::G]
        );
        assert!(extract_colors("{3}{X}").is_empty());
    }

    #[test]
    fn basic_land_gets_land_frame() {
        let forest = card("Forest", "Basic Land — Forest");
        assert_eq!(
            FrameVariant::from_card(&forest, false),
            FrameVariant::Land
        );
    }

    #[test]
    fn split_refines_to_fuse_from_second_half() {
        let mut c = card("Turn // Burn", "Instant");
        c.layout = "split".to_string();
        c.card_faces = vec![
            card("Turn", "Instant"),
            Card {
                oracle_text: format!("Burn deals 2 damage.\n{}", FUSE_REMINDER),
                ..card("Burn", "Instant")
            },
        ];
        assert_eq!(FrameVariant::from_card(&c, false), FrameVariant::Fuse);
    }

    #[test]
    fn alternative_frames_fold_flip_into_transform() {
        let mut c = card("Nezumi Graverobber", "Creature — Rat Rogue");
        c.layout = "flip".to_string();
        assert_eq!(FrameVariant::from_card(&c, false), FrameVariant::Flip);
        assert_eq!(
            FrameVariant::from_card(&c, true),
            FrameVariant::Transform
        );
    }

    #[test]
    fn double_faced_cards_expand_to_two_bitmaps() {
        let mut c = card("Delver of Secrets // Insectile Aberration", "Creature");
        c.layout = "transform".to_string();
        c.card_faces = vec![
            card("Delver of Secrets", "Creature — Human Wizard"),
            card("Insectile Aberration", "Creature — Human Insect"),
        ];
        let cards = layout_cards(&c, false, None);
        assert_eq!(cards.len(), 2, "transform cards render one bitmap per face");
        assert_eq!(cards[0].faces[0].symbol, Some(FaceSymbol::TransformFront));
        assert_eq!(cards[1].faces[0].symbol, Some(FaceSymbol::TransformBack));
    }

    #[test]
    fn fuse_text_is_lifted_out_of_the_halves() {
        let mut c = card("Turn // Burn", "Instant");
        c.layout = "split".to_string();
        c.card_faces = vec![
            Card {
                mana_cost: "{2}{U}".to_string(),
                oracle_text: format!("Until end of turn...\n{}", FUSE_REMINDER),
                ..card("Turn", "Instant")
            },
            Card {
                mana_cost: "{1}{R}".to_string(),
                oracle_text: format!("Burn deals 2 damage.\n{}", FUSE_REMINDER),
                ..card("Burn", "Instant")
            },
        ];
        let cards = layout_cards(&c, false, None);
        assert_eq!(cards.len(), 1);
        let lc = &cards[0];
        assert_eq!(lc.fuse_text.as_deref(), Some(FUSE_REMINDER));
        for face in &lc.faces {
            assert!(!face.card.oracle_text.contains("Fuse"));
        }
        assert_eq!(lc.faces[0].card.colors, vec![ManaColor::U]);
        assert_eq!(lc.faces[1].card.colors, vec![ManaColor::R]);
    }

    #[test]
    fn color_indicator_reminder_spells_out_colors() {
        let mut c = card("Marit Lage", "Token Legendary Creature — Avatar");
        c.color_indicator = Some(vec![ManaColor::B]);
        assert_eq!(
            c.color_indicator_reminder().as_deref(),
            Some("(Marit Lage is black.)")
        );

        c.color_indicator = Some(vec![ManaColor::U, ManaColor::R]);
        assert_eq!(
            c.color_indicator_reminder().as_deref(),
            Some("(Marit Lage is blue and red.)")
        );
    }

    #[test]
    fn token_spec_round_trips_through_canonical_form() {
        let spec = TokenSpec {
            supertypes: vec!["Legendary".to_string()],
            power_toughness: Some(("20".to_string(), "20".to_string())),
            colors: vec![ManaColor::B],
            subtypes: vec!["Avatar".to_string()],
            types: vec!["Creature".to_string()],
            rules: vec!["Flying, indestructible".to_string()],
            name: Some("Marit Lage".to_string()),
        };
        assert_eq!(
            spec.canonical(),
            "Legendary; 20/20; B; Avatar; Creature; Flying, indestructible [Marit Lage]"
        );

        let c = spec.to_card().expect("spec is complete");
        assert_eq!(c.name, "Marit Lage");
        assert_eq!(c.type_line, "Token Legendary Creature — Avatar");
        assert_eq!(c.power.as_deref(), Some("20"));
        assert_eq!(c.colors, vec![ManaColor::B]);
    }

    #[test]
    fn creature_token_without_pt_is_rejected() {
        let spec = TokenSpec {
            colors: vec![ManaColor::G],
            types: vec!["Creature".to_string()],
            subtypes: vec!["Beast".to_string()],
            ..TokenSpec::default()
        };
        assert!(spec.to_card().is_err());
    }
}
