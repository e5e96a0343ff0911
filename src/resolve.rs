//! # Card Resolver
//!
//! Maps parsed [`CardRequest`]s to [`LayoutCard`]s, consulting the local
//! caches before touching the network.
//!
//! The one rule here: resolving a request never aborts the batch. A name
//! that doesn't resolve, an ambiguous token, a transport failure: each
//! degrades to "skip this card, record a diagnostic, continue". Output
//! order always matches request order, including the two faces of a
//! double-faced card.

use crate::cache::CardCache;
use crate::model::{
    layout_cards, Card, CardKind, CardRequest, Diagnostic, DiagnosticKind, LayoutCard,
    BASIC_LANDS,
};
use crate::scryfall::{token_query, LookupError, ScryfallClient};
use std::collections::HashSet;
use std::time::Duration;

/// One resolved deck slot: the bitmap description plus how many copies of
/// it the decklist asked for.
#[derive(Debug, Clone)]
pub struct DeckEntry {
    pub layout: LayoutCard,
    pub copies: u32,
}

/// The resolver's output: deck entries in request order plus everything
/// that went wrong along the way.
#[derive(Debug, Default)]
pub struct ResolvedDeck {
    pub entries: Vec<DeckEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Drop basic lands instead of printing them.
    pub ignore_basic_lands: bool,
    /// Fold flip into double-faced frames, aftermath into split.
    pub alternative_frames: bool,
}

pub struct Resolver<'a> {
    client: &'a ScryfallClient,
    cache: &'a mut CardCache,
    /// Pause between remote calls; Scryfall asks for 50-100ms.
    courtesy_delay: Duration,
}

impl<'a> Resolver<'a> {
    pub fn new(client: &'a ScryfallClient, cache: &'a mut CardCache) -> Self {
        Resolver {
            client,
            cache,
            courtesy_delay: Duration::from_millis(100),
        }
    }

    pub fn with_courtesy_delay(mut self, delay: Duration) -> Self {
        self.courtesy_delay = delay;
        self
    }

    pub fn resolve(&mut self, requests: &[CardRequest], options: ResolveOptions) -> ResolvedDeck {
        let mut deck = ResolvedDeck::default();
        for request in requests {
            match request.kind {
                CardKind::Normal => self.resolve_normal(request, options, &mut deck),
                CardKind::Token | CardKind::Emblem => {
                    self.resolve_token(request, options, &mut deck)
                }
            }
        }
        deck
    }

    fn resolve_normal(
        &mut self,
        request: &CardRequest,
        options: ResolveOptions,
        deck: &mut ResolvedDeck,
    ) {
        if options.ignore_basic_lands && BASIC_LANDS.contains(&request.name.as_str()) {
            return;
        }

        let card = if let Some(hit) = self.cache.lookup_card(&request.name) {
            hit.clone()
        } else {
            match self.client.named_fuzzy(&request.name) {
                Ok(card) => {
                    self.pause();
                    self.cache.store_card(&request.name, card.clone());
                    card
                }
                Err(err) => {
                    self.pause();
                    deck.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::LookupMiss,
                        &request.name,
                        err.to_string(),
                    ));
                    return;
                }
            }
        };

        push_expanded(deck, &card, request, options);
    }

    fn resolve_token(
        &mut self,
        request: &CardRequest,
        options: ResolveOptions,
        deck: &mut ResolvedDeck,
    ) {
        if let Some(spec) = &request.inline_spec {
            // Fully described in the decklist: no cache, no network.
            match spec.to_card() {
                Ok(card) => push_expanded(deck, &card, request, options),
                Err(message) => deck.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ParseError,
                    &request.name,
                    message,
                )),
            }
            return;
        }

        let card = if let Some(hit) = self.cache.lookup_token(request.kind, &request.name) {
            hit.clone()
        } else {
            match self.search_token(request, deck) {
                Some(card) => {
                    self.cache
                        .store_token(request.kind, &request.name, card.clone());
                    card
                }
                None => return,
            }
        };

        push_expanded(deck, &card, request, options);
    }

    /// Remote token search: exact-name query first, loose query as the
    /// fallback, then deduplication and the first-candidate policy.
    fn search_token(&mut self, request: &CardRequest, deck: &mut ResolvedDeck) -> Option<Card> {
        let mut transport_error = None;
        let mut results = Vec::new();
        for exact in [true, false] {
            match self.client.search(&token_query(&request.name, request.kind, exact)) {
                Ok(found) if !found.is_empty() => {
                    self.pause();
                    results = found;
                    break;
                }
                Ok(_) | Err(LookupError::NotFound) => {
                    self.pause();
                }
                Err(err) => {
                    self.pause();
                    transport_error = Some(err.to_string());
                    break;
                }
            }
        }

        if let Some(message) = transport_error {
            deck.diagnostics.push(Diagnostic::new(
                DiagnosticKind::LookupMiss,
                &request.name,
                message,
            ));
            return None;
        }

        let candidates = dedupe_tokens(&request.name, results);
        if candidates.is_empty() {
            deck.diagnostics.push(Diagnostic::new(
                DiagnosticKind::LookupMiss,
                &request.name,
                format!("no matching {}s found", request.kind.as_str()),
            ));
            return None;
        }
        if candidates.len() > 1 {
            deck.diagnostics.push(Diagnostic::new(
                DiagnosticKind::AmbiguousToken,
                &request.name,
                ambiguity_message(&candidates),
            ));
        }

        let mut card = candidates.into_iter().next().expect("checked non-empty");

        if request.kind == CardKind::Emblem {
            if let Some(stripped) = card.name.strip_suffix(" Emblem") {
                card.name = stripped.to_string();
            }
        }
        // Single-face tokens carry their colors as an indicator so the
        // monochrome frame can spell them out as reminder text.
        if card.is_token()
            && !card.is_two_part()
            && card.color_indicator.is_none()
            && !card.colors.is_empty()
        {
            card.color_indicator = Some(card.colors.clone());
        }

        Some(card)
    }

    fn pause(&self) {
        if !self.courtesy_delay.is_zero() {
            std::thread::sleep(self.courtesy_delay);
        }
    }
}

fn push_expanded(
    deck: &mut ResolvedDeck,
    card: &Card,
    request: &CardRequest,
    options: ResolveOptions,
) {
    for layout in layout_cards(card, options.alternative_frames, request.flavor_name.clone()) {
        deck.entries.push(DeckEntry {
            layout,
            copies: request.quantity,
        });
    }
}

fn comparable(name: &str) -> String {
    name.to_lowercase().replace(',', "")
}

/// Collapse a token search result list down to distinct candidates.
///
/// Multi-face results are split into their faces first. A candidate must
/// carry the queried name and a real type line; two candidates are the
/// same printing when they agree on name, type line, colors, rules text
/// and power/toughness. Among survivors, faces whose type line says
/// "Token" win over their non-token back sides. Order of first appearance
/// is preserved, which is what makes the keep-the-first policy
/// deterministic.
pub(crate) fn dedupe_tokens(query: &str, results: Vec<Card>) -> Vec<Card> {
    let mut faces: Vec<Card> = Vec::new();
    for card in results {
        if card.is_two_part() {
            faces.extend(card.card_faces.iter().cloned());
        } else {
            faces.push(card);
        }
    }

    let wanted = comparable(query);
    let mut seen = HashSet::new();
    let mut out: Vec<Card> = Vec::new();
    for card in faces {
        if !comparable(&card.name).contains(&wanted) {
            continue;
        }
        if card.type_line.is_empty() || card.type_line == "Token" {
            continue;
        }
        if seen.insert(identity_key(&card, true)) {
            out.push(card);
        }
    }

    if out.len() > 1 && out.iter().any(|c| c.type_line.contains("Token")) {
        out.retain(|c| c.type_line.contains("Token"));
    }
    out
}

/// The fields that make two token printings "the same". There are tokens
/// that differ only by power/toughness, so P/T is part of the identity
/// unless the caller asks otherwise.
fn identity_key(card: &Card, with_pt: bool) -> String {
    let mut colors = card.colors.clone();
    colors.sort();
    let mut key = format!(
        "{}\n{}\n{:?}\n{}",
        card.name, card.type_line, colors, card.oracle_text
    );
    if with_pt {
        if let (Some(p), Some(t)) = (&card.power, &card.toughness) {
            key.push_str(&format!("\n{}/{}", p, t));
        }
    }
    key
}

fn ambiguity_message(candidates: &[Card]) -> String {
    let first = &candidates[0];
    let pt_only = candidates
        .iter()
        .all(|c| identity_key(c, false) == identity_key(first, false));
    if pt_only {
        match (&first.power, &first.toughness) {
            (Some(p), Some(t)) => format!(
                "{} printings differ only by power/toughness; keeping {}/{}",
                candidates.len(),
                p,
                t
            ),
            _ => format!(
                "{} printings differ only by power/toughness; keeping the first",
                candidates.len()
            ),
        }
    } else {
        format!(
            "{} distinct printings found; keeping the first (spell the token out in the decklist to pick another)",
            candidates.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decklist::parse_decklist;
    use crate::model::{FrameVariant, ManaColor};

    fn token(name: &str, type_line: &str, pt: Option<(&str, &str)>) -> Card {
        Card {
            name: name.to_string(),
            type_line: type_line.to_string(),
            power: pt.map(|(p, _)| p.to_string()),
            toughness: pt.map(|(_, t)| t.to_string()),
            ..Card::default()
        }
    }

    fn temp_cache(tag: &str) -> CardCache {
        let dir = std::env::temp_dir().join(format!(
            "proxyprint-resolve-{}-{}",
            tag,
            std::process::id()
        ));
        CardCache::open(&dir)
    }

    #[test]
    fn inline_token_resolves_without_network() {
        let parse = parse_decklist(
            "1x Marit Lage (token) Legendary; 20/20; B; Avatar; Creature; Flying, indestructible [Marit Lage]",
        );
        assert!(parse.diagnostics.is_empty());

        let client = ScryfallClient::with_base_url("http://127.0.0.1:1");
        let mut cache = temp_cache("inline");
        let mut resolver =
            Resolver::new(&client, &mut cache).with_courtesy_delay(Duration::ZERO);
        let deck = resolver.resolve(&parse.requests, ResolveOptions::default());

        assert!(deck.diagnostics.is_empty(), "{:?}", deck.diagnostics);
        assert_eq!(deck.entries.len(), 1);
        let entry = &deck.entries[0];
        assert_eq!(entry.copies, 1);
        assert_eq!(entry.layout.frame, FrameVariant::Token);
        let card = &entry.layout.faces[0].card;
        assert_eq!(card.name, "Marit Lage");
        assert_eq!(card.power.as_deref(), Some("20"));
        assert_eq!(card.toughness.as_deref(), Some("20"));
        assert_eq!(card.colors, vec![ManaColor::B]);
        assert!(card.type_line.contains("Creature"));
        assert!(card.type_line.contains("Avatar"));
        assert!(card.oracle_text.contains("Flying"));
        assert!(card.oracle_text.contains("indestructible"));
    }

    #[test]
    fn cache_hit_skips_the_network() {
        let client = ScryfallClient::with_base_url("http://127.0.0.1:1");
        let mut cache = temp_cache("hit");
        cache.store_card(
            "Lightning Bolt",
            Card {
                name: "Lightning Bolt".to_string(),
                type_line: "Instant".to_string(),
                mana_cost: "{R}".to_string(),
                oracle_text: "Lightning Bolt deals 3 damage to any target.".to_string(),
                colors: vec![ManaColor::R],
                ..Card::default()
            },
        );
        let parse = parse_decklist("4 Lightning Bolt");
        let mut resolver =
            Resolver::new(&client, &mut cache).with_courtesy_delay(Duration::ZERO);
        let deck = resolver.resolve(&parse.requests, ResolveOptions::default());
        assert!(deck.diagnostics.is_empty());
        assert_eq!(deck.entries.len(), 1);
        assert_eq!(deck.entries[0].copies, 4);
    }

    #[test]
    fn unresolvable_card_is_skipped_with_a_diagnostic() {
        // Nothing listens on this port, so the lookup fails fast; the
        // failure must degrade to a skip, not an abort.
        let client = ScryfallClient::with_base_url("http://127.0.0.1:1");
        let mut cache = temp_cache("miss");
        cache.store_card("Forest", token("Forest", "Basic Land — Forest", None));
        let parse = parse_decklist("1 Xyzzy Nonsense\n1 Forest");
        let mut resolver =
            Resolver::new(&client, &mut cache).with_courtesy_delay(Duration::ZERO);
        let deck = resolver.resolve(&parse.requests, ResolveOptions::default());
        assert_eq!(deck.entries.len(), 1, "the resolvable card survives");
        assert_eq!(deck.entries[0].layout.faces[0].card.name, "Forest");
        assert_eq!(deck.diagnostics.len(), 1);
        assert_eq!(deck.diagnostics[0].kind, DiagnosticKind::LookupMiss);
    }

    #[test]
    fn ignore_basic_lands_drops_them_silently() {
        let client = ScryfallClient::with_base_url("http://127.0.0.1:1");
        let mut cache = temp_cache("basics");
        cache.store_card("Forest", token("Forest", "Basic Land — Forest", None));
        let parse = parse_decklist("8 Forest");
        let mut resolver =
            Resolver::new(&client, &mut cache).with_courtesy_delay(Duration::ZERO);
        let deck = resolver.resolve(
            &parse.requests,
            ResolveOptions {
                ignore_basic_lands: true,
                ..Default::default()
            },
        );
        assert!(deck.entries.is_empty());
        assert!(deck.diagnostics.is_empty());
    }

    #[test]
    fn dedupe_collapses_identical_printings() {
        let results = vec![
            token("Soldier", "Token Creature — Soldier", Some(("1", "1"))),
            token("Soldier", "Token Creature — Soldier", Some(("1", "1"))),
        ];
        let out = dedupe_tokens("Soldier", results);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn dedupe_keeps_pt_variants_separate() {
        let results = vec![
            token("Elemental", "Token Creature — Elemental", Some(("1", "1"))),
            token("Elemental", "Token Creature — Elemental", Some(("4", "4"))),
        ];
        let out = dedupe_tokens("Elemental", results);
        assert_eq!(out.len(), 2, "different P/T means different printings");
    }

    #[test]
    fn dedupe_splits_double_faced_tokens_and_prefers_token_faces() {
        let mut dfc = token("Incubator // Phyrexian", "", None);
        dfc.card_faces = vec![
            token("Incubator", "Token Artifact — Incubator", None),
            token("Incubator Phyrexian", "Artifact Creature — Phyrexian", Some(("0", "0"))),
        ];
        let out = dedupe_tokens("Incubator", vec![dfc]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Incubator");
        assert!(out[0].type_line.contains("Token"));
    }

    #[test]
    fn dedupe_ignores_unrelated_names_and_bare_type_lines() {
        let results = vec![
            token("Soldier", "Token Creature — Soldier", Some(("1", "1"))),
            token("Soldier Ally", "Token Creature — Soldier Ally", Some(("1", "1"))),
            token("Knight", "Token Creature — Knight", Some(("2", "2"))),
            token("Soldier", "Token", None),
            token("Soldier", "", None),
        ];
        let out = dedupe_tokens("Soldier", results);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Soldier");
        assert_eq!(out[1].name, "Soldier Ally");
    }
}
