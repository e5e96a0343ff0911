//! # Card Caches
//!
//! Two flat key-value stores persisted as JSON files, one for cards and
//! one for tokens/emblems. They are separate files on purpose: cards and
//! tokens share names (a "Blood" token coexists with Flesh // Blood), so
//! the two key spaces must never mix.
//!
//! Loading is lenient: a missing or corrupt file just means an empty
//! cache and a slower first run. Saving happens once, at the end of a run.

use crate::error::ProxyError;
use crate::model::{Card, CardKind};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

struct Store {
    path: PathBuf,
    entries: HashMap<String, Card>,
}

impl Store {
    fn load(path: PathBuf) -> Store {
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Store { path, entries }
    }

    fn save(&self) -> Result<(), ProxyError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ProxyError::Output {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let text = serde_json::to_string(&self.entries).expect("card table serializes");
        fs::write(&self.path, text).map_err(|source| ProxyError::Output {
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// The persistent lookup caches for one run.
pub struct CardCache {
    cards: Store,
    tokens: Store,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Tokens and emblems live in the same file but must not collide with
/// each other either, so the kind is folded into the key.
fn token_key(kind: CardKind, name: &str) -> String {
    format!("{}:{}", kind.as_str(), normalize(name))
}

impl CardCache {
    /// Open (or start) the caches under `dir`.
    pub fn open(dir: &Path) -> CardCache {
        CardCache {
            cards: Store::load(dir.join("cards.json")),
            tokens: Store::load(dir.join("tokens.json")),
        }
    }

    pub fn lookup_card(&self, name: &str) -> Option<&Card> {
        self.cards.entries.get(&normalize(name))
    }

    pub fn store_card(&mut self, name: &str, card: Card) {
        self.cards.entries.insert(normalize(name), card);
    }

    pub fn lookup_token(&self, kind: CardKind, name: &str) -> Option<&Card> {
        self.tokens.entries.get(&token_key(kind, name))
    }

    pub fn store_token(&mut self, kind: CardKind, name: &str, card: Card) {
        self.tokens.entries.insert(token_key(kind, name), card);
    }

    /// Write both stores back to disk.
    pub fn save(&self) -> Result<(), ProxyError> {
        self.cards.save()?;
        self.tokens.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Card {
        Card {
            name: name.to_string(),
            ..Card::default()
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let dir = std::env::temp_dir().join("proxyprint-cache-test-case");
        let mut cache = CardCache::open(&dir);
        cache.store_card("Lightning Bolt", named("Lightning Bolt"));
        assert!(cache.lookup_card("lightning bolt").is_some());
        assert!(cache.lookup_card("LIGHTNING BOLT ").is_some());
    }

    #[test]
    fn card_and_token_key_spaces_are_disjoint() {
        let dir = std::env::temp_dir().join("proxyprint-cache-test-disjoint");
        let mut cache = CardCache::open(&dir);
        cache.store_card("Blood", named("Flesh // Blood"));
        cache.store_token(CardKind::Token, "Blood", named("Blood"));
        assert_eq!(cache.lookup_card("Blood").unwrap().name, "Flesh // Blood");
        assert_eq!(
            cache.lookup_token(CardKind::Token, "Blood").unwrap().name,
            "Blood"
        );
        assert!(cache.lookup_token(CardKind::Emblem, "Blood").is_none());
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = std::env::temp_dir().join(format!(
            "proxyprint-cache-test-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);

        let mut cache = CardCache::open(&dir);
        cache.store_card("Forest", named("Forest"));
        cache.store_token(CardKind::Emblem, "Chandra", named("Chandra"));
        cache.save().expect("cache saves");

        let reloaded = CardCache::open(&dir);
        assert!(reloaded.lookup_card("Forest").is_some());
        assert!(reloaded.lookup_token(CardKind::Emblem, "Chandra").is_some());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_cache_file_starts_empty() {
        let dir = std::env::temp_dir().join(format!(
            "proxyprint-cache-corrupt-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("cards.json"), "{not json").unwrap();
        let cache = CardCache::open(&dir);
        assert!(cache.lookup_card("anything").is_none());
        let _ = fs::remove_dir_all(&dir);
    }
}
