//! # Scryfall Client
//!
//! The two lookup operations the resolver consumes: fetch-by-fuzzy-name
//! and search-by-structured-query. Calls are blocking and sequential;
//! the whole pipeline is synchronous, and Scryfall asks clients not to
//! hammer the API anyway (the resolver inserts a courtesy delay between
//! calls).
//!
//! A failed fetch is "no result", never a retry.

use crate::model::{Card, CardKind};
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://api.scryfall.com";

/// Why a lookup produced no card.
#[derive(Debug)]
pub enum LookupError {
    /// The service answered and found nothing.
    NotFound,
    /// The service could not be reached or answered garbage.
    Transport(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound => write!(f, "no match found"),
            LookupError::Transport(msg) => write!(f, "lookup failed: {}", msg),
        }
    }
}

pub struct ScryfallClient {
    agent: ureq::Agent,
    base_url: String,
}

impl Default for ScryfallClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScryfallClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client somewhere else (a mirror, a test server).
    pub fn with_base_url(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("proxyprint/", env!("CARGO_PKG_VERSION")))
            .build();
        ScryfallClient {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /cards/named?fuzzy=`: name lookup tolerant of small typos.
    pub fn named_fuzzy(&self, name: &str) -> Result<Card, LookupError> {
        let url = format!("{}/cards/named", self.base_url);
        match self.agent.get(&url).query("fuzzy", name).call() {
            Ok(response) => response
                .into_json::<Card>()
                .map_err(|e| LookupError::Transport(e.to_string())),
            Err(ureq::Error::Status(404, _)) => Err(LookupError::NotFound),
            Err(e) => Err(LookupError::Transport(e.to_string())),
        }
    }

    /// `GET /cards/search?q=`: structured query, first page of results.
    pub fn search(&self, query: &str) -> Result<Vec<Card>, LookupError> {
        #[derive(Deserialize)]
        struct SearchPage {
            #[serde(default)]
            data: Vec<Card>,
        }

        let url = format!("{}/cards/search", self.base_url);
        match self.agent.get(&url).query("q", query).call() {
            Ok(response) => response
                .into_json::<SearchPage>()
                .map(|page| page.data)
                .map_err(|e| LookupError::Transport(e.to_string())),
            Err(ureq::Error::Status(404, _)) => Err(LookupError::NotFound),
            Err(e) => Err(LookupError::Transport(e.to_string())),
        }
    }
}

/// The search term a token/emblem request turns into. Emblems are stored
/// under "<Planeswalker> Emblem" upstream, so the exact query appends the
/// suffix; the loose query is the fallback when the exact one comes back
/// empty.
pub fn token_query(name: &str, kind: CardKind, exact: bool) -> String {
    let type_word = match kind {
        CardKind::Emblem => "emblem",
        _ => "token",
    };
    if exact {
        let exact_name = match kind {
            CardKind::Emblem => format!("{} Emblem", name),
            _ => name.to_string(),
        };
        format!("type:{} !\"{}\"", type_word, exact_name)
    } else {
        format!("type:{} {}", type_word, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_queries_quote_the_exact_name() {
        assert_eq!(
            token_query("Marit Lage", CardKind::Token, true),
            "type:token !\"Marit Lage\""
        );
        assert_eq!(
            token_query("Marit Lage", CardKind::Token, false),
            "type:token Marit Lage"
        );
    }

    #[test]
    fn emblem_queries_append_the_suffix() {
        assert_eq!(
            token_query("Chandra, Torch of Defiance", CardKind::Emblem, true),
            "type:emblem !\"Chandra, Torch of Defiance Emblem\""
        );
    }
}
