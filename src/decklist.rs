//! # Decklist Parser
//!
//! Turns free-text decklist lines into structured [`CardRequest`]s.
//!
//! The grammar, per line:
//!
//! ```text
//! line      = comment | entry
//! comment   = "//" ...               (whole line)
//! entry     = [quantity] [marker] body ["[" flavor "]"]
//! quantity  = digits ["x"]           (its own whitespace-separated token)
//! marker    = "(token)" | "(emblem)" (case-insensitive)
//! body      = name | token-spec      (a body with ";" is a token spec)
//! ```
//!
//! `#` starts a trailing comment on any line. A malformed line produces a
//! diagnostic for that line only; parsing always continues, and output
//! order matches input order.

use crate::model::{
    CardKind, CardRequest, Diagnostic, DiagnosticKind, ManaColor, TokenSpec, CARD_SUPERTYPES,
    CARD_TYPES,
};

/// The outcome of parsing one decklist: requests in input order plus the
/// problems encountered along the way.
#[derive(Debug, Default)]
pub struct DecklistParse {
    pub requests: Vec<CardRequest>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DecklistParse {
    /// Sum of parsed quantities, before resolution drops anything.
    pub fn requested_count(&self) -> u32 {
        self.requests.iter().map(|r| r.quantity).sum()
    }
}

pub fn parse_decklist(text: &str) -> DecklistParse {
    let mut out = DecklistParse::default();
    for raw_line in text.lines() {
        let line = strip_comments(raw_line);
        if line.is_empty() {
            continue;
        }
        match parse_line(&line) {
            Ok(request) => out.requests.push(request),
            Err(message) => out.diagnostics.push(Diagnostic::new(
                DiagnosticKind::ParseError,
                raw_line.trim(),
                message,
            )),
        }
    }
    out
}

/// Drop `//` lines entirely, cut `#` comments, collapse whitespace runs.
fn strip_comments(line: &str) -> String {
    let line = line.trim_start();
    if line.starts_with("//") {
        return String::new();
    }
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_line(line: &str) -> Result<CardRequest, String> {
    let (quantity, rest) = take_quantity(line)?;
    let (flavor_name, rest) = take_flavor_name(&rest);
    let (kind, rest) = take_marker(&rest);

    if rest.is_empty() {
        return Err("no card name found".to_string());
    }

    if kind != CardKind::Normal && rest.contains(';') {
        let spec = parse_token_spec(&rest, flavor_name)?;
        // Validate now so a bad spec is reported against its line, not
        // halfway through resolution.
        spec.to_card()?;
        let name = spec.display_name().expect("validated by to_card");
        return Ok(CardRequest {
            name,
            quantity,
            kind,
            inline_spec: Some(spec),
            flavor_name: None,
        });
    }

    Ok(CardRequest {
        name: rest,
        quantity,
        kind,
        inline_spec: None,
        flavor_name: if kind == CardKind::Normal {
            flavor_name
        } else {
            None
        },
    })
}

/// A leading `N` or `Nx` token is the copy count. Defaults to 1.
fn take_quantity(line: &str) -> Result<(u32, String), String> {
    let first = line.split_whitespace().next().unwrap_or("");
    let digits = first.strip_suffix('x').unwrap_or(first);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Ok((1, line.to_string()));
    }
    let quantity: u32 = digits
        .parse()
        .map_err(|_| format!("copy count '{}' is out of range", first))?;
    if quantity == 0 {
        return Err("copy count must be at least 1".to_string());
    }
    Ok((quantity, line[first.len()..].trim().to_string()))
}

/// A `[Flavor Name]` section anywhere in the line names the printed title.
fn take_flavor_name(line: &str) -> (Option<String>, String) {
    let Some(open) = line.find('[') else {
        return (None, line.to_string());
    };
    let Some(close_off) = line[open + 1..].find(']') else {
        return (None, line.to_string());
    };
    let close = open + 1 + close_off;
    let flavor = line[open + 1..close].trim().to_string();
    let mut rest = String::new();
    rest.push_str(&line[..open]);
    rest.push_str(&line[close + 1..]);
    let rest = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    let flavor = if flavor.is_empty() { None } else { Some(flavor) };
    (flavor, rest)
}

/// A leading `(token)` / `(emblem)` marker switches the request kind.
fn take_marker(line: &str) -> (CardKind, String) {
    let lower = line.to_ascii_lowercase();
    for (marker, kind) in [("(token)", CardKind::Token), ("(emblem)", CardKind::Emblem)] {
        if lower.starts_with(marker) {
            return (kind, line[marker.len()..].trim().to_string());
        }
    }
    (CardKind::Normal, line.to_string())
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn title_words(field: &str) -> Vec<String> {
    field.split_whitespace().map(title_case).collect()
}

fn all_in(words: &[String], sets: &[&[&str]]) -> bool {
    !words.is_empty()
        && words
            .iter()
            .all(|w| sets.iter().any(|set| set.contains(&w.as_str())))
}

/// Parse a semicolon-delimited inline token spec.
///
/// Fields in order: optional supertypes, optional power/toughness, colors,
/// optional subtypes, types, then any number of rules-text segments. The
/// optional fields are recognized by content: the supertype field must
/// consist of known supertype words, and the power/toughness field carries
/// a `/`. Whether the spec has subtypes is decided by looking one field
/// ahead for known card types, since the subtype vocabulary is open-ended.
fn parse_token_spec(text: &str, name: Option<String>) -> Result<TokenSpec, String> {
    let fields: Vec<&str> = text.split(';').map(str::trim).collect();
    let mut fields = fields.into_iter();
    let mut current = fields.next();

    let supertype_words = title_words(current.unwrap_or(""));
    let supertypes = if all_in(&supertype_words, &[&CARD_SUPERTYPES]) {
        current = fields.next();
        supertype_words
    } else {
        Vec::new()
    };

    let power_toughness = match current {
        Some(field) if field.contains('/') => {
            let (p, t) = field.split_once('/').expect("checked for '/'");
            current = fields.next();
            Some((p.trim().to_string(), t.trim().to_string()))
        }
        _ => None,
    };

    let color_field = current.ok_or("missing color field")?;
    let colors: Vec<ManaColor> = color_field
        .chars()
        .filter_map(ManaColor::from_letter)
        .collect();
    current = fields.next();

    let first_type_field = current.ok_or("missing type field")?;
    let next_field = fields.clone().next();
    let (subtypes, types) = match next_field {
        Some(lookahead)
            if all_in(&title_words(lookahead), &[&CARD_TYPES, &CARD_SUPERTYPES]) =>
        {
            // The lookahead field holds the card types, so this one must be
            // the subtypes.
            fields.next();
            (title_words(first_type_field), title_words(lookahead))
        }
        _ => (Vec::new(), title_words(first_type_field)),
    };

    let rules: Vec<String> = fields
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();

    if name.is_none() && subtypes.is_empty() {
        return Err("token without subtypes needs a [Name]".to_string());
    }

    Ok(TokenSpec {
        supertypes,
        power_toughness,
        colors,
        subtypes,
        types,
        rules,
        name,
    })
}
