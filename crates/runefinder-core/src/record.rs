//! Parsing of `UnicodeData.txt` lines into searchable records.
//!
//! Each line is a `;`-separated record. Only three fields matter here:
//! - field 0: code point in hex
//! - field 1: character name
//! - field 10: Unicode 1.0 name, used as an alias (often empty)

use crate::config::UcdConfig;
use crate::error::ParseError;

/// One character of the database, ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rune {
    pub codepoint: u32,
    pub glyph: char,
    /// `NAME` or `NAME (ALIAS)`.
    pub display_name: String,
    /// Uppercase words from name and alias, without duplicates.
    pub tokens: Vec<String>,
}

impl Rune {
    /// `U+` followed by at least four uppercase hex digits.
    pub fn key(&self) -> String {
        format_codepoint(self.codepoint)
    }

    /// True when every term is one of this record's tokens.
    pub fn matches(&self, terms: &[String]) -> bool {
        contains_all(&self.tokens, terms)
    }
}

/// Format a code point as `U+0041`, `U+1F600`, ...
pub fn format_codepoint(codepoint: u32) -> String {
    format!("U+{:04X}", codepoint)
}

/// Parse one database line.
pub fn parse_line(line: &str) -> Result<Rune, ParseError> {
    let fields: Vec<&str> = line.split(UcdConfig::FIELD_SEPARATOR).collect();
    if fields.len() < UcdConfig::MIN_FIELDS {
        return Err(ParseError::FieldCount {
            expected: UcdConfig::MIN_FIELDS,
            found: fields.len(),
        });
    }

    let codepoint = parse_codepoint(fields[0])?;
    let glyph = char::from_u32(codepoint).ok_or(ParseError::NotAScalarValue(codepoint))?;

    let name = fields[UcdConfig::NAME_FIELD].trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName);
    }
    let alias = fields[UcdConfig::ALIAS_FIELD].trim();

    let mut tokens = Vec::new();
    for word in split_words(name).into_iter().chain(split_words(alias)) {
        if !tokens.contains(&word) {
            tokens.push(word);
        }
    }
    if tokens.is_empty() {
        return Err(ParseError::EmptyName);
    }
    let display_name = if alias.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, alias)
    };

    Ok(Rune {
        codepoint,
        glyph,
        display_name,
        tokens,
    })
}

/// Split text on spaces and hyphens into uppercase words.
///
/// Empty fragments are dropped, so `"A  B--C"` gives `["A", "B", "C"]`.
pub fn split_words(text: &str) -> Vec<String> {
    text.split(|c: char| c == ' ' || c == '-')
        .filter(|word| !word.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// True when every wanted word appears in `tokens`. An empty `wanted` is
/// trivially contained.
pub fn contains_all(tokens: &[String], wanted: &[String]) -> bool {
    wanted.iter().all(|word| tokens.contains(word))
}

fn parse_codepoint(field: &str) -> Result<u32, ParseError> {
    let digits = field.trim();
    let invalid = || ParseError::InvalidCodepoint(field.to_string());

    // from_str_radix alone would accept a leading '+'
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u32::from_str_radix(digits, 16).map_err(|_| invalid())
}
