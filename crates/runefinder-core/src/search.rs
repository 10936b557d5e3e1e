//! Word search over parsed database records.
//!
//! A record matches when every query word is one of its tokens. Matching is
//! exact per token: `MARK` finds `QUESTION MARK` but `MAR` finds nothing.

use crate::error::{Result, RuneError};
use crate::record::{format_codepoint, parse_line, Rune};
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::io::{self, BufRead};
use tracing::{debug, trace};

/// What a caller shows for one matched character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuneEntry {
    pub codepoint: u32,
    pub glyph: char,
    pub name: String,
}

impl From<Rune> for RuneEntry {
    fn from(rune: Rune) -> Self {
        Self {
            codepoint: rune.codepoint,
            glyph: rune.glyph,
            name: rune.display_name,
        }
    }
}

/// Matches of one query, keyed by `U+XXXX`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: HashMap<String, RuneEntry>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a match. A later entry for the same code point replaces the earlier one.
    pub fn insert(&mut self, entry: RuneEntry) {
        self.entries.insert(format_codepoint(entry.codepoint), entry);
    }

    pub fn get(&self, key: &str) -> Option<&RuneEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuneEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Entries ordered by code point.
    pub fn sorted(&self) -> Vec<&RuneEntry> {
        let mut entries: Vec<&RuneEntry> = self.entries.values().collect();
        entries.sort_by_key(|entry| entry.codepoint);
        entries
    }
}

/// Split a query into uppercase search terms.
///
/// Only whitespace separates terms; a hyphen stays part of its term.
pub fn query_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_uppercase).collect()
}

/// Lazily parse a database stream.
///
/// Malformed lines, including lines that are not valid UTF-8, are skipped.
/// Read errors are yielded so the caller can abort the scan.
pub fn records<R: BufRead>(mut reader: R) -> impl Iterator<Item = io::Result<Rune>> {
    let mut buf = Vec::new();
    let mut line_number = 0usize;

    std::iter::from_fn(move || loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return None,
            Ok(_) => {
                line_number += 1;
                let Ok(line) = std::str::from_utf8(trim_line_ending(&buf)) else {
                    trace!("Skipping line {}: not valid UTF-8", line_number);
                    continue;
                };
                if let Some(rune) = parse_or_skip(line_number, line) {
                    return Some(Ok(rune));
                }
            }
            Err(e) => return Some(Err(e)),
        }
    })
}

/// Search already-loaded lines. Cannot fail: bad lines are skipped.
pub fn search_lines<I, S>(lines: I, query: &str) -> ResultSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, line)| parse_or_skip(index + 1, line.as_ref()))
        .map(Ok::<Rune, Infallible>);

    match collect_matches(parsed, &query_terms(query)) {
        Ok(results) => results,
        Err(never) => match never {},
    }
}

/// Search a database stream.
///
/// A read error fails the whole query and discards partial matches.
pub fn search_reader<R: BufRead>(reader: R, query: &str) -> Result<ResultSet> {
    let results =
        collect_matches(records(reader), &query_terms(query)).map_err(RuneError::stream_read)?;

    debug!("Query {:?} matched {} records", query, results.len());
    Ok(results)
}

/// Keep the records that contain every term; stop at the first error.
fn collect_matches<E>(
    mut records: impl Iterator<Item = std::result::Result<Rune, E>>,
    terms: &[String],
) -> std::result::Result<ResultSet, E> {
    records.try_fold(ResultSet::new(), |mut results, rune| {
        let rune = rune?;
        if rune.matches(terms) {
            results.insert(rune.into());
        }
        Ok(results)
    })
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn parse_or_skip(line_number: usize, line: &str) -> Option<Rune> {
    if line.trim().is_empty() {
        return None;
    }
    match parse_line(line) {
        Ok(rune) => Some(rune),
        Err(e) => {
            trace!("Skipping line {}: {}", line_number, e);
            None
        }
    }
}
