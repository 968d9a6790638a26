//! Windowed co-occurrence counting around character mentions.
//!
//! For every token that resolves to a character, the counter looks at up to
//! `window_radius` tokens on each side. Adjective neighbors are counted into
//! the adjective table; neighbors resolving to a *different* character are
//! counted into the ship (character pair) table.
//!
//! ```text
//! brave  kate  met  tom  angry
//! ╰ADJ╯  ╰C╯         ╰C╯ ╰ADJ╯
//!   adj[kate][brave] += 1, adj[kate][angry] += 1, ship[kate][tom] += 1
//! ```

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::alias::{CharacterAliasTable, CharacterId};
use crate::token::{PosTag, TokenStream};

/// Number of tokens inspected on each side of a mention.
pub const DEFAULT_WINDOW_RADIUS: usize = 8;

/// Raw counts for one character, terms kept in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct CountRow {
    character: CharacterId,
    terms: Vec<(String, u32)>,
    term_index: HashMap<String, usize>,
}

impl CountRow {
    fn new(character: CharacterId) -> Self {
        Self {
            character,
            terms: Vec::new(),
            term_index: HashMap::new(),
        }
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    /// Add `n` to the count of `term`.
    pub fn add(&mut self, term: &str, n: u32) {
        match self.term_index.get(term) {
            Some(&idx) => self.terms[idx].1 += n,
            None => {
                self.term_index.insert(term.to_string(), self.terms.len());
                self.terms.push((term.to_string(), n));
            }
        }
    }

    pub fn get(&self, term: &str) -> u32 {
        self.term_index
            .get(term)
            .map(|&idx| self.terms[idx].1)
            .unwrap_or(0)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.term_index.contains_key(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, u32)> {
        self.terms.iter().map(|(term, n)| (term.as_str(), *n))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Character → term → count, rows kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooccurrenceCounts {
    rows: Vec<CountRow>,
    row_index: HashMap<CharacterId, usize>,
}

impl CooccurrenceCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts from literal rows.
    pub fn from_rows<'a, R, T>(rows: R) -> Self
    where
        R: IntoIterator<Item = (&'a str, T)>,
        T: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut counts = Self::new();
        for (character, terms) in rows {
            let row = counts.row_mut(character);
            for (term, n) in terms {
                row.add(term, n);
            }
        }
        counts
    }

    /// Row for `character`, created empty on first access.
    pub fn row_mut(&mut self, character: &str) -> &mut CountRow {
        let idx = match self.row_index.get(character) {
            Some(&idx) => idx,
            None => {
                let idx = self.rows.len();
                self.row_index.insert(character.to_string(), idx);
                self.rows.push(CountRow::new(character.to_string()));
                idx
            }
        };
        &mut self.rows[idx]
    }

    pub fn row(&self, character: &str) -> Option<&CountRow> {
        self.row_index.get(character).map(|&idx| &self.rows[idx])
    }

    pub fn get(&self, character: &str, term: &str) -> u32 {
        self.row(character).map_or(0, |row| row.get(term))
    }

    pub fn rows(&self) -> impl Iterator<Item = &CountRow> {
        self.rows.iter()
    }

    /// Number of character rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for CountRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.terms.len()))?;
        for (term, n) in &self.terms {
            map.serialize_entry(term, n)?;
        }
        map.end()
    }
}

impl Serialize for CooccurrenceCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for row in &self.rows {
            map.serialize_entry(&row.character, row)?;
        }
        map.end()
    }
}

/// Counts co-occurrences inside a fixed-radius window around mentions.
#[derive(Debug, Clone, Copy)]
pub struct CooccurrenceCounter<'a> {
    aliases: &'a CharacterAliasTable,
    window_radius: usize,
}

impl<'a> CooccurrenceCounter<'a> {
    pub fn new(aliases: &'a CharacterAliasTable) -> Self {
        Self {
            aliases,
            window_radius: DEFAULT_WINDOW_RADIUS,
        }
    }

    pub fn with_window_radius(mut self, window_radius: usize) -> Self {
        self.window_radius = window_radius;
        self
    }

    /// Scan the stream once and fill both tables.
    ///
    /// Returns `(adjective counts, ship counts)`.
    pub fn count(&self, tokens: &TokenStream) -> (CooccurrenceCounts, CooccurrenceCounts) {
        let mut adjectives = CooccurrenceCounts::new();
        let mut ships = CooccurrenceCounts::new();

        for (idx, token) in tokens.iter() {
            let character = match self.aliases.resolve(&token.text) {
                Some(character) => character,
                None => continue,
            };
            adjectives.row_mut(character);
            ships.row_mut(character);

            for neighbor_idx in window(idx, tokens.len(), self.window_radius) {
                let neighbor = match tokens.get(neighbor_idx) {
                    Some(neighbor) => neighbor,
                    None => continue,
                };
                if neighbor.pos == PosTag::Adj {
                    adjectives.row_mut(character).add(&neighbor.text, 1);
                }
                if let Some(other) = self.aliases.resolve(&neighbor.text) {
                    if other != character {
                        ships.row_mut(character).add(other, 1);
                    }
                }
            }
        }

        (adjectives, ships)
    }

    /// Character → adjective counts only.
    pub fn count_adjectives(&self, tokens: &TokenStream) -> CooccurrenceCounts {
        self.count(tokens).0
    }

    /// Character → character counts only.
    pub fn count_ships(&self, tokens: &TokenStream) -> CooccurrenceCounts {
        self.count(tokens).1
    }
}

/// Count both tables with an explicit window radius.
pub fn count(
    aliases: &CharacterAliasTable,
    tokens: &TokenStream,
    window_radius: usize,
) -> (CooccurrenceCounts, CooccurrenceCounts) {
    CooccurrenceCounter::new(aliases)
        .with_window_radius(window_radius)
        .count(tokens)
}

/// In-bounds neighbor indices of `center`: `+d` then `-d` for each `d` in `1..=radius`.
fn window(center: usize, len: usize, radius: usize) -> impl Iterator<Item = usize> {
    (1..=radius).flat_map(move |d| {
        let after = center.checked_add(d).filter(|&idx| idx < len);
        let before = center.checked_sub(d);
        after.into_iter().chain(before)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::PosTag::*;

    fn aliases() -> CharacterAliasTable {
        CharacterAliasTable::from_pairs(vec![
            ("kate", "Kate_Smith"),
            ("smith", "Kate_Smith"),
            ("tom", "Tom"),
        ])
    }

    #[test]
    fn window_stays_in_bounds() {
        let near_start: Vec<_> = window(1, 4, 8).collect();
        assert_eq!(near_start, vec![2, 0, 3]);
        assert_eq!(window(0, 1, 8).count(), 0);
    }

    #[test]
    fn single_token_sequence_does_not_panic() {
        let stream = TokenStream::from_pairs(vec![("kate", Propn)]);
        let (adj, ship) = count(&aliases(), &stream, DEFAULT_WINDOW_RADIUS);
        assert_eq!(adj.len(), 1);
        assert!(adj.row("Kate_Smith").unwrap().is_empty());
        assert!(ship.row("Kate_Smith").unwrap().is_empty());
    }

    #[test]
    fn adjective_near_mention_is_counted() {
        let stream = TokenStream::from_pairs(vec![
            ("hi", Intj),
            ("kate", Noun),
            ("looked", Verb),
            ("nice", Adj),
        ]);
        let (adj, _) = count(&aliases(), &stream, DEFAULT_WINDOW_RADIUS);
        insta::assert_snapshot!(serde_json::to_string(&adj).unwrap(), @r###"{"Kate_Smith":{"nice":1}}"###);
    }

    #[test]
    fn both_directions_accumulate_into_one_cell() {
        let stream = TokenStream::from_pairs(vec![
            ("happy", Adj),
            ("kate", Propn),
            ("happy", Adj),
        ]);
        let (adj, _) = count(&aliases(), &stream, DEFAULT_WINDOW_RADIUS);
        assert_eq!(adj.get("Kate_Smith", "happy"), 2);
    }

    #[test]
    fn overlapping_windows_count_every_mention() {
        let stream = TokenStream::from_pairs(vec![
            ("kate", Propn),
            ("tom", Propn),
            ("kate", Propn),
        ]);
        let (_, ship) = count(&aliases(), &stream, DEFAULT_WINDOW_RADIUS);
        assert_eq!(ship.get("Kate_Smith", "Tom"), 2);
        assert_eq!(ship.get("Tom", "Kate_Smith"), 2);
    }

    #[test]
    fn character_is_never_paired_with_itself() {
        let stream = TokenStream::from_pairs(vec![
            ("kate", Propn),
            ("smith", Propn),
            ("tom", Propn),
        ]);
        let (_, ship) = count(&aliases(), &stream, DEFAULT_WINDOW_RADIUS);
        for row in ship.rows() {
            assert!(!row.contains(row.character()));
        }
        assert_eq!(ship.get("Kate_Smith", "Tom"), 2);
    }

    #[test]
    fn neighbors_beyond_radius_are_ignored() {
        let stream = TokenStream::from_pairs(vec![
            ("kate", Propn),
            ("walked", Verb),
            ("far", Adv),
            ("tall", Adj),
        ]);
        let (adj, _) = count(&aliases(), &stream, 2);
        assert_eq!(adj.get("Kate_Smith", "tall"), 0);
        let (adj, _) = count(&aliases(), &stream, 3);
        assert_eq!(adj.get("Kate_Smith", "tall"), 1);
    }

    #[test]
    fn empty_alias_table_counts_nothing() {
        let stream = TokenStream::from_pairs(vec![("kate", Propn), ("nice", Adj)]);
        let (adj, ship) = count(&CharacterAliasTable::new(), &stream, DEFAULT_WINDOW_RADIUS);
        assert!(adj.is_empty());
        assert!(ship.is_empty());
    }

    #[test]
    fn rows_keep_first_seen_order() {
        let stream = TokenStream::from_pairs(vec![
            ("tom", Propn),
            ("grim", Adj),
            ("kate", Propn),
            ("bright", Adj),
        ]);
        let table = aliases();
        let counter = CooccurrenceCounter::new(&table).with_window_radius(1);
        let adj = counter.count_adjectives(&stream);
        insta::assert_snapshot!(serde_json::to_string(&adj).unwrap(), @r###"{"Tom":{"grim":1},"Kate_Smith":{"bright":1,"grim":1}}"###);
    }
}
