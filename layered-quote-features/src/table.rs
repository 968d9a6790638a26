//! Shared `paragraph × character-slot` feature grid.

use std::collections::BTreeMap;
use std::fmt;

use layered_narrative::CharacterId;
use serde::ser::{Serialize, Serializer};

use crate::input::ChapterInput;

/// A single feature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureValue {
    Binary(bool),
    Categorical(u32),
}

impl FeatureValue {
    pub fn as_u32(&self) -> u32 {
        match *self {
            FeatureValue::Binary(flag) => u32::from(flag),
            FeatureValue::Categorical(value) => value,
        }
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.as_u32())
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_u32())
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Feature key → value for one (paragraph, character) pair.
pub type FeatureCell = BTreeMap<&'static str, FeatureValue>;

/// Pre-allocated feature grid filled by extracters.
///
/// Columns are character slots: the rank of each character id in sorted
/// order, so tables built by independent runs line up column for column.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FeatureTable {
    characters: Vec<CharacterId>,
    paragraphs: Vec<Vec<FeatureCell>>,
}

impl FeatureTable {
    /// Allocate an empty table. `characters` is sorted to fix slot order.
    pub fn new(paragraph_num: usize, mut characters: Vec<CharacterId>) -> Self {
        characters.sort();
        characters.dedup();
        let paragraphs = vec![vec![FeatureCell::new(); characters.len()]; paragraph_num];
        Self {
            characters,
            paragraphs,
        }
    }

    /// Allocate a table shaped for a chapter.
    pub fn for_input(input: &ChapterInput) -> Self {
        Self::new(
            input.paragraph_num(),
            input.character_slots().cloned().collect(),
        )
    }

    pub fn paragraph_num(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn character_num(&self) -> usize {
        self.characters.len()
    }

    pub fn characters(&self) -> &[CharacterId] {
        &self.characters
    }

    /// Slot index of a character id.
    pub fn slot_of(&self, character: &str) -> Option<usize> {
        self.characters
            .binary_search_by(|probe| probe.as_str().cmp(character))
            .ok()
    }

    /// Write one feature, leaving every other key of the cell untouched.
    ///
    /// # Panics
    /// If `paragraph` or `slot` is out of range.
    pub fn set(&mut self, paragraph: usize, slot: usize, key: &'static str, value: FeatureValue) {
        self.paragraphs[paragraph][slot].insert(key, value);
    }

    pub fn get(&self, paragraph: usize, slot: usize, key: &str) -> Option<FeatureValue> {
        self.cell(paragraph, slot)
            .and_then(|cell| cell.get(key))
            .copied()
    }

    pub fn cell(&self, paragraph: usize, slot: usize) -> Option<&FeatureCell> {
        self.paragraphs.get(paragraph).and_then(|row| row.get(slot))
    }

    /// Flatten a cell into a classifier vector, `0.0` for missing keys.
    pub fn vector(&self, paragraph: usize, slot: usize, keys: &[&str]) -> Vec<f64> {
        keys.iter()
            .map(|key| {
                self.get(paragraph, slot, key)
                    .map_or(0.0, |value| value.as_f64())
            })
            .collect()
    }
}

impl fmt::Display for FeatureTable {
    /// One line per non-empty cell: `P<paragraph> <character> key=value ...`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (paragraph, row) in self.paragraphs.iter().enumerate() {
            for (slot, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                write!(f, "P{} {}", paragraph, self.characters[slot])?;
                for (key, value) in cell {
                    write!(f, " {}={}", key, value)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
