//! Per-document character alias table.
//!
//! Alias files hold one character entry per line. The alias key is the
//! text between the first `_` and the first `)` of the line, lowercased;
//! the canonical character id is the whole trimmed line:
//!
//! ```text
//! ($_Kate_Smith)   ->  "kate_smith" => "($_Kate_Smith)"
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::errors::{NarrativeError, NarrativeResult};

/// Canonical character identifier, used as row and column key.
pub type CharacterId = String;

/// Lowercased alias surface form to canonical character id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterAliasTable {
    aliases: HashMap<String, CharacterId>,
}

impl CharacterAliasTable {
    /// Create an empty table. Documents without characters resolve nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from explicit `(alias, canonical)` pairs.
    pub fn from_pairs<I, A, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: AsRef<str>,
        C: Into<CharacterId>,
    {
        let aliases = pairs
            .into_iter()
            .map(|(alias, canonical)| (alias.as_ref().to_lowercase(), canonical.into()))
            .collect();
        Self { aliases }
    }

    /// Parse the contents of an alias file.
    ///
    /// Blank lines are skipped. Any other line that does not carry a
    /// non-empty `_name)` segment is rejected with its 1-based line number.
    pub fn parse(content: &str) -> NarrativeResult<Self> {
        let mut aliases = HashMap::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let key = alias_key(line).ok_or_else(|| NarrativeError::MalformedAlias {
                line: idx + 1,
                content: line.to_string(),
            })?;
            aliases.insert(key.to_lowercase(), line.to_string());
        }
        Ok(Self { aliases })
    }

    /// Resolve a token's surface text to its canonical character.
    pub fn resolve(&self, text: &str) -> Option<&CharacterId> {
        self.aliases.get(&text.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Number of aliases (not characters).
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Distinct canonical ids, sorted.
    pub fn characters(&self) -> BTreeSet<&CharacterId> {
        self.aliases.values().collect()
    }
}

fn alias_key(line: &str) -> Option<&str> {
    let start = line.find('_')? + 1;
    let end = line.find(')')?;
    if end <= start {
        return None;
    }
    Some(&line[start..end])
}
