//! Per-chapter input bundle shared by every extracter.

use std::collections::{BTreeMap, BTreeSet};

use layered_narrative::CharacterId;
use serde::{Deserialize, Serialize};

use crate::errors::{FeatureError, FeatureResult};

/// Paragraph, quote and mention structure of one chapter.
///
/// Quote spans are stored per paragraph as a flat list alternating start
/// and end token ids (both inclusive). Mention lists are kept sorted and
/// deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChapterInputParts")]
pub struct ChapterInput {
    paragraph_has_quote: Vec<bool>,
    paragraph_quote_token_ids: Vec<Vec<usize>>,
    character_mentions: BTreeMap<CharacterId, Vec<usize>>,
    characters: BTreeSet<CharacterId>,
}

/// Unvalidated serialized form of [`ChapterInput`].
#[derive(Debug, Clone, Deserialize)]
struct ChapterInputParts {
    paragraph_has_quote: Vec<bool>,
    paragraph_quote_token_ids: Vec<Vec<usize>>,
    character_mentions: BTreeMap<CharacterId, Vec<usize>>,
    /// Defaults to the characters with mentions.
    #[serde(default)]
    characters: Option<BTreeSet<CharacterId>>,
}

impl TryFrom<ChapterInputParts> for ChapterInput {
    type Error = FeatureError;

    fn try_from(parts: ChapterInputParts) -> FeatureResult<Self> {
        let characters = parts
            .characters
            .unwrap_or_else(|| parts.character_mentions.keys().cloned().collect());
        ChapterInput::new(
            parts.paragraph_has_quote,
            parts.paragraph_quote_token_ids,
            parts.character_mentions,
            characters,
        )
    }
}

impl ChapterInput {
    /// Validate and build a chapter input.
    pub fn new(
        paragraph_has_quote: Vec<bool>,
        paragraph_quote_token_ids: Vec<Vec<usize>>,
        mut character_mentions: BTreeMap<CharacterId, Vec<usize>>,
        characters: BTreeSet<CharacterId>,
    ) -> FeatureResult<Self> {
        if paragraph_has_quote.len() != paragraph_quote_token_ids.len() {
            return Err(FeatureError::LengthMismatch {
                flags: paragraph_has_quote.len(),
                spans: paragraph_quote_token_ids.len(),
            });
        }
        for (paragraph, ids) in paragraph_quote_token_ids.iter().enumerate() {
            if ids.len() % 2 != 0 {
                return Err(FeatureError::OddSpanList {
                    paragraph,
                    len: ids.len(),
                });
            }
            for pair in ids.chunks_exact(2) {
                if pair[0] > pair[1] {
                    return Err(FeatureError::InvertedSpan {
                        paragraph,
                        start: pair[0],
                        end: pair[1],
                    });
                }
            }
        }
        for mentions in character_mentions.values_mut() {
            mentions.sort_unstable();
            mentions.dedup();
        }

        Ok(Self {
            paragraph_has_quote,
            paragraph_quote_token_ids,
            character_mentions,
            characters,
        })
    }

    /// Build an input whose character set is the set of mentioned characters.
    pub fn from_mentions(
        paragraph_has_quote: Vec<bool>,
        paragraph_quote_token_ids: Vec<Vec<usize>>,
        character_mentions: BTreeMap<CharacterId, Vec<usize>>,
    ) -> FeatureResult<Self> {
        let characters = character_mentions.keys().cloned().collect();
        Self::new(
            paragraph_has_quote,
            paragraph_quote_token_ids,
            character_mentions,
            characters,
        )
    }

    pub fn paragraph_num(&self) -> usize {
        self.paragraph_has_quote.len()
    }

    pub fn character_num(&self) -> usize {
        self.characters.len()
    }

    pub fn has_quote(&self, paragraph: usize) -> bool {
        self.paragraph_has_quote
            .get(paragraph)
            .copied()
            .unwrap_or(false)
    }

    /// Inclusive `(start, end)` quote spans of a paragraph.
    pub fn quote_spans(&self, paragraph: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.paragraph_quote_token_ids
            .get(paragraph)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
    }

    /// Characters in slot order (lexicographic by id).
    pub fn character_slots(&self) -> impl Iterator<Item = &CharacterId> {
        self.characters.iter()
    }

    /// Sorted mention token ids of a character; empty when never mentioned.
    pub fn mentions(&self, character: &str) -> &[usize] {
        self.character_mentions
            .get(character)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Whether any mention of `character` lies in `[start, end]`.
    pub fn mentioned_within(&self, character: &str, start: usize, end: usize) -> bool {
        let mentions = self.mentions(character);
        let first = mentions.partition_point(|&id| id < start);
        mentions.get(first).map_or(false, |&id| id <= end)
    }

    /// Whether `token` falls inside any quote span of `paragraph`.
    pub fn inside_quote(&self, paragraph: usize, token: usize) -> bool {
        self.quote_spans(paragraph)
            .any(|(start, end)| start <= token && token <= end)
    }
}
