//! Character frequency rank feature.

use crate::extracter::{ExtracterArgs, FeatureExtracter};
use crate::input::ChapterInput;
use crate::table::{FeatureTable, FeatureValue};

/// Categorical: 1-based rank of the character by chapter mention count.
///
/// Ties keep slot order. Characters never mentioned get rank `0`. Written
/// for quote paragraphs only, like the other utterance features.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterFrequencyExtracter;

impl CharacterFrequencyExtracter {
    pub const KEY: &'static str = "charfreqrank";

    pub fn build(_args: &ExtracterArgs) -> Box<dyn FeatureExtracter> {
        Box::new(Self)
    }

    /// Rank per slot.
    pub fn ranks(input: &ChapterInput) -> Vec<u32> {
        let counts: Vec<usize> = input
            .character_slots()
            .map(|character| input.mentions(character).len())
            .collect();

        let mut order: Vec<usize> = (0..counts.len()).collect();
        order.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

        let mut ranks = vec![0; counts.len()];
        for (position, &slot) in order.iter().enumerate() {
            if counts[slot] > 0 {
                ranks[slot] = position as u32 + 1;
            }
        }
        ranks
    }
}

impl FeatureExtracter for CharacterFrequencyExtracter {
    fn key(&self) -> &'static str {
        Self::KEY
    }

    fn extract(&self, input: &ChapterInput, table: &mut FeatureTable) {
        let ranks = Self::ranks(input);
        for paragraph in 0..input.paragraph_num() {
            if !input.has_quote(paragraph) {
                continue;
            }
            for (slot, &rank) in ranks.iter().enumerate() {
                table.set(paragraph, slot, Self::KEY, FeatureValue::Categorical(rank));
            }
        }
    }
}
