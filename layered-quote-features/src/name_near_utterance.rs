//! "Name near utterance" feature.
//!
//! Speakers tend to be named right before or right after what they say
//! (`Tom said, "..."`, `"...," said Tom`). This extracter flags characters
//! mentioned within a few tokens of a quote boundary, outside every quote
//! of the paragraph.

use crate::extracter::{ExtracterArgs, FeatureExtracter};
use crate::input::ChapterInput;
use crate::table::{FeatureTable, FeatureValue};

/// Binary: a mention within `window` tokens before a quote start or after a quote end.
#[derive(Debug, Clone, Copy)]
pub struct NameNearUtteranceExtracter {
    window: usize,
}

impl NameNearUtteranceExtracter {
    pub const KEY: &'static str = "namenearuttr";

    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn build(args: &ExtracterArgs) -> Box<dyn FeatureExtracter> {
        Box::new(Self::new(args.near_window))
    }

    fn is_near(&self, input: &ChapterInput, paragraph: usize, character: &str) -> bool {
        if self.window == 0 {
            return false;
        }
        input.quote_spans(paragraph).any(|(start, end)| {
            let before = start
                .checked_sub(1)
                .map(|last| (start.saturating_sub(self.window), last));
            let after = end
                .checked_add(1)
                .map(|first| (first, end.saturating_add(self.window)));
            before.into_iter().chain(after).any(|(lo, hi)| {
                input
                    .mentions(character)
                    .iter()
                    .filter(|&&id| lo <= id && id <= hi)
                    .any(|&id| !input.inside_quote(paragraph, id))
            })
        })
    }
}

impl FeatureExtracter for NameNearUtteranceExtracter {
    fn key(&self) -> &'static str {
        Self::KEY
    }

    fn extract(&self, input: &ChapterInput, table: &mut FeatureTable) {
        for paragraph in 0..input.paragraph_num() {
            if !input.has_quote(paragraph) {
                continue;
            }
            for (slot, character) in input.character_slots().enumerate() {
                let near = self.is_near(input, paragraph, character);
                table.set(paragraph, slot, Self::KEY, FeatureValue::Binary(near));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn run(window: usize, spans: Vec<usize>, mentions: Vec<(&str, Vec<usize>)>) -> FeatureTable {
        let mentions: BTreeMap<_, _> = mentions
            .into_iter()
            .map(|(name, ids)| (name.to_string(), ids))
            .collect();
        let input = ChapterInput::from_mentions(vec![true], vec![spans], mentions).unwrap();
        let mut table = FeatureTable::for_input(&input);
        NameNearUtteranceExtracter::new(window).extract(&input, &mut table);
        table
    }

    fn near(table: &FeatureTable, character: &str) -> bool {
        let slot = table.slot_of(character).unwrap();
        table.get(0, slot, NameNearUtteranceExtracter::KEY) == Some(FeatureValue::Binary(true))
    }

    #[test]
    fn mentions_just_outside_the_quote_are_near() {
        let table = run(
            3,
            vec![10, 20],
            vec![("Before", vec![7]), ("After", vec![23]), ("Far", vec![2, 30])],
        );
        assert!(near(&table, "Before"));
        assert!(near(&table, "After"));
        assert!(!near(&table, "Far"));
    }

    #[test]
    fn mentions_inside_quotes_are_not_near() {
        let table = run(3, vec![10, 20, 22, 30], vec![("Addressee", vec![12, 23])]);
        assert!(!near(&table, "Addressee"));
    }

    #[test]
    fn quote_at_document_start_only_looks_after() {
        let table = run(2, vec![0, 4], vec![("Kate", vec![6]), ("Tom", vec![7])]);
        assert!(near(&table, "Kate"));
        assert!(!near(&table, "Tom"));
    }

    #[test]
    fn zero_window_never_fires() {
        let table = run(0, vec![10, 20], vec![("Kate", vec![9, 21])]);
        assert!(!near(&table, "Kate"));
    }
}
