//! "Name in utterance" feature.
//!
//! Whether a character's name appears inside a quote of the paragraph.
//! Apart from rare cases ("My name is Kate", or a speaker using their own
//! name in place of "I"), a character named inside an utterance is usually
//! the addressee, not the speaker:
//!
//! ```text
//! "How are you, Kate?" asked Tom.
//! ╰────────────────╯
//!   nameinuttr(Kate) = 1   nameinuttr(Tom) = 0
//! ```

use crate::extracter::{ExtracterArgs, FeatureExtracter};
use crate::input::ChapterInput;
use crate::table::{FeatureTable, FeatureValue};

/// Binary: any mention of the character inside any quote span of the paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameInUtteranceExtracter;

impl NameInUtteranceExtracter {
    pub const KEY: &'static str = "nameinuttr";

    pub fn build(_args: &ExtracterArgs) -> Box<dyn FeatureExtracter> {
        Box::new(Self)
    }
}

impl FeatureExtracter for NameInUtteranceExtracter {
    fn key(&self) -> &'static str {
        Self::KEY
    }

    fn extract(&self, input: &ChapterInput, table: &mut FeatureTable) {
        for paragraph in 0..input.paragraph_num() {
            if !input.has_quote(paragraph) {
                continue;
            }
            for (slot, character) in input.character_slots().enumerate() {
                let appears = input
                    .quote_spans(paragraph)
                    .any(|(start, end)| input.mentioned_within(character, start, end));
                table.set(paragraph, slot, Self::KEY, FeatureValue::Binary(appears));
            }
        }
    }
}
