#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Quote attribution features for layered-narrative.
//!
//! Each extracter computes one feature for every (paragraph, character)
//! pair of a chapter, mostly by testing character mention token ids
//! against quote token spans. A downstream classifier consumes the
//! resulting [`FeatureTable`].
//!
//! ## Built-in extracters
//!
//! | Key | Kind | Meaning |
//! |-----|------|---------|
//! | `nameinuttr` | binary | character mentioned inside a quote of the paragraph |
//! | `namenearuttr` | binary | character mentioned just before or after a quote |
//! | `charfreqrank` | categorical | rank of the character by chapter mention count |
//!
//! ## Usage
//!
//! ```
//! use std::collections::BTreeMap;
//! use layered_quote_features::{ChapterInput, ExtracterArgs, ExtracterRegistry, FeatureValue};
//!
//! let mut mentions = BTreeMap::new();
//! mentions.insert("Kate".to_string(), vec![7]);
//! mentions.insert("Tom".to_string(), vec![12]);
//! let input = ChapterInput::from_mentions(vec![true], vec![vec![5, 10]], mentions).unwrap();
//!
//! let table = ExtracterRegistry::standard()
//!     .extract_all(&["nameinuttr"], &ExtracterArgs::default(), &input)
//!     .unwrap();
//! assert_eq!(table.get(0, 0, "nameinuttr"), Some(FeatureValue::Binary(true)));
//! assert_eq!(table.get(0, 1, "nameinuttr"), Some(FeatureValue::Binary(false)));
//! ```
//!
//! ## Adding an extracter
//!
//! Implement [`FeatureExtracter`], then [`register`](ExtracterRegistry::register)
//! a factory under the extracter's key. Extracters write only their own key
//! and must not depend on running before or after any other extracter.

mod char_frequency;
mod errors;
mod extracter;
mod input;
mod name_in_utterance;
mod name_near_utterance;
mod table;

pub use char_frequency::CharacterFrequencyExtracter;
pub use errors::{FeatureError, FeatureResult};
pub use extracter::{
    run_extracters, ExtracterArgs, ExtracterFactory, ExtracterRegistry, FeatureExtracter,
};
pub use input::ChapterInput;
pub use name_in_utterance::NameInUtteranceExtracter;
pub use name_near_utterance::NameNearUtteranceExtracter;
pub use table::{FeatureCell, FeatureTable, FeatureValue};
