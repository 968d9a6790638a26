#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Character co-occurrence statistics for narrative text.
//!
//! Given tagged tokens from an upstream tagger and a per-document character
//! alias table, this crate counts which adjectives and which other
//! characters appear near each character mention, then re-ranks the counts
//! by TF-IDF so each character's row surfaces its distinctive terms.
//!
//! ## Pipeline
//!
//! - [`TokenStream`] - normalized, indexed tagger output
//! - [`CharacterAliasTable`] - alias surface form to canonical character
//! - [`CooccurrenceCounter`] - windowed counts (adjective and ship tables)
//! - [`rerank`] - TF-IDF weighting into a [`WeightedCooccurrence`]
//!
//! ## Example
//!
//! ```
//! use layered_narrative::{
//!     rerank_or_empty, CharacterAliasTable, CooccurrenceCounter, PosTag, RerankOptions,
//!     TokenStream,
//! };
//!
//! let aliases = CharacterAliasTable::from_pairs(vec![("kate", "Kate"), ("tom", "Tom")]);
//! let tokens = TokenStream::from_pairs(vec![
//!     ("brave", PosTag::Adj),
//!     ("kate", PosTag::Propn),
//!     ("met", PosTag::Verb),
//!     ("tom", PosTag::Propn),
//!     ("grumpy", PosTag::Adj),
//! ]);
//!
//! let (adjectives, ships) = CooccurrenceCounter::new(&aliases).count(&tokens);
//! assert_eq!(ships.get("Kate", "Tom"), 1);
//!
//! let weighted = rerank_or_empty(&adjectives, RerankOptions::default(), "adj");
//! assert_eq!(weighted.len(), 2);
//! ```

mod alias;
mod cooccurrence;
mod errors;
mod rerank;
mod token;

pub use alias::{CharacterAliasTable, CharacterId};
pub use cooccurrence::{
    count, CooccurrenceCounter, CooccurrenceCounts, CountRow, DEFAULT_WINDOW_RADIUS,
};
pub use errors::{NarrativeError, NarrativeResult, RerankError};
pub use rerank::{
    rerank, rerank_or_empty, RerankOptions, TermMatrix, WeightedCooccurrence, WeightedRow,
};
pub use token::{normalize_mentions, PosTag, TaggedToken, Token, TokenOptions, TokenStream};

#[cfg(test)]
mod tests;
