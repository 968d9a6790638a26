//! Adapter from upstream tagger output to an indexed token sequence.
//!
//! The tagger (tokenization, part-of-speech tagging, lemmatization) runs
//! outside this crate. Its records arrive as [`TaggedToken`] values and are
//! normalized here into a [`TokenStream`]: lowercased text, parsed
//! [`PosTag`], stop words removed. Token indices used everywhere else in
//! the crate are positions in this stream.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alias::{CharacterAliasTable, CharacterId};

/// Universal part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Space,
    Sym,
    Verb,
    /// Anything the tagger could not classify, including unknown tags.
    X,
}

impl PosTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosTag::Adj => "ADJ",
            PosTag::Adp => "ADP",
            PosTag::Adv => "ADV",
            PosTag::Aux => "AUX",
            PosTag::Cconj => "CCONJ",
            PosTag::Det => "DET",
            PosTag::Intj => "INTJ",
            PosTag::Noun => "NOUN",
            PosTag::Num => "NUM",
            PosTag::Part => "PART",
            PosTag::Pron => "PRON",
            PosTag::Propn => "PROPN",
            PosTag::Punct => "PUNCT",
            PosTag::Sconj => "SCONJ",
            PosTag::Space => "SPACE",
            PosTag::Sym => "SYM",
            PosTag::Verb => "VERB",
            PosTag::X => "X",
        }
    }
}

impl FromStr for PosTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s.trim().to_ascii_uppercase().as_str() {
            "ADJ" => PosTag::Adj,
            "ADP" => PosTag::Adp,
            "ADV" => PosTag::Adv,
            "AUX" => PosTag::Aux,
            "CCONJ" | "CONJ" => PosTag::Cconj,
            "DET" => PosTag::Det,
            "INTJ" => PosTag::Intj,
            "NOUN" => PosTag::Noun,
            "NUM" => PosTag::Num,
            "PART" => PosTag::Part,
            "PRON" => PosTag::Pron,
            "PROPN" => PosTag::Propn,
            "PUNCT" => PosTag::Punct,
            "SCONJ" => PosTag::Sconj,
            "SPACE" => PosTag::Space,
            "SYM" => PosTag::Sym,
            "VERB" => PosTag::Verb,
            _ => PosTag::X,
        };
        Ok(tag)
    }
}

impl From<String> for PosTag {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(tag) => tag,
            Err(never) => match never {},
        }
    }
}

impl From<PosTag> for String {
    fn from(tag: PosTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token record as produced by the upstream tagger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub pos: PosTag,
    /// Fine-grained tag (e.g. Penn Treebank `JJ`).
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub lemma: String,
    #[serde(default)]
    pub is_stop: bool,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, pos: PosTag) -> Self {
        let text = text.into();
        Self {
            lemma: text.clone(),
            text,
            pos,
            tag: String::new(),
            is_stop: false,
        }
    }

    /// Mark this record as a stop word.
    pub fn stop(mut self) -> Self {
        self.is_stop = true;
        self
    }
}

/// A normalized token, identified by its index in a [`TokenStream`].
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub pos: PosTag,
    pub tag: String,
    pub lemma: String,
}

/// Options controlling how tagger output is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenOptions {
    /// Remove records flagged as stop words, so window radii count content tokens.
    pub drop_stop_words: bool,
}

impl Default for TokenOptions {
    fn default() -> Self {
        Self {
            drop_stop_words: true,
        }
    }
}

/// Indexed, immutable token sequence for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Normalize tagger output: lowercase text, optionally drop stop words.
    pub fn from_tagged<I>(records: I, options: TokenOptions) -> Self
    where
        I: IntoIterator<Item = TaggedToken>,
    {
        let tokens = records
            .into_iter()
            .filter(|record| !(options.drop_stop_words && record.is_stop))
            .map(|record| Token {
                text: record.text.to_lowercase(),
                pos: record.pos,
                tag: record.tag,
                lemma: record.lemma,
            })
            .collect();
        Self { tokens }
    }

    /// Build a stream from `(text, pos)` pairs, keeping text as given.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, PosTag)>,
    {
        let tokens = pairs
            .into_iter()
            .map(|(text, pos)| Token {
                text: text.to_string(),
                pos,
                tag: String::new(),
                lemma: text.to_string(),
            })
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Token)> {
        self.tokens.iter().enumerate()
    }

    /// Token indices of every character mention, keyed by canonical id.
    pub fn mention_index(
        &self,
        aliases: &CharacterAliasTable,
    ) -> BTreeMap<CharacterId, Vec<usize>> {
        let mut index: BTreeMap<CharacterId, Vec<usize>> = BTreeMap::new();
        for (idx, token) in self.iter() {
            if let Some(character) = aliases.resolve(&token.text) {
                index.entry(character.clone()).or_default().push(idx);
            }
        }
        index
    }
}

/// Rewrite inline coreference markers before text is sent to the tagger.
///
/// A word such as `($_Kate_Smith)` replaces the word before it and becomes
/// the text between its first `_` and first `)`. Every word is lowercased.
///
/// ```
/// use layered_narrative::normalize_mentions;
///
/// assert_eq!(normalize_mentions("Hello she ($_Kate) said"), "hello kate said");
/// ```
pub fn normalize_mentions(text: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for word in text.split(' ') {
        let word = if word.starts_with("($_") {
            words.pop();
            marker_name(word)
        } else {
            word
        };
        words.push(word.to_lowercase());
    }
    words.join(" ")
}

fn marker_name(word: &str) -> &str {
    let start = match word.find('_') {
        Some(pos) => pos + 1,
        None => return word,
    };
    match word.find(')') {
        Some(end) if end >= start => &word[start..end],
        _ => &word[start..],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_tags_parse_case_insensitively() {
        assert_eq!("adj".parse::<PosTag>().unwrap(), PosTag::Adj);
        assert_eq!("PROPN".parse::<PosTag>().unwrap(), PosTag::Propn);
        assert_eq!("???".parse::<PosTag>().unwrap(), PosTag::X);
    }

    #[test]
    fn tagged_tokens_deserialize_from_tagger_json() {
        let json = r#"[
            {"text": "Kate", "pos": "PROPN", "tag": "NNP", "lemma": "kate"},
            {"text": "the", "pos": "DET", "tag": "DT", "lemma": "the", "is_stop": true},
            {"text": "Brave", "pos": "ADJ"}
        ]"#;
        let records: Vec<TaggedToken> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[1].is_stop);
        assert_eq!(records[2].pos, PosTag::Adj);
        assert_eq!(records[2].lemma, "");
    }

    #[test]
    fn stop_words_are_dropped_and_text_lowercased() {
        let records = vec![
            TaggedToken::new("Kate", PosTag::Propn),
            TaggedToken::new("the", PosTag::Det).stop(),
            TaggedToken::new("Brave", PosTag::Adj),
        ];
        let stream = TokenStream::from_tagged(records.clone(), TokenOptions::default());
        let texts: Vec<_> = stream.iter().map(|(_, t)| t.text.as_str()).collect();
        assert_eq!(texts, vec!["kate", "brave"]);

        let kept = TokenStream::from_tagged(
            records,
            TokenOptions {
                drop_stop_words: false,
            },
        );
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn mention_index_groups_aliases_by_character() {
        let aliases = CharacterAliasTable::from_pairs(vec![
            ("kate", "Kate_Smith"),
            ("smith", "Kate_Smith"),
            ("tom", "Tom"),
        ]);
        let stream = TokenStream::from_pairs(vec![
            ("kate", PosTag::Propn),
            ("met", PosTag::Verb),
            ("tom", PosTag::Propn),
            ("smith", PosTag::Propn),
        ]);
        let index = stream.mention_index(&aliases);
        assert_eq!(index["Kate_Smith"], vec![0, 3]);
        assert_eq!(index["Tom"], vec![2]);
    }

    #[test]
    fn markers_replace_the_preceding_word() {
        assert_eq!(
            normalize_mentions("Then He ($_Harry_Potter) smiled at her ($_Ginny)"),
            "then harry_potter smiled at ginny"
        );
    }

    #[test]
    fn marker_at_start_has_nothing_to_replace() {
        assert_eq!(normalize_mentions("($_Kate) laughed"), "kate laughed");
        assert_eq!(normalize_mentions("she ($_Kate"), "kate");
    }
}
