//! Extracter trait and the typed registry the orchestrator runs through.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{FeatureError, FeatureResult};
use crate::input::ChapterInput;
use crate::table::FeatureTable;
use crate::{CharacterFrequencyExtracter, NameInUtteranceExtracter, NameNearUtteranceExtracter};

/// A feature computation over one chapter.
///
/// Implementations write only their own [`key`](FeatureExtracter::key) into
/// the cells they touch and never remove keys written by others, so
/// extracters may run in any order over the same table.
pub trait FeatureExtracter: Send + Sync {
    /// The feature key this extracter owns.
    fn key(&self) -> &'static str;

    fn extract(&self, input: &ChapterInput, table: &mut FeatureTable);
}

/// Parameters available to extracter factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtracterArgs {
    /// Token distance for "near the utterance" features.
    pub near_window: usize,
}

impl Default for ExtracterArgs {
    fn default() -> Self {
        Self { near_window: 5 }
    }
}

/// Builds an extracter from shared arguments.
pub type ExtracterFactory = fn(&ExtracterArgs) -> Box<dyn FeatureExtracter>;

/// Map from feature key to extracter factory.
#[derive(Clone, Default)]
pub struct ExtracterRegistry {
    factories: BTreeMap<&'static str, ExtracterFactory>,
}

impl fmt::Debug for ExtracterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtracterRegistry")
            .field("keys", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ExtracterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in extracter.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        let builtins: [(&'static str, ExtracterFactory); 3] = [
            (NameInUtteranceExtracter::KEY, NameInUtteranceExtracter::build),
            (NameNearUtteranceExtracter::KEY, NameNearUtteranceExtracter::build),
            (CharacterFrequencyExtracter::KEY, CharacterFrequencyExtracter::build),
        ];
        for (key, factory) in builtins {
            registry.factories.insert(key, factory);
        }
        registry
    }

    /// Register a factory under a new key.
    pub fn register(&mut self, key: &'static str, factory: ExtracterFactory) -> FeatureResult<()> {
        if self.factories.contains_key(key) {
            return Err(FeatureError::DuplicateExtracter {
                key: key.to_string(),
            });
        }
        self.factories.insert(key, factory);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Instantiate the extracters for `keys`, in the given order.
    pub fn build<K: AsRef<str>>(
        &self,
        keys: &[K],
        args: &ExtracterArgs,
    ) -> FeatureResult<Vec<Box<dyn FeatureExtracter>>> {
        keys.iter()
            .map(|key| {
                let key = key.as_ref();
                self.factories
                    .get(key)
                    .map(|factory| factory(args))
                    .ok_or_else(|| FeatureError::UnknownExtracter {
                        key: key.to_string(),
                    })
            })
            .collect()
    }

    /// Allocate a table for `input` and run every selected extracter on it.
    pub fn extract_all<K: AsRef<str>>(
        &self,
        keys: &[K],
        args: &ExtracterArgs,
        input: &ChapterInput,
    ) -> FeatureResult<FeatureTable> {
        let extracters = self.build(keys, args)?;
        Ok(run_extracters(&extracters, input))
    }
}

/// Run already-built extracters over a freshly allocated table.
pub fn run_extracters(extracters: &[Box<dyn FeatureExtracter>], input: &ChapterInput) -> FeatureTable {
    let mut table = FeatureTable::for_input(input);
    for extracter in extracters {
        debug!(
            "running extracter {} over {} paragraphs x {} characters",
            extracter.key(),
            input.paragraph_num(),
            input.character_num()
        );
        extracter.extract(input, &mut table);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureValue;

    struct ConstantExtracter;

    impl FeatureExtracter for ConstantExtracter {
        fn key(&self) -> &'static str {
            "constant"
        }

        fn extract(&self, input: &ChapterInput, table: &mut FeatureTable) {
            for paragraph in 0..input.paragraph_num() {
                for slot in 0..input.character_num() {
                    table.set(paragraph, slot, self.key(), FeatureValue::Categorical(7));
                }
            }
        }
    }

    fn build_constant(_: &ExtracterArgs) -> Box<dyn FeatureExtracter> {
        Box::new(ConstantExtracter)
    }

    fn input() -> ChapterInput {
        let mentions = vec![("Kate".to_string(), vec![6]), ("Tom".to_string(), vec![1])]
            .into_iter()
            .collect();
        ChapterInput::from_mentions(vec![false, true], vec![vec![], vec![4, 9]], mentions).unwrap()
    }

    #[test]
    fn standard_registry_lists_builtins() {
        let registry = ExtracterRegistry::standard();
        let keys: Vec<_> = registry.keys().collect();
        assert_eq!(keys, vec!["charfreqrank", "nameinuttr", "namenearuttr"]);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut registry = ExtracterRegistry::standard();
        let err = registry
            .register("nameinuttr", build_constant)
            .unwrap_err();
        assert_eq!(
            err,
            FeatureError::DuplicateExtracter {
                key: "nameinuttr".into()
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let registry = ExtracterRegistry::standard();
        let err = registry
            .build(&["nameinuttr", "speakerguess"], &ExtracterArgs::default())
            .err()
            .unwrap();
        assert_eq!(
            err,
            FeatureError::UnknownExtracter {
                key: "speakerguess".into()
            }
        );
    }

    #[test]
    fn custom_extracters_share_the_table() {
        let mut registry = ExtracterRegistry::standard();
        registry.register("constant", build_constant).unwrap();

        let forward = registry
            .extract_all(&["constant", "nameinuttr"], &ExtracterArgs::default(), &input())
            .unwrap();
        let backward = registry
            .extract_all(&["nameinuttr", "constant"], &ExtracterArgs::default(), &input())
            .unwrap();
        assert_eq!(forward, backward);

        insta::assert_snapshot!(forward.to_string(), @r###"
        P0 Kate constant=7
        P0 Tom constant=7
        P1 Kate constant=7 nameinuttr=1
        P1 Tom constant=7 nameinuttr=0
        "###);
    }
}
