//! Per-document pipeline.
//!
//! A document runs two independent pipelines: co-occurrence counting and
//! re-ranking over its tokens, and feature extraction over its chapter
//! structure. They run concurrently and are combined only once both are
//! done. Any stage that fails degrades to an empty result for that stage;
//! the other stages are unaffected.

use layered_narrative::{
    rerank, CharacterAliasTable, CooccurrenceCounter, CooccurrenceCounts, TaggedToken,
    TokenStream, WeightedCooccurrence,
};
use layered_quote_features::{ChapterInput, ExtracterRegistry, FeatureTable};
use log::{info, warn};

use crate::config::BatchConfig;

/// Everything the pipelines need for one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentInput {
    /// Document stem, used to name the artifacts.
    pub name: String,
    /// Upstream tagger output.
    pub tokens: Vec<TaggedToken>,
    /// Contents of the alias file, when one exists.
    pub aliases: Option<String>,
    /// Paragraph and quote structure, when feature extraction applies.
    pub chapter: Option<ChapterInput>,
}

impl DocumentInput {
    pub fn new(name: impl Into<String>, tokens: Vec<TaggedToken>) -> Self {
        Self {
            name: name.into(),
            tokens,
            ..Self::default()
        }
    }

    pub fn with_aliases(mut self, aliases: impl Into<String>) -> Self {
        self.aliases = Some(aliases.into());
        self
    }

    pub fn with_chapter(mut self, chapter: ChapterInput) -> Self {
        self.chapter = Some(chapter);
        self
    }
}

/// Which part of a document's output was degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Inputs could not be read; everything is empty.
    Load,
    /// No usable alias table; both co-occurrence artifacts are empty.
    Characters,
    Adjectives,
    Ships,
    Features,
}

/// Outputs of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentArtifacts {
    pub name: String,
    pub adjectives: WeightedCooccurrence,
    pub ships: WeightedCooccurrence,
    pub features: Option<FeatureTable>,
    /// Stages that fell back to empty output.
    pub degraded: Vec<Stage>,
}

impl DocumentArtifacts {
    /// Empty artifacts for a document whose inputs could not be loaded.
    pub fn failed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adjectives: WeightedCooccurrence::empty(),
            ships: WeightedCooccurrence::empty(),
            features: None,
            degraded: vec![Stage::Load],
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

struct CooccurrenceOutput {
    adjectives: WeightedCooccurrence,
    ships: WeightedCooccurrence,
    degraded: Vec<Stage>,
}

/// Run both pipelines over one document. Never fails; see [`Stage`].
pub fn process_document(
    input: DocumentInput,
    config: &BatchConfig,
    registry: &ExtracterRegistry,
) -> DocumentArtifacts {
    let DocumentInput {
        name,
        tokens,
        aliases,
        chapter,
    } = input;

    let (cooccurrence, features) = rayon::join(
        || cooccurrence_pipeline(&name, tokens, aliases.as_deref(), config),
        || chapter.map(|chapter| feature_pipeline(&name, &chapter, config, registry)),
    );

    let mut degraded = cooccurrence.degraded;
    let features = match features {
        Some(Some(table)) => Some(table),
        Some(None) => {
            degraded.push(Stage::Features);
            None
        }
        None => None,
    };

    DocumentArtifacts {
        name,
        adjectives: cooccurrence.adjectives,
        ships: cooccurrence.ships,
        features,
        degraded,
    }
}

fn cooccurrence_pipeline(
    name: &str,
    tokens: Vec<TaggedToken>,
    aliases: Option<&str>,
    config: &BatchConfig,
) -> CooccurrenceOutput {
    let empty = |stage| CooccurrenceOutput {
        adjectives: WeightedCooccurrence::empty(),
        ships: WeightedCooccurrence::empty(),
        degraded: vec![stage],
    };

    let aliases = match aliases.map(CharacterAliasTable::parse) {
        None => {
            info!("{}: no character file, writing empty co-occurrence", name);
            return empty(Stage::Characters);
        }
        Some(Err(e)) => {
            warn!("{}: {}", name, e);
            return empty(Stage::Characters);
        }
        Some(Ok(table)) if table.is_empty() => {
            info!("{}: character file is empty, writing empty co-occurrence", name);
            return empty(Stage::Characters);
        }
        Some(Ok(table)) => table,
    };

    let stream = TokenStream::from_tagged(tokens, config.token_options());
    let (adjective_counts, ship_counts) = CooccurrenceCounter::new(&aliases)
        .with_window_radius(config.window_radius)
        .count(&stream);
    info!(
        "{}: {} tokens, {} characters mentioned",
        name,
        stream.len(),
        adjective_counts.len()
    );

    let mut degraded = Vec::new();
    let mut weigh = |counts: &CooccurrenceCounts, stage: Stage, label: &str| {
        match rerank(counts, config.rerank_options()) {
            Ok(weighted) => weighted,
            Err(e) => {
                warn!("{}: error creating {} co-occurrence: {}", name, label, e);
                degraded.push(stage);
                WeightedCooccurrence::empty()
            }
        }
    };
    let adjectives = weigh(&adjective_counts, Stage::Adjectives, "adjective");
    let ships = weigh(&ship_counts, Stage::Ships, "relationship");

    CooccurrenceOutput {
        adjectives,
        ships,
        degraded,
    }
}

fn feature_pipeline(
    name: &str,
    chapter: &ChapterInput,
    config: &BatchConfig,
    registry: &ExtracterRegistry,
) -> Option<FeatureTable> {
    match registry.extract_all(config.extracters.as_slice(), &config.extracter_args(), chapter) {
        Ok(table) => Some(table),
        Err(e) => {
            warn!("{}: feature extraction failed: {}", name, e);
            None
        }
    }
}
