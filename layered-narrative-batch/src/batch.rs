//! Batch runs over a directory of documents.
//!
//! Documents are independent: each one is loaded, processed and written on
//! its own worker. A document that fails anywhere is logged and counted, and
//! the run carries on with the rest.

use log::{info, warn};
use rayon::prelude::*;

use layered_quote_features::ExtracterRegistry;

use crate::config::BatchConfig;
use crate::document::{process_document, DocumentArtifacts};
use crate::errors::BatchResult;
use crate::loader::{discover_documents, load_document, DocumentSource};
use crate::writer::write_artifacts;

/// Totals for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub documents: usize,
    /// Documents with at least one empty fallback artifact.
    pub degraded: usize,
    /// Documents whose artifacts could not be written.
    pub failed: usize,
}

impl BatchSummary {
    fn add(self, other: BatchSummary) -> BatchSummary {
        BatchSummary {
            documents: self.documents + other.documents,
            degraded: self.degraded + other.degraded,
            failed: self.failed + other.failed,
        }
    }
}

enum Outcome {
    Clean,
    Degraded,
    Failed,
}

/// Process every document in `config.input_dir` with the built-in extracters.
pub fn run_batch(config: &BatchConfig) -> BatchResult<BatchSummary> {
    run_batch_with(config, &ExtracterRegistry::standard())
}

/// Process every document in `config.input_dir` with `registry`.
///
/// Only failures that affect the whole run are returned as errors: an
/// unreadable input directory or a worker pool that cannot be started.
pub fn run_batch_with(
    config: &BatchConfig,
    registry: &ExtracterRegistry,
) -> BatchResult<BatchSummary> {
    let sources = discover_documents(config)?;
    info!(
        "found {} documents in {}",
        sources.len(),
        config.input_dir.display()
    );

    let run = || {
        sources
            .par_iter()
            .map(|source| {
                let outcome = run_document(source, config, registry);
                BatchSummary {
                    documents: 1,
                    degraded: usize::from(matches!(outcome, Outcome::Degraded)),
                    failed: usize::from(matches!(outcome, Outcome::Failed)),
                }
            })
            .reduce(BatchSummary::default, BatchSummary::add)
    };

    let summary = if config.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?
            .install(run)
    } else {
        run()
    };

    info!(
        "processed {} documents ({} degraded, {} failed)",
        summary.documents, summary.degraded, summary.failed
    );
    Ok(summary)
}

fn run_document(
    source: &DocumentSource,
    config: &BatchConfig,
    registry: &ExtracterRegistry,
) -> Outcome {
    let artifacts = match load_document(source) {
        Ok(input) => process_document(input, config, registry),
        Err(e) => {
            warn!("{}: {}", source.name, e);
            DocumentArtifacts::failed(source.name.clone())
        }
    };

    match write_artifacts(&config.output_dir, &artifacts, config.write_features) {
        Ok(_) if artifacts.is_degraded() => Outcome::Degraded,
        Ok(_) => Outcome::Clean,
        Err(e) => {
            warn!("{}: could not write artifacts: {}", source.name, e);
            Outcome::Failed
        }
    }
}
