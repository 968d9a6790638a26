#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Batch driver for layered-narrative.
//!
//! Reads a directory of tagged documents, and for each one writes:
//!
//! - `<stem>_adj_cooccurrence.json`: TF-IDF weighted adjectives per character
//! - `<stem>_ship_cooccurrence.json`: TF-IDF weighted co-mentioned characters
//! - `<stem>_features.json`: quote attribution features, when enabled and a
//!   `<stem>.chapter.json` exists
//!
//! Failures are contained per document. A document whose inputs are missing
//! or malformed still gets empty (`{}`) co-occurrence files.
//!
//! ```no_run
//! use layered_narrative_batch::{run_batch, BatchConfig};
//!
//! let config = BatchConfig::with_dirs("stories", "characters", "out");
//! let summary = run_batch(&config).unwrap();
//! println!("{} documents", summary.documents);
//! ```

mod batch;
mod config;
mod document;
mod errors;
mod loader;
mod writer;

pub use batch::{run_batch, run_batch_with, BatchSummary};
pub use config::BatchConfig;
pub use document::{process_document, DocumentArtifacts, DocumentInput, Stage};
pub use errors::{BatchError, BatchResult};
pub use loader::{discover_documents, load_document, DocumentSource};
pub use writer::{artifact_path, write_artifacts, ADJECTIVE_SUFFIX, FEATURES_SUFFIX, SHIP_SUFFIX};
