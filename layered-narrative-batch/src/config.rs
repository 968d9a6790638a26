//! Batch configuration.
//!
//! Loaded from TOML; every field is optional:
//!
//! ```toml
//! input_dir = "stories"
//! character_dir = "characters"
//! output_dir = "out"
//! window_radius = 8
//! min_rows = 2
//! drop_stop_words = true
//! extracters = ["nameinuttr", "namenearuttr"]
//! near_window = 5
//! write_features = true
//! threads = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use layered_narrative::{RerankOptions, TokenOptions, DEFAULT_WINDOW_RADIUS};
use layered_quote_features::{ExtracterArgs, NameInUtteranceExtracter};
use serde::{Deserialize, Serialize};

use crate::errors::{BatchError, BatchResult};

/// Configuration for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory holding `<stem>.tokens.json` and `<stem>.chapter.json` files.
    pub input_dir: PathBuf,
    /// Directory holding `<stem>.chars` alias files.
    pub character_dir: PathBuf,
    /// Directory receiving the artifacts.
    pub output_dir: PathBuf,
    pub window_radius: usize,
    /// Fewer character rows than this produce an empty weighted artifact.
    pub min_rows: usize,
    pub drop_stop_words: bool,
    /// Feature extracter keys, run in this order.
    pub extracters: Vec<String>,
    pub near_window: usize,
    /// Also write `<stem>_features.json`.
    pub write_features: bool,
    /// Worker threads, `0` for the rayon default.
    pub threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            character_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            window_radius: DEFAULT_WINDOW_RADIUS,
            min_rows: RerankOptions::default().min_rows,
            drop_stop_words: TokenOptions::default().drop_stop_words,
            extracters: vec![NameInUtteranceExtracter::KEY.to_string()],
            near_window: ExtracterArgs::default().near_window,
            write_features: false,
            threads: 0,
        }
    }
}

impl BatchConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> BatchResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| BatchError::io(path, e))?;
        toml::from_str(&content).map_err(|e| BatchError::Config {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Configuration reading from and writing to the given directories.
    pub fn with_dirs(
        input_dir: impl Into<PathBuf>,
        character_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            character_dir: character_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn rerank_options(&self) -> RerankOptions {
        RerankOptions {
            min_rows: self.min_rows,
        }
    }

    pub fn token_options(&self) -> TokenOptions {
        TokenOptions {
            drop_stop_words: self.drop_stop_words,
        }
    }

    pub fn extracter_args(&self) -> ExtracterArgs {
        ExtracterArgs {
            near_window: self.near_window,
        }
    }
}
