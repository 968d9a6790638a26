//! Artifact output.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::document::DocumentArtifacts;
use crate::errors::{BatchError, BatchResult};

pub const ADJECTIVE_SUFFIX: &str = "_adj_cooccurrence.json";
pub const SHIP_SUFFIX: &str = "_ship_cooccurrence.json";
pub const FEATURES_SUFFIX: &str = "_features.json";

/// Write a document's artifacts into `output_dir`, returning the written paths.
///
/// Both co-occurrence files are always written, as `{}` when empty, so a
/// degraded document still leaves a complete set of outputs behind.
pub fn write_artifacts(
    output_dir: &Path,
    artifacts: &DocumentArtifacts,
    write_features: bool,
) -> BatchResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|e| BatchError::io(output_dir, e))?;

    let mut written = Vec::with_capacity(3);
    written.push(write_json(
        &artifact_path(output_dir, &artifacts.name, ADJECTIVE_SUFFIX),
        &artifacts.adjectives,
    )?);
    written.push(write_json(
        &artifact_path(output_dir, &artifacts.name, SHIP_SUFFIX),
        &artifacts.ships,
    )?);
    if write_features {
        if let Some(features) = &artifacts.features {
            written.push(write_json(
                &artifact_path(output_dir, &artifacts.name, FEATURES_SUFFIX),
                features,
            )?);
        }
    }
    Ok(written)
}

pub fn artifact_path(output_dir: &Path, name: &str, suffix: &str) -> PathBuf {
    output_dir.join(format!("{}{}", name, suffix))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> BatchResult<PathBuf> {
    let content = serde_json::to_string(value).map_err(|e| BatchError::json(path, e))?;
    fs::write(path, content).map_err(|e| BatchError::io(path, e))?;
    Ok(path.to_path_buf())
}
