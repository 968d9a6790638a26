//! TF-IDF re-ranking of raw co-occurrence counts.
//!
//! Each character row is treated as a document and each term as a word.
//! Terms every character co-occurs with get discounted, terms distinctive
//! for one character rise to the top of its row.
//!
//! The transform is the smoothed, L2-normalized variant:
//!
//! ```text
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//! w(c, t)   = count(c, t) * idf(t)
//! row(c)    = w(c, ·) / ||w(c, ·)||₂
//! ```

use log::warn;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::alias::CharacterId;
use crate::cooccurrence::CooccurrenceCounts;
use crate::errors::RerankError;

/// Options for the reranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RerankOptions {
    /// Fewer character rows than this is a degenerate matrix.
    ///
    /// With one row every IDF is 1 and nothing is discounted, so the
    /// default treats single-character documents as degenerate.
    pub min_rows: usize,
}

impl Default for RerankOptions {
    fn default() -> Self {
        Self { min_rows: 2 }
    }
}

/// Dense `characters × terms` matrix, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatrix {
    rows: Vec<CharacterId>,
    columns: Vec<String>,
    values: Vec<f64>,
}

impl TermMatrix {
    /// Tabulate counts: rows in insertion order, columns in first-seen order.
    pub fn tabulate(counts: &CooccurrenceCounts) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut column_index = std::collections::HashMap::new();
        for row in counts.rows() {
            for (term, _) in row.terms() {
                if !column_index.contains_key(term) {
                    column_index.insert(term.to_string(), columns.len());
                    columns.push(term.to_string());
                }
            }
        }

        let rows: Vec<CharacterId> = counts.rows().map(|row| row.character().to_string()).collect();
        let mut values = vec![0.0; rows.len() * columns.len()];
        for (r, row) in counts.rows().enumerate() {
            for (term, n) in row.terms() {
                values[r * columns.len() + column_index[term]] = f64::from(n);
            }
        }

        Self {
            rows,
            columns,
            values,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[row * self.columns.len() + column]
    }

    fn row_values(&self, row: usize) -> &[f64] {
        let width = self.columns.len();
        &self.values[row * width..(row + 1) * width]
    }

    /// Smoothed inverse document frequency of every column.
    pub fn idf(&self) -> Vec<f64> {
        let n = self.rows.len() as f64;
        (0..self.columns.len())
            .map(|col| {
                let df = (0..self.rows.len())
                    .filter(|&row| self.get(row, col) > 0.0)
                    .count() as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect()
    }

    /// Apply `tf × idf` and L2-normalize every row in place.
    pub fn apply_tfidf(&mut self) {
        let idf = self.idf();
        let width = self.columns.len();
        for row in self.values.chunks_mut(width.max(1)) {
            for (value, weight) in row.iter_mut().zip(&idf) {
                *value *= weight;
            }
            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for value in row.iter_mut() {
                    *value /= norm;
                }
            }
        }
    }

    /// Sort each row by descending weight and drop zero weights.
    pub fn into_weighted(self) -> WeightedCooccurrence {
        let rows = (0..self.rows.len())
            .map(|r| {
                let mut terms: Vec<(usize, f64)> = self
                    .row_values(r)
                    .iter()
                    .copied()
                    .enumerate()
                    .filter(|&(_, weight)| weight != 0.0)
                    .collect();
                terms.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                WeightedRow {
                    character: self.rows[r].clone(),
                    terms: terms
                        .into_iter()
                        .map(|(col, weight)| (self.columns[col].clone(), weight))
                        .collect(),
                }
            })
            .collect();
        WeightedCooccurrence { rows }
    }
}

/// One character's terms, sorted by descending weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedRow {
    pub character: CharacterId,
    pub terms: Vec<(String, f64)>,
}

impl WeightedRow {
    pub fn get(&self, term: &str) -> Option<f64> {
        self.terms
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, weight)| *weight)
    }

    /// Terms in rank order.
    pub fn ranked_terms(&self) -> Vec<&str> {
        self.terms.iter().map(|(t, _)| t.as_str()).collect()
    }
}

/// Re-ranked co-occurrence artifact. Serializes as
/// `{character: {term: weight, ...}, ...}` in rank order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedCooccurrence {
    rows: Vec<WeightedRow>,
}

impl WeightedCooccurrence {
    /// The empty artifact, `{}`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> impl Iterator<Item = &WeightedRow> {
        self.rows.iter()
    }

    pub fn row(&self, character: &str) -> Option<&WeightedRow> {
        self.rows.iter().find(|row| row.character == character)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for WeightedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.terms.len()))?;
        for (term, weight) in &self.terms {
            map.serialize_entry(term, weight)?;
        }
        map.end()
    }
}

impl Serialize for WeightedCooccurrence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for row in &self.rows {
            map.serialize_entry(&row.character, row)?;
        }
        map.end()
    }
}

/// Re-rank raw counts by TF-IDF.
pub fn rerank(
    counts: &CooccurrenceCounts,
    options: RerankOptions,
) -> Result<WeightedCooccurrence, RerankError> {
    let mut matrix = TermMatrix::tabulate(counts);
    let (rows, columns) = (matrix.row_count(), matrix.column_count());
    if rows == 0 || columns == 0 || rows < options.min_rows {
        return Err(RerankError::DegenerateMatrix { rows, columns });
    }
    matrix.apply_tfidf();
    Ok(matrix.into_weighted())
}

/// Re-rank raw counts, degrading to the empty artifact on failure.
pub fn rerank_or_empty(
    counts: &CooccurrenceCounts,
    options: RerankOptions,
    label: &str,
) -> WeightedCooccurrence {
    match rerank(counts, options) {
        Ok(weighted) => weighted,
        Err(e) => {
            warn!("{}: {}, writing empty artifact", label, e);
            WeightedCooccurrence::empty()
        }
    }
}
