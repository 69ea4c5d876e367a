//! Tool matrix: shared-tool counts between item pairs.
//!
//! A `ToolMatrix` is validated once at construction: square, labelled with
//! unique item ids, finite non-negative values, symmetric. Fields are private
//! so every matrix the sequencer sees has passed those checks.

pub mod cache;
pub mod loader;
pub mod workbook;

pub use cache::MatrixCache;
pub use loader::{MatrixFormat, load_path, parse_bytes, parse_str};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::ItemId;
use crate::error::{Result, SequencerError};

/// Relative tolerance used when checking symmetry.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Square, symmetric table of shared-tool counts keyed by item id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixTable", into = "MatrixTable")]
pub struct ToolMatrix {
    items: Vec<ItemId>,
    index: HashMap<ItemId, usize>,
    /// Row-major, `items.len()` squared entries.
    values: Vec<f64>,
}

/// Serialized form of a matrix: item ids plus one row per item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixTable {
    pub items: Vec<ItemId>,
    pub rows: Vec<Vec<f64>>,
}

impl ToolMatrix {
    /// Build a matrix whose rows and columns share the same item order.
    pub fn new(items: Vec<ItemId>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if items.is_empty() {
            return Err(SequencerError::MalformedMatrix(
                "matrix has no items".to_string(),
            ));
        }

        let n = items.len();
        if rows.len() != n {
            return Err(SequencerError::MalformedMatrix(format!(
                "{} item labels but {} rows",
                n,
                rows.len()
            )));
        }

        let mut index = HashMap::with_capacity(n);
        for (i, item) in items.iter().enumerate() {
            if index.insert(item.clone(), i).is_some() {
                return Err(SequencerError::MalformedMatrix(format!(
                    "duplicate item label '{}'",
                    item
                )));
            }
        }

        let mut values = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(SequencerError::MalformedMatrix(format!(
                    "row '{}' has {} values, expected {}",
                    items[i],
                    row.len(),
                    n
                )));
            }
            for (j, value) in row.into_iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(SequencerError::MalformedMatrix(format!(
                        "invalid value {} at ({}, {})",
                        value, items[i], items[j]
                    )));
                }
                values.push(value);
            }
        }

        let matrix = Self {
            items,
            index,
            values,
        };
        matrix.check_symmetric()?;
        Ok(matrix)
    }

    /// Build a matrix whose columns may be listed in a different order than
    /// its rows. Columns are realigned to row order; both axes must carry the
    /// same key set.
    pub fn from_labeled(
        row_labels: Vec<ItemId>,
        column_labels: Vec<ItemId>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if row_labels == column_labels {
            return Self::new(row_labels, rows);
        }
        if row_labels.len() != column_labels.len() {
            return Err(SequencerError::MalformedMatrix(format!(
                "{} row labels but {} column labels",
                row_labels.len(),
                column_labels.len()
            )));
        }

        let mut column_of: HashMap<&ItemId, usize> = HashMap::with_capacity(column_labels.len());
        for (j, label) in column_labels.iter().enumerate() {
            if column_of.insert(label, j).is_some() {
                return Err(SequencerError::MalformedMatrix(format!(
                    "duplicate column label '{}'",
                    label
                )));
            }
        }
        let permutation = row_labels
            .iter()
            .map(|label| {
                column_of.get(label).copied().ok_or_else(|| {
                    SequencerError::MalformedMatrix(format!(
                        "row label '{}' has no matching column",
                        label
                    ))
                })
            })
            .collect::<Result<Vec<usize>>>()?;

        let mut aligned = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != permutation.len() {
                let label = row_labels.get(i).map(ItemId::to_string).unwrap_or_default();
                return Err(SequencerError::MalformedMatrix(format!(
                    "row '{}' has {} values, expected {}",
                    label,
                    row.len(),
                    permutation.len()
                )));
            }
            aligned.push(permutation.iter().map(|&j| row[j]).collect());
        }

        Self::new(row_labels, aligned)
    }

    /// Copy of the rows and columns named by `items`, in that order.
    ///
    /// Callers guarantee every id is present and unique; the result inherits
    /// the parent's validity.
    pub(crate) fn select_positions(&self, positions: &[usize]) -> Self {
        let items: Vec<ItemId> = positions.iter().map(|&p| self.items[p].clone()).collect();
        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.clone(), i))
            .collect();
        let mut values = Vec::with_capacity(positions.len() * positions.len());
        for &row in positions {
            for &col in positions {
                values.push(self.at(row, col));
            }
        }
        Self {
            items,
            index,
            values,
        }
    }

    /// Item ids in row (and column) order.
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Number of items on each axis, never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Row/column position of an item.
    pub fn position(&self, item: &str) -> Option<usize> {
        self.index.get(item).copied()
    }

    /// Shared tools between two items by id.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        Some(self.at(i, j))
    }

    /// Shared tools between two items by position.
    ///
    /// Positions come from `position` or iteration over this matrix; anything
    /// out of range panics.
    pub(crate) fn at(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.items.len() + j]
    }

    pub(crate) fn row(&self, i: usize) -> &[f64] {
        let n = self.items.len();
        &self.values[i * n..(i + 1) * n]
    }

    /// Sum of a row, diagonal included.
    pub(crate) fn row_total(&self, i: usize) -> f64 {
        self.row(i).iter().sum()
    }

    /// Iterate `(item, row)` pairs in order.
    pub fn rows(&self) -> impl Iterator<Item = (&ItemId, &[f64])> {
        self.items.iter().enumerate().map(|(i, item)| (item, self.row(i)))
    }

    fn check_symmetric(&self) -> Result<()> {
        let n = self.items.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let a = self.at(i, j);
                let b = self.at(j, i);
                let scale = a.abs().max(b.abs()).max(1.0);
                if (a - b).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(SequencerError::MalformedMatrix(format!(
                        "not symmetric: ({}, {}) = {} but ({}, {}) = {}",
                        self.items[i], self.items[j], a, self.items[j], self.items[i], b
                    )));
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<MatrixTable> for ToolMatrix {
    type Error = SequencerError;

    fn try_from(table: MatrixTable) -> Result<Self> {
        Self::new(table.items, table.rows)
    }
}

impl From<ToolMatrix> for MatrixTable {
    fn from(matrix: ToolMatrix) -> Self {
        let rows = matrix.rows().map(|(_, row)| row.to_vec()).collect();
        Self {
            items: matrix.items,
            rows,
        }
    }
}
