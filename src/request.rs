//! Selection requests.
//!
//! Resolves what the caller asked for (possibly nothing) into a concrete
//! subset and start item, and enforces the item cap before any sequencing
//! work begins.

use std::collections::HashSet;

use crate::domain::ItemId;
use crate::error::{Result, SequencerError};
use crate::matrix::ToolMatrix;

/// Limits applied when resolving a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    /// Items used when the caller selects none.
    pub default_subset_size: usize,
    /// Largest subset accepted.
    pub max_items: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            default_subset_size: 5,
            max_items: 500,
        }
    }
}

/// Items and start item as given by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    pub items: Vec<ItemId>,
    pub start: Option<ItemId>,
}

/// A selection ready for the sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub items: Vec<ItemId>,
    pub start: ItemId,
}

impl SelectionRequest {
    pub fn new(items: Vec<ItemId>, start: Option<ItemId>) -> Self {
        Self { items, start }
    }

    /// Fill in defaults and check the cap.
    ///
    /// No items means the first `default_subset_size` matrix items; no start
    /// means the first selected item. Membership is left to the sequencer.
    pub fn resolve(&self, matrix: &ToolMatrix, limits: &SelectionLimits) -> Result<Selection> {
        let items: Vec<ItemId> = if self.items.is_empty() {
            matrix
                .items()
                .iter()
                .take(limits.default_subset_size)
                .cloned()
                .collect()
        } else {
            self.items.clone()
        };

        let distinct = items.iter().collect::<HashSet<_>>().len();
        if distinct > limits.max_items {
            return Err(SequencerError::SubsetTooLarge {
                requested: distinct,
                limit: limits.max_items,
            });
        }

        let start = match &self.start {
            Some(start) => start.clone(),
            None => items.first().cloned().ok_or_else(|| {
                SequencerError::InvalidSubset("no items selected".to_string())
            })?,
        };

        Ok(Selection { items, start })
    }
}
