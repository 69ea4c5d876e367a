//! Ordered item sequences.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::ItemId;

/// An ordered list of items, first item being the sequencing anchor.
///
/// Produced by the sequencer, or built by hand to score a manual ordering.
/// Whether it is a permutation of a given sub-matrix is checked when it is
/// summarized, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(Vec<ItemId>);

impl Sequence {
    /// Wrap an ordered list of item ids.
    pub fn new(items: Vec<ItemId>) -> Self {
        Self(items)
    }

    /// The items in order.
    pub fn items(&self) -> &[ItemId] {
        &self.0
    }

    /// The first item, if any.
    pub fn start(&self) -> Option<&ItemId> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemId> {
        self.0.iter()
    }

    /// Consecutive pairs `(from, to)`; `len() - 1` of them.
    pub fn transitions(&self) -> impl Iterator<Item = (&ItemId, &ItemId)> {
        self.0.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" → ")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a ItemId;
    type IntoIter = std::slice::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
