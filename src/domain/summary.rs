//! Efficiency summary of a sequence.

use serde::{Deserialize, Serialize};

use crate::domain::ItemId;

/// Total tool count of one item within the selected sub-matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTotal {
    pub item: ItemId,
    pub total_tools: f64,
}

/// Shared tools realized by placing two items next to each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: ItemId,
    pub to: ItemId,
    pub shared_tools: f64,
}

/// Read-only metrics derived from a sequence and its sub-matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencySummary {
    /// Row sums within the sub-matrix, in selection order.
    pub tool_totals: Vec<ItemTotal>,
    /// One entry per adjacent pair in the sequence.
    pub transitions: Vec<Transition>,
    pub total_items: usize,
    /// Tools saved by adjacency sharing.
    pub total_shared: f64,
    pub total_tools_used: f64,
    /// `total_tools_used - total_shared`
    pub adjusted_tools: f64,
    /// Number of transitions, always `total_items - 1`.
    pub effective_changes: usize,
}

impl EfficiencySummary {
    /// Tool total for one item, if it is part of the sequence.
    pub fn total_for(&self, item: &str) -> Option<f64> {
        self.tool_totals
            .iter()
            .find(|t| t.item.as_str() == item)
            .map(|t| t.total_tools)
    }

    /// Shared-tool counts between consecutive items.
    pub fn shared_tools(&self) -> Vec<f64> {
        self.transitions.iter().map(|t| t.shared_tools).collect()
    }

    /// Fraction of used tools saved by sharing, 0.0 when nothing is used.
    pub fn savings_ratio(&self) -> f64 {
        if self.total_tools_used > 0.0 {
            self.total_shared / self.total_tools_used
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> EfficiencySummary {
        EfficiencySummary {
            tool_totals: vec![
                ItemTotal {
                    item: ItemId::new("A"),
                    total_tools: 6.0,
                },
                ItemTotal {
                    item: ItemId::new("B"),
                    total_tools: 8.0,
                },
            ],
            transitions: vec![Transition {
                from: ItemId::new("A"),
                to: ItemId::new("B"),
                shared_tools: 5.0,
            }],
            total_items: 2,
            total_shared: 5.0,
            total_tools_used: 14.0,
            adjusted_tools: 9.0,
            effective_changes: 1,
        }
    }

    #[test]
    fn test_total_for() {
        let s = summary();
        assert_eq!(s.total_for("B"), Some(8.0));
        assert_eq!(s.total_for("Z"), None);
    }

    #[test]
    fn test_shared_tools() {
        assert_eq!(summary().shared_tools(), vec![5.0]);
    }

    #[test]
    fn test_savings_ratio_zero_when_unused() {
        let mut s = summary();
        s.total_tools_used = 0.0;
        s.total_shared = 0.0;
        assert_eq!(s.savings_ratio(), 0.0);
    }
}
