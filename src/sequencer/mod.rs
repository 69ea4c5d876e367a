//! Tool sequencing.
//!
//! Orders a subset of items so that consecutive items share as many tools as
//! possible, then derives the efficiency metrics of that order.
//!
//! # Algorithm
//!
//! 1. **Restrict**: copy the rows and columns of the chosen subset out of the
//!    full matrix, in subset order
//! 2. **Greedy nearest neighbor**: starting from the anchor item, repeatedly
//!    append the remaining item sharing the most tools with the last one;
//!    ties go to the candidate listed first
//! 3. **Summarize**: row totals, per-transition savings, aggregates
//!
//! The greedy pass is O(n²) and does not backtrack, so the order is a good
//! heuristic rather than an optimum. Every function here is pure.

pub mod plan;

pub use plan::{OptimizationResult, evaluate, plan};

use std::collections::HashSet;

use crate::domain::{EfficiencySummary, ItemId, ItemTotal, Sequence, Transition};
use crate::error::{Result, SequencerError};
use crate::matrix::ToolMatrix;

/// Copy the sub-matrix for `subset`, rows and columns in subset order.
///
/// Duplicate ids are dropped, keeping the first occurrence. Fails with
/// `InvalidSubset` when the subset is empty or names an unknown item.
pub fn restrict(matrix: &ToolMatrix, subset: &[ItemId]) -> Result<ToolMatrix> {
    if subset.is_empty() {
        return Err(SequencerError::InvalidSubset(
            "no items selected".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(subset.len());
    let mut positions = Vec::with_capacity(subset.len());
    for item in subset {
        let position = matrix.position(item.as_str()).ok_or_else(|| {
            SequencerError::InvalidSubset(format!("item '{}' not in matrix", item))
        })?;
        if seen.insert(position) {
            positions.push(position);
        }
    }

    if positions.len() < subset.len() {
        tracing::debug!(
            requested = subset.len(),
            kept = positions.len(),
            "Dropped duplicate items from subset"
        );
    }

    Ok(matrix.select_positions(&positions))
}

/// Greedy nearest-neighbor ordering over shared-tool counts.
///
/// Returns a permutation of the sub-matrix items beginning with `start`.
/// Among candidates with equal shared-tool counts the one appearing first in
/// the remaining list wins, so the result is reproducible.
pub fn optimize_sequence(sub_matrix: &ToolMatrix, start: &str) -> Result<Sequence> {
    let start_pos = sub_matrix.position(start).ok_or_else(|| {
        SequencerError::InvalidStartItem(format!("'{}' is not in the selected items", start))
    })?;

    let n = sub_matrix.len();
    let mut order = Vec::with_capacity(n);
    order.push(start_pos);

    let mut remaining: Vec<usize> = (0..n).filter(|&p| p != start_pos).collect();
    let mut last = start_pos;

    while !remaining.is_empty() {
        // Strict comparison keeps the earliest maximum
        let mut best_idx = 0;
        let mut best_shared = sub_matrix.at(last, remaining[0]);
        for (idx, &candidate) in remaining.iter().enumerate().skip(1) {
            let shared = sub_matrix.at(last, candidate);
            if shared > best_shared {
                best_shared = shared;
                best_idx = idx;
            }
        }

        let next = remaining.remove(best_idx);
        tracing::trace!(
            from = %sub_matrix.items()[last],
            to = %sub_matrix.items()[next],
            shared = best_shared,
            "Greedy pick"
        );
        order.push(next);
        last = next;
    }

    let items = sub_matrix.items();
    Ok(Sequence::new(
        order.into_iter().map(|p| items[p].clone()).collect(),
    ))
}

/// Efficiency metrics of `sequence` over `sub_matrix`.
///
/// The sequence must be a permutation of the sub-matrix items; anything else
/// is `InvalidSequence`. Tool totals are listed in sub-matrix order, the
/// transitions in sequence order.
pub fn summarize(sub_matrix: &ToolMatrix, sequence: &Sequence) -> Result<EfficiencySummary> {
    let positions = sequence_positions(sub_matrix, sequence)?;

    // Sub-matrix row order is the selection order
    let tool_totals: Vec<ItemTotal> = sub_matrix
        .items()
        .iter()
        .enumerate()
        .map(|(p, item)| ItemTotal {
            item: item.clone(),
            total_tools: sub_matrix.row_total(p),
        })
        .collect();

    let transitions: Vec<Transition> = positions
        .windows(2)
        .map(|pair| Transition {
            from: sub_matrix.items()[pair[0]].clone(),
            to: sub_matrix.items()[pair[1]].clone(),
            shared_tools: sub_matrix.at(pair[0], pair[1]),
        })
        .collect();

    let total_shared: f64 = transitions.iter().map(|t| t.shared_tools).sum();
    let total_tools_used: f64 = tool_totals.iter().map(|t| t.total_tools).sum();

    Ok(EfficiencySummary {
        total_items: sequence.len(),
        effective_changes: sequence.len() - 1,
        adjusted_tools: total_tools_used - total_shared,
        total_shared,
        total_tools_used,
        tool_totals,
        transitions,
    })
}

/// Positions of the sequence items, checking it is a permutation.
fn sequence_positions(sub_matrix: &ToolMatrix, sequence: &Sequence) -> Result<Vec<usize>> {
    if sequence.len() != sub_matrix.len() {
        return Err(SequencerError::InvalidSequence(format!(
            "sequence has {} items, sub-matrix has {}",
            sequence.len(),
            sub_matrix.len()
        )));
    }

    let mut seen = HashSet::with_capacity(sequence.len());
    sequence
        .iter()
        .map(|item| {
            let position = sub_matrix.position(item.as_str()).ok_or_else(|| {
                SequencerError::InvalidSequence(format!("item '{}' not in sub-matrix", item))
            })?;
            if !seen.insert(position) {
                return Err(SequencerError::InvalidSequence(format!(
                    "item '{}' appears more than once",
                    item
                )));
            }
            Ok(position)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item_ids;

    fn abc() -> ToolMatrix {
        ToolMatrix::new(
            item_ids(["A", "B", "C"]),
            vec![
                vec![0.0, 5.0, 1.0],
                vec![5.0, 0.0, 3.0],
                vec![1.0, 3.0, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_restrict_keeps_subset_order() {
        let sub = restrict(&abc(), &item_ids(["C", "A"])).unwrap();
        assert_eq!(sub.items(), item_ids(["C", "A"]).as_slice());
        assert_eq!(sub.get("A", "C"), Some(1.0));
        assert_eq!(sub.row_total(0), 1.0);
    }

    #[test]
    fn test_restrict_dedups_first_occurrence() {
        let sub = restrict(&abc(), &item_ids(["B", "A", "B", "C", "A"])).unwrap();
        assert_eq!(sub.items(), item_ids(["B", "A", "C"]).as_slice());
    }

    #[test]
    fn test_restrict_unknown_item() {
        let err = restrict(&abc(), &item_ids(["A", "Q"])).unwrap_err();
        assert!(matches!(err, SequencerError::InvalidSubset(_)));
        assert!(err.to_string().contains("'Q'"));
    }

    #[test]
    fn test_restrict_empty_subset() {
        let err = restrict(&abc(), &[]).unwrap_err();
        assert!(matches!(err, SequencerError::InvalidSubset(_)));
    }

    #[test]
    fn test_optimize_picks_highest_shared() {
        let seq = optimize_sequence(&abc(), "A").unwrap();
        assert_eq!(seq.items(), item_ids(["A", "B", "C"]).as_slice());
    }

    #[test]
    fn test_optimize_from_middle_item() {
        let seq = optimize_sequence(&abc(), "C").unwrap();
        assert_eq!(seq.items(), item_ids(["C", "B", "A"]).as_slice());
    }

    #[test]
    fn test_optimize_single_item() {
        let sub = restrict(&abc(), &item_ids(["B"])).unwrap();
        let seq = optimize_sequence(&sub, "B").unwrap();
        assert_eq!(seq.items(), item_ids(["B"]).as_slice());
    }

    #[test]
    fn test_optimize_tie_prefers_earliest_remaining() {
        let m = ToolMatrix::new(
            item_ids(["A", "B", "C"]),
            vec![
                vec![0.0, 4.0, 4.0],
                vec![4.0, 0.0, 0.0],
                vec![4.0, 0.0, 0.0],
            ],
        )
        .unwrap();
        let seq = optimize_sequence(&m, "A").unwrap();
        assert_eq!(seq.items(), item_ids(["A", "B", "C"]).as_slice());

        // Same matrix, subset listed the other way round
        let sub = restrict(&m, &item_ids(["A", "C", "B"])).unwrap();
        let seq = optimize_sequence(&sub, "A").unwrap();
        assert_eq!(seq.items(), item_ids(["A", "C", "B"]).as_slice());
    }

    #[test]
    fn test_optimize_all_zero_keeps_listed_order() {
        let m = ToolMatrix::new(item_ids(["A", "B", "C", "D"]), vec![vec![0.0; 4]; 4]).unwrap();
        let seq = optimize_sequence(&m, "C").unwrap();
        assert_eq!(seq.items(), item_ids(["C", "A", "B", "D"]).as_slice());
    }

    #[test]
    fn test_optimize_unknown_start() {
        let sub = restrict(&abc(), &item_ids(["A", "B"])).unwrap();
        let err = optimize_sequence(&sub, "C").unwrap_err();
        assert!(matches!(err, SequencerError::InvalidStartItem(_)));
    }

    #[test]
    fn test_summarize_reference_scenario() {
        let m = abc();
        let seq = optimize_sequence(&m, "A").unwrap();
        let s = summarize(&m, &seq).unwrap();

        assert_eq!(s.total_for("A"), Some(6.0));
        assert_eq!(s.total_for("B"), Some(8.0));
        assert_eq!(s.total_for("C"), Some(4.0));
        assert_eq!(s.shared_tools(), vec![5.0, 3.0]);
        assert_eq!(s.total_shared, 8.0);
        assert_eq!(s.total_tools_used, 18.0);
        assert_eq!(s.adjusted_tools, 10.0);
        assert_eq!(s.effective_changes, 2);
        assert_eq!(s.total_items, 3);
    }

    #[test]
    fn test_summarize_single_item() {
        let m = ToolMatrix::new(item_ids(["A"]), vec![vec![9.0]]).unwrap();
        let s = summarize(&m, &Sequence::new(item_ids(["A"]))).unwrap();
        assert_eq!(s.total_shared, 0.0);
        assert_eq!(s.effective_changes, 0);
        assert_eq!(s.adjusted_tools, 9.0);
        assert!(s.transitions.is_empty());
    }

    #[test]
    fn test_summarize_manual_order() {
        let s = summarize(&abc(), &Sequence::new(item_ids(["A", "C", "B"]))).unwrap();
        assert_eq!(s.shared_tools(), vec![1.0, 3.0]);
        assert_eq!(s.adjusted_tools, 14.0);
    }

    #[test]
    fn test_summarize_totals_follow_selection_order() {
        let sub = restrict(&abc(), &item_ids(["C", "A", "B"])).unwrap();
        let seq = optimize_sequence(&sub, "A").unwrap();
        assert_eq!(seq.items(), item_ids(["A", "B", "C"]).as_slice());

        let s = summarize(&sub, &seq).unwrap();
        let order: Vec<&str> = s.tool_totals.iter().map(|t| t.item.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
        assert_eq!(s.total_tools_used, 18.0);
    }

    #[test]
    fn test_summarize_rejects_non_permutation() {
        let m = abc();
        let short = summarize(&m, &Sequence::new(item_ids(["A", "B"]))).unwrap_err();
        assert!(matches!(short, SequencerError::InvalidSequence(_)));

        let dup = summarize(&m, &Sequence::new(item_ids(["A", "B", "A"]))).unwrap_err();
        assert!(dup.to_string().contains("more than once"));

        let unknown = summarize(&m, &Sequence::new(item_ids(["A", "B", "Z"]))).unwrap_err();
        assert!(unknown.to_string().contains("'Z'"));
    }
}
