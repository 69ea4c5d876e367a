//! One-call optimization: restrict, sequence, summarize.

use serde::{Deserialize, Serialize};

use crate::domain::{EfficiencySummary, ItemId, Sequence};
use crate::error::Result;
use crate::matrix::ToolMatrix;
use crate::sequencer::{optimize_sequence, restrict, summarize};

/// Everything a caller renders or exports after one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub sequence: Sequence,
    pub summary: EfficiencySummary,
    /// Sub-matrix with rows and columns in sequence order.
    pub sub_matrix: ToolMatrix,
}

/// Greedy sequence for `subset` starting at `start`, with its metrics.
pub fn plan(matrix: &ToolMatrix, subset: &[ItemId], start: &str) -> Result<OptimizationResult> {
    let sub_matrix = restrict(matrix, subset)?;
    let sequence = optimize_sequence(&sub_matrix, start)?;
    let summary = summarize(&sub_matrix, &sequence)?;
    tracing::debug!(
        items = sequence.len(),
        start,
        total_shared = summary.total_shared,
        adjusted_tools = summary.adjusted_tools,
        "Optimized sequence"
    );
    finish(&sub_matrix, sequence, summary)
}

/// Metrics for a caller-chosen order, for comparison with the greedy one.
///
/// Duplicate ids in `order` are dropped, keeping the first occurrence.
pub fn evaluate(matrix: &ToolMatrix, order: &[ItemId]) -> Result<OptimizationResult> {
    let sub_matrix = restrict(matrix, order)?;
    let sequence = Sequence::new(sub_matrix.items().to_vec());
    let summary = summarize(&sub_matrix, &sequence)?;
    tracing::debug!(
        items = sequence.len(),
        total_shared = summary.total_shared,
        "Evaluated manual sequence"
    );
    finish(&sub_matrix, sequence, summary)
}

fn finish(
    sub_matrix: &ToolMatrix,
    sequence: Sequence,
    summary: EfficiencySummary,
) -> Result<OptimizationResult> {
    let reordered = restrict(sub_matrix, sequence.items())?;
    Ok(OptimizationResult {
        sequence,
        summary,
        sub_matrix: reordered,
    })
}
