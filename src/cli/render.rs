//! Terminal rendering of matrices and results.

use colored::*;

use toolseq::OptimizationResult;
use toolseq::ToolMatrix;
use toolseq::workcenter::WorkCenter;

/// Format a tool count: integers without decimals, others with two.
pub fn count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

pub fn work_centers(centers: &[WorkCenter]) -> String {
    let mut out = String::new();
    for wc in centers {
        out.push_str(&format!("  {}  {}\n", wc.name.cyan(), wc.matrix_path.display()));
    }
    out
}

/// Item ids with their row totals over the whole matrix.
pub fn items(matrix: &ToolMatrix) -> String {
    let width = label_width(matrix);
    let mut out = format!("{:<width$}  {}\n", "Item".bold(), "Total_Tools".bold(), width = width);
    for (item, row) in matrix.rows() {
        out.push_str(&format!(
            "{:<width$}  {:>11}\n",
            item.as_str(),
            count(row.iter().sum()),
            width = width
        ));
    }
    out
}

pub fn result(result: &OptimizationResult, heading: &str) -> String {
    let summary = &result.summary;
    let mut out = String::new();

    out.push_str(&format!("{}\n", heading.green().bold()));
    out.push_str(&format!("  {}\n\n", result.sequence));

    out.push_str(&format!("{}\n", "Total Tools per Item (in Selected Matrix)".green().bold()));
    let width = label_width(&result.sub_matrix);
    for total in &summary.tool_totals {
        out.push_str(&format!(
            "  {:<width$}  {:>8}\n",
            total.item.as_str(),
            count(total.total_tools),
            width = width
        ));
    }
    out.push('\n');

    if !summary.transitions.is_empty() {
        out.push_str(&format!("{}\n", "Shared Tools per Transition".green().bold()));
        for t in &summary.transitions {
            out.push_str(&format!("  {} → {}: {}\n", t.from, t.to, count(t.shared_tools)));
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n", "Summary of Sequence Efficiency".green().bold()));
    out.push_str(&format!("  Total Items:                  {}\n", summary.total_items));
    out.push_str(&format!("  Total Tools Used:             {}\n", count(summary.total_tools_used)));
    out.push_str(&format!(
        "  Tools Saved (shared):         {} ({:.1}%)\n",
        count(summary.total_shared),
        summary.savings_ratio() * 100.0
    ));
    out.push_str(&format!("  Effective Tool Changes:       {}\n", summary.effective_changes));
    out.push_str(&format!("  Adjusted Tools After Savings: {}\n\n", count(summary.adjusted_tools)));

    out.push_str(&format!("{}\n", "Sub-Matrix (sequence order)".green().bold()));
    out.push_str(&matrix_table(&result.sub_matrix));
    out
}

/// Matrix as an aligned text table.
pub fn matrix_table(matrix: &ToolMatrix) -> String {
    let labels: Vec<String> = matrix.items().iter().map(|i| i.to_string()).collect();
    let cells: Vec<Vec<String>> = matrix
        .rows()
        .map(|(_, row)| row.iter().map(|v| count(*v)).collect())
        .collect();
    let cell_width = labels
        .iter()
        .chain(cells.iter().flatten())
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(1);
    let width = label_width(matrix);

    let mut out = format!("  {:<width$}", "", width = width);
    for label in &labels {
        out.push_str(&format!(" {:>cell_width$}", label, cell_width = cell_width));
    }
    out.push('\n');
    for (label, row) in labels.iter().zip(&cells) {
        out.push_str(&format!("  {:<width$}", label, width = width));
        for cell in row {
            out.push_str(&format!(" {:>cell_width$}", cell, cell_width = cell_width));
        }
        out.push('\n');
    }
    out
}

fn label_width(matrix: &ToolMatrix) -> usize {
    matrix
        .items()
        .iter()
        .map(|i| i.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max(4)
}
