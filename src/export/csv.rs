//! CSV bundle export.
//!
//! Three files in one directory:
//! - `sequence.csv`: `Position,Optimized_Sequence`
//! - `tool_totals.csv`: `Item,Total_Tools`, in selection order
//! - `sub_matrix.csv`: the sub-matrix with rows and columns in sequence order

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::sequencer::OptimizationResult;

pub const SEQUENCE_FILE: &str = "sequence.csv";
pub const TOTALS_FILE: &str = "tool_totals.csv";
pub const SUB_MATRIX_FILE: &str = "sub_matrix.csv";

/// Write the three CSV files into `dir`, creating it if needed.
pub fn write_bundle(result: &OptimizationResult, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(SEQUENCE_FILE), sequence_csv(result))?;
    fs::write(dir.join(TOTALS_FILE), totals_csv(result))?;
    fs::write(dir.join(SUB_MATRIX_FILE), sub_matrix_csv(result))?;
    Ok(())
}

pub fn sequence_csv(result: &OptimizationResult) -> String {
    let mut out = String::from("Position,Optimized_Sequence\n");
    for (i, item) in result.sequence.iter().enumerate() {
        out.push_str(&format!("{},{}\n", i + 1, field(item.as_str())));
    }
    out
}

pub fn totals_csv(result: &OptimizationResult) -> String {
    let mut out = String::from("Item,Total_Tools\n");
    for total in &result.summary.tool_totals {
        out.push_str(&format!("{},{}\n", field(total.item.as_str()), total.total_tools));
    }
    out
}

pub fn sub_matrix_csv(result: &OptimizationResult) -> String {
    let matrix = &result.sub_matrix;
    let mut out = String::from("Item");
    for item in matrix.items() {
        out.push(',');
        out.push_str(&field(item.as_str()));
    }
    out.push('\n');
    for (item, row) in matrix.rows() {
        out.push_str(&field(item.as_str()));
        for value in row {
            out.push_str(&format!(",{}", value));
        }
        out.push('\n');
    }
    out
}

/// Quote a field when it contains a delimiter, quote or line break.
fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
