//! Excel results workbook.
//!
//! Three sheets:
//! - `Sequence`: one `Optimized_Sequence` column
//! - `Tool_Totals`: `Item`, `Total_Tools`, in selection order
//! - `Sub_Matrix`: the sub-matrix in sequence order, ids in the first row and column

use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::{Result, SequencerError};
use crate::sequencer::OptimizationResult;

pub const SEQUENCE_SHEET: &str = "Sequence";
pub const TOTALS_SHEET: &str = "Tool_Totals";
pub const SUB_MATRIX_SHEET: &str = "Sub_Matrix";

/// Write the results workbook to `path`, creating parent directories.
pub fn write_workbook(result: &OptimizationResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut workbook = build_workbook(result)?;
    workbook.save(path)?;
    Ok(())
}

fn build_workbook(result: &OptimizationResult) -> Result<Workbook> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet().set_name(SEQUENCE_SHEET)?;
    sheet.write_string_with_format(0, 0, "Optimized_Sequence", &header)?;
    for (i, item) in result.sequence.iter().enumerate() {
        sheet.write_string(row(i + 1)?, 0, item.as_str())?;
    }

    let sheet = workbook.add_worksheet().set_name(TOTALS_SHEET)?;
    sheet.write_string_with_format(0, 0, "Item", &header)?;
    sheet.write_string_with_format(0, 1, "Total_Tools", &header)?;
    for (i, total) in result.summary.tool_totals.iter().enumerate() {
        let r = row(i + 1)?;
        sheet.write_string(r, 0, total.item.as_str())?;
        sheet.write_number(r, 1, total.total_tools)?;
    }

    let matrix = &result.sub_matrix;
    let sheet = workbook.add_worksheet().set_name(SUB_MATRIX_SHEET)?;
    sheet.write_string_with_format(0, 0, "Item", &header)?;
    for (i, item) in matrix.items().iter().enumerate() {
        sheet.write_string_with_format(0, col(i + 1)?, item.as_str(), &header)?;
    }
    for (i, (item, values)) in matrix.rows().enumerate() {
        let r = row(i + 1)?;
        sheet.write_string_with_format(r, 0, item.as_str(), &header)?;
        for (j, value) in values.iter().enumerate() {
            sheet.write_number(r, col(j + 1)?, *value)?;
        }
    }

    Ok(workbook)
}

fn row(i: usize) -> Result<u32> {
    u32::try_from(i).map_err(|_| too_large())
}

fn col(j: usize) -> Result<u16> {
    u16::try_from(j).map_err(|_| too_large())
}

fn too_large() -> SequencerError {
    SequencerError::UnsupportedFormat("result too large for an Excel worksheet".to_string())
}
