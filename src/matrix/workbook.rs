//! Excel workbook input.
//!
//! A work-center workbook keeps its matrix on the `Tool_Matrix` sheet: item
//! ids across the first row after a corner cell, item ids down the first
//! column, shared-tool counts in between. Blank value cells count as zero.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::domain::ItemId;
use crate::error::{Result, SequencerError};
use crate::matrix::ToolMatrix;

/// Sheet holding the matrix inside a work-center workbook.
pub const MATRIX_SHEET: &str = "Tool_Matrix";

/// Parse the `Tool_Matrix` sheet of an `.xlsx` workbook.
pub(crate) fn parse_workbook(bytes: &[u8]) -> Result<ToolMatrix> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let sheets = workbook.sheet_names();
    if !sheets.iter().any(|name| name == MATRIX_SHEET) {
        return Err(SequencerError::MalformedMatrix(format!(
            "workbook has no '{}' sheet (found: {})",
            MATRIX_SHEET,
            sheets.join(", ")
        )));
    }

    let range = workbook.worksheet_range(MATRIX_SHEET)?;
    let (first_row, first_col) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));
    let at = |row: usize, col: usize| cell_ref(first_row + row, first_col + col);

    let mut sheet_rows = range.rows().enumerate();
    let Some((_, header)) = sheet_rows.next() else {
        return Err(SequencerError::MalformedMatrix(format!(
            "'{}' sheet is empty, expected a header row",
            MATRIX_SHEET
        )));
    };

    let last = header.iter().rposition(|cell| !is_blank(cell)).unwrap_or(0);
    if last == 0 {
        return Err(SequencerError::MalformedMatrix(
            "header row has no item columns".to_string(),
        ));
    }
    let columns = header[1..=last]
        .iter()
        .enumerate()
        .map(|(c, cell)| {
            let id = cell_text(cell);
            if id.is_empty() {
                return Err(SequencerError::MalformedMatrix(format!(
                    "{}: header cell has no item id",
                    at(0, c + 1)
                )));
            }
            Ok(ItemId::new(id))
        })
        .collect::<Result<Vec<ItemId>>>()?;

    let mut row_labels = Vec::with_capacity(columns.len());
    let mut rows = Vec::with_capacity(columns.len());
    for (r, row) in sheet_rows {
        if row.iter().all(is_blank) {
            continue;
        }
        let label = row.first().map(cell_text).unwrap_or_default();
        if label.is_empty() {
            return Err(SequencerError::MalformedMatrix(format!(
                "{}: missing item id",
                at(r, 0)
            )));
        }
        if let Some(extra) = row.iter().skip(last + 1).position(|cell| !is_blank(cell)) {
            return Err(SequencerError::MalformedMatrix(format!(
                "{}: value outside the header columns",
                at(r, last + 1 + extra)
            )));
        }

        let values = (1..=last)
            .map(|c| match row.get(c) {
                None => Ok(0.0),
                Some(cell) => cell_value(cell).ok_or_else(|| {
                    SequencerError::MalformedMatrix(format!(
                        "{}: '{}' is not a number",
                        at(r, c),
                        cell_text(cell)
                    ))
                }),
            })
            .collect::<Result<Vec<f64>>>()?;
        row_labels.push(ItemId::new(label));
        rows.push(values);
    }

    tracing::debug!(sheet = MATRIX_SHEET, items = row_labels.len(), "Read workbook matrix");
    ToolMatrix::from_labeled(row_labels, columns, rows)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Item id text of a cell. Numeric ids print without a fractional part.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(n) => n.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(n) => Some(*n as f64),
        Data::Empty => Some(0.0),
        Data::String(s) if s.trim().is_empty() => Some(0.0),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Spreadsheet reference such as `B3` for a zero-based row and column.
fn cell_ref(row: usize, col: usize) -> String {
    let mut letters = String::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.insert(0, char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    format!("{}{}", letters, row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item_ids;
    use rust_xlsxwriter::Workbook;

    enum Cell<'a> {
        Text(&'a str),
        Number(f64),
        Blank,
    }

    use Cell::{Blank, Number, Text};

    fn workbook_bytes(sheet: &str, rows: &[Vec<Cell<'_>>]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet().set_name(sheet).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Text(s) => {
                        worksheet.write_string(r as u32, c as u16, *s).unwrap();
                    }
                    Number(v) => {
                        worksheet.write_number(r as u32, c as u16, *v).unwrap();
                    }
                    Blank => {}
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_reads_tool_matrix_sheet() {
        let bytes = workbook_bytes(
            MATRIX_SHEET,
            &[
                vec![Blank, Text("A"), Text("B"), Text("C")],
                vec![Text("A"), Number(0.0), Number(5.0), Number(1.0)],
                vec![Text("B"), Number(5.0), Number(0.0), Number(3.0)],
                vec![Text("C"), Number(1.0), Number(3.0), Number(0.0)],
            ],
        );
        let m = parse_workbook(&bytes).unwrap();
        assert_eq!(m.items(), item_ids(["A", "B", "C"]).as_slice());
        assert_eq!(m.get("B", "C"), Some(3.0));
    }

    #[test]
    fn test_numeric_ids_and_blank_cells() {
        let bytes = workbook_bytes(
            MATRIX_SHEET,
            &[
                vec![Text("Item"), Number(101.0), Number(102.0)],
                vec![Number(102.0), Number(2.0), Blank],
                vec![Number(101.0), Blank, Number(2.0)],
            ],
        );
        let m = parse_workbook(&bytes).unwrap();
        assert_eq!(m.items(), item_ids(["102", "101"]).as_slice());
        assert_eq!(m.get("101", "102"), Some(2.0));
        assert_eq!(m.get("102", "102"), Some(0.0));
    }

    #[test]
    fn test_missing_sheet() {
        let bytes = workbook_bytes("Sheet1", &[vec![Blank, Text("A")]]);
        let err = parse_workbook(&bytes).unwrap_err();
        assert!(err.to_string().contains("no 'Tool_Matrix' sheet (found: Sheet1)"));
    }

    #[test]
    fn test_text_value_reports_cell() {
        let bytes = workbook_bytes(
            MATRIX_SHEET,
            &[
                vec![Blank, Text("A"), Text("B")],
                vec![Text("A"), Number(0.0), Text("n/a")],
                vec![Text("B"), Number(1.0), Number(0.0)],
            ],
        );
        let err = parse_workbook(&bytes).unwrap_err();
        assert!(err.to_string().contains("C2: 'n/a' is not a number"));
    }

    #[test]
    fn test_value_outside_header() {
        let bytes = workbook_bytes(
            MATRIX_SHEET,
            &[
                vec![Blank, Text("A")],
                vec![Text("A"), Number(1.0), Number(9.0)],
            ],
        );
        let err = parse_workbook(&bytes).unwrap_err();
        assert!(err.to_string().contains("C2: value outside the header columns"));
    }

    #[test]
    fn test_not_a_workbook() {
        let err = parse_workbook(b"Item,A\nA,1\n").unwrap_err();
        assert!(matches!(err, SequencerError::Workbook(_)));
    }

    #[test]
    fn test_cell_ref() {
        assert_eq!(cell_ref(0, 0), "A1");
        assert_eq!(cell_ref(2, 1), "B3");
        assert_eq!(cell_ref(9, 25), "Z10");
        assert_eq!(cell_ref(0, 26), "AA1");
    }
}
