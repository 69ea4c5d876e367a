//! Matrix loading from delimited text, JSON, YAML and Excel workbooks.
//!
//! Delimited files carry a header row of column item ids after a corner
//! cell, then one row per item: `row_id, v1, v2, ...`. JSON and YAML files
//! carry the `MatrixTable` shape `{ items: [...], rows: [[...]] }`. Workbooks
//! hold the delimited layout on their `Tool_Matrix` sheet.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::domain::ItemId;
use crate::error::{Result, SequencerError};
use crate::matrix::{MatrixTable, ToolMatrix, workbook};

/// Supported matrix file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixFormat {
    Xlsx,
    Csv,
    Tsv,
    Json,
    Yaml,
}

impl MatrixFormat {
    /// All formats, in the order work-center discovery tries them.
    pub const ALL: [MatrixFormat; 5] = [Self::Xlsx, Self::Csv, Self::Tsv, Self::Json, Self::Yaml];

    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                SequencerError::UnsupportedFormat(format!(
                    "{} has no file extension",
                    path.display()
                ))
            })?;
        ext.parse()
    }

    /// Extensions recognized for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Xlsx => &["xlsx", "xlsm"],
            Self::Csv => &["csv"],
            Self::Tsv => &["tsv"],
            Self::Json => &["json"],
            Self::Yaml => &["yml", "yaml"],
        }
    }
}

impl FromStr for MatrixFormat {
    type Err = SequencerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" | "xlsm" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            "yml" | "yaml" => Ok(Self::Yaml),
            other => Err(SequencerError::UnsupportedFormat(format!(
                "matrix extension '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extensions()[0])
    }
}

/// Load a matrix from a file, choosing the format by extension.
pub fn load_path(path: impl AsRef<Path>) -> Result<ToolMatrix> {
    let path = path.as_ref();
    let format = MatrixFormat::from_path(path)?;
    let bytes = read_matrix_file(path)?;
    let matrix = parse_bytes(&bytes, format)?;
    tracing::debug!(path = %path.display(), items = matrix.len(), "Loaded tool matrix");
    Ok(matrix)
}

pub(crate) fn read_matrix_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        SequencerError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read matrix {:?}: {}", path, e),
        ))
    })
}

/// Parse raw file content in the given format.
pub fn parse_bytes(bytes: &[u8], format: MatrixFormat) -> Result<ToolMatrix> {
    if format == MatrixFormat::Xlsx {
        return workbook::parse_workbook(bytes);
    }
    let content = std::str::from_utf8(bytes).map_err(|e| {
        SequencerError::MalformedMatrix(format!("{} content is not valid UTF-8: {}", format, e))
    })?;
    parse_str(content, format)
}

/// Parse matrix text in the given format.
///
/// Workbooks are binary; pass them to `parse_bytes`.
pub fn parse_str(content: &str, format: MatrixFormat) -> Result<ToolMatrix> {
    match format {
        MatrixFormat::Csv => parse_delimited(content, ','),
        MatrixFormat::Tsv => parse_delimited(content, '\t'),
        MatrixFormat::Json => {
            let table: MatrixTable = serde_json::from_str(content)?;
            ToolMatrix::try_from(table)
        }
        MatrixFormat::Yaml => {
            let table: MatrixTable = serde_yaml::from_str(content)?;
            ToolMatrix::try_from(table)
        }
        MatrixFormat::Xlsx => Err(SequencerError::UnsupportedFormat(
            "xlsx content is binary, not text".to_string(),
        )),
    }
}

fn parse_delimited(content: &str, delimiter: char) -> Result<ToolMatrix> {
    let content = content.trim_start_matches('\u{feff}');
    let mut records = read_records(content, delimiter)?.into_iter();

    let header = records.next().ok_or_else(|| {
        SequencerError::MalformedMatrix("file is empty, expected a header row".to_string())
    })?;
    let columns: Vec<ItemId> = header
        .fields
        .into_iter()
        .skip(1)
        .map(ItemId::new)
        .collect();
    if columns.is_empty() {
        return Err(SequencerError::MalformedMatrix(
            "header row has no item columns".to_string(),
        ));
    }

    let mut row_labels = Vec::with_capacity(columns.len());
    let mut rows = Vec::with_capacity(columns.len());
    for Record { line, fields } in records {
        let mut cells = fields.into_iter();
        let label = cells.next().unwrap_or_default();
        if label.is_empty() {
            return Err(SequencerError::MalformedMatrix(format!(
                "line {}: missing item id",
                line
            )));
        }
        let values = cells
            .enumerate()
            .map(|(col, cell)| {
                cell.parse::<f64>().map_err(|_| {
                    SequencerError::MalformedMatrix(format!(
                        "line {}, column {}: '{}' is not a number",
                        line,
                        col + 2,
                        cell
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        if values.len() != columns.len() {
            return Err(SequencerError::MalformedMatrix(format!(
                "line {}: {} values, header names {} items",
                line,
                values.len(),
                columns.len()
            )));
        }
        row_labels.push(ItemId::new(label));
        rows.push(values);
    }

    ToolMatrix::from_labeled(row_labels, columns, rows)
}

/// One delimited record and the line it starts on.
#[derive(Debug, PartialEq)]
struct Record {
    line: usize,
    fields: Vec<String>,
}

/// Split delimited text into records, honouring double-quoted fields.
///
/// Quoted fields may span lines. Blank lines are skipped and `\r\n` endings
/// are accepted.
fn read_records(content: &str, delimiter: char) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                quoted = true;
            }
            '\n' if !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
                push_record(&mut records, record_line, std::mem::take(&mut fields), quoted);
                quoted = false;
                line += 1;
                record_line = line;
            }
            '\r' if !in_quotes => {}
            c if c == delimiter && !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            c => {
                if c == '\n' {
                    line += 1;
                }
                field.push(c);
            }
        }
    }

    if in_quotes {
        return Err(SequencerError::MalformedMatrix(format!(
            "line {}: unterminated quoted field",
            record_line
        )));
    }
    fields.push(field.trim().to_string());
    push_record(&mut records, record_line, fields, quoted);
    Ok(records)
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>, quoted: bool) {
    let blank = !quoted && fields.iter().all(|f| f.is_empty());
    if !blank {
        records.push(Record { line, fields });
    }
}
