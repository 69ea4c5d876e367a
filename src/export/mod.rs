//! Result export.
//!
//! Writes an `OptimizationResult` as an Excel workbook or a CSV bundle (one
//! sheet or file each for the sequence, the tool totals and the reordered
//! sub-matrix), or as a single JSON/YAML report.

pub mod csv;
pub mod xlsx;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SequencerError};
use crate::sequencer::OptimizationResult;

/// Default export name, file or directory depending on format.
pub const DEFAULT_FILE_STEM: &str = "Optimization_Results";

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    #[serde(alias = "yml")]
    Yaml,
    Xlsx,
}

impl FromStr for ExportFormat {
    type Err = SequencerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(SequencerError::UnsupportedFormat(format!(
                "export format '{}' (expected csv, json, yaml or xlsx)",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// Single-file report: the result plus where and when it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub work_center: Option<String>,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: OptimizationResult,
}

impl OptimizationReport {
    pub fn new(result: OptimizationResult, work_center: Option<&str>) -> Self {
        Self {
            work_center: work_center.map(str::to_string),
            generated_at: Utc::now(),
            result,
        }
    }
}

/// Where results go by default: `dir/<file_stem>` plus an extension for
/// single-file formats.
pub fn default_output(dir: &Path, file_stem: &str, format: ExportFormat) -> PathBuf {
    match format {
        ExportFormat::Csv => dir.join(file_stem),
        ExportFormat::Json => dir.join(format!("{}.json", file_stem)),
        ExportFormat::Yaml => dir.join(format!("{}.yml", file_stem)),
        ExportFormat::Xlsx => dir.join(format!("{}.xlsx", file_stem)),
    }
}

/// Write `result` to `path` in `format` and return the path written.
///
/// For CSV, `path` is a directory that is created if missing.
pub fn write_result(
    result: &OptimizationResult,
    format: ExportFormat,
    path: &Path,
    work_center: Option<&str>,
) -> Result<PathBuf> {
    match format {
        ExportFormat::Csv => csv::write_bundle(result, path)?,
        ExportFormat::Xlsx => xlsx::write_workbook(result, path)?,
        ExportFormat::Json | ExportFormat::Yaml => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            let report = OptimizationReport::new(result.clone(), work_center);
            let content = if format == ExportFormat::Json {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_yaml::to_string(&report)?
            };
            fs::write(path, content)?;
        }
    }
    tracing::debug!(path = %path.display(), %format, "Exported optimization results");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item_ids;
    use crate::matrix::ToolMatrix;
    use crate::sequencer::plan;
    use tempfile::TempDir;

    fn result() -> OptimizationResult {
        let m = ToolMatrix::new(
            item_ids(["A", "B", "C"]),
            vec![
                vec![0.0, 5.0, 1.0],
                vec![5.0, 0.0, 3.0],
                vec![1.0, 3.0, 0.0],
            ],
        )
        .unwrap();
        plan(&m, m.items(), "A").unwrap()
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("yml".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("xls".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_serde() {
        let f: ExportFormat = serde_yaml::from_str("yml").unwrap();
        assert_eq!(f, ExportFormat::Yaml);
        assert_eq!(serde_json::to_string(&ExportFormat::Json).unwrap(), "\"json\"");
        let f: ExportFormat = serde_yaml::from_str("xlsx").unwrap();
        assert_eq!(f, ExportFormat::Xlsx);
    }

    #[test]
    fn test_default_output() {
        let dir = Path::new("data/WC1");
        assert_eq!(
            default_output(dir, DEFAULT_FILE_STEM, ExportFormat::Csv),
            PathBuf::from("data/WC1/Optimization_Results")
        );
        assert_eq!(
            default_output(dir, DEFAULT_FILE_STEM, ExportFormat::Yaml),
            PathBuf::from("data/WC1/Optimization_Results.yml")
        );
        assert_eq!(
            default_output(dir, DEFAULT_FILE_STEM, ExportFormat::Xlsx),
            PathBuf::from("data/WC1/Optimization_Results.xlsx")
        );
    }

    #[test]
    fn test_write_json_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/report.json");
        write_result(&result(), ExportFormat::Json, &path, Some("WC1")).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["work_center"], "WC1");
        assert_eq!(value["sequence"], serde_json::json!(["A", "B", "C"]));
        assert_eq!(value["summary"]["total_shared"], 8.0);
        assert_eq!(value["summary"]["effective_changes"], 2);
        assert_eq!(value["sub_matrix"]["items"], serde_json::json!(["A", "B", "C"]));
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_write_yaml_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.yml");
        write_result(&result(), ExportFormat::Yaml, &path, None).unwrap();

        let value: serde_yaml::Value =
            serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["adjusted_tools"].as_f64(), Some(10.0));
        assert!(value["work_center"].is_null());
    }
}
