//! Work-center discovery.
//!
//! A data directory holds one subdirectory per work center. A subdirectory
//! counts as a work center when it contains `<matrix_stem>.<ext>` for a
//! supported matrix extension.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, SequencerError};
use crate::matrix::MatrixFormat;

/// Default matrix file stem inside a work-center directory.
pub const DEFAULT_MATRIX_STEM: &str = "Tool_Matrix";

/// A work center and the matrix file found for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCenter {
    pub name: String,
    pub dir: PathBuf,
    pub matrix_path: PathBuf,
}

/// All work centers under `data_dir`, sorted by name.
///
/// When a directory holds the matrix in several formats, the first in
/// `MatrixFormat::ALL` order wins.
pub fn discover(data_dir: &Path, matrix_stem: &str) -> Result<Vec<WorkCenter>> {
    let base = glob::Pattern::escape(&data_dir.to_string_lossy());
    let stem = glob::Pattern::escape(matrix_stem);
    let pattern = format!("{}/*/{}.*", base, stem);

    let mut found: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();
    for path in glob::glob(&pattern)?.filter_map(|r| r.ok()) {
        let Ok(format) = MatrixFormat::from_path(&path) else {
            continue;
        };
        let Some(name) = path
            .parent()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().to_string())
        else {
            continue;
        };
        let rank = MatrixFormat::ALL
            .iter()
            .position(|f| *f == format)
            .unwrap_or(usize::MAX);
        if found.get(&name).is_none_or(|(existing, _)| rank < *existing) {
            found.insert(name, (rank, path));
        }
    }

    let centers: Vec<WorkCenter> = found
        .into_iter()
        .map(|(name, (_, matrix_path))| WorkCenter {
            dir: data_dir.join(&name),
            name,
            matrix_path,
        })
        .collect();
    tracing::debug!(data_dir = %data_dir.display(), count = centers.len(), "Discovered work centers");
    Ok(centers)
}

/// The work center called `name`, or `WorkCenterNotFound`.
pub fn find(data_dir: &Path, matrix_stem: &str, name: &str) -> Result<WorkCenter> {
    discover(data_dir, matrix_stem)?
        .into_iter()
        .find(|wc| wc.name == name)
        .ok_or_else(|| {
            SequencerError::WorkCenterNotFound(format!(
                "'{}' (no {}.* under {})",
                name,
                matrix_stem,
                data_dir.join(name).display()
            ))
        })
}
