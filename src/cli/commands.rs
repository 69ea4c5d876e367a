//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - centers: list work centers under the data directory
//! - items: list the items of one matrix
//! - optimize: greedy tool sequence for a selection
//! - evaluate: metrics for a manual order

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use toolseq::ItemId;
use toolseq::export::ExportFormat;

/// toolseq - Order work-center items to minimize tool changes
#[derive(Parser, Debug)]
#[command(name = "toolseq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List work centers that have a tool matrix
    Centers,

    /// List the items of a tool matrix with their tool totals
    Items {
        #[command(flatten)]
        source: MatrixSource,
    },

    /// Compute the greedy tool sequence for selected items
    Optimize {
        #[command(flatten)]
        source: MatrixSource,

        /// Items to sequence, comma separated (default: first items of the matrix)
        #[arg(short, long, value_delimiter = ',')]
        items: Vec<String>,

        /// Starting item (default: first selected item)
        #[arg(short, long)]
        start: Option<String>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Score a manual item order
    Evaluate {
        #[command(flatten)]
        source: MatrixSource,

        /// Items in the order to score, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        items: Vec<String>,

        #[command(flatten)]
        export: ExportArgs,
    },
}

/// Where the tool matrix comes from
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct MatrixSource {
    /// Work center name under the data directory
    #[arg(short, long)]
    pub work_center: Option<String>,

    /// Path to a matrix file (xlsx, csv, tsv, json, yml)
    #[arg(short, long)]
    pub matrix: Option<PathBuf>,
}

/// Result export options
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Write results to disk
    #[arg(short, long)]
    pub export: bool,

    /// Export format: csv, json, yaml or xlsx (default from config)
    #[arg(short, long, requires = "export")]
    pub format: Option<ExportFormat>,

    /// Output path (default: next to the matrix)
    #[arg(short, long, requires = "export")]
    pub output: Option<PathBuf>,
}

/// Convert raw CLI item names to item ids, dropping blanks
pub fn to_item_ids(items: &[String]) -> Vec<ItemId> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(ItemId::from)
        .collect()
}
