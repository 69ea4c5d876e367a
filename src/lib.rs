//! toolseq - Tool sequencing for manufacturing work centers
//!
//! Orders the items of a work center so that consecutive items share as many
//! tools as possible, reducing physical tool changes. The sequencer is a pure
//! greedy nearest-neighbor pass over a symmetric matrix of shared-tool
//! counts; loading, caching, discovery and export sit around it.

pub mod domain;
pub mod error;
pub mod export;
pub mod matrix;
pub mod request;
pub mod sequencer;
pub mod workcenter;

pub use domain::{EfficiencySummary, ItemId, Sequence};
pub use error::{Result, SequencerError};
pub use matrix::{MatrixCache, ToolMatrix};
pub use sequencer::{OptimizationResult, evaluate, optimize_sequence, plan, restrict, summarize};
