//! Domain types for toolseq
//!
//! - ItemId: identifier of a manufacturing item
//! - Sequence: ordered items produced by the sequencer
//! - EfficiencySummary: tool totals, transition savings and aggregate metrics

pub mod item;
pub mod sequence;
pub mod summary;

pub use item::{ItemId, item_ids};
pub use sequence::Sequence;
pub use summary::{EfficiencySummary, ItemTotal, Transition};
