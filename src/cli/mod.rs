//! CLI module for toolseq - command-line interface and terminal rendering.
//!
//! Provides the main entry point with subcommands for listing work centers
//! and items, optimizing a sequence and scoring a manual order.

pub mod commands;
pub mod render;

pub use commands::Cli;
