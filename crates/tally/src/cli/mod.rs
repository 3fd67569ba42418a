//! CLI support for the `tally` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod output;
pub mod style;

pub use context::CommandContext;
