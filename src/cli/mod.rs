//! Command-line interface module.

mod args;
pub mod check;
pub mod common;
pub mod edit;
pub mod export;
pub mod show;
pub mod transcript;

pub use args::{Cli, Commands, EditOp};
