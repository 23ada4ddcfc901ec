//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// ASCII sequence diagram toolkit
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: plot.toml, searched upward, optional)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Parse plots and report actors and messages
    #[command(visible_alias = "c")]
    Check {
        /// Plot files to check
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },

    /// Print every message (dispatch mode)
    Show {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Run configured actions over every message (accumulate mode)
    #[command(visible_alias = "t")]
    Transcript {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Write output to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Parse then render back to normalized plot text
    #[command(visible_alias = "e")]
    Export {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Write output to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Apply one edit and print the rendered result
    Edit {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Overwrite the input file instead of printing
        #[arg(short, long)]
        write: bool,

        #[command(subcommand)]
        op: EditOp,
    },
}

/// Edits applied by `seqplot edit`.
///
/// Messages are addressed by order and actors by column, both 0-based as
/// printed by `seqplot check --verbose`.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Add a message from one actor column to another
    NewMessage {
        from: usize,
        to: usize,
        title: String,

        /// Text after the title
        #[arg(long)]
        content: Option<String>,

        /// Insert at this order instead of appending
        #[arg(short, long)]
        position: Option<usize>,

        /// Draw a both-ended arrow
        #[arg(long)]
        both: bool,
    },

    /// Remove a message
    DeleteMessage { order: usize },

    /// Move a message one position earlier
    MessageUp { order: usize },

    /// Move a message one position later
    MessageDown { order: usize },

    /// Swap two messages
    SwapMessages { a: usize, b: usize },

    /// Swap an actor with its left neighbour
    ActorLeft { column: usize },

    /// Swap an actor with its right neighbour
    ActorRight { column: usize },

    /// Point a message at other actor columns
    SetEndpoints {
        order: usize,
        from: usize,
        to: usize,

        /// Draw a both-ended arrow
        #[arg(long)]
        both: bool,
    },

    /// Replace a message title
    SetTitle { order: usize, title: String },

    /// Replace a message content
    SetContent { order: usize, content: String },

    /// Replace a message data object (JSON)
    SetData { order: usize, json: String },

    /// Set one actor data field (JSON value, or a plain string)
    ActorData {
        column: usize,
        key: String,
        value: String,
    },
}
