//! seqplot - parse, edit, render and act on ASCII sequence diagrams.

mod action;
mod cli;
mod config;
mod embed;
mod logger;
mod parser;
mod plot;
mod render;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PlotConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = PlotConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Check { files } => cli::check::run_check(files, &config),
        Commands::Show { file } => cli::show::run_show(file, &config),
        Commands::Transcript { file, output } => {
            cli::transcript::run_transcript(file, output.as_deref(), &config)
        }
        Commands::Export { file, output } => {
            cli::export::run_export(file, output.as_deref(), &config)
        }
        Commands::Edit { file, write, op } => cli::edit::run_edit(file, op, *write, &config),
    }
}
