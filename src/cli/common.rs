//! Common utilities shared across CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::config::PlotConfig;
use crate::logger::status_error;
use crate::parser::{ParseError, parse};
use crate::plot::Plot;
use crate::{debug, log};

/// Read a plot file.
pub fn read_source(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

/// Parse already-read text, titled from config or the file stem.
pub fn parse_source(file: &Path, raw: &str, config: &PlotConfig) -> Result<Plot, ParseError> {
    parse(config.plot_title(file), file.display().to_string(), raw)
}

/// Read and parse, printing a caret diagnostic on parse failure.
pub fn read_plot(file: &Path, config: &PlotConfig) -> Result<Plot> {
    let raw = read_source(file)?;
    let plot = parse_source(file, &raw, config).map_err(|err| {
        let source = file.display().to_string();
        status_error(&source, &err.diagnostic(&source));
        anyhow!("failed to parse {source}")
    })?;
    debug!("parse"; "{} `{}` (id {})", plot.source, plot.title, plot.id().get());
    Ok(plot)
}

/// Write to `output` when given, else stdout.
pub fn write_output(module: &str, text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            log!(module; "wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
