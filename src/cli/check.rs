//! `seqplot check`: parse plots and summarize them.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use super::common::{parse_source, read_source};
use crate::config::PlotConfig;
use crate::logger::{status_error, status_success, status_warning};
use crate::plot::Plot;
use crate::utils::plural::plural_count;
use crate::{debug, debug_do};

/// Check every file, reporting each; fails if any did not parse.
pub fn run_check(files: &[PathBuf], config: &PlotConfig) -> Result<()> {
    let mut failed = 0;
    for file in files {
        if !check_file(file, config) {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!(
            "found {} out of {}",
            plural_count(failed, "invalid plot"),
            files.len()
        );
    }
    Ok(())
}

fn check_file(file: &Path, config: &PlotConfig) -> bool {
    let source = file.display().to_string();
    let raw = match read_source(file) {
        Ok(raw) => raw,
        Err(err) => {
            status_error(&source, &format!("{err:#}"));
            return false;
        }
    };

    match parse_source(file, &raw, config) {
        Ok(plot) => {
            status_success(&summary(&plot));
            if plot.messages().is_empty() {
                status_warning(&format!("{source}: no messages"));
            }
            debug_do! {
                for view in plot.views() {
                    debug!("plot"; "{view}");
                }
            }
            true
        }
        Err(err) => {
            status_error(&source, &err.diagnostic(&source));
            false
        }
    }
}

/// One-line plot summary: `login.plot: 3 actors (A, B, C), 5 messages`.
pub fn summary(plot: &Plot) -> String {
    let names: Vec<&str> = plot.actors().iter().map(|a| a.name.as_str()).collect();
    format!(
        "{}: {} ({}), {}",
        plot.source,
        plural_count(names.len(), "actor"),
        names.join(", "),
        plural_count(plot.messages().len(), "message")
    )
}
