//! `seqplot export`: normalize a plot by rendering it back to text.

use std::path::Path;

use anyhow::Result;

use super::common::{read_plot, write_output};
use crate::config::PlotConfig;

pub fn run_export(file: &Path, output: Option<&Path>, config: &PlotConfig) -> Result<()> {
    let plot = read_plot(file, config)?;
    let text = config.renderer().render(&plot);
    write_output("export", &text, output)
}
