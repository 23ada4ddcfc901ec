//! `seqplot transcript`: run configured actions in accumulate mode.

use std::path::Path;

use anyhow::Result;

use super::common::{read_plot, write_output};
use crate::action::accumulate;
use crate::config::PlotConfig;
use crate::plot::Plot;

pub fn run_transcript(file: &Path, output: Option<&Path>, config: &PlotConfig) -> Result<()> {
    let plot = read_plot(file, config)?;
    let text = transcript(&plot, config)?;
    write_output("transcript", &text, output)
}

/// Concatenated output of every matching action, message by message.
pub fn transcript(plot: &Plot, config: &PlotConfig) -> Result<String> {
    let registry = config.registry()?;
    let store = config.template_store();
    Ok(accumulate(&registry, plot, &store)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use std::fs;

    const TEXT: &str = "\
Client Server
|---->| LOGIN {\"user\": \"alice\"}
|<----| OK welcome";

    #[test]
    fn test_default_transcript() {
        let plot = parse("t", "t.plot", TEXT).unwrap();
        let text = transcript(&plot, &PlotConfig::default()).unwrap();
        assert_eq!(
            text,
            "Client --> Server: LOGIN \nServer --> Client: OK welcome\n"
        );
    }

    #[test]
    fn test_configured_actions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("login.txt"), "__DATA.user__ logs in").unwrap();
        fs::write(dir.path().join("line.txt"), "__NUMBER__. __TITLE__").unwrap();

        let mut config = PlotConfig::from_str(
            r#"
            [templates]
            dir = "."

            [[actions]]
            name = "login"
            title = "login"
            template = "login.txt"

            [[actions]]
            name = "every"
            template = "line.txt"
            "#,
        )
        .unwrap();
        config.root = dir.path().to_path_buf();

        let plot = parse("t", "t.plot", TEXT).unwrap();
        let text = transcript(&plot, &config).unwrap();
        assert_eq!(text, "alice logs in\n1. LOGIN\n2. OK\n");
    }

    #[test]
    fn test_run_transcript_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("flow.plot");
        let output = dir.path().join("flow.txt");
        fs::write(&input, TEXT).unwrap();

        run_transcript(&input, Some(&output), &PlotConfig::default()).unwrap();
        let written = fs::read_to_string(output).unwrap();
        assert_eq!(written.lines().count(), 2);
    }
}
