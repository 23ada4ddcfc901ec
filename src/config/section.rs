//! Configuration section definitions.
//!
//! | Struct            | TOML Section   | Purpose                         |
//! |-------------------|----------------|---------------------------------|
//! | `PlotSection`     | `[plot]`       | Plot title                      |
//! | `RenderSection`   | `[render]`     | Renderer column width           |
//! | `TemplateSection` | `[templates]`  | Template directory              |
//! | `ActionSection`   | `[[actions]]`  | Title-triggered template actions|

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigDiagnostics;
use crate::render::{MIN_COLUMN_WIDTH, MIN_RENDER_WIDTH};

/// `[plot]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSection {
    /// Plot title. Falls back to the input file stem.
    pub title: Option<String>,
}

/// `[render]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    pub min_width: usize,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            min_width: MIN_COLUMN_WIDTH,
        }
    }
}

impl RenderSection {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.min_width < MIN_RENDER_WIDTH {
            diag.error_with_hint(
                "render.min_width",
                format!("must be at least {MIN_RENDER_WIDTH}, got {}", self.min_width),
                format!("the default is {MIN_COLUMN_WIDTH}"),
            );
        }
    }
}

/// `[templates]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSection {
    /// Directory searched before the built-in templates.
    pub dir: Option<PathBuf>,
}

/// One `[[actions]]` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionSection {
    pub name: String,

    /// Title literal to trigger on. Absent fires on every message.
    #[serde(default)]
    pub title: Option<String>,

    /// Template identifier.
    #[serde(default)]
    pub template: String,
}

impl ActionSection {
    pub fn validate(actions: &[Self], diag: &mut ConfigDiagnostics) {
        for (i, action) in actions.iter().enumerate() {
            if action.name.trim().is_empty() {
                diag.error(format!("actions[{i}].name"), "must not be empty");
            } else if actions[..i].iter().any(|other| other.name == action.name) {
                diag.error(
                    format!("actions[{i}].name"),
                    format!("action `{}` is defined twice", action.name),
                );
            }
            if action.template.trim().is_empty() {
                diag.error_with_hint(
                    format!("actions[{i}].template"),
                    "must name a template",
                    "built-in templates: show.txt, transcript.txt",
                );
            }
        }
    }
}
