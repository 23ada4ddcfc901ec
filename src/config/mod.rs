//! Project configuration from `plot.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section    # [plot], [render], [templates], [[actions]]
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── util       # upward config search, path resolution
//! └── mod.rs     # PlotConfig (this file)
//! ```
//!
//! The file is optional: without one every section takes its default and
//! only the built-in templates are available.

mod error;
mod section;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use section::{ActionSection, PlotSection, RenderSection, TemplateSection};

use util::{find_config_file, resolve_against};

use crate::action::{
    Action, ActionRegistry, DirLoader, EmbeddedLoader, RegistrationError, TemplateStore,
};
use crate::render::Renderer;
use crate::{debug, log};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_NAME: &str = "plot.toml";

/// Template rendered per message when no actions are configured.
pub const TRANSCRIPT_TEMPLATE: &str = "transcript.txt";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing plot.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths resolve against
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub plot: PlotSection,

    #[serde(default)]
    pub render: RenderSection,

    #[serde(default)]
    pub templates: TemplateSection,

    #[serde(default)]
    pub actions: Vec<ActionSection>,
}

impl PlotConfig {
    /// Load configuration for the current directory.
    ///
    /// `explicit` must exist. Without it `plot.toml` is searched upward from
    /// cwd and defaults are used when none is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let name = explicit.unwrap_or(Path::new(DEFAULT_CONFIG_NAME));

        let Some(config_path) = find_config_file(&cwd, name) else {
            if let Some(path) = explicit {
                bail!(ConfigError::Io(
                    path.to_path_buf(),
                    std::io::Error::from(std::io::ErrorKind::NotFound)
                ));
            }
            debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG_NAME);
            return Ok(Self {
                root: cwd,
                ..Self::default()
            });
        };

        let mut config = Self::from_path(&config_path)?;
        config.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.config_path = config_path;
        config.validate()?;

        debug!("config"; "loaded {}", config.config_path.display());
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Validate all sections, collecting every error.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.render.validate(&mut diag);
        ActionSection::validate(&self.actions, &mut diag);
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    // ------------------------------------------------------------------------
    // derived values
    // ------------------------------------------------------------------------

    /// Plot title: `[plot] title`, else the input file stem.
    pub fn plot_title(&self, input: &Path) -> String {
        self.plot.title.clone().unwrap_or_else(|| {
            input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }

    /// Template directory resolved against the config root.
    pub fn templates_dir(&self) -> Option<PathBuf> {
        self.templates
            .dir
            .as_deref()
            .map(|dir| resolve_against(&self.root, dir))
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.render.min_width)
    }

    /// Template store over the configured directory or the built-ins.
    pub fn template_store(&self) -> TemplateStore {
        match self.templates_dir() {
            Some(dir) => TemplateStore::new(DirLoader::new(dir)),
            None => TemplateStore::new(EmbeddedLoader),
        }
    }

    /// Registry for `[[actions]]`, or a single transcript action when empty.
    pub fn registry(&self) -> Result<ActionRegistry, RegistrationError> {
        let mut registry = ActionRegistry::new();
        if self.actions.is_empty() {
            registry.add(
                Action::builder("transcript")
                    .trigger(|_, _| true)
                    .template(TRANSCRIPT_TEMPLATE),
            )?;
            return Ok(registry);
        }

        for section in &self.actions {
            let builder = Action::builder(&section.name).template(&section.template);
            let builder = match &section.title {
                Some(title) => builder.on_title(title),
                None => builder.trigger(|_, _| true),
            };
            registry.add(builder)?;
        }
        Ok(registry)
    }
}

// ============================================================================
// tests
// ============================================================================
