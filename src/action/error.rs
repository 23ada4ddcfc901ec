//! Action pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

/// An action could not be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("action `{0}` has no trigger (set one or give a title to match)")]
    MissingTrigger(String),

    #[error("action `{0}` has no execute (set one or give a template)")]
    MissingExecute(String),

    #[error("action `{0}` is already registered")]
    Duplicate(String),
}

/// A template could not be loaded or compiled.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template `{0}` not found")]
    NotFound(String),

    #[error("IO error when reading template `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("unknown placeholder `__{name}__` in template `{id}`")]
    UnknownPlaceholder { id: String, name: String },
}

/// A pipeline run failed before or while executing actions.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Template(#[from] TemplateError),
}
